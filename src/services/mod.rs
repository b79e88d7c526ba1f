use crate::io::ContentReader;
use crate::services::cache::PostCache;
use crate::services::listing::ListingService;
use crate::services::posts::PostService;
use crate::services::renderer::ArticleRenderer;
use crate::site::SiteConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub mod cache;
pub mod listing;
pub mod posts;
pub mod renderer;

/// The wired-up core: one cache shared by the renderer, the aggregator and the
/// listing pages built on top of them.
#[derive(Clone)]
pub struct Blog {
    pub cache: Arc<PostCache>,
    pub renderer: Arc<ArticleRenderer>,
    pub posts: Arc<PostService>,
    pub listings: Arc<ListingService>,
}

impl Blog {
    pub fn new(
        reader: Arc<dyn ContentReader>,
        site: Arc<SiteConfig>,
        max_cache_size: usize,
        posts_per_page: usize,
    ) -> Self {
        let cache = Arc::new(PostCache::new(max_cache_size));
        let renderer = Arc::new(ArticleRenderer::new(
            reader.clone(),
            site,
            cache.clone(),
        ));
        let posts = Arc::new(PostService::new(reader, renderer.clone(), cache.clone()));
        let listings = Arc::new(ListingService::new(
            posts.clone(),
            renderer.clone(),
            cache.clone(),
            posts_per_page,
        ));

        Self {
            cache,
            renderer,
            posts,
            listings,
        }
    }
}

/// Spawns the periodic flush, the only invalidation path for cached renders.
pub fn start_cache_reset_timer(cache: Arc<PostCache>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if cache.is_empty() {
                debug!("Cache reset timer fired with nothing rendered");
            } else {
                info!(
                    "Cache reset timer fired after {:?} ({}/{} entries)",
                    every,
                    cache.len(),
                    cache.max_size()
                );
            }
            cache.flush();
        }
    })
}

use crate::config::AlmanacConfig;
use crate::io::local::LocalContentReader;
use crate::services::{start_cache_reset_timer, Blog};
use crate::site::SiteConfig;
use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::info;

pub mod config;
mod domain;
mod error;
mod features;
mod io;
mod parser;
mod services;
mod site;

#[cfg(test)]
mod tests;

#[derive(Clone)]
pub struct AppState {
    pub blog: Blog,
    pub config: Arc<AlmanacConfig>,
}

// static assets win, everything else falls through to the blog routes
pub fn app(state: AppState) -> Router {
    let blog_routes = features::posts::posts_router().with_state(state.clone());
    Router::new().fallback_service(ServeDir::new(&state.config.public_dir).fallback(blog_routes))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AlmanacConfig::from_env()?;
    let shared_config = Arc::new(config.clone());

    // templates and site defaults are read once; handlers only ever see this snapshot
    let site = Arc::new(SiteConfig::load(&config.template_dir).await);

    let reader = Arc::new(LocalContentReader::new(config.content_dir.clone()));
    let blog = Blog::new(
        reader,
        site,
        config.max_cache_size,
        config.posts_per_page,
    );

    start_cache_reset_timer(blog.cache.clone(), config.cache_reset_interval);

    let app_state = AppState {
        blog,
        config: shared_config,
    };

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "Almanac v{} listening on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

use crate::domain::{Article, DayGroup, Page};
use crate::error::{AlmanacError, Result};
use crate::parser::locator::POSTS_ROOT;
use crate::parser::markdown::offset_footnotes;
use crate::parser::metadata::replace_metadata;
use crate::services::cache::PostCache;
use crate::services::posts::{AggregateOptions, DayFilter, PostService};
use crate::services::renderer::{ArticleRenderer, RenderedFile};
use crate::site::template_environment;
use minijinja::context;
use std::sync::Arc;
use tracing::debug;

pub const INDEX_SLOT: &str = "posts/index.md";
pub const DAY_TEMPLATE_KEY: &str = "DayTemplate";
pub const ARTICLE_PARTIAL_KEY: &str = "ArticlePartial";
pub const FOOTER_TEMPLATE_KEY: &str = "FooterTemplate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPage {
    Html(Arc<str>),
    Redirect(String),
}

#[derive(Debug, Clone, Copy, Default)]
struct Pager {
    prev_page: Option<usize>,
    next_page: Option<usize>,
}

/// Assembles listing pages (home, numbered pages, date archives) out of day groups.
pub struct ListingService {
    posts: Arc<PostService>,
    renderer: Arc<ArticleRenderer>,
    cache: Arc<PostCache>,
    posts_per_page: usize,
}

impl ListingService {
    pub fn new(
        posts: Arc<PostService>,
        renderer: Arc<ArticleRenderer>,
        cache: Arc<PostCache>,
        posts_per_page: usize,
    ) -> Self {
        Self {
            posts,
            renderer,
            cache,
            posts_per_page,
        }
    }

    /// Listing page `number` (1-based). Pages past either end redirect to the
    /// last page, or to `/` when there is at most one page.
    pub async fn page(&self, number: usize) -> Result<ListingPage> {
        let key = format!("/page/{number}");
        if let Some(html) = self.cache.get_html(&key) {
            return Ok(ListingPage::Html(html));
        }

        let pages = self.posts.paginate(self.posts_per_page).await?;

        let in_range = (1..=pages.len()).contains(&number);
        let empty_home = pages.is_empty() && number == 1;
        if !in_range && !empty_home {
            let destination = if pages.len() > 1 {
                format!("/page/{}", pages.len())
            } else {
                "/".to_string()
            };
            return Ok(ListingPage::Redirect(destination));
        }

        let page = pages.get(number - 1);
        let days = page.map(|page| page.days.as_slice()).unwrap_or_default();
        let pager = Pager {
            prev_page: (number > 1).then(|| number - 1),
            next_page: (pages.len() > number).then(|| number + 1),
        };

        debug!(
            "Assembling listing page {} ({} articles)",
            number,
            page.map(Page::article_count).unwrap_or(0)
        );
        let html: Arc<str> = self.assemble(days, pager).await?.into();
        self.cache.set_html(&key, html.clone());
        Ok(ListingPage::Html(html))
    }

    /// Every day matching `filter`, on one page without pager links.
    pub async fn archive(&self, filter: DayFilter) -> Result<String> {
        let days = self
            .posts
            .aggregate(AggregateOptions {
                filter: Some(filter),
                limit: None,
            })
            .await?;

        if days.is_empty() {
            return Err(AlmanacError::NotFound(format!("archive {:?}", filter)));
        }

        self.assemble(&days, Pager::default()).await
    }

    async fn index_article(&self) -> Result<Arc<Article>> {
        match self.renderer.render_file(&format!("{POSTS_ROOT}/index")).await {
            Ok(RenderedFile::Article(article)) => Ok(article),
            Ok(RenderedFile::Redirect(_)) | Err(AlmanacError::NotFound(_)) => {
                Err(AlmanacError::TemplatesNotLoaded(INDEX_SLOT))
            }
            Err(e) => Err(e),
        }
    }

    async fn assemble(&self, days: &[DayGroup], pager: Pager) -> Result<String> {
        let index = self.index_article().await?;
        let metadata = &index.metadata;

        let mut env = template_environment();
        let day_source = metadata
            .get(DAY_TEMPLATE_KEY)
            .ok_or(AlmanacError::TemplatesNotLoaded(DAY_TEMPLATE_KEY))?;
        env.add_template_owned("day", day_source.clone())
            .map_err(|e| AlmanacError::template(DAY_TEMPLATE_KEY, e))?;
        if let Some(partial) = metadata.get(ARTICLE_PARTIAL_KEY) {
            env.add_template_owned("article", partial.clone())
                .map_err(|e| AlmanacError::template(ARTICLE_PARTIAL_KEY, e))?;
        }
        let footer_source = metadata
            .get(FOOTER_TEMPLATE_KEY)
            .cloned()
            .unwrap_or_default();
        env.add_template_owned("footer", footer_source)
            .map_err(|e| AlmanacError::template(FOOTER_TEMPLATE_KEY, e))?;

        let day_template = env
            .get_template("day")
            .map_err(|e| AlmanacError::template(DAY_TEMPLATE_KEY, e))?;

        // each day gets its own footnote suffix so fn1 from two days can't collide
        let mut body = String::new();
        for (position, day) in days.iter().enumerate() {
            let rendered = day_template
                .render(day)
                .map_err(|e| AlmanacError::template(DAY_TEMPLATE_KEY, e))?;
            body.push_str(&offset_footnotes(&rendered, position));
        }
        let body = replace_metadata(metadata, &body);

        let footer = env
            .get_template("footer")
            .and_then(|t| {
                t.render(context! {
                    prevPage => pager.prev_page,
                    nextPage => pager.next_page,
                })
            })
            .map_err(|e| AlmanacError::template(FOOTER_TEMPLATE_KEY, e))?;

        let header = with_site_title(&index.rendered_header, metadata.get("SiteTitle"));
        let site_footer = self.renderer.site().footer()?;

        Ok(format!("{header}{body}{footer}{site_footer}"))
    }
}

// listing pages show only the site title, not "page | site"
fn with_site_title(header: &str, site_title: Option<&String>) -> String {
    const OPEN: &str = "<title>";
    const CLOSE: &str = "</title>";

    let Some(site_title) = site_title else {
        return header.to_string();
    };
    match (header.find(OPEN), header.find(CLOSE)) {
        (Some(open), Some(close)) if open + OPEN.len() <= close => format!(
            "{}{}{}",
            &header[..open + OPEN.len()],
            site_title,
            &header[close..]
        ),
        _ => header.to_string(),
    }
}

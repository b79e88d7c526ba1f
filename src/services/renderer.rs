use crate::domain::Article;
use crate::error::{AlmanacError, Result};
use crate::io::ContentReader;
use crate::parser::locator::{
    content_stem, external_link, is_post_path, normalized_key, MARKDOWN_EXTENSION, POSTS_ROOT,
    REDIRECT_EXTENSION,
};
use crate::parser::markdown::compile_markdown_to_html;
use crate::parser::metadata::{
    merge_metadata, parse_metadata, parse_publish_date, replace_metadata, split_post_lines,
};
use crate::parser::redirect::{parse_redirect, RedirectSidecar};
use crate::services::cache::PostCache;
use crate::site::SiteConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a content path resolves to. Absence is reported as [`AlmanacError::NotFound`].
#[derive(Debug, Clone)]
pub enum RenderedFile {
    Article(Arc<Article>),
    Redirect(RedirectSidecar),
}

pub struct ArticleRenderer {
    reader: Arc<dyn ContentReader>,
    site: Arc<SiteConfig>,
    cache: Arc<PostCache>,
}

impl ArticleRenderer {
    pub fn new(
        reader: Arc<dyn ContentReader>,
        site: Arc<SiteConfig>,
        cache: Arc<PostCache>,
    ) -> Self {
        Self {
            reader,
            site,
            cache,
        }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Resolves a content path (with or without extension) to its rendered
    /// article, or to its redirect sidecar when no Markdown file exists.
    pub async fn render_file(&self, path: &str) -> Result<RenderedFile> {
        let stem = content_stem(path);

        if let Some(article) = self.cache.get_article(&stem) {
            return Ok(RenderedFile::Article(article));
        }

        let markdown_path = format!("{stem}{MARKDOWN_EXTENSION}");
        if self.reader.exists(Path::new(&markdown_path)).await? {
            return self.render_article(&stem).await.map(RenderedFile::Article);
        }

        let redirect_path = format!("{stem}{REDIRECT_EXTENSION}");
        if self.reader.exists(Path::new(&redirect_path)).await? {
            let content = self.reader.read_to_string(Path::new(&redirect_path)).await?;
            return match parse_redirect(&content) {
                Some(sidecar) => Ok(RenderedFile::Redirect(sidecar)),
                None => {
                    warn!("Ignoring malformed redirect sidecar {}", redirect_path);
                    Err(AlmanacError::NotFound(stem))
                }
            };
        }

        Err(AlmanacError::NotFound(stem))
    }

    /// The cached article for a Markdown file, rendering and caching it on a miss.
    ///
    /// Two concurrent misses for the same file both render; the later insert
    /// replaces the earlier one with an equivalent article.
    pub async fn render_article(&self, file: &str) -> Result<Arc<Article>> {
        if let Some(article) = self.cache.get_article(file) {
            return Ok(article);
        }

        let stem = content_stem(file);
        let markdown_path = format!("{stem}{MARKDOWN_EXTENSION}");
        let content = self.reader.read_to_string(Path::new(&markdown_path)).await?;

        let article = Arc::new(self.build_article(&stem, &content)?);
        debug!(
            "Rendered {} ({}) for {}",
            article,
            article.title().unwrap_or("untitled"),
            article.relative_link().unwrap_or("/")
        );
        self.cache.set_article(&stem, article.clone());

        Ok(article)
    }

    fn build_article(&self, stem: &str, content: &str) -> Result<Article> {
        let (metadata_lines, body) = split_post_lines(content);

        let mut metadata = merge_metadata(
            &self.site.default_metadata,
            parse_metadata(metadata_lines),
        );
        metadata.insert("relativeLink".to_string(), external_link(stem));
        if is_post_path(stem) {
            metadata.insert("BodyClass".to_string(), "post".to_string());
        }

        let date = metadata.get("Date").and_then(|d| parse_publish_date(d));

        let rendered_header = replace_metadata(&metadata, self.site.header()?);
        let rendered_post_header =
            replace_metadata(&metadata, &self.site.render_post_header(&metadata)?);
        let rendered_footer_fragment =
            replace_metadata(&metadata, &self.site.render_footer_fragment(&metadata)?);
        let rendered_body = replace_metadata(&metadata, &compile_markdown_to_html(&body));

        Ok(Article {
            file: normalized_key(stem),
            metadata,
            date,
            rendered_header,
            rendered_post_header,
            rendered_body,
            rendered_footer_fragment,
        })
    }

    /// The themed body for a missing page: `posts/404.md` when present, otherwise
    /// a short notice inside the site header and footer.
    pub async fn render_not_found(&self) -> Result<String> {
        let footer = self.site.footer()?;

        match self.render_file(&format!("{POSTS_ROOT}/404")).await {
            Ok(RenderedFile::Article(article)) => Ok(article.html(footer)),
            Ok(RenderedFile::Redirect(_)) | Err(AlmanacError::NotFound(_)) => {
                let header = replace_metadata(&self.site.default_metadata, self.site.header()?);
                Ok(format!("{header}<p>Page not found.</p>{footer}"))
            }
            Err(e) => Err(e),
        }
    }
}

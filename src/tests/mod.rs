use crate::domain::{Article, DayGroup, Metadata};
use crate::io::ContentReader;
use crate::parser::metadata::parse_publish_date;
use crate::services::Blog;
use crate::site::{SiteConfig, TemplateSources};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mod unit_markdown_footnotes;
mod unit_metadata_parser;
mod unit_pagination;

// --- Manual Mock: ContentReader ---
// keeps every "file" in memory, keyed by its content-relative path
#[derive(Clone, Default)]
pub struct MockContentReader {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub reads: Arc<AtomicUsize>,
    pub fail_listing: Arc<Mutex<bool>>,
    pub fail_exists: Arc<Mutex<bool>>,
}

impl MockContentReader {
    pub fn new() -> Self {
        Self::default()
    }

    // helper to "create" a file in our fake world
    pub fn add_file(&self, path: &str, content: &str) {
        let mut files = self.files.lock().unwrap();
        files.insert(PathBuf::from(path), content.to_string());
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentReader for MockContentReader {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("File not found in mock: {:?}", path))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        if *self.fail_exists.lock().unwrap() {
            anyhow::bail!("Simulated permission failure on {:?}", path);
        }
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if *self.fail_listing.lock().unwrap() {
            anyhow::bail!("Simulated directory walk failure under {:?}", root);
        }
        let files = self.files.lock().unwrap();
        Ok(files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }
}

pub fn test_sources() -> TemplateSources {
    TemplateSources {
        default_tags: Some("@@SiteTitle=Test Blog\n@@Author=Site Author\n".into()),
        header: Some(
            "<html><head><title>@@Title@@ | @@SiteTitle@@</title></head><body class=\"@@BodyClass@@\">"
                .into(),
        ),
        footer: Some("</body></html>".into()),
        post_header: Some("<h1>{{ Title }}</h1><time>{{ Date | formatPostDate }}</time>".into()),
        rss_footer: Some("<p>Read more on {{ SiteTitle }}</p>".into()),
    }
}

pub fn test_site() -> Arc<SiteConfig> {
    Arc::new(SiteConfig::from_sources(test_sources()))
}

pub fn test_blog(reader: &MockContentReader) -> Blog {
    Blog::new(Arc::new(reader.clone()), test_site(), 50, 10)
}

// a post file body with the usual metadata lines on top
pub fn post_source(title: &str, date: &str, body: &str) -> String {
    format!("@@Title={title}\n@@Date={date}\n\n{body}\n")
}

// an article built by hand, for tests that only need grouping and counting
pub fn stub_article(file: &str, date: &str) -> Arc<Article> {
    Arc::new(Article {
        file: file.to_string(),
        metadata: Metadata::new(),
        date: parse_publish_date(date),
        rendered_header: String::new(),
        rendered_post_header: String::new(),
        rendered_body: String::new(),
        rendered_footer_fragment: String::new(),
    })
}

pub fn stub_day(date: (i32, u32, u32), articles: usize) -> DayGroup {
    let day = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
    DayGroup {
        date: day,
        articles: (0..articles)
            .map(|i| {
                stub_article(
                    &format!("./posts/{}/{}/{}/post-{}", date.0, date.1, date.2, i),
                    &format!("{} 0{}:00", day, i % 10),
                )
            })
            .collect(),
    }
}

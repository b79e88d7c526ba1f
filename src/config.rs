use crate::services::cache::DEFAULT_MAX_CACHE_SIZE;
use crate::services::posts::DEFAULT_POSTS_PER_PAGE;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AlmanacConfig {
    pub content_dir: PathBuf,
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    pub posts_per_page: usize,
    pub max_cache_size: usize,
    pub cache_reset_interval: Duration,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("."),
            template_dir: PathBuf::from("./templates"),
            public_dir: PathBuf::from("./public"),
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            cache_reset_interval: Duration::from_secs(1800),
        }
    }
}

impl AlmanacConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let content_dir = std::env::var("CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.content_dir);

        let template_dir = std::env::var("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.template_dir);

        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.public_dir);

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let port = parse_var("PORT")?.unwrap_or(defaults.port);
        let posts_per_page = parse_var("POSTS_PER_PAGE")?.unwrap_or(defaults.posts_per_page);
        let max_cache_size = parse_var("MAX_CACHE_SIZE")?.unwrap_or(defaults.max_cache_size);

        let cache_reset_interval = parse_var::<u64>("CACHE_RESET_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_reset_interval);

        Ok(Self {
            content_dir,
            template_dir,
            public_dir,
            bind_addr,
            port,
            posts_per_page,
            max_cache_size,
            cache_reset_interval,
        })
    }
}

// unset variables fall back to defaults, but a value that is present must parse
fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Failed to parse {} from environment variables", key)),
        Err(_) => Ok(None),
    }
}

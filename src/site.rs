use crate::domain::Metadata;
use crate::error::{AlmanacError, Result};
use crate::parser::metadata::{parse_metadata, parse_publish_date};
use chrono::{Datelike, NaiveDate};
use minijinja::{AutoEscape, Environment, Value};
use std::path::Path;
use tracing::{info, warn};

pub const HEADER_SLOT: &str = "header.html";
pub const FOOTER_SLOT: &str = "footer.html";
pub const POST_HEADER_SLOT: &str = "postHeader.html";
pub const RSS_FOOTER_SLOT: &str = "rssFooter.html";
pub const DEFAULT_TAGS_SLOT: &str = "defaultTags.html";

/// Raw template sources as found on disk. `None` marks a slot that failed to load.
#[derive(Debug, Default, Clone)]
pub struct TemplateSources {
    pub default_tags: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub post_header: Option<String>,
    pub rss_footer: Option<String>,
}

/// Site-wide defaults and templates, built once at startup and shared read-only.
pub struct SiteConfig {
    pub default_metadata: Metadata,
    header: Option<String>,
    footer: Option<String>,
    templates: Environment<'static>,
}

impl SiteConfig {
    /// Loads every slot from `template_dir`. Missing files are logged and leave
    /// their slot empty instead of aborting startup.
    pub async fn load(template_dir: &Path) -> Self {
        async fn read_slot(dir: &Path, name: &str) -> Option<String> {
            let path = dir.join(name);
            match tokio::fs::read_to_string(&path).await {
                Ok(source) => Some(source),
                Err(e) => {
                    warn!("Template {} could not be loaded: {}", path.display(), e);
                    None
                }
            }
        }

        let sources = TemplateSources {
            default_tags: read_slot(template_dir, DEFAULT_TAGS_SLOT).await,
            header: read_slot(template_dir, HEADER_SLOT).await,
            footer: read_slot(template_dir, FOOTER_SLOT).await,
            post_header: read_slot(template_dir, POST_HEADER_SLOT).await,
            rss_footer: read_slot(template_dir, RSS_FOOTER_SLOT).await,
        };

        info!("Loaded site templates from {}", template_dir.display());
        Self::from_sources(sources)
    }

    pub fn from_sources(sources: TemplateSources) -> Self {
        let default_metadata = sources
            .default_tags
            .as_deref()
            .map(|tags| parse_metadata(tags.lines()))
            .unwrap_or_default();

        let mut templates = template_environment();
        for (slot, source) in [
            (POST_HEADER_SLOT, sources.post_header),
            (RSS_FOOTER_SLOT, sources.rss_footer),
        ] {
            let Some(source) = source else { continue };
            if let Err(e) = templates.add_template_owned(slot, source) {
                warn!("Template {} failed to compile: {}", slot, e);
            }
        }

        Self {
            default_metadata,
            header: sources.header,
            footer: sources.footer,
            templates,
        }
    }

    pub fn header(&self) -> Result<&str> {
        self.header
            .as_deref()
            .ok_or(AlmanacError::TemplatesNotLoaded(HEADER_SLOT))
    }

    pub fn footer(&self) -> Result<&str> {
        self.footer
            .as_deref()
            .ok_or(AlmanacError::TemplatesNotLoaded(FOOTER_SLOT))
    }

    pub fn render_post_header(&self, metadata: &Metadata) -> Result<String> {
        self.render_slot(POST_HEADER_SLOT, metadata)
    }

    pub fn render_footer_fragment(&self, metadata: &Metadata) -> Result<String> {
        self.render_slot(RSS_FOOTER_SLOT, metadata)
    }

    fn render_slot(&self, slot: &'static str, metadata: &Metadata) -> Result<String> {
        let template = self
            .templates
            .get_template(slot)
            .map_err(|_| AlmanacError::TemplatesNotLoaded(slot))?;
        template
            .render(metadata)
            .map_err(|e| AlmanacError::template(slot, e))
    }
}

/// A template environment with the date filters every site template can use.
/// Output is never escaped: templates splice pre-rendered HTML.
pub fn template_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("formatPostDate", format_post_date);
    env.add_filter("formatIsoDate", format_iso_date);
    env.add_filter("formatDate", format_date);
    env.add_filter("dateLink", date_link);
    env
}

fn value_text(value: &Value) -> Option<String> {
    if value.is_undefined() || value.is_none() {
        return None;
    }
    Some(match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    })
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    parse_publish_date(value).map(|dt| dt.date())
}

// Monday, 17 March 2014
fn format_post_date(value: Value) -> String {
    let Some(raw) = value_text(&value) else {
        return String::new();
    };
    match parse_publish_date(&raw) {
        Some(dt) => dt.format("%A, %-d %B %Y").to_string(),
        None => raw,
    }
}

fn format_iso_date(value: Value) -> String {
    value_text(&value)
        .as_deref()
        .and_then(parse_publish_date)
        .map(|dt| dt.and_utc().to_rfc3339())
        .unwrap_or_default()
}

fn format_date(value: Value) -> String {
    let Some(raw) = value_text(&value) else {
        return String::new();
    };
    match parse_day(&raw) {
        Some(day) => day.format("%A<br />%-d<br />%B<br />%Y").to_string(),
        None => raw,
    }
}

fn date_link(value: Value) -> String {
    match value_text(&value).as_deref().and_then(parse_day) {
        Some(day) => format!("/{}/{}/{}/", day.year(), day.month(), day.day()),
        None => "/".to_string(),
    }
}

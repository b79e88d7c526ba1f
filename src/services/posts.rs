use crate::domain::{DayGroup, Page};
use crate::error::Result;
use crate::io::{path_to_slashed, ContentReader};
use crate::parser::locator::{day_from_path, is_post_path, is_redirect_path, POSTS_ROOT};
use crate::services::cache::PostCache;
use crate::services::renderer::ArticleRenderer;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_POSTS_PER_PAGE: usize = 10;

/// Narrows an aggregation to one year, month or day. A field only filters when
/// it is `Some`, so January (`month0 == Some(0)`) is a real filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayFilter {
    pub year: Option<i32>,
    /// 0-based, January is 0.
    pub month0: Option<u32>,
    pub day: Option<u32>,
}

impl DayFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |year| year == date.year())
            && self.month0.map_or(true, |month| month == date.month0())
            && self.day.map_or(true, |day| day == date.day())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub filter: Option<DayFilter>,
    pub limit: Option<usize>,
}

pub struct PostService {
    reader: Arc<dyn ContentReader>,
    renderer: Arc<ArticleRenderer>,
    cache: Arc<PostCache>,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn ContentReader>,
        renderer: Arc<ArticleRenderer>,
        cache: Arc<PostCache>,
    ) -> Self {
        Self {
            reader,
            renderer,
            cache,
        }
    }

    /// All posts grouped by calendar day, newest day first, articles within a day
    /// newest first by their `Date` metadata. Served from the cache when present.
    pub async fn sorted_and_grouped(&self) -> Result<Arc<Vec<DayGroup>>> {
        if let Some(days) = self.cache.sorted_grouped() {
            return Ok(days);
        }

        let files = self.reader.list_files(Path::new(POSTS_ROOT)).await?;
        let mut post_files: Vec<String> = files
            .iter()
            .map(|p| path_to_slashed(p))
            .filter(|p| is_post_path(p))
            .collect();
        post_files.sort();

        let mut files_by_day: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for file in post_files {
            match day_from_path(&file) {
                Some(day) => files_by_day.entry(day).or_default().push(file),
                None => warn!("Skipping {}: path is not a calendar date", file),
            }
        }

        let mut days = Vec::with_capacity(files_by_day.len());
        for (date, files) in files_by_day.into_iter().rev() {
            let mut articles = Vec::with_capacity(files.len());
            for file in files.iter().filter(|f| !is_redirect_path(f)) {
                articles.push(self.renderer.render_article(file).await?);
            }

            // a day holding only redirects has nothing to list
            if articles.is_empty() {
                continue;
            }

            articles.sort_by(|a, b| b.date.cmp(&a.date));
            days.push(DayGroup { date, articles });
        }

        debug!("Aggregated {} days of posts", days.len());
        let days = Arc::new(days);
        self.cache.set_sorted_grouped(days.clone());
        Ok(days)
    }

    /// Grouped posts after the optional day filter and article limit.
    pub async fn aggregate(&self, options: AggregateOptions) -> Result<Vec<DayGroup>> {
        let all = self.sorted_and_grouped().await?;

        let days = match options.filter {
            Some(filter) => filter_days(&all, filter),
            None => all.as_ref().clone(),
        };

        Ok(match options.limit {
            Some(limit) => limit_days(days, limit),
            None => days,
        })
    }

    pub async fn paginate(&self, page_size: usize) -> Result<Vec<Page>> {
        let all = self.sorted_and_grouped().await?;
        Ok(paginate_days(&all, page_size))
    }

    pub async fn count(&self) -> Result<(usize, usize)> {
        let all = self.sorted_and_grouped().await?;
        let articles = all.iter().map(DayGroup::len).sum();
        Ok((articles, all.len()))
    }
}

pub fn filter_days(days: &[DayGroup], filter: DayFilter) -> Vec<DayGroup> {
    days.iter()
        .filter(|day| filter.matches(day.date))
        .cloned()
        .collect()
}

/// Walks days in order while article budget remains. A day larger than the
/// remaining budget is cut to `remaining - 1` articles, which leaves one
/// article of budget for the days after it. Days left empty are not emitted.
pub fn limit_days(days: Vec<DayGroup>, limit: usize) -> Vec<DayGroup> {
    let mut remaining = limit;
    let mut limited = Vec::new();

    for mut day in days {
        if remaining < day.len() {
            day.articles.truncate(remaining.saturating_sub(1));
        }
        remaining -= day.len();

        if !day.is_empty() {
            limited.push(day);
        }
        if remaining == 0 {
            break;
        }
    }

    limited
}

/// Buckets whole days into pages holding at least `page_size` articles each;
/// only the last page may hold fewer.
pub fn paginate_days(days: &[DayGroup], page_size: usize) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut page_days = Vec::new();
    let mut count = 0;

    for day in days {
        count += day.len();
        page_days.push(day.clone());

        if count >= page_size {
            pages.push(Page {
                number: pages.len() + 1,
                days: std::mem::take(&mut page_days),
            });
            count = 0;
        }
    }

    if !page_days.is_empty() {
        pages.push(Page {
            number: pages.len() + 1,
            days: page_days,
        });
    }

    pages
}

use crate::domain::Article;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Every article published on one calendar day, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub articles: Vec<Arc<Article>>,
}

impl DayGroup {
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// A run of whole day groups shown together on one listing page.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub days: Vec<DayGroup>,
}

impl Page {
    pub fn article_count(&self) -> usize {
        self.days.iter().map(DayGroup::len).sum()
    }
}

use crate::domain::{Article, DayGroup};
use crate::parser::locator::normalized_key;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub const DEFAULT_MAX_CACHE_SIZE: usize = 50;

/// What the per-file store can hold: a rendered article, or a whole rendered
/// page (listing pages are cached under their route, e.g. `/page/2`).
#[derive(Debug, Clone)]
pub enum CachedRender {
    Article(Arc<Article>),
    Html(Arc<str>),
}

#[derive(Debug)]
struct CacheEntry {
    value: CachedRender,
    inserted_at: DateTime<Utc>,
    // insertion order; wall-clock stamps can tie or step backwards
    sequence: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    rendered: HashMap<String, CacheEntry>,
    sorted_grouped: Option<Arc<Vec<DayGroup>>>,
    next_sequence: u64,
}

/// Bounded store of rendered content plus the singleton aggregation result.
///
/// Capacity applies to the per-file store only; entries are evicted oldest
/// insertion first and reads never refresh an entry. Nothing here watches the
/// filesystem: an edited post stays stale until the next [`PostCache::flush`].
///
/// One coarse mutex guards everything, so a flush cannot interleave with a
/// get or set.
#[derive(Debug)]
pub struct PostCache {
    max_size: usize,
    state: Mutex<CacheState>,
}

impl Default for PostCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CACHE_SIZE)
    }
}

impl PostCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            state: Mutex::new(CacheState::default()),
        }
    }

    // a panic while holding the lock can't leave a half-written entry, so poisoning is ignored
    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn get(&self, key: &str) -> Option<CachedRender> {
        let state = self.state();
        let hit = state.rendered.get(key).map(|entry| entry.value.clone());
        debug!(
            "{} cache: {}",
            if hit.is_some() { "In" } else { "Not in" },
            key
        );
        hit
    }

    /// Inserts or wholesale replaces `key`, then evicts the single oldest entry
    /// if the store grew past capacity.
    pub fn set(&self, key: impl Into<String>, value: CachedRender) {
        let key = key.into();
        let mut state = self.state();

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.rendered.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Utc::now(),
                sequence,
            },
        );

        if state.rendered.len() > self.max_size {
            let oldest = state
                .rendered
                .iter()
                .min_by_key(|(_, entry)| entry.sequence)
                .map(|(key, _)| key.clone());

            if let Some(entry) = oldest.and_then(|key| state.rendered.remove_entry(&key)) {
                debug!(
                    "Evicted {} from cache (inserted {})",
                    entry.0, entry.1.inserted_at
                );
            }
        }
    }

    pub fn get_article(&self, file: &str) -> Option<Arc<Article>> {
        match self.get(&normalized_key(file))? {
            CachedRender::Article(article) => Some(article),
            CachedRender::Html(_) => None,
        }
    }

    pub fn set_article(&self, file: &str, article: Arc<Article>) {
        self.set(normalized_key(file), CachedRender::Article(article));
    }

    pub fn get_html(&self, key: &str) -> Option<Arc<str>> {
        match self.get(key)? {
            CachedRender::Html(html) => Some(html),
            CachedRender::Article(_) => None,
        }
    }

    pub fn set_html(&self, key: &str, html: impl Into<Arc<str>>) {
        self.set(key, CachedRender::Html(html.into()));
    }

    pub fn sorted_grouped(&self) -> Option<Arc<Vec<DayGroup>>> {
        self.state().sorted_grouped.clone()
    }

    pub fn set_sorted_grouped(&self, days: Arc<Vec<DayGroup>>) {
        self.state().sorted_grouped = Some(days);
    }

    pub fn len(&self) -> usize {
        self.state().rendered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every rendered entry and the aggregation result.
    pub fn flush(&self) {
        let mut state = self.state();
        info!(
            "Emptying the cache ({} rendered entries).",
            state.rendered.len()
        );
        state.rendered.clear();
        state.sorted_grouped = None;
    }
}

use chrono::NaiveDate;
use std::time::Duration;

use crate::core::feed::ShownCards;

/// In-process shown-card store
///
/// Keyed by (viewer, profile) and holding the calendar day the card was
/// last surfaced. The recorded-day comparison is the correctness rule;
/// the cache's TTL and capacity only bound memory, since an entry older
/// than a day can never compare equal to "today" again.
pub struct ShownCardCache {
    cache: moka::sync::Cache<(i64, i64), NaiveDate>,
}

impl ShownCardCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::sync::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Number of live entries (approximate, for diagnostics)
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl ShownCards for ShownCardCache {
    fn shown_on(&self, viewer_id: i64, profile_id: i64, day: NaiveDate) -> bool {
        self.cache.get(&(viewer_id, profile_id)) == Some(day)
    }

    fn mark_shown(&self, viewer_id: i64, profile_id: i64, day: NaiveDate) {
        self.cache.insert((viewer_id, profile_id), day);
    }
}

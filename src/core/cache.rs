//! Expiring cache for per-period aggregates.
//!
//! Entries expire after a fixed time-to-live and the whole cache is cleared
//! on every write; there is no finer-grained invalidation. The cache lives
//! inside one process and is never shared across processes.

use crate::config::CacheConfig;
use crate::core::period::DateRange;
use moka::sync::Cache;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Points per employee id for one date range.
pub type EmployeeSums = BTreeMap<i64, u64>;

#[derive(Clone)]
pub struct AggregateCache {
    inner: Cache<DateRange, Arc<EmployeeSums>>,
}

impl AggregateCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub fn from_config(cfg: &CacheConfig) -> Self {
        Self::new(cfg.max_capacity, Duration::from_secs(cfg.ttl_secs))
    }

    pub fn get(&self, range: &DateRange) -> Option<Arc<EmployeeSums>> {
        self.inner.get(range)
    }

    pub fn insert(&self, range: DateRange, sums: Arc<EmployeeSums>) {
        self.inner.insert(range, sums);
    }

    /// Drop every cached aggregate.
    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AggregateCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

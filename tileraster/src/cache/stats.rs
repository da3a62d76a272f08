//! Catalog counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Point-in-time catalog statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Sources listed in the configuration.
    pub sources_configured: usize,
    /// Sources opened so far (ready or invalid).
    pub sources_open: usize,
    /// Tiles currently memoized.
    pub tiles_cached: u64,
    /// Memo capacity.
    pub max_tiles: u64,
    pub hits: u64,
    pub misses: u64,
    /// Engine renders actually performed.
    pub renders: u64,
    /// Requests that ended in an error.
    pub failures: u64,
}

impl CatalogStats {
    /// Fraction of tile lookups answered from the memo.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    renders: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render(&self) {
        self.renders.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Fill the counter fields of `stats`.
    pub fn fill(&self, stats: &mut CatalogStats) {
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats.renders = self.renders.load(Ordering::Relaxed);
        stats.failures = self.failures.load(Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CatalogStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CatalogStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_counters_fill() {
        let counters = Counters::default();
        counters.hit();
        counters.miss();
        counters.miss();
        counters.render();
        let mut stats = CatalogStats::default();
        counters.fill(&mut stats);
        assert_eq!((stats.hits, stats.misses, stats.renders, stats.failures), (1, 2, 1, 0));
    }
}

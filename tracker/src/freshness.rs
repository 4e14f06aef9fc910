//! Cache staleness for health reporting. Staleness never blocks reads;
//! callers decide whether a stale cache is a degraded signal.

use crate::store::PlayerStore;
use crate::types::unix_millis;
use serde::Serialize;

pub const DEFAULT_STALE_THRESHOLD_MINUTES: u64 = 120;

/// True once the cache age exceeds the threshold. Exactly at the
/// threshold is still fresh.
pub fn is_stale(now_ms: u64, last_updated_ms: u64, threshold_minutes: u64) -> bool {
    now_ms.saturating_sub(last_updated_ms) > threshold_minutes * 60_000
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthSummary {
    pub player_count: usize,
    pub last_updated: Option<u64>,
    pub age_minutes: Option<u64>,
    pub is_stale: bool,
}

pub fn health_summary(store: &dyn PlayerStore, threshold_minutes: u64) -> HealthSummary {
    let now = unix_millis();
    let last_updated = store.latest_update();

    HealthSummary {
        player_count: store.count(),
        last_updated,
        age_minutes: last_updated.map(|ts| now.saturating_sub(ts) / 60_000),
        // An empty cache has no age to judge.
        is_stale: last_updated.is_some_and(|ts| is_stale(now, ts, threshold_minutes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn fresh_at_threshold_stale_past_it() {
        let threshold = DEFAULT_STALE_THRESHOLD_MINUTES;
        let last = 1_700_000_000_000u64;

        assert!(!is_stale(last, last, threshold));
        assert!(!is_stale(last + 120 * 60_000, last, threshold));
        assert!(is_stale(last + 121 * 60_000, last, threshold));
    }

    #[test]
    fn empty_store_is_not_stale() {
        let store = MemoryStore::new();
        let summary = health_summary(&store, DEFAULT_STALE_THRESHOLD_MINUTES);
        assert_eq!(summary.player_count, 0);
        assert_eq!(summary.last_updated, None);
        assert_eq!(summary.age_minutes, None);
        assert!(!summary.is_stale);
    }
}

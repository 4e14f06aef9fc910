//! Keyed cache of player records. `account_id` is the canonical key;
//! `steam_id` is a denormalized lookup alias, and the union of both must
//! stay unique across records.

use crate::types::{unix_millis, PlayerRecord};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("identity {id} collides with record {existing}")]
    IdentityCollision { id: String, existing: String },
}

pub trait PlayerStore: Send + Sync {
    /// Inserts the record, or replaces every mutable field of the existing
    /// one in a single step. `last_updated` is assigned by the store and
    /// strictly increases on every call for the same record.
    fn upsert(&self, record: PlayerRecord) -> Result<(), StoreError>;

    /// Finds a record whose `account_id` or `steam_id` equals `id`.
    fn find_by_either_id(&self, id: &str) -> Option<PlayerRecord>;

    /// All records, ordered by rank tier descending, then win rate
    /// descending.
    fn find_all(&self) -> Vec<PlayerRecord>;

    fn count(&self) -> usize;

    /// Most recent `last_updated` across all records, for freshness
    /// reporting.
    fn latest_update(&self) -> Option<u64>;
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, PlayerRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Seeds the store from a previously persisted snapshot, keeping the
    /// original `last_updated` stamps.
    pub fn with_records(records: Vec<PlayerRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.account_id.clone(), r))
            .collect();
        MemoryStore {
            records: RwLock::new(map),
        }
    }
}

impl PlayerStore for MemoryStore {
    fn upsert(&self, mut record: PlayerRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();

        // Reject writes that would make a lookup by either id ambiguous.
        for (key, existing) in records.iter() {
            if *key == record.account_id {
                continue;
            }
            let collides = existing.steam_id.as_deref() == Some(record.account_id.as_str())
                || Some(existing.account_id.as_str()) == record.steam_id.as_deref()
                || (record.steam_id.is_some() && existing.steam_id == record.steam_id);
            if collides {
                return Err(StoreError::IdentityCollision {
                    id: record.account_id.clone(),
                    existing: existing.account_id.clone(),
                });
            }
        }

        let now = unix_millis();
        record.last_updated = match records.get(&record.account_id) {
            Some(prev) if now <= prev.last_updated => prev.last_updated + 1,
            _ => now,
        };

        records.insert(record.account_id.clone(), record);
        Ok(())
    }

    fn find_by_either_id(&self, id: &str) -> Option<PlayerRecord> {
        let records = self.records.read();
        if let Some(record) = records.get(id) {
            return Some(record.clone());
        }
        records
            .values()
            .find(|r| r.steam_id.as_deref() == Some(id))
            .cloned()
    }

    fn find_all(&self) -> Vec<PlayerRecord> {
        let mut all: Vec<PlayerRecord> = self.records.read().values().cloned().collect();
        all.sort_by(|a, b| {
            b.rank_tier
                .cmp(&a.rank_tier)
                .then(b.win_rate.cmp(&a.win_rate))
        });
        all
    }

    fn count(&self) -> usize {
        self.records.read().len()
    }

    fn latest_update(&self) -> Option<u64> {
        self.records.read().values().map(|r| r.last_updated).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(account_id: &str, steam_id: Option<&str>) -> PlayerRecord {
        PlayerRecord {
            account_id: account_id.into(),
            steam_id: steam_id.map(String::from),
            display_name: "player".into(),
            persona_name: None,
            avatar_url: None,
            rank_tier: 0,
            competitive_rank: None,
            win: 0,
            lose: 0,
            win_rate: 0,
            total_games: 0,
            estimated_mmr: None,
            recent_matches: Vec::new(),
            last_updated: 0,
        }
    }

    #[test]
    fn upsert_then_find_by_either_id() {
        let store = MemoryStore::new();
        store
            .upsert(record("149901486", Some("76561198110167214")))
            .unwrap();

        assert!(store.find_by_either_id("149901486").is_some());
        assert!(store.find_by_either_id("76561198110167214").is_some());
        assert!(store.find_by_either_id("999").is_none());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn repeated_upsert_only_advances_last_updated() {
        let store = MemoryStore::new();
        let payload = record("149901486", None);

        store.upsert(payload.clone()).unwrap();
        let first = store.find_by_either_id("149901486").unwrap();

        store.upsert(payload.clone()).unwrap();
        let second = store.find_by_either_id("149901486").unwrap();

        assert!(second.last_updated > first.last_updated);
        let mut a = first.clone();
        let mut b = second.clone();
        a.last_updated = 0;
        b.last_updated = 0;
        assert_eq!(a, b);
    }

    #[test]
    fn upsert_replaces_all_mutable_fields() {
        let store = MemoryStore::new();
        let mut payload = record("149901486", None);
        payload.win = 10;
        payload.rank_tier = 35;
        store.upsert(payload.clone()).unwrap();

        payload.win = 12;
        payload.rank_tier = 41;
        payload.persona_name = Some("kirara".into());
        store.upsert(payload).unwrap();

        let stored = store.find_by_either_id("149901486").unwrap();
        assert_eq!(stored.win, 12);
        assert_eq!(stored.rank_tier, 41);
        assert_eq!(stored.persona_name.as_deref(), Some("kirara"));
    }

    #[test]
    fn colliding_identities_are_rejected() {
        let store = MemoryStore::new();
        store
            .upsert(record("149901486", Some("76561198110167214")))
            .unwrap();

        // Another player claiming the first player's steam id
        let err = store
            .upsert(record("174245541", Some("76561198110167214")))
            .unwrap_err();
        assert!(matches!(err, StoreError::IdentityCollision { .. }));

        // A player whose account id equals an existing steam id
        let err = store
            .upsert(record("76561198110167214", None))
            .unwrap_err();
        assert!(matches!(err, StoreError::IdentityCollision { .. }));

        assert_eq!(store.count(), 1);
    }

    #[test]
    fn find_all_orders_by_rank_then_win_rate() {
        let store = MemoryStore::new();

        let mut a = record("1", None);
        a.rank_tier = 54;
        a.win_rate = 40;
        let mut b = record("2", None);
        b.rank_tier = 54;
        b.win_rate = 61;
        let mut c = record("3", None);
        c.rank_tier = 71;
        c.win_rate = 50;

        for r in [a, b, c] {
            store.upsert(r).unwrap();
        }

        let ids: Vec<String> = store.find_all().into_iter().map(|r| r.account_id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn latest_update_is_max() {
        let store = MemoryStore::new();
        assert_eq!(store.latest_update(), None);
        store.upsert(record("1", None)).unwrap();
        store.upsert(record("2", None)).unwrap();
        let latest = store.latest_update().unwrap();
        let second = store.find_by_either_id("2").unwrap().last_updated;
        assert_eq!(latest, second.max(store.find_by_either_id("1").unwrap().last_updated));
    }
}

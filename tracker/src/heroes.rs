//! Read-through cache for the hero-name catalog. Owned by whoever drives
//! the pipeline and passed by reference into the analytics step, so there
//! is no process-global state. Populated at most once per process; a
//! failed fetch memoizes an empty catalog and names fall back to
//! `"Hero {id}"`.

use crate::client::StatsClient;
use std::collections::HashMap;
use tokio::sync::OnceCell;

#[derive(Default)]
pub struct HeroCatalog {
    names: OnceCell<HashMap<u32, String>>,
}

impl HeroCatalog {
    pub fn new() -> Self {
        HeroCatalog {
            names: OnceCell::new(),
        }
    }

    /// Fetches the catalog unless it is already populated. Safe to call
    /// concurrently; only the first caller performs the request.
    pub async fn populate(&self, client: &StatsClient) {
        let names = self
            .names
            .get_or_init(|| async { client.get_heroes().await })
            .await;
        if names.is_empty() {
            tracing::warn!("Hero catalog is empty; falling back to generic hero names");
        }
    }

    pub fn name_for(&self, hero_id: u32) -> String {
        self.names
            .get()
            .and_then(|names| names.get(&hero_id).cloned())
            .unwrap_or_else(|| format!("Hero {hero_id}"))
    }
}

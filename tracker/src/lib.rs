pub mod analytics;
pub mod api;
pub mod client;
pub mod config;
pub mod crawler;
pub mod freshness;
pub mod heroes;
pub mod identity;
pub mod metrics_defs;
pub mod roster;
pub mod snapshot;
pub mod store;
pub mod types;

use crate::api::AppState;
use crate::client::StatsClient;
use crate::config::Config;
use crate::crawler::Crawler;
use crate::roster::{Roster, RosterError};
use crate::snapshot::{FilesystemSnapshotProvider, SnapshotProvider};
use crate::store::{MemoryStore, PlayerStore};
use crate::types::CrawlRunSummary;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),
}

fn build_state(config: &Config) -> Result<Arc<AppState>, ServeError> {
    let roster = Roster::from_file(Path::new(&config.roster))?;

    let snapshot: Option<Arc<dyn SnapshotProvider>> = config
        .snapshot
        .as_ref()
        .map(|s| Arc::new(FilesystemSnapshotProvider::new(&s.base_dir, &s.filename)) as _);

    // Start from the last snapshot when one exists; a missing or unreadable
    // snapshot just means an empty cache until the first crawl.
    let store: Arc<dyn PlayerStore> = match &snapshot {
        Some(provider) => match provider.load() {
            Ok(records) => {
                tracing::info!(records = records.len(), "Loaded player snapshot");
                Arc::new(MemoryStore::with_records(records))
            }
            Err(err) => {
                tracing::warn!(error = %err, "No usable snapshot, starting empty");
                Arc::new(MemoryStore::new())
            }
        },
        None => Arc::new(MemoryStore::new()),
    };

    let client = StatsClient::new(&config.upstream);
    let crawler = Crawler::new(client, store.clone(), config.crawl);

    Ok(Arc::new(AppState {
        store,
        crawler,
        roster,
        sync_secret: config.sync_secret.clone(),
        stale_threshold_minutes: config.freshness.threshold_minutes,
        snapshot,
    }))
}

/// Runs the HTTP service until the listener fails.
pub async fn serve(config: Config) -> Result<(), ServeError> {
    let state = build_state(&config)?;
    let app = api::router(state);

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    tracing::info!(addr = %addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Runs a single crawl over the configured roster and returns its summary.
/// Used by the `crawl` subcommand; the caller maps a degraded summary to a
/// non-zero exit.
pub async fn crawl_once(config: Config) -> Result<CrawlRunSummary, ServeError> {
    let state = build_state(&config)?;
    let summary = state.crawler.run(&state.roster.players).await;

    if let Some(snapshot) = &state.snapshot {
        if let Err(err) = snapshot.store(&state.store.find_all()) {
            tracing::error!(error = %err, "Failed to store snapshot after crawl");
        }
    }

    Ok(summary)
}

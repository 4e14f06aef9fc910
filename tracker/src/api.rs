//! HTTP surface over the cache: cached reads, health, the push-sync
//! endpoint and a manual crawl trigger. Reads never touch the upstream
//! provider; they serve whatever the store currently holds.

use crate::analytics::{self, HeroStat, StreakKind};
use crate::crawler::Crawler;
use crate::freshness::{self, HealthSummary};
use crate::metrics_defs::SYNC_BATCH_REJECTED;
use crate::roster::Roster;
use crate::snapshot::SnapshotProvider;
use crate::store::PlayerStore;
use crate::types::{CrawlRunSummary, MatchResult, PlayerRecord};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<dyn PlayerStore>,
    pub crawler: Crawler,
    pub roster: Roster,
    pub sync_secret: String,
    pub stale_threshold_minutes: u64,
    pub snapshot: Option<Arc<dyn SnapshotProvider>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/players", get(list_players))
        .route("/players/{id}", get(get_player))
        .route("/crawl", post(trigger_crawl))
        .route("/sync", post(sync))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("player not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
}

#[derive(Serialize)]
struct ApiErrorResponse {
    error_message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = Json(ApiErrorResponse {
            error_message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// A cached record plus the analytics derived at read time.
#[derive(Serialize)]
struct PlayerPayload {
    #[serde(flatten)]
    record: PlayerRecord,
    rank_bucket: &'static str,
    rank_stars: Option<u8>,
    streak: u32,
    streak_type: StreakKind,
    top_heroes: Vec<HeroStat>,
}

impl From<PlayerRecord> for PlayerPayload {
    fn from(record: PlayerRecord) -> Self {
        let results: Vec<MatchResult> = record.recent_matches.iter().map(|m| m.result).collect();
        let (streak, streak_type) = analytics::streak(&results);

        PlayerPayload {
            rank_bucket: analytics::rank_bucket(record.rank_tier).name(),
            rank_stars: analytics::rank_stars(record.rank_tier),
            streak,
            streak_type,
            top_heroes: analytics::top_heroes(&record.recent_matches),
            record,
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthSummary> {
    Json(freshness::health_summary(
        state.store.as_ref(),
        state.stale_threshold_minutes,
    ))
}

#[derive(Serialize)]
struct PlayersResponse {
    players: Vec<PlayerPayload>,
    total: usize,
    last_updated: Option<u64>,
}

async fn list_players(State(state): State<Arc<AppState>>) -> Json<PlayersResponse> {
    let players = state.store.find_all();
    Json(PlayersResponse {
        total: players.len(),
        last_updated: state.store.latest_update(),
        players: players.into_iter().map(PlayerPayload::from).collect(),
    })
}

async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayerPayload>, ApiError> {
    state
        .store
        .find_by_either_id(&id)
        .map(|record| Json(record.into()))
        .ok_or(ApiError::NotFound)
}

async fn trigger_crawl(State(state): State<Arc<AppState>>) -> Response {
    let summary = state.crawler.run(&state.roster.players).await;

    if let Some(snapshot) = &state.snapshot {
        if let Err(err) = snapshot.store(&state.store.find_all()) {
            tracing::error!(error = %err, "Failed to store snapshot after crawl");
        }
    }

    let status = if summary.is_degraded() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    (status, Json(summary)).into_response()
}

#[derive(Deserialize)]
struct SyncRequest {
    players: Vec<PlayerRecord>,
}

#[derive(Serialize)]
struct SyncResponse {
    synced: usize,
    rejected: usize,
}

/// Push-sync collaborator: an external crawler pushes precomputed records.
/// A bad shared secret rejects the whole batch before anything is applied.
async fn sync(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let expected = format!("Bearer {}", state.sync_secret);
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    if !authorized {
        metrics::counter!(SYNC_BATCH_REJECTED.name).increment(1);
        return Err(ApiError::Unauthorized);
    }

    let mut synced = 0;
    let mut rejected = 0;
    for record in request.players {
        let account_id = record.account_id.clone();
        match state.store.upsert(record) {
            Ok(()) => synced += 1,
            Err(err) => {
                rejected += 1;
                tracing::warn!(account_id = %account_id, error = %err, "Rejected pushed record");
            }
        }
    }

    Ok(Json(SyncResponse { synced, rejected }))
}

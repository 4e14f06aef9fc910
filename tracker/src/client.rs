//! HTTP client for the upstream stats provider. Every read is a single
//! request with no retry: a non-success status or transport failure
//! resolves to an absent or default value at this boundary and is logged,
//! never returned as an error.

use crate::config::Upstream;
use crate::metrics_defs::UPSTREAM_FETCH_FAILURE;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct ProfileInner {
    personaname: Option<String>,
    avatarfull: Option<String>,
}

#[derive(Deserialize)]
struct MmrEstimate {
    estimate: Option<u32>,
}

#[derive(Deserialize)]
struct PlayerResponse {
    profile: Option<ProfileInner>,
    rank_tier: Option<u32>,
    competitive_rank: Option<u32>,
    mmr_estimate: Option<MmrEstimate>,
}

/// Profile fields used by the pipeline, flattened out of the provider's
/// nested response shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub persona_name: Option<String>,
    pub avatar_url: Option<String>,
    pub rank_tier: u32,
    pub competitive_rank: Option<u32>,
    pub estimated_mmr: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct WinLoss {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub lose: u32,
}

/// Raw recent-match row as returned by the provider, most-recent-first.
#[derive(Clone, Debug, Deserialize)]
pub struct RawMatch {
    pub match_id: u64,
    pub hero_id: u32,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    pub radiant_win: bool,
    pub player_slot: u32,
    #[serde(default)]
    pub start_time: u64,
}

#[derive(Deserialize)]
struct HeroEntry {
    id: u32,
    localized_name: String,
}

#[derive(Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl StatsClient {
    pub fn new(upstream: &Upstream) -> Self {
        StatsClient {
            client: reqwest::Client::new(),
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            user_agent: upstream.user_agent.clone(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Option<T> {
        let response = match self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                metrics::counter!(UPSTREAM_FETCH_FAILURE.name).increment(1);
                tracing::warn!(url = %url, error = %err, "Upstream request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            metrics::counter!(UPSTREAM_FETCH_FAILURE.name).increment(1);
            tracing::warn!(url = %url, status = %response.status(), "Upstream returned non-success");
            return None;
        }

        match response.json::<T>().await {
            Ok(value) => Some(value),
            Err(err) => {
                metrics::counter!(UPSTREAM_FETCH_FAILURE.name).increment(1);
                tracing::warn!(url = %url, error = %err, "Failed to parse upstream response");
                None
            }
        }
    }

    /// Profile read. Absent on any failure; the caller decides what a
    /// missing profile means for the entry.
    pub async fn get_profile(&self, account_id: &str) -> Option<Profile> {
        let url = format!("{}/players/{account_id}", self.base_url);
        let data: PlayerResponse = self.get_json(url).await?;

        Some(Profile {
            persona_name: data.profile.as_ref().and_then(|p| p.personaname.clone()),
            avatar_url: data.profile.as_ref().and_then(|p| p.avatarfull.clone()),
            rank_tier: data.rank_tier.unwrap_or(0),
            competitive_rank: data.competitive_rank,
            estimated_mmr: data.mmr_estimate.and_then(|m| m.estimate),
        })
    }

    /// Win/loss totals, zeroed on failure.
    pub async fn get_win_loss(&self, account_id: &str) -> WinLoss {
        let url = format!("{}/players/{account_id}/wl", self.base_url);
        self.get_json(url).await.unwrap_or_default()
    }

    /// Recent matches in provider recency order, empty on failure.
    pub async fn get_recent_matches(&self, account_id: &str, limit: u32) -> Vec<RawMatch> {
        let url = format!("{}/players/{account_id}/matches?limit={limit}", self.base_url);
        self.get_json(url).await.unwrap_or_default()
    }

    /// Hero id to localized name mapping, empty on failure. Memoization
    /// lives in the injected catalog, not here.
    pub async fn get_heroes(&self) -> HashMap<u32, String> {
        let url = format!("{}/heroes", self.base_url);
        let heroes: Vec<HeroEntry> = self.get_json(url).await.unwrap_or_default();
        heroes
            .into_iter()
            .map(|h| (h.id, h.localized_name))
            .collect()
    }
}

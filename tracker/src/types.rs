use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch. All record timestamps use this scale.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
}

impl MatchResult {
    /// Derives the player's outcome from the raw match flags. Slots below
    /// 128 are Radiant; the player won iff their side matches `radiant_win`.
    pub fn from_slot(player_slot: u32, radiant_win: bool) -> Self {
        let is_radiant = player_slot < 128;
        if is_radiant == radiant_win {
            MatchResult::Win
        } else {
            MatchResult::Loss
        }
    }
}

/// One row of the bounded recent-match history kept on a player record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: u64,
    pub hero_id: u32,
    pub hero_name: String,
    pub result: MatchResult,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    // Unix seconds, as reported by the provider.
    pub start_time: u64,
}

/// Cached, denormalized view of one tracked player. `account_id` is the
/// canonical key; `steam_id` is kept only when the roster listed a SteamID64.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub account_id: String,
    #[serde(default)]
    pub steam_id: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub persona_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// 0 = uncalibrated; tens digit = tier 1-8, ones digit = star 1-5.
    #[serde(default)]
    pub rank_tier: u32,
    #[serde(default)]
    pub competitive_rank: Option<u32>,
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub lose: u32,
    #[serde(default)]
    pub win_rate: u32,
    #[serde(default)]
    pub total_games: u32,
    #[serde(default)]
    pub estimated_mmr: Option<u32>,
    /// Most-recent-first, bounded by the crawl match limit.
    #[serde(default)]
    pub recent_matches: Vec<MatchSummary>,
    /// Set by the store on every upsert; never trusted from callers.
    #[serde(default)]
    pub last_updated: u64,
}

/// Aggregate outcome of one crawl over the roster.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CrawlRunSummary {
    pub total: u32,
    pub success: u32,
    pub failed: u32,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl CrawlRunSummary {
    /// A run with more failures than successes is reported as an overall
    /// failure to the caller.
    pub fn is_degraded(&self) -> bool {
        self.failed > self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_slot_and_radiant_win() {
        // Radiant player, radiant won
        assert_eq!(MatchResult::from_slot(0, true), MatchResult::Win);
        // Radiant player, dire won
        assert_eq!(MatchResult::from_slot(127, false), MatchResult::Loss);
        // Dire player, dire won
        assert_eq!(MatchResult::from_slot(128, false), MatchResult::Win);
        // Dire player, radiant won
        assert_eq!(MatchResult::from_slot(130, true), MatchResult::Loss);
    }

    #[test]
    fn degraded_when_failures_outnumber_successes() {
        let summary = CrawlRunSummary {
            total: 3,
            success: 1,
            failed: 2,
            ..Default::default()
        };
        assert!(summary.is_degraded());

        let summary = CrawlRunSummary {
            total: 4,
            success: 2,
            failed: 2,
            ..Default::default()
        };
        assert!(!summary.is_degraded());
    }
}

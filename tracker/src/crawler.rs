//! Sequential, rate-limited driver over the roster. Each entry is
//! resolved, fetched, derived and upserted; failures are recorded and
//! never abort the run. The crawl is deliberately not fanned out across
//! entries so the upstream's implicit rate limit is respected; only the
//! three reads within one entry run concurrently.

use crate::client::StatsClient;
use crate::heroes::HeroCatalog;
use crate::identity::PlayerIdentity;
use crate::metrics_defs::{CRAWL_ENTRY_FAILURE, CRAWL_ENTRY_SUCCESS, CRAWL_RUN_DURATION};
use crate::roster::RosterEntry;
use crate::store::PlayerStore;
use crate::types::{CrawlRunSummary, MatchResult, MatchSummary, PlayerRecord};
use crate::{analytics, types};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};

#[derive(Clone, Copy, Deserialize, Debug, PartialEq)]
pub struct CrawlConfig {
    /// Fixed pause between roster entries. Upstream backpressure, not a
    /// performance knob.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// How many recent matches to keep per player.
    #[serde(default = "default_match_limit")]
    pub match_limit: u32,
}

fn default_delay_ms() -> u64 {
    500
}

fn default_match_limit() -> u32 {
    5
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            delay_ms: default_delay_ms(),
            match_limit: default_match_limit(),
        }
    }
}

pub struct Crawler {
    client: StatsClient,
    heroes: HeroCatalog,
    store: Arc<dyn PlayerStore>,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(client: StatsClient, store: Arc<dyn PlayerStore>, config: CrawlConfig) -> Self {
        Crawler {
            client,
            heroes: HeroCatalog::new(),
            store,
            config,
        }
    }

    /// Runs one crawl over the roster in order. Runs to completion; there
    /// is no cancellation and no whole-batch timeout.
    pub async fn run(&self, roster: &[RosterEntry]) -> CrawlRunSummary {
        let started = Instant::now();
        let mut summary = CrawlRunSummary {
            total: roster.len() as u32,
            ..Default::default()
        };

        tracing::info!(players = roster.len(), "Starting crawl");

        // Warm the hero catalog before the loop, as a single shared fetch.
        self.heroes.populate(&self.client).await;

        for (index, entry) in roster.iter().enumerate() {
            match self.crawl_entry(entry).await {
                Ok(record) => {
                    summary.success += 1;
                    metrics::counter!(CRAWL_ENTRY_SUCCESS.name).increment(1);
                    tracing::info!(
                        player = %entry.name,
                        rank_tier = record.rank_tier,
                        win_rate = record.win_rate,
                        "Crawled player"
                    );
                }
                Err(message) => {
                    summary.failed += 1;
                    metrics::counter!(CRAWL_ENTRY_FAILURE.name).increment(1);
                    tracing::warn!(player = %entry.name, "{message}");
                    summary.errors.push(message);
                }
            }

            if index + 1 < roster.len() {
                sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        metrics::histogram!(CRAWL_RUN_DURATION.name).record(summary.duration_ms as f64);

        tracing::info!(
            success = summary.success,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "Crawl finished"
        );

        summary
    }

    /// One roster entry: resolve, fetch the three endpoints concurrently,
    /// derive, upsert. The error string becomes the run summary entry.
    async fn crawl_entry(&self, entry: &RosterEntry) -> Result<PlayerRecord, String> {
        let identity = PlayerIdentity::from_roster(entry);
        let account_id = identity.account_id.as_str();

        let (profile, win_loss, raw_matches) = tokio::join!(
            self.client.get_profile(account_id),
            self.client.get_win_loss(account_id),
            self.client.get_recent_matches(account_id, self.config.match_limit),
        );

        // Without a profile there is nothing worth caching for this entry.
        let profile = profile.ok_or_else(|| format!("{}: profile unavailable", entry.name))?;

        let recent_matches: Vec<MatchSummary> = raw_matches
            .into_iter()
            .map(|m| MatchSummary {
                match_id: m.match_id,
                hero_id: m.hero_id,
                hero_name: self.heroes.name_for(m.hero_id),
                result: MatchResult::from_slot(m.player_slot, m.radiant_win),
                kills: m.kills,
                deaths: m.deaths,
                assists: m.assists,
                start_time: m.start_time,
            })
            .collect();

        let record = PlayerRecord {
            account_id: identity.account_id,
            steam_id: identity.steam_id,
            display_name: identity.display_name,
            persona_name: profile.persona_name,
            avatar_url: profile.avatar_url,
            rank_tier: profile.rank_tier,
            competitive_rank: profile.competitive_rank,
            win: win_loss.win,
            lose: win_loss.lose,
            win_rate: analytics::win_rate(win_loss.win, win_loss.lose),
            total_games: win_loss.win + win_loss.lose,
            estimated_mmr: profile.estimated_mmr,
            recent_matches,
            last_updated: types::unix_millis(),
        };

        self.store
            .upsert(record.clone())
            .map_err(|err| format!("{}: {err}", entry.name))?;

        Ok(record)
    }
}

//! Pure derivations over raw player statistics: win rate, streaks,
//! hero frequency and rank bucketing. Nothing here touches the network
//! or the store.

use crate::types::{MatchResult, MatchSummary};
use indexmap::IndexMap;
use serde::Serialize;

const TOP_HEROES_LIMIT: usize = 5;

/// Percentage of games won, rounded to the nearest integer. Zero games
/// means a zero win rate, not a division error.
pub fn win_rate(win: u32, lose: u32) -> u32 {
    let total = win + lose;
    if total == 0 {
        return 0;
    }
    ((win as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Win,
    Loss,
    None,
}

/// Length and kind of the consecutive same-outcome run ending at the most
/// recent match. Input must be ordered most-recent-first.
pub fn streak(results: &[MatchResult]) -> (u32, StreakKind) {
    let Some(first) = results.first() else {
        return (0, StreakKind::None);
    };

    let kind = match first {
        MatchResult::Win => StreakKind::Win,
        MatchResult::Loss => StreakKind::Loss,
    };
    let count = results.iter().take_while(|r| **r == *first).count() as u32;

    (count, kind)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeroStat {
    pub hero_id: u32,
    pub games: u32,
    pub wins: u32,
}

/// Groups matches by hero, ordered by games played descending. Ties keep
/// the first-seen order of the input. At most five entries are returned.
pub fn top_heroes(matches: &[MatchSummary]) -> Vec<HeroStat> {
    let mut by_hero: IndexMap<u32, HeroStat> = IndexMap::new();

    for m in matches {
        let stat = by_hero.entry(m.hero_id).or_insert(HeroStat {
            hero_id: m.hero_id,
            games: 0,
            wins: 0,
        });
        stat.games += 1;
        if m.result == MatchResult::Win {
            stat.wins += 1;
        }
    }

    let mut heroes: Vec<HeroStat> = by_hero.into_values().collect();
    // Stable sort preserves the first-seen insertion order on ties.
    heroes.sort_by(|a, b| b.games.cmp(&a.games));
    heroes.truncate(TOP_HEROES_LIMIT);
    heroes
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RankBucket {
    Uncalibrated,
    Herald,
    Guardian,
    Crusader,
    Archon,
    Legend,
    Ancient,
    Divine,
    Immortal,
}

impl RankBucket {
    pub fn name(&self) -> &'static str {
        match self {
            RankBucket::Uncalibrated => "Uncalibrated",
            RankBucket::Herald => "Herald",
            RankBucket::Guardian => "Guardian",
            RankBucket::Crusader => "Crusader",
            RankBucket::Archon => "Archon",
            RankBucket::Legend => "Legend",
            RankBucket::Ancient => "Ancient",
            RankBucket::Divine => "Divine",
            RankBucket::Immortal => "Immortal",
        }
    }
}

/// Maps the tens digit of a rank tier to its named bucket. A tier of zero
/// is uncalibrated regardless of the star digit.
pub fn rank_bucket(rank_tier: u32) -> RankBucket {
    match rank_tier / 10 {
        1 => RankBucket::Herald,
        2 => RankBucket::Guardian,
        3 => RankBucket::Crusader,
        4 => RankBucket::Archon,
        5 => RankBucket::Legend,
        6 => RankBucket::Ancient,
        7 => RankBucket::Divine,
        8 => RankBucket::Immortal,
        _ => RankBucket::Uncalibrated,
    }
}

/// Star level within a tier: the ones digit when it falls in 1-5 and the
/// player is calibrated, otherwise nothing.
pub fn rank_stars(rank_tier: u32) -> Option<u8> {
    if rank_tier / 10 == 0 {
        return None;
    }
    match (rank_tier % 10) as u8 {
        stars @ 1..=5 => Some(stars),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchResult::{Loss, Win};

    fn summary(hero_id: u32, result: MatchResult) -> MatchSummary {
        MatchSummary {
            match_id: 1,
            hero_id,
            hero_name: format!("Hero {hero_id}"),
            result,
            kills: 0,
            deaths: 0,
            assists: 0,
            start_time: 0,
        }
    }

    #[test]
    fn win_rate_rounds() {
        assert_eq!(win_rate(0, 0), 0);
        assert_eq!(win_rate(3, 1), 75);
        assert_eq!(win_rate(1, 3), 25);
        assert_eq!(win_rate(1, 2), 33);
        assert_eq!(win_rate(2, 1), 67);
    }

    #[test]
    fn streak_of_empty_input() {
        assert_eq!(streak(&[]), (0, StreakKind::None));
    }

    #[test]
    fn streak_counts_leading_run() {
        assert_eq!(streak(&[Win, Win, Loss]), (2, StreakKind::Win));
        assert_eq!(streak(&[Loss, Loss, Loss, Win]), (3, StreakKind::Loss));
        assert_eq!(streak(&[Win]), (1, StreakKind::Win));
    }

    #[test]
    fn top_heroes_sorted_by_games_with_first_seen_ties() {
        let matches = vec![
            summary(7, Win),
            summary(12, Loss),
            summary(7, Loss),
            summary(44, Win),
            summary(12, Win),
        ];
        let heroes = top_heroes(&matches);
        assert_eq!(heroes.len(), 3);
        // 7 and 12 both have two games; 7 was seen first.
        assert_eq!(heroes[0].hero_id, 7);
        assert_eq!(heroes[0].games, 2);
        assert_eq!(heroes[0].wins, 1);
        assert_eq!(heroes[1].hero_id, 12);
        assert_eq!(heroes[2].hero_id, 44);
    }

    #[test]
    fn top_heroes_never_exceeds_five() {
        let matches: Vec<MatchSummary> = (0..8).map(|id| summary(id, Win)).collect();
        assert_eq!(top_heroes(&matches).len(), 5);
    }

    #[test]
    fn rank_buckets() {
        assert_eq!(rank_bucket(0), RankBucket::Uncalibrated);
        assert_eq!(rank_bucket(15), RankBucket::Herald);
        assert_eq!(rank_bucket(35), RankBucket::Crusader);
        assert_eq!(rank_bucket(84), RankBucket::Immortal);
        // Star digit without a tier is still uncalibrated
        assert_eq!(rank_bucket(5), RankBucket::Uncalibrated);
        // Out-of-range tens digit
        assert_eq!(rank_bucket(95), RankBucket::Uncalibrated);
    }

    #[test]
    fn rank_stars_valid_range_only() {
        assert_eq!(rank_stars(35), Some(5));
        assert_eq!(rank_stars(31), Some(1));
        assert_eq!(rank_stars(30), None);
        assert_eq!(rank_stars(37), None);
        assert_eq!(rank_stars(0), None);
        assert_eq!(rank_stars(5), None);
    }
}

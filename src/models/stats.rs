//! Derived statistics models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Combat efficiency line for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatScoreStat {
    pub player_name: String,

    pub agent: Option<String>,

    pub team: String,

    /// Average combat score per round
    pub acs: f64,

    /// Average damage per round, reported damage only
    pub adr: f64,

    /// Headshot percentage
    pub headshot_percentage: f64,
}

/// KAST impact line for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KastImpactStat {
    pub player_name: String,

    pub agent: Option<String>,

    pub team: String,

    /// Rounds this player appeared in
    pub total_rounds: u32,

    pub rounds_with_kast: u32,

    pub rounds_without_kast: u32,

    /// Share of rounds with a kill, assist or survival (0 to 100)
    pub kast_percentage: f64,

    /// Team round loss rate when this player contributed nothing (0 to 100)
    pub loss_rate_without_kast: f64,

    /// Team round win rate when they did contribute (0 to 100)
    pub win_rate_with_kast: f64,

    /// Coaching sentence derived from the rates
    pub insight: String,
}

/// Economy pattern line for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyStat {
    pub team_name: String,

    pub total_rounds: u32,

    /// Win rate on the two pistol rounds (0 to 100)
    pub pistol_win_rate: f64,

    /// Win rate on force-buy rounds (0 to 100)
    pub force_buy_win_rate: f64,

    /// Win rate on eco rounds, the upset potential (0 to 100)
    pub eco_conversion_rate: f64,

    /// Loss rate on bonus rounds reached off a won eco or force (0 to 100).
    /// 0 when no qualifying bonus round was played.
    pub bonus_loss_rate: f64,

    /// Win rate on full-buy rounds (0 to 100)
    pub full_buy_win_rate: f64,

    /// Rule-based coaching insights
    pub insights: Vec<String>,
}

/// Raw per-player totals accumulated from round history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundTotals {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub first_bloods: u32,
    pub first_deaths: u32,
}

/// Everything derived from one match.
///
/// Maps are ordered so that serializing the same bundle twice is
/// byte-identical, which is what makes cached copies safe to reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatsBundle {
    pub match_id: String,

    /// Content digest of the input record; a stable cache key
    pub source_digest: String,

    /// Combat lines keyed by player name
    pub player_stats: BTreeMap<String, CombatScoreStat>,

    /// KAST impact, most damaging gaps first
    pub kast_impact: Vec<KastImpactStat>,

    /// Economy patterns keyed by team name
    pub economy: BTreeMap<String, EconomyStat>,

    /// Totals from round history; empty for box-score-only feeds
    pub round_totals: BTreeMap<String, PlayerRoundTotals>,
}

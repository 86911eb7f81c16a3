//! Score-line estimation for matches with no round history.
//!
//! When a feed ships only box scores, KAST and economy figures are
//! estimated from what survives: K/D/A ratios and the final score line.
//! The estimates are banded heuristics tuned to plausible pro ranges, not
//! a predictive model. Every function here is pure, so identical inputs
//! always estimate identically.

use crate::engine::constants::{
    BONUS_LOSS_MODEL, KAST_BASE_POSITIVE, KAST_BASE_STRONG, KAST_BASE_WEAK, KAST_ESTIMATE_CEILING,
    KAST_ESTIMATE_FLOOR, KAST_SLOPE_POSITIVE, KAST_SLOPE_STRONG, KAST_SLOPE_WEAK, KDA_EVEN,
    KDA_STRONG, LOSS_RATE_BASE, LOSS_RATE_CEILING, LOSS_RATE_DEATH_WEIGHT, LOSS_RATE_FLOOR,
    LOSER_ECO_MODEL, LOSER_FORCE_MODEL, LOSER_FULL_BUY_MODEL, LOSER_PISTOL_MODEL,
    WINNER_ECO_MODEL, WINNER_FORCE_MODEL, WINNER_FULL_BUY_MODEL, WINNER_PISTOL_MODEL,
    WIN_RATE_BASE, WIN_RATE_CEILING, WIN_RATE_FLOOR, WIN_RATE_KDA_WEIGHT,
};
use crate::engine::round_to_tenth;
use crate::models::{MatchRecord, PlayerAggregate};

/// Estimated KAST figures for one player, shaped to slot into the same
/// output as exact counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedKast {
    pub total_rounds: u32,
    pub rounds_with_kast: u32,
    pub rounds_without_kast: u32,
    pub kast_percentage: f64,
    pub loss_rate_without_kast: f64,
    pub win_rate_with_kast: f64,
}

/// Estimated category win rates for one team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedEconomy {
    pub total_rounds: u32,
    pub pistol_win_rate: f64,
    pub force_buy_win_rate: f64,
    pub eco_conversion_rate: f64,
    pub bonus_loss_rate: f64,
    pub full_buy_win_rate: f64,
}

/// Map a K/D/A ratio onto an estimated KAST percentage.
///
/// Three linear bands, continuous at the seams and monotonically
/// increasing, clamped to a plausible pro range.
pub fn kast_percentage_from_kda(kda_ratio: f64) -> f64 {
    let estimate = if kda_ratio > KDA_STRONG {
        KAST_BASE_STRONG + (kda_ratio - KDA_STRONG) * KAST_SLOPE_STRONG
    } else if kda_ratio > KDA_EVEN {
        KAST_BASE_POSITIVE + (kda_ratio - KDA_EVEN) * KAST_SLOPE_POSITIVE
    } else {
        KAST_BASE_WEAK + kda_ratio * KAST_SLOPE_WEAK
    };
    estimate.clamp(KAST_ESTIMATE_FLOOR, KAST_ESTIMATE_CEILING)
}

/// Estimate a full KAST line for one player from box-score totals.
pub fn estimate_kast(player: &PlayerAggregate, total_rounds: u32) -> EstimatedKast {
    let kda_ratio = player.kda_ratio();
    let kast_percentage = kast_percentage_from_kda(kda_ratio);

    let rounds_with_kast =
        ((total_rounds as f64 * kast_percentage / 100.0).round() as u32).min(total_rounds);
    let rounds_without_kast = total_rounds - rounds_with_kast;

    // Players who die often are modeled as costlier when they fail to
    // contribute
    let death_frequency = player.deaths as f64 / total_rounds.max(1) as f64;
    let loss_rate = (LOSS_RATE_BASE + death_frequency * 100.0 * LOSS_RATE_DEATH_WEIGHT)
        .clamp(LOSS_RATE_FLOOR, LOSS_RATE_CEILING);
    let win_rate =
        (WIN_RATE_BASE + kda_ratio * WIN_RATE_KDA_WEIGHT).clamp(WIN_RATE_FLOOR, WIN_RATE_CEILING);

    EstimatedKast {
        total_rounds,
        rounds_with_kast,
        rounds_without_kast,
        kast_percentage: round_to_tenth(kast_percentage),
        loss_rate_without_kast: round_to_tenth(loss_rate),
        win_rate_with_kast: round_to_tenth(win_rate),
    }
}

/// Estimate category win rates for one team from the final score line.
///
/// A tied score has no winner, so both teams estimate with the loser
/// models.
pub fn estimate_economy(
    record: &MatchRecord,
    team_name: &str,
    total_rounds: u32,
) -> EstimatedEconomy {
    let team_score = record.team_score(team_name).unwrap_or(0).max(0);
    let win_rate = team_score as f64 / total_rounds.max(1) as f64;

    let (pistol, force, eco, full_buy) = if record.team_won(team_name) {
        (
            WINNER_PISTOL_MODEL.apply(win_rate),
            WINNER_FORCE_MODEL.apply(win_rate),
            WINNER_ECO_MODEL.apply(win_rate),
            WINNER_FULL_BUY_MODEL.apply(win_rate),
        )
    } else {
        (
            LOSER_PISTOL_MODEL.apply(win_rate),
            LOSER_FORCE_MODEL.apply(win_rate),
            LOSER_ECO_MODEL.apply(win_rate),
            LOSER_FULL_BUY_MODEL.apply(win_rate),
        )
    };
    let bonus_loss = BONUS_LOSS_MODEL.apply(1.0 - win_rate);

    EstimatedEconomy {
        total_rounds,
        pistol_win_rate: round_to_tenth(pistol),
        force_buy_win_rate: round_to_tenth(force),
        eco_conversion_rate: round_to_tenth(eco),
        bonus_loss_rate: round_to_tenth(bonus_loss),
        full_buy_win_rate: round_to_tenth(full_buy),
    }
}

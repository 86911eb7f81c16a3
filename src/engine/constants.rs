//! Named constants behind every derived statistic.
//!
//! Scoring weights and loadout bands follow the published title conventions;
//! the estimation models are heuristics calibrated against professional match
//! data and carry no statistical guarantee.

// ── Combat scoring ──────────────────────────────────────────────

/// Combat score points per kill.
pub const KILL_SCORE_WEIGHT: f64 = 150.0;

/// Combat score points per assist.
pub const ASSIST_SCORE_WEIGHT: f64 = 25.0;

/// Damage substituted per kill when a nonzero kill line arrives with zero
/// reported damage. Applies to the combat score only, never to ADR.
pub const ESTIMATED_DAMAGE_PER_KILL: f64 = 140.0;

/// Assumed shots fired per kill when no exact shot count is reported.
pub const ASSUMED_SHOTS_PER_KILL: u32 = 4;

// ── Round classification ────────────────────────────────────────

/// Rounds per half; a pistol round opens each half.
pub const ROUNDS_PER_HALF: u32 = 12;

/// Team loadout totals below this value classify the round as an eco.
pub const ECO_LOADOUT_CEILING: u32 = 10_000;

/// Team loadout totals below this value (and at or above the eco ceiling)
/// classify the round as a force buy. At or above is a full buy.
pub const FORCE_LOADOUT_CEILING: u32 = 19_500;

/// Assumed match length when neither round history, declared count nor the
/// score sum is usable.
pub const FALLBACK_MATCH_LENGTH: u32 = 23;

// ── KAST estimation from KDA (fallback mode) ────────────────────

/// KDA above this marks a dominant performance.
pub const KDA_STRONG: f64 = 2.0;

/// KDA above this marks a positive performance.
pub const KDA_EVEN: f64 = 1.0;

pub const KAST_BASE_STRONG: f64 = 82.0;
pub const KAST_SLOPE_STRONG: f64 = 2.0;
pub const KAST_BASE_POSITIVE: f64 = 70.0;
pub const KAST_SLOPE_POSITIVE: f64 = 12.0;
pub const KAST_BASE_WEAK: f64 = 55.0;
pub const KAST_SLOPE_WEAK: f64 = 15.0;

/// Plausible band for an estimated KAST percentage.
pub const KAST_ESTIMATE_FLOOR: f64 = 50.0;
pub const KAST_ESTIMATE_CEILING: f64 = 95.0;

pub const LOSS_RATE_BASE: f64 = 65.0;
pub const LOSS_RATE_DEATH_WEIGHT: f64 = 0.3;
pub const LOSS_RATE_FLOOR: f64 = 65.0;
pub const LOSS_RATE_CEILING: f64 = 95.0;

pub const WIN_RATE_BASE: f64 = 55.0;
pub const WIN_RATE_KDA_WEIGHT: f64 = 10.0;
pub const WIN_RATE_FLOOR: f64 = 55.0;
pub const WIN_RATE_CEILING: f64 = 90.0;

// ── Economy estimation from the score line (fallback mode) ──────

/// Linear rate model `base + (input - anchor) * slope`, clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateModel {
    pub base: f64,
    pub anchor: f64,
    pub slope: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl RateModel {
    pub fn apply(&self, input: f64) -> f64 {
        (self.base + (input - self.anchor) * self.slope).clamp(self.floor, self.ceiling)
    }
}

pub const WINNER_PISTOL_MODEL: RateModel = RateModel {
    base: 50.0,
    anchor: 0.5,
    slope: 80.0,
    floor: 0.0,
    ceiling: 100.0,
};

pub const WINNER_FORCE_MODEL: RateModel = RateModel {
    base: 30.0,
    anchor: 0.4,
    slope: 50.0,
    floor: 0.0,
    ceiling: 100.0,
};

pub const WINNER_ECO_MODEL: RateModel = RateModel {
    base: 15.0,
    anchor: 0.4,
    slope: 40.0,
    floor: 0.0,
    ceiling: 50.0,
};

pub const WINNER_FULL_BUY_MODEL: RateModel = RateModel {
    base: 55.0,
    anchor: 0.5,
    slope: 60.0,
    floor: 30.0,
    ceiling: 90.0,
};

pub const LOSER_PISTOL_MODEL: RateModel = RateModel {
    base: 20.0,
    anchor: 0.0,
    slope: 50.0,
    floor: 0.0,
    ceiling: 100.0,
};

pub const LOSER_FORCE_MODEL: RateModel = RateModel {
    base: 15.0,
    anchor: 0.0,
    slope: 40.0,
    floor: 0.0,
    ceiling: 100.0,
};

pub const LOSER_ECO_MODEL: RateModel = RateModel {
    base: 10.0,
    anchor: 0.0,
    slope: 30.0,
    floor: 0.0,
    ceiling: 50.0,
};

pub const LOSER_FULL_BUY_MODEL: RateModel = RateModel {
    base: 35.0,
    anchor: 0.0,
    slope: 50.0,
    floor: 30.0,
    ceiling: 90.0,
};

/// Applied to the match loss rate (1 - win rate).
pub const BONUS_LOSS_MODEL: RateModel = RateModel {
    base: 30.0,
    anchor: 0.0,
    slope: 40.0,
    floor: 0.0,
    ceiling: 100.0,
};

// ── Insight thresholds ──────────────────────────────────────────

/// Loss rate without KAST at or above this reads "critically impacts".
pub const KAST_LOSS_CRITICAL: f64 = 70.0;

/// Loss rate without KAST at or above this reads "significantly affects".
pub const KAST_LOSS_SIGNIFICANT: f64 = 50.0;

pub const PISTOL_WEAKNESS_BELOW: f64 = 40.0;
pub const PISTOL_STRENGTH_AT: f64 = 70.0;

pub const SNOWBALL_FORCE_WIN_AT: f64 = 60.0;
pub const SNOWBALL_BONUS_LOSS_AT: f64 = 50.0;

pub const ECO_UPSET_AT: f64 = 30.0;
pub const ECO_STRUGGLE_BELOW: f64 = 15.0;

/// The low-eco insight needs strictly more eco rounds than this to fire.
pub const ECO_STRUGGLE_MIN_ROUNDS: u32 = 3;

pub const FULL_BUY_REVIEW_BELOW: f64 = 50.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_model_applies_and_clamps() {
        // Winner pistol at a 65% match win rate: 50 + 0.15 * 80 = 62
        let rate = WINNER_PISTOL_MODEL.apply(0.65);
        assert!((rate - 62.0).abs() < 1e-9);

        // Eco estimates cap at 50
        assert_eq!(WINNER_ECO_MODEL.apply(2.0), 50.0);

        // Full buy estimates never dip below 30
        assert_eq!(LOSER_FULL_BUY_MODEL.apply(-1.0), 30.0);
    }

    #[test]
    fn test_loadout_bands_are_ordered() {
        assert!(ECO_LOADOUT_CEILING < FORCE_LOADOUT_CEILING);
    }
}

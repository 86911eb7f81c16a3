//! Team economy stats and pattern insights.
//!
//! The insight rules run on category win rates only, so counted and
//! estimated figures flow through the same rule table. The one exception
//! is the low-eco-success rule, which needs a real eco round count and
//! therefore never fires on estimated figures.

use crate::engine::attribution::EconomyBreakdown;
use crate::engine::constants::{
    ECO_STRUGGLE_BELOW, ECO_STRUGGLE_MIN_ROUNDS, ECO_UPSET_AT, FULL_BUY_REVIEW_BELOW,
    PISTOL_STRENGTH_AT, PISTOL_WEAKNESS_BELOW, SNOWBALL_BONUS_LOSS_AT, SNOWBALL_FORCE_WIN_AT,
};
use crate::engine::estimator::EstimatedEconomy;
use crate::engine::round_to_tenth;
use crate::models::EconomyStat;

/// Where a team's economy figures came from.
#[derive(Debug, Clone, Copy)]
pub enum EconomySource {
    /// Counted from classified round history
    Exact(EconomyBreakdown),
    /// Estimated from the final score line
    Estimated(EstimatedEconomy),
}

/// Percentage with a floored denominator, rounded to one decimal.
fn rate(part: u32, whole: u32) -> f64 {
    round_to_tenth(part as f64 / whole.max(1) as f64 * 100.0)
}

/// Assemble the output stat for one team from either source.
pub fn economy_stat(team_name: &str, source: EconomySource) -> EconomyStat {
    let (total_rounds, pistol, force, eco, bonus_loss, full_buy, eco_rounds_played) = match source {
        EconomySource::Exact(breakdown) => (
            breakdown.total_rounds,
            rate(breakdown.pistol_rounds_won, breakdown.pistol_rounds_played),
            rate(breakdown.force_buy_wins, breakdown.force_buy_rounds),
            rate(breakdown.eco_round_wins, breakdown.eco_rounds),
            rate(
                breakdown.bonus_rounds_lost,
                breakdown.bonus_rounds_after_force_win,
            ),
            rate(breakdown.full_buy_wins, breakdown.full_buy_rounds),
            breakdown.eco_rounds,
        ),
        // Category round counts are unknown without round history
        EconomySource::Estimated(estimate) => (
            estimate.total_rounds,
            estimate.pistol_win_rate,
            estimate.force_buy_win_rate,
            estimate.eco_conversion_rate,
            estimate.bonus_loss_rate,
            estimate.full_buy_win_rate,
            0,
        ),
    };

    let insights = economy_insights(
        team_name,
        pistol,
        force,
        eco,
        bonus_loss,
        full_buy,
        eco_rounds_played,
    );

    EconomyStat {
        team_name: team_name.to_string(),
        total_rounds,
        pistol_win_rate: pistol,
        force_buy_win_rate: force,
        eco_conversion_rate: eco,
        bonus_loss_rate: bonus_loss,
        full_buy_win_rate: full_buy,
        insights,
    }
}

/// Run the insight rule table over one team's category rates.
///
/// Rules fire independently; several insights can stack for the same
/// team.
pub fn economy_insights(
    team_name: &str,
    pistol_win_rate: f64,
    force_buy_win_rate: f64,
    eco_conversion_rate: f64,
    bonus_loss_rate: f64,
    full_buy_win_rate: f64,
    eco_rounds_played: u32,
) -> Vec<String> {
    let mut insights = Vec::new();

    if pistol_win_rate < PISTOL_WEAKNESS_BELOW {
        insights.push(format!(
            "Pistol rounds are a weakness ({pistol_win_rate:.1}%). \
             Review opening strategies and agent utility usage."
        ));
    } else if pistol_win_rate >= PISTOL_STRENGTH_AT {
        insights.push(format!(
            "Strong pistol round performance ({pistol_win_rate:.1}% win rate) - \
             setting favorable economy early."
        ));
    }

    if force_buy_win_rate >= SNOWBALL_FORCE_WIN_AT && bonus_loss_rate >= SNOWBALL_BONUS_LOSS_AT {
        insights.push(format!(
            "Snowball pattern detected: {team_name} wins force-buys ({force_buy_win_rate:.1}%) \
             but loses {bonus_loss_rate:.1}% of subsequent bonus rounds. \
             Net negative economy impact despite winning eco rounds."
        ));
    }

    if eco_conversion_rate >= ECO_UPSET_AT {
        insights.push(format!(
            "High eco conversion rate ({eco_conversion_rate:.1}%) - \
             team can upset on save rounds. Consider playing for picks more often."
        ));
    } else if eco_conversion_rate < ECO_STRUGGLE_BELOW && eco_rounds_played > ECO_STRUGGLE_MIN_ROUNDS
    {
        insights.push(format!(
            "Low eco round success ({eco_conversion_rate:.1}%). \
             Consider coordinated rushes or stacking sites during saves."
        ));
    }

    if full_buy_win_rate < FULL_BUY_REVIEW_BELOW {
        insights.push(format!(
            "Full buy win rate is concerning ({full_buy_win_rate:.1}%). \
             Review executes and utility coordination."
        ));
    }

    insights
}

//! KAST impact stats and their insight sentences.
//!
//! Exact counters and score-line estimates meet here: both collapse into
//! the same output shape, so consumers never branch on how the figures
//! were derived.

use std::cmp::Ordering;

use crate::engine::attribution::KastCounters;
use crate::engine::constants::{KAST_LOSS_CRITICAL, KAST_LOSS_SIGNIFICANT};
use crate::engine::estimator::EstimatedKast;
use crate::engine::round_to_tenth;
use crate::models::{KastImpactStat, PlayerIdentity};

/// Where a player's KAST figures came from.
#[derive(Debug, Clone, Copy)]
pub enum KastSource {
    /// Counted round by round from match history
    Exact(KastCounters),
    /// Estimated from box-score totals
    Estimated(EstimatedKast),
}

/// Assemble the output stat for one player from either source.
pub fn kast_impact_stat(identity: &PlayerIdentity, source: KastSource) -> KastImpactStat {
    let (total_rounds, rounds_with, rounds_without, kast_pct, loss_rate, win_rate) = match source {
        KastSource::Exact(counters) => {
            let kast_pct = round_to_tenth(
                counters.rounds_with_kast as f64 / counters.total_rounds.max(1) as f64 * 100.0,
            );
            let loss_rate = round_to_tenth(
                counters.team_losses_without_kast as f64
                    / counters.rounds_without_kast.max(1) as f64
                    * 100.0,
            );
            let win_rate = round_to_tenth(
                counters.team_wins_with_kast as f64 / counters.rounds_with_kast.max(1) as f64
                    * 100.0,
            );
            (
                counters.total_rounds,
                counters.rounds_with_kast,
                counters.rounds_without_kast,
                kast_pct,
                loss_rate,
                win_rate,
            )
        }
        KastSource::Estimated(estimate) => (
            estimate.total_rounds,
            estimate.rounds_with_kast,
            estimate.rounds_without_kast,
            estimate.kast_percentage,
            estimate.loss_rate_without_kast,
            estimate.win_rate_with_kast,
        ),
    };

    let insight = kast_insight(&identity.name, total_rounds, rounds_without, loss_rate);

    KastImpactStat {
        player_name: identity.name.clone(),
        agent: identity.agent.clone(),
        team: identity.team.clone(),
        total_rounds,
        rounds_with_kast: rounds_with,
        rounds_without_kast: rounds_without,
        kast_percentage: kast_pct,
        loss_rate_without_kast: loss_rate,
        win_rate_with_kast: win_rate,
        insight,
    }
}

/// Render the per-player insight sentence.
pub fn kast_insight(
    player_name: &str,
    total_rounds: u32,
    rounds_without_kast: u32,
    loss_rate: f64,
) -> String {
    if rounds_without_kast == 0 {
        return format!(
            "{player_name} maintained KAST in all {total_rounds} rounds - exceptional consistency."
        );
    }

    let severity = if loss_rate >= KAST_LOSS_CRITICAL {
        "critically impacts"
    } else if loss_rate >= KAST_LOSS_SIGNIFICANT {
        "significantly affects"
    } else {
        "impacts"
    };

    format!(
        "Team loses {loss_rate:.1}% of rounds when {player_name} dies without KAST. \
         ({rounds_without_kast}/{total_rounds} rounds without KAST). \
         Their positioning {severity} team performance."
    )
}

/// Order stats by impact: highest loss rate first, names break ties so
/// equal rates always list the same way.
pub fn sort_by_impact(stats: &mut [KastImpactStat]) {
    stats.sort_by(|a, b| {
        b.loss_rate_without_kast
            .partial_cmp(&a.loss_rate_without_kast)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
}

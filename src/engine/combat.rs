//! Combat efficiency: ACS, ADR and headshot percentage.

use crate::engine::constants::{
    ASSIST_SCORE_WEIGHT, ASSUMED_SHOTS_PER_KILL, ESTIMATED_DAMAGE_PER_KILL, KILL_SCORE_WEIGHT,
};
use crate::engine::round_to_tenth;
use crate::models::{CombatScoreStat, PlayerAggregate};

/// Average combat score per round.
///
/// Feeds that only carry frag lines report zero damage next to a nonzero
/// kill count; those get a per-kill damage substitute so the score stays
/// usable. The substitution never reaches ADR.
pub fn average_combat_score(player: &PlayerAggregate, total_rounds: u32) -> f64 {
    let rounds = total_rounds.max(1) as f64;

    let damage = if player.damage_dealt == 0 && player.kills > 0 {
        player.kills as f64 * ESTIMATED_DAMAGE_PER_KILL
    } else {
        player.damage_dealt as f64
    };

    let combat_score = damage
        + player.kills as f64 * KILL_SCORE_WEIGHT
        + player.assists as f64 * ASSIST_SCORE_WEIGHT;

    round_to_tenth(combat_score / rounds)
}

/// Average damage per round, from reported damage only.
pub fn average_damage_per_round(player: &PlayerAggregate, total_rounds: u32) -> f64 {
    let rounds = total_rounds.max(1) as f64;
    round_to_tenth(player.damage_dealt as f64 / rounds)
}

/// Headshot percentage, from the exact shot count when the feed reports
/// one, otherwise from an assumed shots-per-kill model.
pub fn headshot_percentage(player: &PlayerAggregate) -> f64 {
    let shots = match player.shots_fired {
        Some(s) if s > 0 => s,
        _ => (player.kills * ASSUMED_SHOTS_PER_KILL).max(1),
    };
    round_to_tenth(player.headshots as f64 / shots as f64 * 100.0)
}

/// Assemble the full combat line for one player.
pub fn combat_score_stat(player: &PlayerAggregate, total_rounds: u32) -> CombatScoreStat {
    CombatScoreStat {
        player_name: player.identity.name.clone(),
        agent: player.identity.agent.clone(),
        team: player.identity.team.clone(),
        acs: average_combat_score(player, total_rounds),
        adr: average_damage_per_round(player, total_rounds),
        headshot_percentage: headshot_percentage(player),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(kills: u32, deaths: u32, assists: u32, damage: u32) -> PlayerAggregate {
        PlayerAggregate::new("Rezze", "Vipers")
            .with_combat(kills, deaths, assists)
            .with_damage(damage)
    }

    #[test]
    fn test_acs_from_reported_damage() {
        // (3000 + 20*150 + 4*25) / 24 = 254.166...
        let p = player(20, 14, 4, 3000);
        assert_eq!(average_combat_score(&p, 24), 254.2);
    }

    #[test]
    fn test_acs_substitutes_damage_for_frag_only_feeds() {
        // damage = 10 * 140 = 1400; (1400 + 1500) / 20 = 145
        let p = player(10, 8, 0, 0);
        assert_eq!(average_combat_score(&p, 20), 145.0);
    }

    #[test]
    fn test_acs_no_substitution_without_kills() {
        let p = player(0, 12, 2, 0);
        // (0 + 0 + 50) / 20 = 2.5
        assert_eq!(average_combat_score(&p, 20), 2.5);
    }

    #[test]
    fn test_adr_never_substitutes() {
        let p = player(10, 8, 0, 0);
        assert_eq!(average_damage_per_round(&p, 20), 0.0);

        let q = player(10, 8, 0, 2600);
        assert_eq!(average_damage_per_round(&q, 20), 130.0);
    }

    #[test]
    fn test_zero_total_rounds_treated_as_one() {
        let p = player(2, 1, 0, 300);
        // Denominator floors at 1 round
        assert_eq!(average_combat_score(&p, 0), 600.0);
        assert_eq!(average_damage_per_round(&p, 0), 300.0);

        let silent = player(0, 0, 0, 0);
        assert_eq!(average_combat_score(&silent, 0), 0.0);
        assert_eq!(average_damage_per_round(&silent, 0), 0.0);
    }

    #[test]
    fn test_headshot_percentage_assumed_shots() {
        // 9 headshots / (18 kills * 4 shots) = 12.5%
        let p = player(18, 10, 2, 2400).with_headshots(9);
        assert_eq!(headshot_percentage(&p), 12.5);
    }

    #[test]
    fn test_headshot_percentage_prefers_exact_shots() {
        let p = player(18, 10, 2, 2400)
            .with_headshots(9)
            .with_shots_fired(60);
        assert_eq!(headshot_percentage(&p), 15.0);
    }

    #[test]
    fn test_headshot_percentage_zero_kills() {
        let p = player(0, 5, 0, 120).with_headshots(0);
        assert_eq!(headshot_percentage(&p), 0.0);
    }

    #[test]
    fn test_headshot_percentage_zero_exact_shots_falls_back() {
        // A reported shot count of 0 is unusable; fall back to the model
        let p = player(4, 3, 0, 600).with_headshots(2).with_shots_fired(0);
        assert_eq!(headshot_percentage(&p), 12.5);
    }

    #[test]
    fn test_combat_stat_fields_non_negative() {
        let p = PlayerAggregate::new("Dusk", "Nocturne");
        let stat = combat_score_stat(&p, 0);

        assert!(stat.acs >= 0.0);
        assert!(stat.adr >= 0.0);
        assert!(stat.headshot_percentage >= 0.0);
        assert_eq!(stat.team, "Nocturne");
    }
}

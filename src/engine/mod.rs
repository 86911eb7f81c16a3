//! Statistics derivation engine.
//!
//! Turns a raw match record into derived combat, KAST and economy stats.
//! Two derivation modes cover the two shapes telemetry arrives in: exact
//! counting when per-round history is present, and score-line estimation
//! when only the box score survived. Mode selection happens here; the
//! per-stat modules are pure and never look at the input twice.
//!
//! The engine holds no state beyond its configuration, so one instance
//! can serve concurrent callers and identical inputs always produce
//! byte-identical output.

pub mod attribution;
pub mod combat;
pub mod constants;
pub mod economy;
pub mod estimator;
pub mod kast;

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::models::{
    CombatScoreStat, EconomyStat, KastImpactStat, MatchRecord, MatchStatsBundle, PlayerAggregate,
};

use self::economy::EconomySource;
use self::kast::KastSource;

/// Round to one decimal place, the precision every output rate uses.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Structural faults in an input match.
///
/// These are never patched by defaults: guessing at an unknown team or a
/// negative count would misattribute wins and losses instead of failing
/// loudly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMatchData {
    #[error("{field} names team {value:?}, expected {team_one:?} or {team_two:?}")]
    UnknownTeam {
        field: &'static str,
        value: String,
        team_one: String,
        team_two: String,
    },

    #[error("{field} names player {value:?}, who is not on the match roster")]
    UnknownPlayer {
        field: &'static str,
        value: String,
    },

    #[error("{field} is negative ({value})")]
    NegativeCount {
        field: &'static str,
        value: i64,
    },
}

fn unknown_team(field: &'static str, value: &str, record: &MatchRecord) -> InvalidMatchData {
    InvalidMatchData::UnknownTeam {
        field,
        value: value.to_string(),
        team_one: record.team_one.clone(),
        team_two: record.team_two.clone(),
    }
}

/// Reject matches whose references cannot be attributed safely.
fn validate(record: &MatchRecord) -> Result<(), InvalidMatchData> {
    if record.total_rounds < 0 {
        return Err(InvalidMatchData::NegativeCount {
            field: "total_rounds",
            value: record.total_rounds as i64,
        });
    }
    if record.team_one_score < 0 {
        return Err(InvalidMatchData::NegativeCount {
            field: "team_one_score",
            value: record.team_one_score as i64,
        });
    }
    if record.team_two_score < 0 {
        return Err(InvalidMatchData::NegativeCount {
            field: "team_two_score",
            value: record.team_two_score as i64,
        });
    }

    for player in &record.players {
        if !record.is_declared_team(&player.identity.team) {
            return Err(unknown_team(
                "players.identity.team",
                &player.identity.team,
                record,
            ));
        }
    }

    for round in &record.rounds {
        if !record.is_declared_team(&round.attack_team) {
            return Err(unknown_team("rounds.attack_team", &round.attack_team, record));
        }
        if !record.is_declared_team(&round.defense_team) {
            return Err(unknown_team(
                "rounds.defense_team",
                &round.defense_team,
                record,
            ));
        }
        if !record.is_declared_team(&round.winner) {
            return Err(unknown_team("rounds.winner", &round.winner, record));
        }
        for state in &round.player_states {
            if record.roster_team(&state.player_name).is_none() {
                return Err(InvalidMatchData::UnknownPlayer {
                    field: "rounds.player_states.player_name",
                    value: state.player_name.clone(),
                });
            }
        }
    }

    Ok(())
}

/// First 16 hex characters of a SHA256 over the input's canonical JSON
/// form. Identical inputs always carry the same digest, which is what
/// lets a cache serve a prior bundle verbatim.
fn source_digest(record: &MatchRecord) -> String {
    let canonical =
        serde_json::to_string(record).unwrap_or_else(|_| record.match_id.clone());
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

/// The derivation facade. Construct once, call from anywhere.
#[derive(Debug, Clone)]
pub struct StatsEngine {
    config: EngineConfig,
}

impl StatsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Combat scoring for one player. Pure arithmetic, no validation.
    pub fn compute_combat_score(
        &self,
        player: &PlayerAggregate,
        total_rounds: u32,
    ) -> CombatScoreStat {
        combat::combat_score_stat(player, total_rounds)
    }

    /// KAST impact for every player, ordered by impact.
    ///
    /// Exact mode covers the players who appear in round history;
    /// fallback mode covers the whole roster.
    pub fn compute_kast_impact(
        &self,
        record: &MatchRecord,
    ) -> Result<Vec<KastImpactStat>, InvalidMatchData> {
        validate(record)?;
        let total_rounds = self.resolve_total_rounds(record);

        let mut stats = if record.rounds.is_empty() {
            self.estimated_kast_stats(record, total_rounds)
        } else {
            let attribution = attribution::resolve(record, &self.config);
            self.exact_kast_stats(record, &attribution)
        };
        kast::sort_by_impact(&mut stats);
        Ok(stats)
    }

    /// Economy pattern for one named team.
    pub fn compute_economy_pattern(
        &self,
        record: &MatchRecord,
        team_name: &str,
    ) -> Result<EconomyStat, InvalidMatchData> {
        validate(record)?;
        if !record.is_declared_team(team_name) {
            return Err(unknown_team("team_name", team_name, record));
        }
        let total_rounds = self.resolve_total_rounds(record);

        let stat = if record.rounds.is_empty() {
            economy::economy_stat(
                team_name,
                EconomySource::Estimated(estimator::estimate_economy(
                    record,
                    team_name,
                    total_rounds,
                )),
            )
        } else {
            let attribution = attribution::resolve(record, &self.config);
            let breakdown = attribution
                .team_breakdowns
                .get(team_name)
                .copied()
                .unwrap_or_default();
            economy::economy_stat(team_name, EconomySource::Exact(breakdown))
        };
        Ok(stat)
    }

    /// Derive the full stats bundle for a match.
    pub fn process_match_stats(
        &self,
        record: &MatchRecord,
    ) -> Result<MatchStatsBundle, InvalidMatchData> {
        validate(record)?;
        let total_rounds = self.resolve_total_rounds(record);
        let exact = !record.rounds.is_empty();
        tracing::debug!(
            match_id = %record.match_id,
            exact_mode = exact,
            total_rounds,
            "deriving match stats"
        );

        let mut player_stats = BTreeMap::new();
        for player in &record.players {
            player_stats.insert(
                player.identity.name.clone(),
                combat::combat_score_stat(player, total_rounds),
            );
        }

        let teams = [record.team_one.as_str(), record.team_two.as_str()];
        let (mut kast_impact, economy, round_totals) = if exact {
            let attribution = attribution::resolve(record, &self.config);
            let stats = self.exact_kast_stats(record, &attribution);

            let mut economy = BTreeMap::new();
            for team in teams {
                let breakdown = attribution
                    .team_breakdowns
                    .get(team)
                    .copied()
                    .unwrap_or_default();
                economy.insert(
                    team.to_string(),
                    economy::economy_stat(team, EconomySource::Exact(breakdown)),
                );
            }
            (stats, economy, attribution.player_totals)
        } else {
            let stats = self.estimated_kast_stats(record, total_rounds);

            let mut economy = BTreeMap::new();
            for team in teams {
                economy.insert(
                    team.to_string(),
                    economy::economy_stat(
                        team,
                        EconomySource::Estimated(estimator::estimate_economy(
                            record,
                            team,
                            total_rounds,
                        )),
                    ),
                );
            }
            // Round totals need real rounds to count
            (stats, economy, BTreeMap::new())
        };
        kast::sort_by_impact(&mut kast_impact);

        Ok(MatchStatsBundle {
            match_id: record.match_id.clone(),
            source_digest: source_digest(record),
            player_stats,
            kast_impact,
            economy,
            round_totals,
        })
    }

    /// Rounds to derive over: counted history first, then the declared
    /// total, then the score sum, then the configured typical length.
    fn resolve_total_rounds(&self, record: &MatchRecord) -> u32 {
        let derived = record.declared_or_derived_rounds();
        if derived > 0 {
            derived
        } else {
            self.config.fallback_match_length
        }
    }

    fn exact_kast_stats(
        &self,
        record: &MatchRecord,
        attribution: &attribution::RoundAttribution,
    ) -> Vec<KastImpactStat> {
        record
            .players
            .iter()
            .filter_map(|player| {
                attribution
                    .player_counters
                    .get(&player.identity.name)
                    .map(|counters| {
                        kast::kast_impact_stat(&player.identity, KastSource::Exact(*counters))
                    })
            })
            .collect()
    }

    fn estimated_kast_stats(
        &self,
        record: &MatchRecord,
        total_rounds: u32,
    ) -> Vec<KastImpactStat> {
        record
            .players
            .iter()
            .map(|player| {
                kast::kast_impact_stat(
                    &player.identity,
                    KastSource::Estimated(estimator::estimate_kast(player, total_rounds)),
                )
            })
            .collect()
    }
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerRoundState, RoundRecord, TeamSide};

    fn engine() -> StatsEngine {
        StatsEngine::default()
    }

    fn roster_match(match_id: &str) -> MatchRecord {
        MatchRecord::new(match_id, "Vipers", "Nocturne")
            .with_score(2, 0)
            .with_player(
                PlayerAggregate::new("Rezze", "Vipers")
                    .with_agent("Jett")
                    .with_combat(2, 0, 0)
                    .with_damage(310),
            )
            .with_player(PlayerAggregate::new("Dusk", "Vipers").with_combat(1, 1, 1))
            .with_player(PlayerAggregate::new("Kaori", "Nocturne").with_combat(1, 2, 0))
    }

    /// Round 1 pistol and round 2 full buy, both taken by Vipers, with
    /// Rezze contributing in both.
    fn two_round_match() -> MatchRecord {
        roster_match("m-100")
            .with_round(
                RoundRecord::new(1, "Vipers", "Nocturne", "Vipers")
                    .with_player(
                        PlayerRoundState::new("Rezze", TeamSide::Attack)
                            .with_combat(1, 0, 0)
                            .with_alive(true)
                            .with_loadout(800),
                    )
                    .with_player(
                        PlayerRoundState::new("Kaori", TeamSide::Defense).with_combat(0, 1, 0),
                    ),
            )
            .with_round(
                RoundRecord::new(2, "Vipers", "Nocturne", "Vipers")
                    .with_player(
                        PlayerRoundState::new("Rezze", TeamSide::Attack)
                            .with_combat(1, 0, 0)
                            .with_loadout(21_000),
                    )
                    .with_player(
                        PlayerRoundState::new("Kaori", TeamSide::Defense)
                            .with_combat(1, 1, 0)
                            .with_loadout(20_000),
                    ),
            )
    }

    #[test]
    fn test_round_to_tenth() {
        assert!((round_to_tenth(66.666) - 66.7).abs() < 1e-9);
        assert!((round_to_tenth(85.25) - 85.3).abs() < 1e-9);
        assert!((round_to_tenth(0.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_round_match_exact_stats() {
        let bundle = engine().process_match_stats(&two_round_match()).unwrap();

        let rezze = bundle
            .kast_impact
            .iter()
            .find(|s| s.player_name == "Rezze")
            .unwrap();
        assert_eq!(rezze.total_rounds, 2);
        assert_eq!(rezze.rounds_with_kast, 2);
        assert!((rezze.kast_percentage - 100.0).abs() < 1e-9);
        assert_eq!(
            rezze.insight,
            "Rezze maintained KAST in all 2 rounds - exceptional consistency."
        );

        let vipers = &bundle.economy["Vipers"];
        assert!((vipers.pistol_win_rate - 100.0).abs() < 1e-9);
        assert!((vipers.full_buy_win_rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_mode_skips_players_without_round_appearances() {
        // Dusk is on the roster but never shows up in round history
        let stats = engine().compute_kast_impact(&two_round_match()).unwrap();

        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.player_name != "Dusk"));
    }

    #[test]
    fn test_fallback_mode_covers_whole_roster() {
        let m = roster_match("m-101").with_total_rounds(20);
        let stats = engine().compute_kast_impact(&m).unwrap();

        assert_eq!(stats.len(), 3);
        let names: Vec<&str> = stats.iter().map(|s| s.player_name.as_str()).collect();
        assert!(names.contains(&"Rezze"));
        assert!(names.contains(&"Dusk"));
        assert!(names.contains(&"Kaori"));
    }

    #[test]
    fn test_fallback_total_rounds_resolution() {
        // Declared total wins over the score sum
        let declared = roster_match("m-102").with_total_rounds(20);
        let stats = engine().compute_kast_impact(&declared).unwrap();
        assert_eq!(stats[0].total_rounds, 20);

        // Score sum when no total is declared
        let scored = roster_match("m-103").with_score(13, 7);
        let stats = engine().compute_kast_impact(&scored).unwrap();
        assert_eq!(stats[0].total_rounds, 20);

        // Configured typical length when nothing is derivable
        let bare = roster_match("m-104").with_score(0, 0);
        let stats = engine().compute_kast_impact(&bare).unwrap();
        assert_eq!(stats[0].total_rounds, 23);
    }

    #[test]
    fn test_round_totals_only_in_exact_mode() {
        let exact = engine().process_match_stats(&two_round_match()).unwrap();
        assert_eq!(exact.round_totals["Rezze"].kills, 2);
        assert_eq!(exact.round_totals["Kaori"].deaths, 2);

        let fallback = engine()
            .process_match_stats(&roster_match("m-105"))
            .unwrap();
        assert!(fallback.round_totals.is_empty());
    }

    #[test]
    fn test_process_output_is_byte_identical_across_calls() {
        let m = two_round_match();
        let engine = engine();

        let first = serde_json::to_string(&engine.process_match_stats(&m).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.process_match_stats(&m).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_source_digest_tracks_input() {
        let engine = engine();
        let bundle = engine.process_match_stats(&two_round_match()).unwrap();

        assert_eq!(bundle.source_digest.len(), 16);
        assert!(bundle
            .source_digest
            .chars()
            .all(|c| c.is_ascii_hexdigit()));

        // Any input change moves the digest
        let altered = two_round_match().with_map("Ascent");
        let altered_bundle = engine.process_match_stats(&altered).unwrap();
        assert_ne!(bundle.source_digest, altered_bundle.source_digest);
    }

    #[test]
    fn test_player_stats_cover_roster_in_both_modes() {
        let engine = engine();

        let exact = engine.process_match_stats(&two_round_match()).unwrap();
        assert_eq!(exact.player_stats.len(), 3);

        let fallback = engine.process_match_stats(&roster_match("m-106")).unwrap();
        assert_eq!(fallback.player_stats.len(), 3);
        // ACS present for a player who never appears in rounds
        assert!(fallback.player_stats["Dusk"].acs > 0.0);
    }

    #[test]
    fn test_kast_impact_sorted_by_loss_rate() {
        let bundle = engine().process_match_stats(&two_round_match()).unwrap();
        let rates: Vec<f64> = bundle
            .kast_impact
            .iter()
            .map(|s| s.loss_rate_without_kast)
            .collect();

        for pair in rates.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_percentage_fields_stay_in_bounds() {
        let bundle = engine().process_match_stats(&two_round_match()).unwrap();

        for stat in &bundle.kast_impact {
            for rate in [
                stat.kast_percentage,
                stat.loss_rate_without_kast,
                stat.win_rate_with_kast,
            ] {
                assert!((0.0..=100.0).contains(&rate));
            }
            assert_eq!(
                stat.rounds_with_kast + stat.rounds_without_kast,
                stat.total_rounds
            );
        }
        for economy in bundle.economy.values() {
            for rate in [
                economy.pistol_win_rate,
                economy.force_buy_win_rate,
                economy.eco_conversion_rate,
                economy.bonus_loss_rate,
                economy.full_buy_win_rate,
            ] {
                assert!((0.0..=100.0).contains(&rate));
            }
        }
    }

    #[test]
    fn test_negative_total_rounds_rejected() {
        let m = roster_match("m-107").with_total_rounds(-3);
        let err = engine().process_match_stats(&m).unwrap_err();

        assert_eq!(
            err,
            InvalidMatchData::NegativeCount {
                field: "total_rounds",
                value: -3,
            }
        );
    }

    #[test]
    fn test_negative_score_rejected() {
        let m = roster_match("m-108").with_score(13, -1);
        let err = engine().process_match_stats(&m).unwrap_err();

        assert!(matches!(
            err,
            InvalidMatchData::NegativeCount {
                field: "team_two_score",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_roster_team_rejected() {
        let m = roster_match("m-109").with_player(PlayerAggregate::new("Ghost", "Phantoms"));
        let err = engine().process_match_stats(&m).unwrap_err();

        assert!(matches!(
            err,
            InvalidMatchData::UnknownTeam {
                field: "players.identity.team",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_round_winner_rejected() {
        let m = roster_match("m-110").with_round(RoundRecord::new(1, "Vipers", "Nocturne", "Phantoms"));
        let err = engine().process_match_stats(&m).unwrap_err();

        match err {
            InvalidMatchData::UnknownTeam { field, value, .. } => {
                assert_eq!(field, "rounds.winner");
                assert_eq!(value, "Phantoms");
            }
            other => panic!("expected UnknownTeam, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_round_player_rejected() {
        let m = roster_match("m-111").with_round(
            RoundRecord::new(1, "Vipers", "Nocturne", "Vipers")
                .with_player(PlayerRoundState::new("Ghost", TeamSide::Attack)),
        );
        let err = engine().process_match_stats(&m).unwrap_err();

        assert_eq!(
            err,
            InvalidMatchData::UnknownPlayer {
                field: "rounds.player_states.player_name",
                value: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_economy_pattern_for_undeclared_team_rejected() {
        let err = engine()
            .compute_economy_pattern(&two_round_match(), "Phantoms")
            .unwrap_err();

        match err {
            InvalidMatchData::UnknownTeam {
                field,
                value,
                team_one,
                team_two,
            } => {
                assert_eq!(field, "team_name");
                assert_eq!(value, "Phantoms");
                assert_eq!(team_one, "Vipers");
                assert_eq!(team_two, "Nocturne");
            }
            other => panic!("expected UnknownTeam, got {other:?}"),
        }
    }

    #[test]
    fn test_economy_pattern_exact_and_estimated_modes() {
        let engine = engine();

        let exact = engine
            .compute_economy_pattern(&two_round_match(), "Vipers")
            .unwrap();
        assert!((exact.pistol_win_rate - 100.0).abs() < 1e-9);

        let fallback = engine
            .compute_economy_pattern(&roster_match("m-112").with_score(13, 7), "Vipers")
            .unwrap();
        // win_rate 0.65 through the winner pistol model
        assert!((fallback.pistol_win_rate - 62.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_combat_score_scenario() {
        let player = PlayerAggregate::new("Rezze", "Vipers")
            .with_combat(20, 10, 4)
            .with_damage(1958);
        let stat = engine().compute_combat_score(&player, 20);

        // (1958 + 20*150 + 4*25) / 20 = 252.9
        assert!((stat.acs - 252.9).abs() < 1e-9);
        assert!((stat.adr - 97.9).abs() < 1e-9);
    }

    #[test]
    fn test_error_messages_name_field_and_value() {
        let m = roster_match("m-113").with_total_rounds(-3);
        let err = engine().process_match_stats(&m).unwrap_err();

        assert_eq!(err.to_string(), "total_rounds is negative (-3)");
    }
}

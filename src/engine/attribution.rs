//! Exact per-round attribution from round history.
//!
//! A single pass over the rounds fills three accumulator families: KAST
//! counters and raw totals per player, and economy breakdowns per team.
//! KAST here is the simplified definition (kill, assist or survival); the
//! input schema carries no kill ordering, so trade detection is not
//! possible and survival stands in for the T component. Both derivation
//! modes share this definition, which keeps their outputs comparable.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::models::{MatchRecord, PlayerRoundTotals, RoundCategory, RoundRecord};

/// Per-player KAST round counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KastCounters {
    /// Rounds this player appeared in
    pub total_rounds: u32,
    pub rounds_with_kast: u32,
    pub rounds_without_kast: u32,
    pub team_wins_with_kast: u32,
    pub team_losses_with_kast: u32,
    pub team_wins_without_kast: u32,
    pub team_losses_without_kast: u32,
}

/// Per-team economy round breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EconomyBreakdown {
    pub total_rounds: u32,
    pub pistol_rounds_played: u32,
    pub pistol_rounds_won: u32,
    pub eco_rounds: u32,
    pub eco_round_wins: u32,
    pub force_buy_rounds: u32,
    pub force_buy_wins: u32,
    pub full_buy_rounds: u32,
    pub full_buy_wins: u32,
    /// Bonus rounds reached off the back of a won eco or force buy
    pub bonus_rounds_after_force_win: u32,
    /// Of those, the ones thrown away. The snowball signal.
    pub bonus_rounds_lost: u32,
}

/// Everything one pass over the round history yields.
#[derive(Debug, Clone, Default)]
pub struct RoundAttribution {
    pub player_counters: BTreeMap<String, KastCounters>,
    pub player_totals: BTreeMap<String, PlayerRoundTotals>,
    pub team_breakdowns: BTreeMap<String, EconomyBreakdown>,
}

/// Classify one round from `team`'s perspective.
///
/// Pistol rounds are positional (the first round of each half) and win over
/// any label. An explicit BONUS label overrides the loadout bands; other
/// labels are provider metadata and do not. Everything else classifies by
/// the team's total loadout value.
pub fn classify_round(round: &RoundRecord, team: &str, config: &EngineConfig) -> RoundCategory {
    if config.pistol_rounds().contains(&round.round_number) {
        return RoundCategory::Pistol;
    }
    if round.category() == Some(RoundCategory::Bonus) {
        return RoundCategory::Bonus;
    }

    let loadout = round.team_loadout(round.side_of(team));
    if loadout < config.eco_loadout_ceiling {
        RoundCategory::Eco
    } else if loadout < config.force_loadout_ceiling {
        RoundCategory::Force
    } else {
        RoundCategory::FullBuy
    }
}

/// Walk the round history once, filling every accumulator.
pub fn resolve(record: &MatchRecord, config: &EngineConfig) -> RoundAttribution {
    let mut attribution = RoundAttribution::default();
    // Previous round's (category, won) per team, for bonus qualification
    let mut previous: BTreeMap<&str, (RoundCategory, bool)> = BTreeMap::new();

    let teams = [record.team_one.as_str(), record.team_two.as_str()];
    for team in teams {
        attribution
            .team_breakdowns
            .insert(team.to_string(), EconomyBreakdown::default());
    }

    for round in &record.rounds {
        for team in teams {
            let category = classify_round(round, team, config);
            let won = round.winner == team;

            if let Some(breakdown) = attribution.team_breakdowns.get_mut(team) {
                breakdown.total_rounds += 1;
                match category {
                    RoundCategory::Pistol => {
                        breakdown.pistol_rounds_played += 1;
                        if won {
                            breakdown.pistol_rounds_won += 1;
                        }
                    }
                    RoundCategory::Eco => {
                        breakdown.eco_rounds += 1;
                        if won {
                            breakdown.eco_round_wins += 1;
                        }
                    }
                    RoundCategory::Force => {
                        breakdown.force_buy_rounds += 1;
                        if won {
                            breakdown.force_buy_wins += 1;
                        }
                    }
                    RoundCategory::FullBuy => {
                        breakdown.full_buy_rounds += 1;
                        if won {
                            breakdown.full_buy_wins += 1;
                        }
                    }
                    RoundCategory::Bonus => {
                        // Only bonus rounds earned by a won eco or force
                        // feed the snowball counters
                        if let Some((prev_category, prev_won)) = previous.get(team) {
                            let qualified = *prev_won
                                && matches!(
                                    prev_category,
                                    RoundCategory::Eco | RoundCategory::Force
                                );
                            if qualified {
                                breakdown.bonus_rounds_after_force_win += 1;
                                if !won {
                                    breakdown.bonus_rounds_lost += 1;
                                }
                            }
                        }
                    }
                }
            }

            previous.insert(team, (category, won));
        }

        for state in &round.player_states {
            let Some(team) = record.roster_team(&state.player_name) else {
                continue;
            };
            let team_won = round.winner == team;
            let has_kast = state.kills > 0 || state.assists > 0 || state.alive;

            let counters = attribution
                .player_counters
                .entry(state.player_name.clone())
                .or_default();
            counters.total_rounds += 1;
            if has_kast {
                counters.rounds_with_kast += 1;
                if team_won {
                    counters.team_wins_with_kast += 1;
                } else {
                    counters.team_losses_with_kast += 1;
                }
            } else {
                counters.rounds_without_kast += 1;
                if team_won {
                    counters.team_wins_without_kast += 1;
                } else {
                    counters.team_losses_without_kast += 1;
                }
            }

            let totals = attribution
                .player_totals
                .entry(state.player_name.clone())
                .or_default();
            totals.kills += state.kills;
            totals.deaths += state.deaths;
            totals.assists += state.assists;
        }

        // Opening-kill credits. Names outside the roster are kill-feed
        // artifacts and are ignored.
        if let Some(name) = &round.first_blood {
            if record.roster_team(name).is_some() {
                attribution
                    .player_totals
                    .entry(name.clone())
                    .or_default()
                    .first_bloods += 1;
            }
        }
        if let Some(name) = &round.first_blood_victim {
            if record.roster_team(name).is_some() {
                attribution
                    .player_totals
                    .entry(name.clone())
                    .or_default()
                    .first_deaths += 1;
            }
        }
    }

    attribution
}

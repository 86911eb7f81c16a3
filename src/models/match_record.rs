//! Match telemetry input record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerAggregate, RoundRecord};

/// One match as reported by a telemetry provider: two teams, a roster of
/// box-score totals, and optionally the full round history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Provider match identifier, opaque
    pub match_id: String,

    /// Map label, carried through but never interpreted
    #[serde(default)]
    pub map_name: Option<String>,

    pub team_one: String,

    pub team_two: String,

    /// Final score lines. Signed so that corrupt feeds deserialize and are
    /// then rejected with a structural error instead of a decode failure.
    #[serde(default)]
    pub team_one_score: i32,

    #[serde(default)]
    pub team_two_score: i32,

    /// Declared round count; 0 when the provider omitted it
    #[serde(default)]
    pub total_rounds: i32,

    /// When the match was played, if the provider says
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,

    /// Roster with aggregate totals; the minimum required input
    pub players: Vec<PlayerAggregate>,

    /// Round history; empty for box-score-only feeds
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
}

impl MatchRecord {
    pub fn new(
        match_id: impl Into<String>,
        team_one: impl Into<String>,
        team_two: impl Into<String>,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            map_name: None,
            team_one: team_one.into(),
            team_two: team_two.into(),
            team_one_score: 0,
            team_two_score: 0,
            total_rounds: 0,
            played_at: None,
            players: Vec::new(),
            rounds: Vec::new(),
        }
    }

    pub fn with_map(mut self, map_name: impl Into<String>) -> Self {
        self.map_name = Some(map_name.into());
        self
    }

    pub fn with_score(mut self, team_one_score: i32, team_two_score: i32) -> Self {
        self.team_one_score = team_one_score;
        self.team_two_score = team_two_score;
        self
    }

    pub fn with_total_rounds(mut self, total_rounds: i32) -> Self {
        self.total_rounds = total_rounds;
        self
    }

    pub fn with_played_at(mut self, played_at: DateTime<Utc>) -> Self {
        self.played_at = Some(played_at);
        self
    }

    pub fn with_player(mut self, player: PlayerAggregate) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_round(mut self, round: RoundRecord) -> Self {
        self.rounds.push(round);
        self
    }

    pub fn is_declared_team(&self, name: &str) -> bool {
        self.team_one == name || self.team_two == name
    }

    /// The other declared team, if `team_name` is one of the two.
    pub fn opponent_of(&self, team_name: &str) -> Option<&str> {
        if self.team_one == team_name {
            Some(&self.team_two)
        } else if self.team_two == team_name {
            Some(&self.team_one)
        } else {
            None
        }
    }

    pub fn team_score(&self, team_name: &str) -> Option<i32> {
        if self.team_one == team_name {
            Some(self.team_one_score)
        } else if self.team_two == team_name {
            Some(self.team_two_score)
        } else {
            None
        }
    }

    /// Derived winner: the team with the strictly higher score. A tied
    /// score line has no winner.
    pub fn winning_team(&self) -> Option<&str> {
        match self.team_one_score.cmp(&self.team_two_score) {
            std::cmp::Ordering::Greater => Some(&self.team_one),
            std::cmp::Ordering::Less => Some(&self.team_two),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn team_won(&self, team_name: &str) -> bool {
        self.winning_team() == Some(team_name)
    }

    pub fn score_sum(&self) -> i32 {
        self.team_one_score + self.team_two_score
    }

    /// Best available round count: the round history when present, else the
    /// declared count, else the score sum. Returns 0 when nothing usable is
    /// reported; callers substitute their own fallback length.
    pub fn declared_or_derived_rounds(&self) -> u32 {
        if !self.rounds.is_empty() {
            return self.rounds.len() as u32;
        }
        if self.total_rounds > 0 {
            return self.total_rounds as u32;
        }
        if self.score_sum() > 0 {
            return self.score_sum() as u32;
        }
        0
    }

    /// Team affiliation of a roster player.
    pub fn roster_team(&self, player_name: &str) -> Option<&str> {
        self.players
            .iter()
            .find(|p| p.identity.name == player_name)
            .map(|p| p.identity.team.as_str())
    }
}

//! Round history records.

use serde::{Deserialize, Serialize};

use super::TeamSide;

/// Economy category of a round, always judged from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundCategory {
    Pistol,
    Eco,
    Force,
    FullBuy,
    Bonus,
}

impl RoundCategory {
    /// Lenient parse of provider labels. Unknown labels yield `None` so a
    /// noisy feed degrades instead of failing.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PISTOL" => Some(RoundCategory::Pistol),
            "ECO" | "SAVE" => Some(RoundCategory::Eco),
            "FORCE" | "FORCE_BUY" => Some(RoundCategory::Force),
            "FULL_BUY" | "FULL" | "BUY" => Some(RoundCategory::FullBuy),
            "BONUS" => Some(RoundCategory::Bonus),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundCategory::Pistol => write!(f, "PISTOL"),
            RoundCategory::Eco => write!(f, "ECO"),
            RoundCategory::Force => write!(f, "FORCE"),
            RoundCategory::FullBuy => write!(f, "FULL_BUY"),
            RoundCategory::Bonus => write!(f, "BONUS"),
        }
    }
}

/// One player's state over a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoundState {
    /// Must name a player on the match roster
    pub player_name: String,

    pub side: TeamSide,

    #[serde(default)]
    pub kills: u32,

    #[serde(default)]
    pub deaths: u32,

    #[serde(default)]
    pub assists: u32,

    /// Survived to the end of the round. Defaults to false, so a feed that
    /// drops the flag never grants survival credit.
    #[serde(default)]
    pub alive: bool,

    /// Value of weapons and armor carried into the round
    #[serde(default)]
    pub loadout_value: u32,
}

impl PlayerRoundState {
    pub fn new(player_name: impl Into<String>, side: TeamSide) -> Self {
        Self {
            player_name: player_name.into(),
            side,
            kills: 0,
            deaths: 0,
            assists: 0,
            alive: false,
            loadout_value: 0,
        }
    }

    pub fn with_combat(mut self, kills: u32, deaths: u32, assists: u32) -> Self {
        self.kills = kills;
        self.deaths = deaths;
        self.assists = assists;
        self
    }

    pub fn with_alive(mut self, alive: bool) -> Self {
        self.alive = alive;
        self
    }

    pub fn with_loadout(mut self, loadout_value: u32) -> Self {
        self.loadout_value = loadout_value;
        self
    }
}

/// One round of match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number
    pub round_number: u32,

    /// Raw provider category label (e.g. "FORCE_BUY"), kept as metadata
    #[serde(default)]
    pub category_label: Option<String>,

    pub attack_team: String,

    pub defense_team: String,

    /// Winning team name
    pub winner: String,

    /// Player credited with the round's opening kill
    #[serde(default)]
    pub first_blood: Option<String>,

    /// Player who died to the opening kill
    #[serde(default)]
    pub first_blood_victim: Option<String>,

    #[serde(default)]
    pub player_states: Vec<PlayerRoundState>,
}

impl RoundRecord {
    pub fn new(
        round_number: u32,
        attack_team: impl Into<String>,
        defense_team: impl Into<String>,
        winner: impl Into<String>,
    ) -> Self {
        Self {
            round_number,
            category_label: None,
            attack_team: attack_team.into(),
            defense_team: defense_team.into(),
            winner: winner.into(),
            first_blood: None,
            first_blood_victim: None,
            player_states: Vec::new(),
        }
    }

    pub fn with_category(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    pub fn with_first_blood(
        mut self,
        killer: impl Into<String>,
        victim: impl Into<String>,
    ) -> Self {
        self.first_blood = Some(killer.into());
        self.first_blood_victim = Some(victim.into());
        self
    }

    pub fn with_player(mut self, state: PlayerRoundState) -> Self {
        self.player_states.push(state);
        self
    }

    /// Parsed category label, if the provider supplied a recognizable one.
    pub fn category(&self) -> Option<RoundCategory> {
        self.category_label.as_deref().and_then(RoundCategory::parse)
    }

    /// Which side the named team played this round. Any team that is not
    /// the attacker is treated as defending.
    pub fn side_of(&self, team_name: &str) -> TeamSide {
        if self.attack_team == team_name {
            TeamSide::Attack
        } else {
            TeamSide::Defense
        }
    }

    /// Total loadout value fielded on one side of the round.
    pub fn team_loadout(&self, side: TeamSide) -> u32 {
        self.player_states
            .iter()
            .filter(|s| s.side == side)
            .map(|s| s.loadout_value)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(RoundCategory::parse("PISTOL"), Some(RoundCategory::Pistol));
        assert_eq!(RoundCategory::parse("eco"), Some(RoundCategory::Eco));
        assert_eq!(RoundCategory::parse("SAVE"), Some(RoundCategory::Eco));
        assert_eq!(RoundCategory::parse("FORCE_BUY"), Some(RoundCategory::Force));
        assert_eq!(RoundCategory::parse(" full_buy "), Some(RoundCategory::FullBuy));
        assert_eq!(RoundCategory::parse("BONUS"), Some(RoundCategory::Bonus));
        assert_eq!(RoundCategory::parse("ANTI_ECO"), None);
        assert_eq!(RoundCategory::parse(""), None);
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&RoundCategory::FullBuy).unwrap(),
            "\"FULL_BUY\""
        );
        assert_eq!(format!("{}", RoundCategory::FullBuy), "FULL_BUY");
    }

    #[test]
    fn test_side_of() {
        let round = RoundRecord::new(3, "Vipers", "Nocturne", "Vipers");
        assert_eq!(round.side_of("Vipers"), TeamSide::Attack);
        assert_eq!(round.side_of("Nocturne"), TeamSide::Defense);
    }

    #[test]
    fn test_team_loadout_sums_one_side() {
        let round = RoundRecord::new(4, "Vipers", "Nocturne", "Nocturne")
            .with_player(PlayerRoundState::new("Rezze", TeamSide::Attack).with_loadout(3900))
            .with_player(PlayerRoundState::new("Dusk", TeamSide::Attack).with_loadout(4100))
            .with_player(PlayerRoundState::new("Kaori", TeamSide::Defense).with_loadout(1500));

        assert_eq!(round.team_loadout(TeamSide::Attack), 8000);
        assert_eq!(round.team_loadout(TeamSide::Defense), 1500);
    }

    #[test]
    fn test_round_category_from_label() {
        let round = RoundRecord::new(7, "Vipers", "Nocturne", "Vipers").with_category("bonus");
        assert_eq!(round.category(), Some(RoundCategory::Bonus));

        let unlabeled = RoundRecord::new(8, "Vipers", "Nocturne", "Vipers");
        assert_eq!(unlabeled.category(), None);
    }

    #[test]
    fn test_round_deserialize_minimal() {
        let json = r#"{
            "round_number": 2,
            "attack_team": "Vipers",
            "defense_team": "Nocturne",
            "winner": "Nocturne"
        }"#;
        let round: RoundRecord = serde_json::from_str(json).unwrap();

        assert_eq!(round.round_number, 2);
        assert!(round.player_states.is_empty());
        assert_eq!(round.category_label, None);
        assert_eq!(round.first_blood, None);
    }
}

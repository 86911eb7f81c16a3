//! Player identity and box-score records.

use serde::{Deserialize, Serialize};

/// Side of the map a player occupied for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Attack,
    Defense,
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Attack => write!(f, "attack"),
            TeamSide::Defense => write!(f, "defense"),
        }
    }
}

/// Immutable player identity within one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    /// Display name, unique within the match
    pub name: String,

    /// Agent or role label, carried through to outputs untouched
    #[serde(default)]
    pub agent: Option<String>,

    /// Team affiliation; must name one of the match's two declared teams
    pub team: String,
}

impl PlayerIdentity {
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent: None,
            team: team.into(),
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}

/// Whole-match box-score totals for one player.
///
/// This is the minimum required input: present even when the match carries
/// no round history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub identity: PlayerIdentity,

    #[serde(default)]
    pub kills: u32,

    #[serde(default)]
    pub deaths: u32,

    #[serde(default)]
    pub assists: u32,

    /// Total damage dealt; 0 when the provider only reports frag lines
    #[serde(default)]
    pub damage_dealt: u32,

    #[serde(default)]
    pub headshots: u32,

    /// Exact shot count when the provider reports one
    #[serde(default)]
    pub shots_fired: Option<u32>,
}

impl PlayerAggregate {
    /// Create an aggregate with zeroed totals.
    pub fn new(name: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            identity: PlayerIdentity::new(name, team),
            kills: 0,
            deaths: 0,
            assists: 0,
            damage_dealt: 0,
            headshots: 0,
            shots_fired: None,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.identity = self.identity.with_agent(agent);
        self
    }

    pub fn with_combat(mut self, kills: u32, deaths: u32, assists: u32) -> Self {
        self.kills = kills;
        self.deaths = deaths;
        self.assists = assists;
        self
    }

    pub fn with_damage(mut self, damage_dealt: u32) -> Self {
        self.damage_dealt = damage_dealt;
        self
    }

    pub fn with_headshots(mut self, headshots: u32) -> Self {
        self.headshots = headshots;
        self
    }

    pub fn with_shots_fired(mut self, shots_fired: u32) -> Self {
        self.shots_fired = Some(shots_fired);
        self
    }

    /// Kill/assist to death ratio with a floored death denominator.
    pub fn kda_ratio(&self) -> f64 {
        (self.kills + self.assists) as f64 / self.deaths.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kda_ratio() {
        let p = PlayerAggregate::new("Rezze", "Vipers").with_combat(10, 5, 8);
        assert!((p.kda_ratio() - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_kda_ratio_zero_deaths() {
        let p = PlayerAggregate::new("Rezze", "Vipers").with_combat(4, 0, 2);
        // Deaths floored at 1
        assert!((p.kda_ratio() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_builder_chain() {
        let p = PlayerAggregate::new("Kaori", "Nocturne")
            .with_agent("Jett")
            .with_combat(18, 12, 4)
            .with_damage(2431)
            .with_headshots(9)
            .with_shots_fired(120);

        assert_eq!(p.identity.name, "Kaori");
        assert_eq!(p.identity.agent.as_deref(), Some("Jett"));
        assert_eq!(p.identity.team, "Nocturne");
        assert_eq!(p.damage_dealt, 2431);
        assert_eq!(p.shots_fired, Some(120));
    }

    #[test]
    fn test_aggregate_deserialize_partial() {
        // Providers that only ship frag lines omit the optional fields
        let json = r#"{
            "identity": {"name": "Dusk", "team": "Vipers"},
            "kills": 12,
            "deaths": 14
        }"#;
        let p: PlayerAggregate = serde_json::from_str(json).unwrap();

        assert_eq!(p.kills, 12);
        assert_eq!(p.assists, 0);
        assert_eq!(p.damage_dealt, 0);
        assert_eq!(p.shots_fired, None);
        assert_eq!(p.identity.agent, None);
    }

    #[test]
    fn test_team_side_serialization() {
        assert_eq!(serde_json::to_string(&TeamSide::Attack).unwrap(), "\"attack\"");
        assert_eq!(serde_json::to_string(&TeamSide::Defense).unwrap(), "\"defense\"");
        let side: TeamSide = serde_json::from_str("\"attack\"").unwrap();
        assert_eq!(side, TeamSide::Attack);
    }
}

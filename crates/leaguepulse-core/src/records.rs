// League, team, owner and matchup records as supplied by the fetch layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// League-level metadata. Fetched once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    pub name: String,
    /// Season label, e.g. "2025".
    pub season: String,
    /// Number of team seats in the league.
    pub total_rosters: u32,
}

/// One team seat in a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Small positive integer, unique within a league.
    pub roster_id: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Vec<String>,
}

/// A league member who owns (or co-owns) a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub user_id: String,
    pub display_name: String,
    /// Custom team name chosen by the owner, if any.
    #[serde(default)]
    pub team_name: Option<String>,
}

/// One team's side of a weekly matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Records sharing a matchup id play each other. `None` means the team
    /// has no game this week.
    #[serde(default)]
    pub matchup_id: Option<u32>,
    pub roster_id: u32,
    #[serde(default)]
    pub starters: Vec<String>,
    /// Present only once games are scored.
    #[serde(default)]
    pub points: Option<f64>,
    /// Per-player points, keyed by player id.
    #[serde(default)]
    pub players_points: BTreeMap<String, f64>,
}

impl Matchup {
    /// Points scored so far, treating unscored records as zero.
    pub fn points_or_zero(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }
}

// Individual draft pick representation and position parsing.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Football roster positions that carry scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DEF")]
    Defense,
}

impl Position {
    /// Every scored position, in roster display order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position code into a Position enum.
    ///
    /// Handles provider-style abbreviations:
    /// - "QB", "RB", "WR", "TE", "K" map directly
    /// - "DEF", "DST", "D/ST" all map to Defense
    /// - Anything else (IDP codes, blanks) is `None`
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DEF" | "DST" | "D/ST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display code for this position.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Lenient deserializer: unknown or blank codes become `None` instead of an
/// error, so one odd pick never rejects a whole draft.
fn lenient_position<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Position::from_code))
}

/// Optional descriptive fields attached to a pick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickMetadata {
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: Option<Position>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Professional team abbreviation (e.g. "KC").
    #[serde(default)]
    pub nfl_team: Option<String>,
}

/// A single completed draft selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub player_id: String,
    /// 1-based round number.
    pub round: u32,
    /// 1-based overall pick number, unique within a draft.
    pub pick_no: u32,
    /// Owning team's roster identifier.
    pub roster_id: u32,
    #[serde(default)]
    pub metadata: PickMetadata,
}

impl DraftPick {
    /// Convenience accessor for the pick's position, if known.
    pub fn position(&self) -> Option<Position> {
        self.metadata.position
    }

    /// "First Last" when both names are present, otherwise whatever exists,
    /// falling back to the player id.
    pub fn player_name(&self) -> String {
        match (&self.metadata.first_name, &self.metadata.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => self.player_id.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Completed matchup summaries: winner, margin and star performer.
//
// Values stay numeric here; formatting to two decimals is left to renderers.

use serde::Serialize;
use tracing::debug;

use crate::directory::TeamDirectory;
use crate::matchup::{group_matchups, MatchupGroup};
use crate::records::Matchup;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    Winner { roster_id: u32, name: String },
    Tie,
}

/// Highest individual score in a matchup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarPerformer {
    pub roster_id: u32,
    pub player_id: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub matchup_id: u32,
    pub team_a: u32,
    pub team_b: u32,
    pub name_a: String,
    pub name_b: String,
    pub points_a: f64,
    pub points_b: f64,
    pub outcome: Outcome,
    /// Absolute point difference, never negative.
    pub margin: f64,
    pub star: Option<StarPerformer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekSummaries {
    pub summaries: Vec<Summary>,
    /// Matchup ids skipped because they did not have exactly two sides.
    pub unpaired: Vec<u32>,
}

/// Summarize every paired matchup of a completed week, ascending by id.
pub fn summarize_week(matchups: &[Matchup], directory: &TeamDirectory) -> WeekSummaries {
    let mut out = WeekSummaries::default();

    for group in group_matchups(matchups) {
        match group {
            MatchupGroup::Paired { matchup_id, a, b } => {
                out.summaries.push(summarize_pair(matchup_id, a, b, directory));
            }
            MatchupGroup::Unpaired { matchup_id, sides } => {
                debug!(matchup_id, sides = sides.len(), "skipping unpaired matchup in summary");
                out.unpaired.push(matchup_id);
            }
        }
    }

    out
}

fn summarize_pair(matchup_id: u32, a: &Matchup, b: &Matchup, directory: &TeamDirectory) -> Summary {
    let points_a = a.points_or_zero();
    let points_b = b.points_or_zero();
    let name_a = directory.display_name(a.roster_id);
    let name_b = directory.display_name(b.roster_id);

    let outcome = if points_a == points_b {
        Outcome::Tie
    } else if points_a > points_b {
        Outcome::Winner {
            roster_id: a.roster_id,
            name: name_a.clone(),
        }
    } else {
        Outcome::Winner {
            roster_id: b.roster_id,
            name: name_b.clone(),
        }
    };

    Summary {
        matchup_id,
        team_a: a.roster_id,
        team_b: b.roster_id,
        name_a,
        name_b,
        points_a,
        points_b,
        outcome,
        margin: (points_a - points_b).abs(),
        star: star_performer(&[a, b]),
    }
}

/// Scan sides in order, players in ascending id; the first strictly highest
/// score wins.
pub fn star_performer(sides: &[&Matchup]) -> Option<StarPerformer> {
    let mut best: Option<StarPerformer> = None;
    for side in sides {
        for (player_id, &points) in &side.players_points {
            if best.as_ref().map_or(true, |b| points > b.points) {
                best = Some(StarPerformer {
                    roster_id: side.roster_id,
                    player_id: player_id.clone(),
                    points,
                });
            }
        }
    }
    best
}

/// A week counts as complete once every grouped record carries points.
pub fn is_complete(matchups: &[Matchup]) -> bool {
    let mut grouped = matchups.iter().filter(|m| m.matchup_id.is_some()).peekable();
    grouped.peek().is_some() && grouped.all(|m| m.points.is_some())
}

// Weekly matchup previews and Game of the Week selection.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::directory::TeamDirectory;
use crate::forecast::power::power_of;
use crate::matchup::{group_matchups, MatchupGroup};
use crate::records::Matchup;

/// Qualitative lean for a preview. Never a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Favorite {
    TossUp,
    Slight(u32),
}

impl Favorite {
    pub fn label(&self, directory: &TeamDirectory) -> String {
        match self {
            Favorite::TossUp => "Toss-up".to_string(),
            Favorite::Slight(roster_id) => {
                format!("{} slight favorite", directory.display_name(*roster_id))
            }
        }
    }
}

/// Forecast for one paired matchup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub matchup_id: u32,
    pub team_a: u32,
    pub team_b: u32,
    pub power_a: f64,
    pub power_b: f64,
    /// Absolute power gap; smaller means a closer game.
    pub diff: f64,
}

impl Preview {
    pub fn favorite(&self) -> Favorite {
        if self.power_a == self.power_b {
            Favorite::TossUp
        } else if self.power_a > self.power_b {
            Favorite::Slight(self.team_a)
        } else {
            Favorite::Slight(self.team_b)
        }
    }
}

/// All previews for one week, closest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekForecast {
    pub previews: Vec<Preview>,
    /// Closest preview; `None` when the week has no paired games.
    pub game_of_the_week: Option<Preview>,
    /// Matchup ids skipped because they did not have exactly two sides.
    pub unpaired: Vec<u32>,
}

/// Build previews for a week of matchup records.
///
/// Groups are visited in ascending matchup id, then stably sorted by diff,
/// so ties at the minimum resolve to the lowest matchup id.
pub fn forecast_week(matchups: &[Matchup], power: &BTreeMap<u32, f64>) -> WeekForecast {
    let mut previews = Vec::new();
    let mut unpaired = Vec::new();

    for group in group_matchups(matchups) {
        match group {
            MatchupGroup::Paired { matchup_id, a, b } => {
                let power_a = power_of(power, a.roster_id);
                let power_b = power_of(power, b.roster_id);
                previews.push(Preview {
                    matchup_id,
                    team_a: a.roster_id,
                    team_b: b.roster_id,
                    power_a,
                    power_b,
                    diff: (power_a - power_b).abs(),
                });
            }
            MatchupGroup::Unpaired { matchup_id, sides } => {
                debug!(matchup_id, sides = sides.len(), "skipping unpaired matchup in forecast");
                unpaired.push(matchup_id);
            }
        }
    }

    previews.sort_by(|a, b| {
        a.diff
            .partial_cmp(&b.diff)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    WeekForecast {
        game_of_the_week: previews.first().cloned(),
        previews,
        unpaired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::power::DEFAULT_POWER;
    use crate::matchup::tests::side;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn power() -> BTreeMap<u32, f64> {
        BTreeMap::from([(1, 80.0), (2, 60.0), (3, 55.0), (4, 52.0), (5, 70.0), (6, 67.0)])
    }

    #[test]
    fn previews_sorted_by_diff() {
        let records = vec![
            side(Some(1), 1, None),
            side(Some(1), 2, None),
            side(Some(2), 3, None),
            side(Some(2), 4, None),
            side(Some(3), 5, None),
            side(Some(3), 6, None),
        ];
        let forecast = forecast_week(&records, &power());
        let ids: Vec<u32> = forecast.previews.iter().map(|p| p.matchup_id).collect();
        // Groups 2 and 3 tie at diff 3; lower id first.
        assert_eq!(ids, vec![2, 3, 1]);
        let gotw = forecast.game_of_the_week.unwrap();
        assert_eq!(gotw.matchup_id, 2);
        assert!(approx_eq(gotw.diff, 3.0, 1e-12));
    }

    #[test]
    fn missing_power_defaults() {
        let records = vec![side(Some(4), 1, None), side(Some(4), 42, None)];
        let forecast = forecast_week(&records, &power());
        let p = &forecast.previews[0];
        assert!(approx_eq(p.power_b, DEFAULT_POWER, 1e-12));
        assert!(approx_eq(p.diff, 30.0, 1e-12));
        assert_eq!(p.favorite(), Favorite::Slight(1));
    }

    #[test]
    fn equal_powers_are_toss_up() {
        let records = vec![side(Some(1), 98, None), side(Some(1), 99, None)];
        let forecast = forecast_week(&records, &BTreeMap::new());
        let p = forecast.game_of_the_week.unwrap();
        assert_eq!(p.favorite(), Favorite::TossUp);
        assert_eq!(p.favorite().label(&TeamDirectory::default()), "Toss-up");
    }

    #[test]
    fn favorite_label_names_team() {
        let fav = Favorite::Slight(3);
        assert_eq!(fav.label(&TeamDirectory::default()), "Team 3 slight favorite");
    }

    #[test]
    fn unpaired_groups_are_reported_not_self_paired() {
        let records = vec![
            side(Some(1), 1, None),
            side(Some(2), 2, None),
            side(Some(2), 3, None),
        ];
        let forecast = forecast_week(&records, &power());
        assert_eq!(forecast.previews.len(), 1);
        assert_eq!(forecast.unpaired, vec![1]);
    }

    #[test]
    fn empty_week() {
        let forecast = forecast_week(&[], &power());
        assert!(forecast.previews.is_empty());
        assert!(forecast.game_of_the_week.is_none());
    }
}

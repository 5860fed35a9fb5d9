// Roster id -> display name resolution.

use std::collections::HashMap;

use crate::records::{Owner, Team};

/// Lookup table joining teams to their owners for display purposes.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    names: HashMap<u32, String>,
}

impl TeamDirectory {
    /// Build the directory from the league's teams and members.
    ///
    /// Name precedence per team: the owner's custom team name, then the
    /// owner's display name. Teams without a resolvable owner are left out
    /// and get a synthesized name on lookup.
    pub fn new(teams: &[Team], owners: &[Owner]) -> Self {
        let by_user: HashMap<&str, &Owner> =
            owners.iter().map(|o| (o.user_id.as_str(), o)).collect();

        let names = teams
            .iter()
            .filter_map(|team| {
                let owner = by_user.get(team.owner_id.as_deref()?)?;
                let name = owner
                    .team_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(owner.display_name.as_str());
                Some((team.roster_id, name.to_string()))
            })
            .collect();

        Self { names }
    }

    /// Display name for a team. Never fails.
    pub fn display_name(&self, roster_id: u32) -> String {
        self.names
            .get(&roster_id)
            .cloned()
            .unwrap_or_else(|| format!("Team {roster_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(roster_id: u32, owner: Option<&str>) -> Team {
        Team {
            roster_id,
            owner_id: owner.map(String::from),
            players: Vec::new(),
        }
    }

    fn owner(user_id: &str, display: &str, team_name: Option<&str>) -> Owner {
        Owner {
            user_id: user_id.into(),
            display_name: display.into(),
            team_name: team_name.map(String::from),
        }
    }

    #[test]
    fn prefers_custom_team_name() {
        let dir = TeamDirectory::new(
            &[team(1, Some("u1"))],
            &[owner("u1", "alice", Some("Gridiron Ghosts"))],
        );
        assert_eq!(dir.display_name(1), "Gridiron Ghosts");
    }

    #[test]
    fn blank_team_name_falls_back_to_display_name() {
        let dir = TeamDirectory::new(&[team(1, Some("u1"))], &[owner("u1", "alice", Some("  "))]);
        assert_eq!(dir.display_name(1), "alice");
    }

    #[test]
    fn missing_owner_synthesizes_name() {
        let dir = TeamDirectory::new(
            &[team(1, None), team(2, Some("ghost"))],
            &[owner("u1", "alice", None)],
        );
        assert_eq!(dir.display_name(1), "Team 1");
        assert_eq!(dir.display_name(2), "Team 2");
        assert_eq!(dir.display_name(99), "Team 99");
    }
}

// Grouping of weekly matchup records into games.

use std::collections::BTreeMap;

use crate::records::Matchup;

/// The records sharing one matchup id.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchupGroup<'a> {
    /// Exactly two sides: a normal head-to-head game.
    Paired {
        matchup_id: u32,
        a: &'a Matchup,
        b: &'a Matchup,
    },
    /// Any other number of sides. Callers decide how to report these.
    Unpaired {
        matchup_id: u32,
        sides: Vec<&'a Matchup>,
    },
}

impl MatchupGroup<'_> {
    pub fn matchup_id(&self) -> u32 {
        match self {
            MatchupGroup::Paired { matchup_id, .. } | MatchupGroup::Unpaired { matchup_id, .. } => {
                *matchup_id
            }
        }
    }
}

/// Group records by matchup id, ascending. Records without a matchup id are
/// dropped. Within a group, records keep their input order.
pub fn group_matchups(matchups: &[Matchup]) -> Vec<MatchupGroup<'_>> {
    let mut groups: BTreeMap<u32, Vec<&Matchup>> = BTreeMap::new();
    for m in matchups {
        if let Some(id) = m.matchup_id {
            groups.entry(id).or_default().push(m);
        }
    }

    groups
        .into_iter()
        .map(|(matchup_id, sides)| {
            if sides.len() == 2 {
                MatchupGroup::Paired {
                    matchup_id,
                    a: sides[0],
                    b: sides[1],
                }
            } else {
                MatchupGroup::Unpaired { matchup_id, sides }
            }
        })
        .collect()
}

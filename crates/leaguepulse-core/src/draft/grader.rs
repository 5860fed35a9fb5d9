// Draft grader: turns a league's pick list into per-team sub-scores, a
// league-normalized total, a letter grade and qualitative tags.
//
// Totals are only comparable within one league: the best drafter is always
// anchored at 100.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::directory::TeamDirectory;
use crate::draft::grade::LetterGrade;
use crate::draft::pick::{DraftPick, Position};
use crate::scoring::ScoringConfig;

const TOP_HEAVY_SCALE: f64 = 3.0;
const BALANCE_BASE: f64 = 10.0;
const BALANCE_SCALE: f64 = 8.0;
const BALANCE_MAX_MISS: u32 = 3;
const DEPTH_CURVE_SCALE: f64 = 60.0;
/// Overall pick the depth curve is measured from.
const DEPTH_CURVE_ORIGIN: f64 = 60.0;
const DEPTH_CURVE_OFFSET: f64 = 5.0;
const DEPTH_SCALE: f64 = 2.5;
const VOLATILITY_SWEET_SPOT: usize = 5;
const VOLATILITY_SCALE: f64 = 5.0;
const VOLATILITY_LATE_REWARD: f64 = 2.0;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Qualitative observations about a draft. Rules are evaluated in
/// declaration order and every matching rule appends its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTag {
    RbCore,
    EarlyQb,
    WrRoom,
    LateDarts,
    SkippedKickerDefense,
}

impl DraftTag {
    pub fn label(&self) -> &'static str {
        match self {
            DraftTag::RbCore => "RB core",
            DraftTag::EarlyQb => "Early QB",
            DraftTag::WrRoom => "WR room",
            DraftTag::LateDarts => "Late dart thrower",
            DraftTag::SkippedKickerDefense => "Skipped K/DEF",
        }
    }
}

impl Serialize for DraftTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Graded draft for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDraftScore {
    pub roster_id: u32,
    /// Owner display name (synthesized when the owner is unknown).
    pub owner: String,
    pub top_heavy: f64,
    pub balance: f64,
    pub depth: f64,
    pub volatility: f64,
    /// Weighted total before league normalization.
    pub raw_total: f64,
    /// League-normalized total; the league's best draft is 100.
    pub total: f64,
    pub grade: LetterGrade,
    pub note: &'static str,
    pub tags: Vec<DraftTag>,
}

/// The four sub-scores for a single team before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub top_heavy: f64,
    pub balance: f64,
    pub depth: f64,
    pub volatility: f64,
}

impl SubScores {
    pub fn weighted_total(&self, config: &ScoringConfig) -> f64 {
        let w = &config.weights;
        w.top_heavy * self.top_heavy
            + w.balance * self.balance
            + w.depth * self.depth
            + w.volatility * self.volatility
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Grade every team that made at least one pick.
///
/// Algorithm:
/// 1. Partition picks by roster (ascending roster id) and sort each team's
///    picks by overall pick number.
/// 2. Compute the four sub-scores and the weighted raw total.
/// 3. Normalize against the league's best raw total (floored at 1).
/// 4. Assign letter grade, note and tags.
/// 5. Stable sort ascending by normalized total (worst first).
pub fn grade_draft(
    picks: &[DraftPick],
    directory: &TeamDirectory,
    config: &ScoringConfig,
) -> Vec<TeamDraftScore> {
    let mut by_team: BTreeMap<u32, Vec<&DraftPick>> = BTreeMap::new();
    for pick in picks {
        by_team.entry(pick.roster_id).or_default().push(pick);
    }
    for team_picks in by_team.values_mut() {
        team_picks.sort_by_key(|p| p.pick_no);
    }

    let scored: Vec<(u32, SubScores, f64, Vec<DraftTag>)> = by_team
        .iter()
        .map(|(&roster_id, team_picks)| {
            let sub = score_team(team_picks, config);
            let raw = sub.weighted_total(config);
            debug!(roster_id, raw_total = raw, picks = team_picks.len(), "scored draft");
            (roster_id, sub, raw, tags_for(team_picks, config))
        })
        .collect();

    let league_max = scored
        .iter()
        .map(|(_, _, raw, _)| *raw)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);
    debug!(teams = scored.len(), league_max, "normalizing draft totals");

    let mut results: Vec<TeamDraftScore> = scored
        .into_iter()
        .map(|(roster_id, sub, raw_total, tags)| {
            let total = raw_total / league_max * 100.0;
            let grade = LetterGrade::from_total(total);
            TeamDraftScore {
                roster_id,
                owner: directory.display_name(roster_id),
                top_heavy: sub.top_heavy,
                balance: sub.balance,
                depth: sub.depth,
                volatility: sub.volatility,
                raw_total,
                total,
                grade,
                note: grade.note(),
                tags,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        a.total
            .partial_cmp(&b.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results
}

/// Compute the four sub-scores for one team's picks.
pub fn score_team(picks: &[&DraftPick], config: &ScoringConfig) -> SubScores {
    SubScores {
        top_heavy: top_heavy_score(picks, config),
        balance: balance_score(picks, config),
        depth: depth_score(picks, config),
        volatility: volatility_score(late_count(picks, config)),
    }
}

fn top_heavy_score(picks: &[&DraftPick], config: &ScoringConfig) -> f64 {
    let sum: f64 = picks
        .iter()
        .filter(|p| p.pick_no <= config.early_cutoff)
        .map(|p| config.curve.value(p.pick_no) * config.multiplier(p.position()))
        .sum();
    sum * TOP_HEAVY_SCALE
}

fn balance_score(picks: &[&DraftPick], config: &ScoringConfig) -> f64 {
    let penalty: f64 = Position::ALL
        .iter()
        .map(|&pos| {
            let actual = count_at(picks, pos);
            let ideal = config.ideal_depth.get(pos);
            let miss = actual.abs_diff(ideal).min(BALANCE_MAX_MISS);
            f64::from(miss) / config.multipliers.get(pos)
        })
        .sum();
    (BALANCE_BASE - penalty).max(0.0) * BALANCE_SCALE
}

fn depth_score(picks: &[&DraftPick], config: &ScoringConfig) -> f64 {
    let sum: f64 = picks
        .iter()
        .filter(|p| p.pick_no > config.bench_start && p.pick_no <= config.bench_end)
        .map(|p| {
            let shifted = (f64::from(p.pick_no) - DEPTH_CURVE_ORIGIN + DEPTH_CURVE_OFFSET).max(1.0);
            config.multiplier(p.position()) * DEPTH_CURVE_SCALE / shifted.sqrt()
        })
        .sum();
    sum * DEPTH_SCALE
}

/// Rewards a handful of late speculative picks; zero or too many both cost.
pub fn volatility_score(late_count: usize) -> f64 {
    let excess = late_count.saturating_sub(VOLATILITY_SWEET_SPOT) as f64;
    let rewarded = late_count.min(VOLATILITY_SWEET_SPOT) as f64;
    (BALANCE_BASE - excess).max(0.0) * VOLATILITY_SCALE + rewarded * VOLATILITY_LATE_REWARD
}

fn late_count(picks: &[&DraftPick], config: &ScoringConfig) -> usize {
    picks.iter().filter(|p| p.pick_no > config.bench_end).count()
}

fn count_at(picks: &[&DraftPick], pos: Position) -> u32 {
    picks.iter().filter(|p| p.position() == Some(pos)).count() as u32
}

fn tags_for(picks: &[&DraftPick], config: &ScoringConfig) -> Vec<DraftTag> {
    let early_at = |pos: Position| {
        picks
            .iter()
            .any(|p| p.position() == Some(pos) && p.pick_no <= config.early_cutoff)
    };

    let mut tags = Vec::new();
    if count_at(picks, Position::RunningBack) >= 2 && early_at(Position::RunningBack) {
        tags.push(DraftTag::RbCore);
    }
    if early_at(Position::Quarterback) {
        tags.push(DraftTag::EarlyQb);
    }
    if count_at(picks, Position::WideReceiver) >= 4 {
        tags.push(DraftTag::WrRoom);
    }
    if late_count(picks, config) >= 5 {
        tags.push(DraftTag::LateDarts);
    }
    if count_at(picks, Position::Kicker) == 0 && count_at(picks, Position::Defense) == 0 {
        tags.push(DraftTag::SkippedKickerDefense);
    }
    tags
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::PickMetadata;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn pick(roster_id: u32, pick_no: u32, pos: &str) -> DraftPick {
        DraftPick {
            player_id: format!("p{pick_no}"),
            round: (pick_no - 1) / 12 + 1,
            pick_no,
            roster_id,
            metadata: PickMetadata {
                position: Position::from_code(pos),
                ..PickMetadata::default()
            },
        }
    }

    fn grade(picks: &[DraftPick]) -> Vec<TeamDraftScore> {
        grade_draft(picks, &TeamDirectory::default(), &ScoringConfig::default())
    }

    #[test]
    fn empty_draft_yields_empty_grades() {
        assert!(grade(&[]).is_empty());
    }

    #[test]
    fn two_team_scenario() {
        let picks = vec![
            pick(1, 1, "QB"),
            pick(1, 50, "RB"),
            pick(2, 2, "RB"),
            pick(2, 49, "WR"),
        ];
        let grades = grade(&picks);
        assert_eq!(grades.len(), 2);

        // Ascending: team 2 first, team 1 anchored at 100.
        assert_eq!(grades[0].roster_id, 2);
        assert_eq!(grades[1].roster_id, 1);
        assert_eq!(grades[1].total, 100.0);
        assert!(grades[0].total < 100.0 && grades[0].total > 95.0);

        // Team 1: 3 * (100/sqrt(3)) * 1.1, no bench picks, no late picks.
        let t1 = &grades[1];
        assert!(approx_eq(t1.top_heavy, 3.0 * 100.0 / 3f64.sqrt() * 1.1, 1e-9));
        assert!(approx_eq(t1.balance, 0.0, 1e-12));
        assert!(approx_eq(t1.depth, 0.0, 1e-12));
        assert!(approx_eq(t1.volatility, 50.0, 1e-12));

        let t2 = &grades[0];
        assert!(approx_eq(t2.top_heavy, 187.5, 1e-9));
        let expected = (0.45 * 187.5 + 5.0) / (0.45 * t1.top_heavy + 5.0) * 100.0;
        assert!(approx_eq(t2.total, expected, 1e-9));
    }

    #[test]
    fn team_without_picks_is_absent() {
        let grades = grade(&[pick(3, 5, "WR")]);
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].roster_id, 3);
        assert_eq!(grades[0].owner, "Team 3");
    }

    #[test]
    fn best_team_always_normalizes_to_100() {
        let picks: Vec<DraftPick> = (1..=48)
            .map(|n| pick((n - 1) % 4 + 1, n, ["QB", "RB", "WR", "TE"][(n % 4) as usize]))
            .collect();
        let grades = grade(&picks);
        assert_eq!(grades.len(), 4);
        assert_eq!(grades.last().unwrap().total, 100.0);
        assert!(grades.windows(2).all(|w| w[0].total <= w[1].total));
    }

    #[test]
    fn tiny_totals_are_not_inflated() {
        // Raw total below 1: the divisor floor keeps it from scaling to 100.
        let mut cfg = ScoringConfig::default();
        cfg.weights.top_heavy = 0.0;
        cfg.weights.balance = 0.0;
        cfg.weights.volatility = 0.0;
        cfg.weights.depth = 0.001;
        let grades = grade_draft(&[pick(1, 100, "K")], &TeamDirectory::default(), &cfg);
        let raw = grades[0].raw_total;
        assert!(raw < 1.0);
        assert!(approx_eq(grades[0].total, raw * 100.0, 1e-12));
    }

    #[test]
    fn equal_totals_keep_roster_order() {
        let picks = vec![pick(5, 10, "WR"), pick(2, 10, "WR"), pick(9, 10, "WR")];
        let grades = grade(&picks);
        let ids: Vec<u32> = grades.iter().map(|g| g.roster_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn unknown_position_uses_neutral_multiplier() {
        let cfg = ScoringConfig::default();
        let p = pick(1, 2, "LB");
        let sub = score_team(&[&p], &cfg);
        assert!(approx_eq(sub.top_heavy, 3.0 * 50.0, 1e-9));
    }

    #[test]
    fn ideal_roster_gets_full_balance() {
        let cfg = ScoringConfig::default();
        let mut picks = Vec::new();
        let layout = [("QB", 2), ("RB", 5), ("WR", 5), ("TE", 2), ("K", 1), ("DEF", 1)];
        let mut n = 1;
        for (pos, count) in layout {
            for _ in 0..count {
                picks.push(pick(1, n * 10, pos));
                n += 1;
            }
        }
        let refs: Vec<&DraftPick> = picks.iter().collect();
        assert!(approx_eq(score_team(&refs, &cfg).balance, 80.0, 1e-12));
    }

    #[test]
    fn balance_miss_is_capped_per_position() {
        let cfg = ScoringConfig::default();
        // Ten QBs: QB miss capped at 3; every other position misses fully.
        let picks: Vec<DraftPick> = (1..=10).map(|n| pick(1, n * 12, "QB")).collect();
        let refs: Vec<&DraftPick> = picks.iter().collect();
        let penalty: f64 = 3.0 / 1.10 + 3.0 / 1.25 + 3.0 / 1.15 + 2.0 / 1.05 + 1.0 / 0.5 + 1.0 / 0.6;
        let expected = (10.0 - penalty).max(0.0) * 8.0;
        assert!(approx_eq(score_team(&refs, &cfg).balance, expected, 1e-9));
    }

    #[test]
    fn depth_counts_only_bench_window() {
        let cfg = ScoringConfig::default();
        let picks = vec![pick(1, 72, "RB"), pick(1, 73, "RB"), pick(1, 168, "WR"), pick(1, 169, "WR")];
        let refs: Vec<&DraftPick> = picks.iter().collect();
        let expected = (1.25 * 60.0 / 18f64.sqrt() + 1.15 * 60.0 / 113f64.sqrt()) * 2.5;
        assert!(approx_eq(score_team(&refs, &cfg).depth, expected, 1e-9));
    }

    #[test]
    fn depth_curve_is_clamped_near_its_origin() {
        let cfg = ScoringConfig {
            early_cutoff: 10,
            bench_start: 40,
            ..ScoringConfig::default()
        };
        // 56 - 60 + 5 = 1 and 50 - 60 + 5 < 1 both divide by sqrt(1).
        let picks = vec![pick(1, 50, "LB"), pick(1, 56, "LB"), pick(1, 64, "LB")];
        let refs: Vec<&DraftPick> = picks.iter().collect();
        let expected = (60.0 + 60.0 + 60.0 / 3.0) * 2.5;
        assert!(approx_eq(score_team(&refs, &cfg).depth, expected, 1e-9));
    }

    #[test]
    fn volatility_rewards_moderate_late_picks() {
        assert!(approx_eq(volatility_score(0), 50.0, 1e-12));
        assert!(approx_eq(volatility_score(3), 56.0, 1e-12));
        assert!(approx_eq(volatility_score(5), 60.0, 1e-12));
        assert!(approx_eq(volatility_score(8), 45.0, 1e-12));
        assert!(approx_eq(volatility_score(20), 10.0, 1e-12));
    }

    #[test]
    fn tags_follow_rule_order() {
        let mut picks = vec![
            pick(1, 3, "RB"),
            pick(1, 20, "QB"),
            pick(1, 40, "RB"),
            pick(1, 60, "WR"),
            pick(1, 80, "WR"),
            pick(1, 100, "WR"),
            pick(1, 120, "WR"),
        ];
        for n in 170..175 {
            picks.push(pick(1, n, "TE"));
        }
        let grades = grade(&picks);
        assert_eq!(
            grades[0].tags,
            vec![
                DraftTag::RbCore,
                DraftTag::EarlyQb,
                DraftTag::WrRoom,
                DraftTag::LateDarts,
                DraftTag::SkippedKickerDefense,
            ]
        );
    }

    #[test]
    fn rb_core_needs_an_early_back() {
        let grades = grade(&[pick(1, 40, "RB"), pick(1, 50, "RB"), pick(1, 60, "K")]);
        assert!(!grades[0].tags.contains(&DraftTag::RbCore));
        assert!(!grades[0].tags.contains(&DraftTag::SkippedKickerDefense));
    }

    #[test]
    fn grade_and_note_agree() {
        let grades = grade(&[pick(1, 1, "RB"), pick(2, 2, "K")]);
        for g in &grades {
            assert_eq!(g.grade, LetterGrade::from_total(g.total));
            assert_eq!(g.note, g.grade.note());
        }
    }
}

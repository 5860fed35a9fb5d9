// Power index: a continuous strength value derived from the draft grade.
//
// power = 50 + (normalized_total - 75) * 1.25. An average (75) draft sits at
// 50. There is no clamping; values outside 0..100 are expected for outliers.

use std::collections::BTreeMap;

use crate::draft::grader::TeamDraftScore;

/// Power assumed for any team without a draft grade.
pub const DEFAULT_POWER: f64 = 50.0;

const AVERAGE_TOTAL: f64 = 75.0;
const POWER_PER_POINT: f64 = 1.25;

/// Power value for a single normalized draft total.
pub fn power_for(normalized_total: f64) -> f64 {
    DEFAULT_POWER + (normalized_total - AVERAGE_TOTAL) * POWER_PER_POINT
}

/// Map every graded team to its power value.
pub fn power_index(scores: &[TeamDraftScore]) -> BTreeMap<u32, f64> {
    scores
        .iter()
        .map(|s| (s.roster_id, power_for(s.total)))
        .collect()
}

/// Look up a team's power, falling back to [`DEFAULT_POWER`].
pub fn power_of(index: &BTreeMap<u32, f64>, roster_id: u32) -> f64 {
    index.get(&roster_id).copied().unwrap_or(DEFAULT_POWER)
}

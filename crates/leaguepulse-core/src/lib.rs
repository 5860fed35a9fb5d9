// Library root: pure scoring and forecast engine for league reports.
//
// Draft grading feeds the power index, which feeds weekly previews.
// Completed-week summaries are an independent branch over raw matchups.

pub mod directory;
pub mod draft;
pub mod forecast;
pub mod matchup;
pub mod records;
pub mod scoring;
pub mod summary;

pub use directory::TeamDirectory;
pub use draft::grade::LetterGrade;
pub use draft::grader::{grade_draft, DraftTag, TeamDraftScore};
pub use draft::pick::{DraftPick, PickMetadata, Position};
pub use forecast::power::{power_index, power_of, DEFAULT_POWER};
pub use forecast::preview::{forecast_week, Favorite, Preview, WeekForecast};
pub use matchup::{group_matchups, MatchupGroup};
pub use records::{League, Matchup, Owner, Team};
pub use scoring::{ScoringConfig, ScoringError};
pub use summary::{summarize_week, Outcome, StarPerformer, Summary, WeekSummaries};

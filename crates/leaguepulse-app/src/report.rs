// Report assembly and rendering.
//
// `build_report` pulls one league's records from a source and runs the
// engine: grades -> power -> previews for the target week, plus summaries of
// the previous (completed) week. Renderers own all number formatting.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use leaguepulse_core::{
    forecast_week, grade_draft, power_index, summarize_week, League, Outcome, ScoringConfig,
    TeamDirectory, TeamDraftScore, WeekForecast, WeekSummaries,
};
use serde::Serialize;
use tracing::info;

use crate::source::LeagueSource;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Completed-week results section.
#[derive(Debug, Clone, Serialize)]
pub struct WeekResults {
    pub week: u32,
    #[serde(flatten)]
    pub results: WeekSummaries,
}

/// Everything the engine derived for one league and week.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueReport {
    pub league: League,
    pub week: u32,
    pub generated_at: DateTime<Utc>,
    /// Display name per roster id.
    pub teams: BTreeMap<u32, String>,
    /// Player display names known from the draft, by player id.
    pub players: BTreeMap<String, String>,
    /// Worst to best.
    pub grades: Vec<TeamDraftScore>,
    pub power: BTreeMap<u32, f64>,
    pub forecast: WeekForecast,
    /// Results of `week - 1`; absent in week 1.
    pub results: Option<WeekResults>,
    #[serde(skip)]
    pub directory: TeamDirectory,
}

impl LeagueReport {
    pub fn team_name(&self, roster_id: u32) -> String {
        self.directory.display_name(roster_id)
    }

    pub fn player_name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.players
            .get(player_id)
            .map(String::as_str)
            .unwrap_or(player_id)
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Fetch one league's records and run the full engine.
///
/// `week` defaults to the source's current week.
pub async fn build_report(
    source: &dyn LeagueSource,
    week: Option<u32>,
    scoring: &ScoringConfig,
) -> Result<LeagueReport> {
    let week = match week {
        Some(w) => w,
        None => source
            .current_week()
            .await
            .context("failed to determine current week")?,
    };

    let previous_week = async {
        match week.checked_sub(1).filter(|w| *w >= 1) {
            Some(prev) => source.matchups(prev).await.map(|m| Some((prev, m))),
            None => Ok(None),
        }
    };

    let (league, teams, owners, picks, upcoming, previous) = tokio::try_join!(
        source.league(),
        source.teams(),
        source.owners(),
        source.draft_picks(),
        source.matchups(week),
        previous_week,
    )
    .with_context(|| format!("failed to fetch records for league {}", source.league_id()))?;

    info!(
        league = %league.name,
        week,
        teams = teams.len(),
        picks = picks.len(),
        "building league report"
    );

    let directory = TeamDirectory::new(&teams, &owners);
    let grades = grade_draft(&picks, &directory, scoring);
    let power = power_index(&grades);
    let forecast = forecast_week(&upcoming, &power);
    let results = previous.map(|(prev, matchups)| WeekResults {
        week: prev,
        results: summarize_week(&matchups, &directory),
    });

    let players = picks
        .iter()
        .map(|p| (p.player_id.clone(), p.player_name()))
        .collect();
    let team_names = teams
        .iter()
        .map(|t| (t.roster_id, directory.display_name(t.roster_id)))
        .collect();

    Ok(LeagueReport {
        league,
        week,
        generated_at: Utc::now(),
        teams: team_names,
        players,
        grades,
        power,
        forecast,
        results,
        directory,
    })
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

pub fn render(report: &LeagueReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_grades_csv(report),
    }
}

/// Human-readable newsletter-style report.
pub fn render_text(report: &LeagueReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) - Week {}",
        report.league.name, report.league.season, report.week
    );

    out.push_str("\nDRAFT GRADES\n");
    if report.grades.is_empty() {
        out.push_str("  No draft data yet.\n");
    }
    for (rank, g) in report.grades.iter().rev().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<24} {:<2}  {:>6.2}",
            rank + 1,
            g.owner,
            g.grade.label(),
            g.total
        );
        let _ = writeln!(out, "      {}", g.note);
        if !g.tags.is_empty() {
            let tags: Vec<&str> = g.tags.iter().map(|t| t.label()).collect();
            let _ = writeln!(out, "      [{}]", tags.join(", "));
        }
    }

    let _ = writeln!(out, "\nWEEK {} PREVIEW", report.week);
    match &report.forecast.game_of_the_week {
        Some(gotw) => {
            let _ = writeln!(
                out,
                "  Game of the Week: {} vs {} (gap {:.2})",
                report.team_name(gotw.team_a),
                report.team_name(gotw.team_b),
                gotw.diff
            );
        }
        None => out.push_str("  No matchups scheduled.\n"),
    }
    for p in &report.forecast.previews {
        let _ = writeln!(
            out,
            "  {} ({:.1}) vs {} ({:.1}) - {}",
            report.team_name(p.team_a),
            p.power_a,
            report.team_name(p.team_b),
            p.power_b,
            p.favorite().label(&report.directory)
        );
    }

    if let Some(results) = &report.results {
        let _ = writeln!(out, "\nWEEK {} RESULTS", results.week);
        if results.results.summaries.is_empty() {
            out.push_str("  No completed matchups.\n");
        }
        for s in &results.results.summaries {
            let verdict = match &s.outcome {
                Outcome::Winner { name, .. } => format!("{name} wins by {:.2}", s.margin),
                Outcome::Tie => "Tie".to_string(),
            };
            let _ = writeln!(
                out,
                "  {} {:.2} - {:.2} {}: {}",
                s.name_a, s.points_a, s.points_b, s.name_b, verdict
            );
            if let Some(star) = &s.star {
                let _ = writeln!(
                    out,
                    "      Star: {} ({:.2}) for {}",
                    report.player_name(&star.player_id),
                    star.points,
                    report.team_name(star.roster_id)
                );
            }
        }
    }

    out
}

pub fn render_json(report: &LeagueReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

#[derive(Debug, Serialize)]
struct GradeRow<'a> {
    rank: usize,
    roster_id: u32,
    owner: &'a str,
    grade: &'static str,
    total: String,
    top_heavy: String,
    balance: String,
    depth: String,
    volatility: String,
    power: String,
    tags: String,
}

/// Draft grades as CSV, best first.
pub fn render_grades_csv(report: &LeagueReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (rank, g) in report.grades.iter().rev().enumerate() {
        let power = report.power.get(&g.roster_id).copied().unwrap_or_default();
        writer
            .serialize(GradeRow {
                rank: rank + 1,
                roster_id: g.roster_id,
                owner: &g.owner,
                grade: g.grade.label(),
                total: format!("{:.2}", g.total),
                top_heavy: format!("{:.2}", g.top_heavy),
                balance: format!("{:.2}", g.balance),
                depth: format!("{:.2}", g.depth),
                volatility: format!("{:.2}", g.volatility),
                power: format!("{power:.2}"),
                tags: g.tags.iter().map(|t| t.label()).collect::<Vec<_>>().join("; "),
            })
            .context("failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

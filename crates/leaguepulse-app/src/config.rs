// Configuration loading and parsing (league.toml, scoring.toml).

use leaguepulse_core::{ScoringConfig, ScoringError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Last regular-season week a report can target.
pub const MAX_WEEK: u32 = 18;

const MAX_RETRIES_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },

    #[error("invalid scoring config: {0}")]
    Scoring(#[from] ScoringError),
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueSection,
    pub fetch: FetchConfig,
    pub cache_path: PathBuf,
    pub scoring: ScoringConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
    #[serde(default)]
    fetch: FetchConfig,
    #[serde(default)]
    cache: CacheSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueSection {
    /// Provider league identifier.
    pub league_id: String,
    /// Week to report on. When omitted, the provider's current week is used.
    #[serde(default)]
    pub week: Option<u32>,
}

/// HTTP behavior of the fetch layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Base delay; doubled on every retry.
    pub backoff_ms: u64,
    /// Upper bound on any single retry delay.
    pub max_backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.sleeper.app/v1".into(),
            max_retries: 3,
            backoff_ms: 500,
            max_backoff_ms: 30_000,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CacheSection {
    #[serde(default)]
    path: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// (optionally) `config/scoring.toml`, relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- scoring.toml (optional) ---
    let scoring_path = config_dir.join("scoring.toml");
    let scoring = if scoring_path.exists() {
        let text = read_file(&scoring_path)?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: scoring_path.clone(),
            source: e,
        })?
    } else {
        ScoringConfig::default()
    };

    let cache_path = league_file
        .cache
        .path
        .map(PathBuf::from)
        .unwrap_or_else(default_cache_path);

    let config = Config {
        league: league_file.league,
        fetch: league_file.fetch,
        cache_path,
        scoring,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        if target.exists() {
            continue;
        }
        std::fs::copy(&path, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", path.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Platform data directory, or the working directory when none exists.
fn default_cache_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "leaguepulse")
        .map(|dirs| dirs.data_dir().join("leaguepulse.db"))
        .unwrap_or_else(|| PathBuf::from("leaguepulse.db"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.league_id".into(),
            message: "must not be empty".into(),
        });
    }

    if let Some(week) = config.league.week {
        if !(1..=MAX_WEEK).contains(&week) {
            return Err(ConfigError::ValidationError {
                field: "league.week".into(),
                message: format!("must be between 1 and {MAX_WEEK}, got {week}"),
            });
        }
    }

    if config.fetch.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::ValidationError {
            field: "fetch.max_retries".into(),
            message: format!("must be <= {MAX_RETRIES_LIMIT}, got {}", config.fetch.max_retries),
        });
    }

    if config.fetch.backoff_ms > config.fetch.max_backoff_ms {
        return Err(ConfigError::ValidationError {
            field: "fetch.backoff_ms".into(),
            message: format!(
                "must be <= fetch.max_backoff_ms ({}), got {}",
                config.fetch.max_backoff_ms, config.fetch.backoff_ms
            ),
        });
    }

    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "fetch.timeout_secs".into(),
            message: "must be > 0".into(),
        });
    }

    config.scoring.validate()?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

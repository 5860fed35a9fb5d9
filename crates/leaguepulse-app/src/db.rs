// SQLite snapshot cache for fetched league records.
//
// Only data that can no longer change is cached: a finished draft's picks
// and fully scored weeks. Everything else always goes to the source.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leaguepulse_core::summary::is_complete;
use leaguepulse_core::{DraftPick, League, Matchup, Owner, Team};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::source::{FetchError, LeagueSource};

/// What a snapshot row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    DraftPicks,
    Matchups,
}

impl SnapshotKind {
    fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::DraftPicks => "draft_picks",
            SnapshotKind::Matchups => "matchups",
        }
    }
}

/// SQLite-backed store of JSON snapshots keyed by league, kind and week.
pub struct Cache {
    conn: Mutex<Connection>,
}

impl Cache {
    /// Open (or create) the cache at `path`. Pass `":memory:"` for an
    /// ephemeral cache (useful for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open cache database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set cache pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS snapshots (
                league_id  TEXT NOT NULL,
                kind       TEXT NOT NULL,
                week       INTEGER NOT NULL,
                payload    TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                PRIMARY KEY (league_id, kind, week)
            );
            ",
        )
        .context("failed to create cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("cache mutex poisoned")
    }

    /// Store (or replace) a snapshot.
    pub fn store<T: Serialize>(
        &self,
        league_id: &str,
        kind: SnapshotKind,
        week: u32,
        value: &T,
    ) -> Result<()> {
        let payload = serde_json::to_string(value).context("failed to serialize snapshot")?;
        let fetched_at = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO snapshots (league_id, kind, week, payload, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![league_id, kind.as_str(), week, payload, fetched_at],
            )
            .context("failed to store snapshot")?;
        Ok(())
    }

    /// Load a snapshot. Returns `None` if nothing is stored for the key.
    pub fn load<T: DeserializeOwned>(
        &self,
        league_id: &str,
        kind: SnapshotKind,
        week: u32,
    ) -> Result<Option<T>> {
        let payload: Option<String> = self
            .conn()
            .query_row(
                "SELECT payload FROM snapshots WHERE league_id = ?1 AND kind = ?2 AND week = ?3",
                params![league_id, kind.as_str(), week],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query snapshot")?;

        payload
            .map(|p| serde_json::from_str(&p).context("failed to deserialize snapshot"))
            .transpose()
    }

    /// When a snapshot was stored, if it exists.
    pub fn fetched_at(
        &self,
        league_id: &str,
        kind: SnapshotKind,
        week: u32,
    ) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn()
            .query_row(
                "SELECT fetched_at FROM snapshots WHERE league_id = ?1 AND kind = ?2 AND week = ?3",
                params![league_id, kind.as_str(), week],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query snapshot timestamp")?;

        raw.map(|ts| {
            DateTime::parse_from_rfc3339(&ts)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid snapshot timestamp {ts}"))
        })
        .transpose()
    }

    /// Drop every snapshot for a league. Returns the number of rows removed.
    pub fn clear_league(&self, league_id: &str) -> Result<usize> {
        self.conn()
            .execute("DELETE FROM snapshots WHERE league_id = ?1", params![league_id])
            .context("failed to clear league snapshots")
    }
}

// ---------------------------------------------------------------------------
// CachedSource
// ---------------------------------------------------------------------------

/// A `LeagueSource` that serves immutable data from the cache.
///
/// Cache failures are logged and fall through to the inner source; they
/// never fail a fetch.
pub struct CachedSource<S> {
    inner: S,
    cache: Cache,
}

impl<S: LeagueSource> CachedSource<S> {
    pub fn new(inner: S, cache: Cache) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    fn cached<T: DeserializeOwned>(&self, kind: SnapshotKind, week: u32) -> Option<T> {
        match self.cache.load(self.inner.league_id(), kind, week) {
            Ok(hit) => {
                if hit.is_some() {
                    let fetched_at = self
                        .cache
                        .fetched_at(self.inner.league_id(), kind, week)
                        .ok()
                        .flatten();
                    debug!(kind = kind.as_str(), week, ?fetched_at, "cache hit");
                }
                hit
            }
            Err(e) => {
                warn!(kind = kind.as_str(), week, "cache read failed: {e:#}");
                None
            }
        }
    }

    fn remember<T: Serialize>(&self, kind: SnapshotKind, week: u32, value: &T) {
        if let Err(e) = self.cache.store(self.inner.league_id(), kind, week, value) {
            warn!(kind = kind.as_str(), week, "cache write failed: {e:#}");
        }
    }
}

#[async_trait]
impl<S: LeagueSource> LeagueSource for CachedSource<S> {
    fn league_id(&self) -> &str {
        self.inner.league_id()
    }

    async fn league(&self) -> Result<League, FetchError> {
        self.inner.league().await
    }

    async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        self.inner.teams().await
    }

    async fn owners(&self) -> Result<Vec<Owner>, FetchError> {
        self.inner.owners().await
    }

    async fn draft_picks(&self) -> Result<Vec<DraftPick>, FetchError> {
        if let Some(picks) = self.cached(SnapshotKind::DraftPicks, 0) {
            return Ok(picks);
        }
        let picks = self.inner.draft_picks().await?;
        if !picks.is_empty() {
            self.remember(SnapshotKind::DraftPicks, 0, &picks);
        }
        Ok(picks)
    }

    async fn matchups(&self, week: u32) -> Result<Vec<Matchup>, FetchError> {
        if let Some(matchups) = self.cached(SnapshotKind::Matchups, week) {
            return Ok(matchups);
        }
        let matchups = self.inner.matchups(week).await?;
        if is_complete(&matchups) {
            self.remember(SnapshotKind::Matchups, week, &matchups);
        }
        Ok(matchups)
    }

    async fn current_week(&self) -> Result<u32, FetchError> {
        self.inner.current_week().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

// Record sources: where the engine's inputs come from.
//
// The engine never performs I/O. A `LeagueSource` hands it fully
// materialized records for one league; failures surface here and never
// reach the engine.

pub mod sleeper;

use async_trait::async_trait;
use leaguepulse_core::{DraftPick, League, Matchup, Owner, Team};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("not found: {what}")]
    NotFound { what: String },
}

/// Per-league supplier of raw records.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    /// Identifier of the league this source serves.
    fn league_id(&self) -> &str;

    async fn league(&self) -> Result<League, FetchError>;

    async fn teams(&self) -> Result<Vec<Team>, FetchError>;

    async fn owners(&self) -> Result<Vec<Owner>, FetchError>;

    /// Picks from the league's most recent draft; empty when no draft exists.
    async fn draft_picks(&self) -> Result<Vec<DraftPick>, FetchError>;

    async fn matchups(&self, week: u32) -> Result<Vec<Matchup>, FetchError>;

    /// The provider's current week (at least 1).
    async fn current_week(&self) -> Result<u32, FetchError>;
}

// Sleeper public API client.
//
// Fetches league, roster, user, draft and matchup payloads over HTTPS and
// converts them into engine records. Transient failures (transport errors,
// HTTP 429 and 5xx) are retried with exponential backoff.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use leaguepulse_core::{DraftPick, League, Matchup, Owner, PickMetadata, Position, Team};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{FetchError, LeagueSource};
use crate::config::FetchConfig;

const USER_AGENT: &str = concat!("leaguepulse/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LeaguePayload {
    league_id: String,
    name: String,
    season: String,
    total_rosters: u32,
}

#[derive(Debug, Deserialize)]
struct RosterPayload {
    roster_id: u32,
    owner_id: Option<String>,
    players: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    user_id: String,
    display_name: Option<String>,
    metadata: Option<UserMetadata>,
}

#[derive(Debug, Deserialize)]
struct UserMetadata {
    team_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DraftPayload {
    draft_id: String,
    #[serde(default)]
    created: i64,
}

#[derive(Debug, Deserialize)]
struct PickPayload {
    player_id: String,
    round: u32,
    pick_no: u32,
    roster_id: Option<u32>,
    metadata: Option<PickMetadataPayload>,
}

/// Sleeper sends every metadata value as a string.
#[derive(Debug, Deserialize)]
struct PickMetadataPayload {
    position: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    team: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchupPayload {
    matchup_id: Option<u32>,
    roster_id: u32,
    starters: Option<Vec<String>>,
    points: Option<f64>,
    players_points: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct StatePayload {
    week: u32,
}

// ---------------------------------------------------------------------------
// Payload -> record conversion
// ---------------------------------------------------------------------------

impl From<LeaguePayload> for League {
    fn from(p: LeaguePayload) -> Self {
        League {
            league_id: p.league_id,
            name: p.name,
            season: p.season,
            total_rosters: p.total_rosters,
        }
    }
}

impl From<RosterPayload> for Team {
    fn from(p: RosterPayload) -> Self {
        Team {
            roster_id: p.roster_id,
            owner_id: p.owner_id,
            players: p.players.unwrap_or_default(),
        }
    }
}

impl From<UserPayload> for Owner {
    fn from(p: UserPayload) -> Self {
        Owner {
            display_name: p.display_name.unwrap_or_else(|| p.user_id.clone()),
            user_id: p.user_id,
            team_name: p.metadata.and_then(|m| m.team_name),
        }
    }
}

impl From<MatchupPayload> for Matchup {
    fn from(p: MatchupPayload) -> Self {
        Matchup {
            matchup_id: p.matchup_id,
            roster_id: p.roster_id,
            starters: p.starters.unwrap_or_default(),
            points: p.points,
            players_points: p.players_points.unwrap_or_default(),
        }
    }
}

/// Picks without an owning roster cannot be graded and are dropped.
fn pick_from_payload(p: PickPayload) -> Option<DraftPick> {
    let Some(roster_id) = p.roster_id else {
        warn!(pick_no = p.pick_no, "draft pick has no roster id, skipping");
        return None;
    };
    let metadata = p
        .metadata
        .map(|m| PickMetadata {
            position: m.position.as_deref().and_then(Position::from_code),
            first_name: m.first_name,
            last_name: m.last_name,
            nfl_team: m.team,
        })
        .unwrap_or_default();
    Some(DraftPick {
        player_id: p.player_id,
        round: p.round,
        pick_no: p.pick_no,
        roster_id,
        metadata,
    })
}

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// HTTP client bound to one Sleeper league.
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
    league_id: String,
    max_retries: u32,
    backoff: Duration,
    max_backoff: Duration,
}

impl SleeperClient {
    pub fn new(league_id: impl Into<String>, fetch: &FetchConfig) -> Result<Self, FetchError> {
        let base_url = fetch.base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport {
                url: base_url.clone(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url,
            league_id: league_id.into(),
            max_retries: fetch.max_retries,
            backoff: Duration::from_millis(fetch.backoff_ms),
            max_backoff: Duration::from_millis(fetch.max_backoff_ms),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body. Sleeper answers unknown ids with
    /// a literal `null`, so callers decode into `Option`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);
        let mut attempt: u32 = 0;

        loop {
            let retry_reason = match self.http.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.bytes().await.map_err(|e| FetchError::Transport {
                        url: url.clone(),
                        source: e,
                    })?;
                    debug!(%url, bytes = body.len(), "fetched");
                    return serde_json::from_slice(&body)
                        .map_err(|e| FetchError::Decode { url, source: e });
                }
                Ok(resp) => {
                    let status = resp.status();
                    if !is_retryable(status) || attempt >= self.max_retries {
                        return Err(FetchError::Status {
                            url,
                            status: status.as_u16(),
                        });
                    }
                    format!("HTTP {status}")
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(FetchError::Transport { url, source: e });
                    }
                    e.to_string()
                }
            };

            let delay = retry_delay(self.backoff, attempt, self.max_backoff);
            attempt += 1;
            warn!(%url, attempt, ?delay, "retrying after {retry_reason}");
            tokio::time::sleep(delay).await;
        }
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let list: Option<Vec<T>> = self.get_json(path).await?;
        Ok(list.unwrap_or_default())
    }
}

/// `base × 2^attempt`, saturating and capped at `max`.
fn retry_delay(base: Duration, attempt: u32, max: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(max)
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait]
impl LeagueSource for SleeperClient {
    fn league_id(&self) -> &str {
        &self.league_id
    }

    async fn league(&self) -> Result<League, FetchError> {
        let payload: Option<LeaguePayload> =
            self.get_json(&format!("/league/{}", self.league_id)).await?;
        payload.map(League::from).ok_or_else(|| FetchError::NotFound {
            what: format!("league {}", self.league_id),
        })
    }

    async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        let rosters: Vec<RosterPayload> = self
            .get_list(&format!("/league/{}/rosters", self.league_id))
            .await?;
        Ok(rosters.into_iter().map(Team::from).collect())
    }

    async fn owners(&self) -> Result<Vec<Owner>, FetchError> {
        let users: Vec<UserPayload> = self
            .get_list(&format!("/league/{}/users", self.league_id))
            .await?;
        Ok(users.into_iter().map(Owner::from).collect())
    }

    async fn draft_picks(&self) -> Result<Vec<DraftPick>, FetchError> {
        let drafts: Vec<DraftPayload> = self
            .get_list(&format!("/league/{}/drafts", self.league_id))
            .await?;
        let Some(latest) = drafts.into_iter().max_by_key(|d| d.created) else {
            debug!(league_id = %self.league_id, "league has no drafts");
            return Ok(Vec::new());
        };

        let picks: Vec<PickPayload> = self
            .get_list(&format!("/draft/{}/picks", latest.draft_id))
            .await?;
        Ok(picks.into_iter().filter_map(pick_from_payload).collect())
    }

    async fn matchups(&self, week: u32) -> Result<Vec<Matchup>, FetchError> {
        let matchups: Vec<MatchupPayload> = self
            .get_list(&format!("/league/{}/matchups/{week}", self.league_id))
            .await?;
        Ok(matchups.into_iter().map(Matchup::from).collect())
    }

    async fn current_week(&self) -> Result<u32, FetchError> {
        let state: Option<StatePayload> = self.get_json("/state/nfl").await?;
        let state = state.ok_or_else(|| FetchError::NotFound {
            what: "nfl state".into(),
        })?;
        // Preseason reports week 0.
        Ok(state.week.max(1))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve the canned responses in order, one per connection. Returns the
    /// base URL and a counter of requests seen.
    async fn mock_server(responses: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();

        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                counter.fetch_add(1, Ordering::SeqCst);
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.flush().await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), seen)
    }

    fn client(base_url: &str, max_retries: u32) -> SleeperClient {
        let fetch = FetchConfig {
            base_url: base_url.into(),
            max_retries,
            backoff_ms: 1,
            max_backoff_ms: 10,
            timeout_secs: 5,
        };
        SleeperClient::new("42", &fetch).unwrap()
    }

    #[test]
    fn pick_metadata_strings_are_parsed() {
        let json = r#"{
            "player_id": "4046", "round": 1, "pick_no": 3, "roster_id": 7,
            "picked_by": "u7", "draft_slot": 3,
            "metadata": { "position": "QB", "first_name": "Patrick",
                          "last_name": "Mahomes", "team": "KC", "years_exp": "8" }
        }"#;
        let payload: PickPayload = serde_json::from_str(json).unwrap();
        let pick = pick_from_payload(payload).unwrap();
        assert_eq!(pick.roster_id, 7);
        assert_eq!(pick.position(), Some(Position::Quarterback));
        assert_eq!(pick.metadata.nfl_team.as_deref(), Some("KC"));
        assert_eq!(pick.player_name(), "Patrick Mahomes");
    }

    #[test]
    fn pick_without_roster_is_dropped() {
        let json = r#"{ "player_id": "1", "round": 1, "pick_no": 1, "roster_id": null }"#;
        let payload: PickPayload = serde_json::from_str(json).unwrap();
        assert!(pick_from_payload(payload).is_none());
    }

    #[test]
    fn user_team_name_comes_from_metadata() {
        let json = r#"{ "user_id": "u1", "display_name": "alice",
                        "metadata": { "team_name": "Blitz", "avatar": "x" } }"#;
        let owner = Owner::from(serde_json::from_str::<UserPayload>(json).unwrap());
        assert_eq!(owner.team_name.as_deref(), Some("Blitz"));
        assert_eq!(owner.display_name, "alice");
    }

    #[test]
    fn matchup_nulls_become_defaults() {
        let json = r#"{ "matchup_id": null, "roster_id": 3, "starters": null,
                        "points": null, "players_points": null }"#;
        let m = Matchup::from(serde_json::from_str::<MatchupPayload>(json).unwrap());
        assert_eq!(m.matchup_id, None);
        assert!(m.starters.is_empty());
        assert!(m.players_points.is_empty());
    }

    #[test]
    fn only_transient_statuses_retry() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn retry_delay_doubles_then_caps() {
        let base = Duration::from_millis(500);
        let cap = Duration::from_secs(30);
        assert_eq!(retry_delay(base, 0, cap), Duration::from_millis(500));
        assert_eq!(retry_delay(base, 3, cap), Duration::from_millis(4000));
        assert_eq!(retry_delay(base, 10, cap), cap);
    }

    #[test]
    fn retry_delay_saturates_on_huge_backoff() {
        let base = Duration::from_millis(u64::MAX);
        let cap = Duration::from_millis(u64::MAX);
        assert_eq!(retry_delay(base, 31, cap), cap);
        assert_eq!(retry_delay(Duration::MAX, 5, Duration::MAX), Duration::MAX);
    }

    #[tokio::test]
    async fn fetches_league() {
        let body = r#"{"league_id":"42","name":"Dynasty Bros","season":"2025","total_rosters":12,"status":"in_season"}"#;
        let (base, _) = mock_server(vec![http_response("200 OK", body)]).await;
        let league = client(&base, 0).league().await.unwrap();
        assert_eq!(league.name, "Dynasty Bros");
        assert_eq!(league.total_rosters, 12);
    }

    #[tokio::test]
    async fn null_league_is_not_found() {
        let (base, _) = mock_server(vec![http_response("200 OK", "null")]).await;
        let err = client(&base, 0).league().await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let (base, seen) = mock_server(vec![
            http_response("503 Service Unavailable", ""),
            http_response("429 Too Many Requests", ""),
            http_response("200 OK", r#"{"week":7,"season":"2025"}"#),
        ])
        .await;
        let week = client(&base, 3).current_week().await.unwrap();
        assert_eq!(week, 7);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (base, seen) = mock_server(vec![
            http_response("500 Internal Server Error", ""),
            http_response("500 Internal Server Error", ""),
        ])
        .await;
        let err = client(&base, 1).current_week().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_errors_fail_immediately() {
        let (base, seen) = mock_server(vec![http_response("404 Not Found", "")]).await;
        let err = client(&base, 3).teams().await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn preseason_week_is_clamped() {
        let (base, _) = mock_server(vec![http_response("200 OK", r#"{"week":0}"#)]).await;
        assert_eq!(client(&base, 0).current_week().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn picks_come_from_latest_draft() {
        let drafts = r#"[{"draft_id":"old","created":100},{"draft_id":"new","created":200}]"#;
        let picks = r#"[{"player_id":"9","round":1,"pick_no":1,"roster_id":2,"metadata":{"position":"RB"}}]"#;
        let (base, _) = mock_server(vec![
            http_response("200 OK", drafts),
            http_response("200 OK", picks),
        ])
        .await;
        let picks = client(&base, 0).draft_picks().await.unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].position(), Some(Position::RunningBack));
    }

    #[tokio::test]
    async fn no_drafts_means_no_picks() {
        let (base, seen) = mock_server(vec![http_response("200 OK", "[]")]).await;
        assert!(client(&base, 0).draft_picks().await.unwrap().is_empty());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}

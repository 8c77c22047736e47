use crate::Roster;
use crate::decode::{DecodeError, Decoded, decode};
use crate::index::{RosterIndex, build_index};
use log::{debug, info, warn};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Where the roster CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    Path(PathBuf),
    Url(String),
}

impl RosterSource {
    /// `http://` and `https://` strings are URLs, anything else a file path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            RosterSource::Url(raw.to_string())
        } else {
            RosterSource::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for RosterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterSource::Path(path) => write!(f, "{}", path.display()),
            RosterSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub source: RosterSource,
    /// Reject a decode whose distinct team count differs from this.
    pub expected_team_count: Option<usize>,
    /// Fetch-and-decode attempts before giving up. Clamped to at least one.
    pub max_attempts: u32,
}

impl LoadOptions {
    pub fn new(source: RosterSource) -> Self {
        Self {
            source,
            expected_team_count: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
    #[error("{url} responded with HTTP {status}")]
    Http { url: String, status: u16 },
    #[error("roster CSV could not be decoded ({} error(s), first: {})", .0.len(), first_error(.0))]
    Decode(Vec<DecodeError>),
    #[error("roster failed validation: {0}")]
    Validation(String),
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: Box<LoadError> },
}

fn first_error(errors: &[DecodeError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}

/// A decoded, indexed and validated roster, ready for filtering.
#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub source: RosterSource,
    pub roster: Roster,
    pub index: RosterIndex,
    pub attempts: u32,
}

/// Roster loader backed by the local filesystem or plain HTTP(S).
#[derive(Debug, Clone)]
pub struct RosterApi {
    client: Client,
    timeout: Duration,
}

impl Default for RosterApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("rostertui/0.1 (terminal roster viewer)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl RosterApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch, decode, index and validate the roster.
    ///
    /// Fetch failures return immediately. A decode that fails or does not pass
    /// validation is retried from a fresh fetch, up to `max_attempts` times,
    /// after which the last rejection is wrapped in [`LoadError::Exhausted`].
    pub async fn load(&self, options: &LoadOptions) -> LoadResult<LoadedRoster> {
        let max_attempts = options.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let raw = self.fetch_raw(&options.source).await?;
            debug!("fetched {} bytes from {} (attempt {attempt})", raw.len(), options.source);

            match validate(decode(&raw), options.expected_team_count) {
                Ok((roster, index)) => {
                    info!(
                        "loaded {} players and {} teams from {}",
                        roster.len(),
                        index.team_count(),
                        options.source
                    );
                    return Ok(LoadedRoster {
                        source: options.source.clone(),
                        roster,
                        index,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    warn!("attempt {attempt}/{max_attempts} rejected: {e}");
                    last_error = Some(e);
                }
            }
        }

        Err(LoadError::Exhausted {
            attempts: max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| LoadError::Validation("no attempt made".into())),
            ),
        })
    }

    /// Raw CSV bytes from a file path or URL.
    pub async fn fetch_raw(&self, source: &RosterSource) -> LoadResult<Vec<u8>> {
        match source {
            RosterSource::Path(path) => std::fs::read(path).map_err(|e| LoadError::Io {
                path: path.clone(),
                source: e,
            }),
            RosterSource::Url(url) => self.get(url).await,
        }
    }

    async fn get(&self, url: &str) -> LoadResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LoadError::Network { url: url.to_owned(), source: e })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LoadError::Network { url: url.to_owned(), source: e })?;
        Ok(body.to_vec())
    }
}

/// Check a decode against the roster's expected shape and build its index.
pub fn validate(
    decoded: Decoded,
    expected_team_count: Option<usize>,
) -> LoadResult<(Roster, RosterIndex)> {
    if !decoded.errors.is_empty() {
        return Err(LoadError::Decode(decoded.errors));
    }

    let index = build_index(&decoded.roster.players);
    if let Some(expected) = expected_team_count
        && index.team_count() != expected
    {
        return Err(LoadError::Validation(format!(
            "expected {expected} teams, found {}",
            index.team_count()
        )));
    }

    Ok((decoded.roster, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
FIRST_NAME,LAST_NAME,TEAMS
Wayne,Gretzky,\"Edmonton Oilers, Los Angeles Kings\"
Bobby,Orr,\"Boston Bruins, Chicago Blackhawks\"
";

    fn sample_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("data")
            .join("players.csv")
    }

    #[test]
    fn source_parse_distinguishes_urls_from_paths() {
        assert_eq!(
            RosterSource::parse("https://example.com/players.csv"),
            RosterSource::Url("https://example.com/players.csv".into())
        );
        assert_eq!(
            RosterSource::parse(" data/players.csv "),
            RosterSource::Path(PathBuf::from("data/players.csv"))
        );
    }

    #[test]
    fn validate_rejects_decode_errors() {
        let err = validate(decode(b"A\xff\n"), None).unwrap_err();
        assert!(matches!(err, LoadError::Decode(ref errors) if !errors.is_empty()));
    }

    #[test]
    fn validate_checks_expected_team_count() {
        let (roster, index) = validate(decode(CSV.as_bytes()), Some(4)).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(index.team_count(), 4);

        let err = validate(decode(CSV.as_bytes()), Some(58)).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn validate_accepts_header_only_roster() {
        let (roster, index) = validate(decode(b"FIRST_NAME,LAST_NAME,TEAMS\n"), None).unwrap();
        assert!(roster.is_empty());
        assert_eq!(index.team_count(), 0);
    }

    #[tokio::test]
    async fn loads_bundled_sample_from_disk() {
        let api = RosterApi::new();
        let loaded = api
            .load(&LoadOptions::new(RosterSource::Path(sample_path())))
            .await
            .expect("sample roster should load");
        assert_eq!(loaded.attempts, 1);
        assert!(!loaded.roster.is_empty());
        assert_eq!(loaded.index.name_pairs.len(), loaded.roster.len());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let api = RosterApi::new();
        let err = api
            .load(&LoadOptions::new(RosterSource::Path("/nonexistent/players.csv".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn loads_roster_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/players.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body(CSV)
            .create_async()
            .await;

        let api = RosterApi::new();
        let options = LoadOptions::new(RosterSource::Url(format!("{}/players.csv", server.url())));
        let loaded = api.load(&options).await.unwrap();
        assert_eq!(loaded.roster.len(), 2);
        assert_eq!(loaded.index.team_at(0), Some("Boston Bruins"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_returned_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/players.csv")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let api = RosterApi::new();
        let options = LoadOptions::new(RosterSource::Url(format!("{}/players.csv", server.url())));
        let err = api.load(&options).await.unwrap_err();
        assert!(matches!(err, LoadError::Http { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn validation_failures_retry_up_to_the_cap() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/players.csv")
            .with_status(200)
            .with_body(CSV)
            .expect(2)
            .create_async()
            .await;

        let api = RosterApi::new();
        let options = LoadOptions {
            source: RosterSource::Url(format!("{}/players.csv", server.url())),
            expected_team_count: Some(58),
            max_attempts: 2,
        };
        let err = api.load(&options).await.unwrap_err();
        match err {
            LoadError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, LoadError::Validation(_)));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        mock.assert_async().await;
    }
}

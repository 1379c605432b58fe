use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::FeedUrls;
use crate::error::FeedError;
use crate::http_client::{body_snippet, feed_client};
use crate::models::{BettingGame, GameReport, UmpireRecord};

/// Outcome of one feed read. `Unavailable` carries the reason and reads as an
/// empty collection everywhere downstream.
#[derive(Debug)]
pub enum FeedResult<T> {
    Loaded(Vec<T>),
    Unavailable(FeedError),
}

impl<T> FeedResult<T> {
    pub fn items(&self) -> &[T] {
        match self {
            FeedResult::Loaded(items) => items,
            FeedResult::Unavailable(_) => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            FeedResult::Loaded(items) => items,
            FeedResult::Unavailable(_) => Vec::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, FeedResult::Loaded(_))
    }

    pub fn error(&self) -> Option<&FeedError> {
        match self {
            FeedResult::Loaded(_) => None,
            FeedResult::Unavailable(err) => Some(err),
        }
    }

    fn from_parsed(feed: &str, parsed: Result<Vec<T>, FeedError>) -> Self {
        match parsed {
            Ok(items) => {
                info!(feed, count = items.len(), "feed loaded");
                FeedResult::Loaded(items)
            }
            Err(err) => {
                warn!(feed, error = %err, "feed unavailable, continuing without it");
                FeedResult::Unavailable(err)
            }
        }
    }
}

/// The three upstream sources the record builder reads from.
pub trait GameFeeds {
    fn mlb_reports(&self) -> FeedResult<GameReport>;
    fn umpires(&self) -> FeedResult<UmpireRecord>;
    fn betting_games(&self) -> FeedResult<BettingGame>;
}

/// Production feeds: one GET each, no retry.
#[derive(Debug, Clone)]
pub struct HttpFeeds {
    urls: FeedUrls,
}

impl HttpFeeds {
    pub fn new(urls: FeedUrls) -> Self {
        Self { urls }
    }
}

impl GameFeeds for HttpFeeds {
    fn mlb_reports(&self) -> FeedResult<GameReport> {
        let parsed = fetch_body(&self.urls.mlb).and_then(|body| parse_mlb_reports_json(&body));
        FeedResult::from_parsed("mlb", parsed)
    }

    fn umpires(&self) -> FeedResult<UmpireRecord> {
        let parsed = fetch_body(&self.urls.umpire).and_then(|body| parse_umpires_json(&body));
        FeedResult::from_parsed("umpire", parsed)
    }

    fn betting_games(&self) -> FeedResult<BettingGame> {
        let parsed =
            fetch_body(&self.urls.betting).and_then(|body| parse_betting_games_json(&body));
        FeedResult::from_parsed("betting", parsed)
    }
}

fn fetch_body(url: &str) -> Result<String, FeedError> {
    let client = feed_client().map_err(|err| FeedError::Client(format!("{err:#}")))?;
    let resp = client.get(url).send()?;
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(FeedError::Status {
            status: status.as_u16(),
            snippet: body_snippet(&body),
        });
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct MlbEnvelope {
    #[serde(default)]
    reports: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct BettingEnvelope {
    #[serde(default)]
    games: Vec<BettingGame>,
}

/// Parses `{"reports": [...]}`. Reports that do not decode are dropped one by
/// one so a single bad game cannot empty the whole slate.
pub fn parse_mlb_reports_json(raw: &str) -> Result<Vec<GameReport>, FeedError> {
    let Some(trimmed) = non_null(raw) else {
        return Ok(Vec::new());
    };
    let envelope: MlbEnvelope = serde_json::from_str(trimmed)?;

    let mut reports = Vec::with_capacity(envelope.reports.len());
    for (idx, value) in envelope.reports.into_iter().enumerate() {
        let matchup = value
            .get("matchup")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        match serde_json::from_value::<GameReport>(value) {
            Ok(report) => reports.push(report),
            Err(err) => warn!(idx, %matchup, error = %err, "dropping undecodable game report"),
        }
    }
    Ok(reports)
}

/// Parses the umpire feed's bare list.
pub fn parse_umpires_json(raw: &str) -> Result<Vec<UmpireRecord>, FeedError> {
    let Some(trimmed) = non_null(raw) else {
        return Ok(Vec::new());
    };
    Ok(serde_json::from_str(trimmed)?)
}

/// Parses `{"games": [...]}`.
pub fn parse_betting_games_json(raw: &str) -> Result<Vec<BettingGame>, FeedError> {
    let Some(trimmed) = non_null(raw) else {
        return Ok(Vec::new());
    };
    let envelope: BettingEnvelope = serde_json::from_str(trimmed)?;
    Ok(envelope.games)
}

fn non_null(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_reads_as_empty() {
        let result: FeedResult<UmpireRecord> = FeedResult::Unavailable(FeedError::Status {
            status: 503,
            snippet: "down".to_string(),
        });
        assert!(!result.is_available());
        assert!(result.items().is_empty());
        assert!(result.error().is_some());
        assert!(result.into_items().is_empty());
    }

    #[test]
    fn blank_bodies_parse_to_empty() {
        assert!(parse_mlb_reports_json("").unwrap().is_empty());
        assert!(parse_umpires_json(" null ").unwrap().is_empty());
        assert!(parse_betting_games_json("\n").unwrap().is_empty());
    }

    #[test]
    fn missing_list_key_is_empty() {
        assert!(parse_mlb_reports_json("{}").unwrap().is_empty());
        assert!(parse_betting_games_json(r#"{"other": 1}"#).unwrap().is_empty());
    }

    #[test]
    fn umpire_feed_must_be_a_list() {
        assert!(matches!(
            parse_umpires_json(r#"{"umpires": []}"#),
            Err(FeedError::Parse(_))
        ));
    }
}

use thiserror::Error;

/// Why a feed came back empty.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http client unavailable: {0}")]
    Client(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("http {status}: {snippet}")]
    Status { status: u16, snippet: String },
    #[error("invalid json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A game report that cannot become a `GameRecord`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("matchup {0:?} is not in AWAY @ HOME form")]
    MalformedMatchup(String),
    #[error("{side} pitcher missing for {matchup}")]
    MissingPitcher {
        side: &'static str,
        matchup: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

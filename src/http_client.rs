use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const FEED_TIMEOUT_SECS: u64 = 30;
const LONG_TIMEOUT_SECS: u64 = 120;
const USER_AGENT: &str = concat!("mlb-preview/", env!("CARGO_PKG_VERSION"));

static FEED_CLIENT: OnceCell<Client> = OnceCell::new();
static LONG_CLIENT: OnceCell<Client> = OnceCell::new();

/// Client for the read-only data feeds and logo downloads.
pub fn feed_client() -> Result<&'static Client> {
    FEED_CLIENT.get_or_try_init(|| build_client(FEED_TIMEOUT_SECS))
}

/// Client for text generation and CMS uploads, which routinely run past the feed timeout.
pub fn long_client() -> Result<&'static Client> {
    LONG_CLIENT.get_or_try_init(|| build_client(LONG_TIMEOUT_SECS))
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build http client")
}

/// First couple hundred characters of a response body, flattened onto one line.
pub fn body_snippet(body: &str) -> String {
    body.trim()
        .replace('\n', " ")
        .replace('\r', " ")
        .chars()
        .take(220)
        .collect::<String>()
}

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_MLB_FEED_URL: &str = "https://mlb-matchup-api-savant.onrender.com/latest";
pub const DEFAULT_UMPIRE_FEED_URL: &str = "https://umpire-json-api.onrender.com";
pub const DEFAULT_BETTING_FEED_URL: &str =
    "https://draftkings-splits-scraper-webservice.onrender.com/mlb";

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_PUBLISH_DOMAINS: &str = "thebettinginsider.com";
const DEFAULT_POST_URL: &str = "https://www.thebettinginsider.com/betting/about";
const DEFAULT_OUT_DIR: &str = "site";
const DEFAULT_MAX_LINKS: usize = 5;
const DEFAULT_POST_DELAY_SECS: u64 = 3;

/// Loads `.env.local` then `.env`; missing files are fine.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrls {
    pub mlb: String,
    pub umpire: String,
    pub betting: String,
}

impl Default for FeedUrls {
    fn default() -> Self {
        Self {
            mlb: DEFAULT_MLB_FEED_URL.to_string(),
            umpire: DEFAULT_UMPIRE_FEED_URL.to_string(),
            betting: DEFAULT_BETTING_FEED_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct WebflowConfig {
    pub api_token: String,
    pub site_id: String,
    pub collection_id: String,
    pub publish_domains: Vec<String>,
    pub post_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub feeds: FeedUrls,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub webflow_api_token: Option<String>,
    pub webflow_site_id: Option<String>,
    pub webflow_collection_id: Option<String>,
    pub webflow_publish_domains: Vec<String>,
    pub webflow_post_url: String,
    pub out_dir: PathBuf,
    pub max_links: usize,
    pub post_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let max_links = match get("PREVIEW_MAX_LINKS") {
            Some(raw) => raw.parse::<usize>().map_err(|_| ConfigError::Invalid {
                key: "PREVIEW_MAX_LINKS",
                value: raw,
            })?,
            None => DEFAULT_MAX_LINKS,
        };
        let post_delay_secs = match get("PREVIEW_POST_DELAY_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "PREVIEW_POST_DELAY_SECS",
                value: raw,
            })?,
            None => DEFAULT_POST_DELAY_SECS,
        };

        let webflow_publish_domains = get("WEBFLOW_PUBLISH_DOMAINS")
            .unwrap_or_else(|| DEFAULT_PUBLISH_DOMAINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            feeds: FeedUrls {
                mlb: get("MLB_FEED_URL").unwrap_or_else(|| DEFAULT_MLB_FEED_URL.to_string()),
                umpire: get("UMPIRE_FEED_URL")
                    .unwrap_or_else(|| DEFAULT_UMPIRE_FEED_URL.to_string()),
                betting: get("BETTING_FEED_URL")
                    .unwrap_or_else(|| DEFAULT_BETTING_FEED_URL.to_string()),
            },
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            webflow_api_token: get("WEBFLOW_API_TOKEN"),
            webflow_site_id: get("WEBFLOW_SITE_ID"),
            webflow_collection_id: get("WEBFLOW_COLLECTION_ID"),
            webflow_publish_domains,
            webflow_post_url: get("WEBFLOW_POST_URL")
                .unwrap_or_else(|| DEFAULT_POST_URL.to_string()),
            out_dir: PathBuf::from(
                get("PREVIEW_OUT_DIR").unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()),
            ),
            max_links,
            post_delay: Duration::from_secs(post_delay_secs),
        })
    }

    pub fn require_openai(&self) -> Result<OpenAiConfig, ConfigError> {
        let api_key = self
            .openai_api_key
            .clone()
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        Ok(OpenAiConfig {
            api_key,
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
        })
    }

    pub fn require_webflow(&self) -> Result<WebflowConfig, ConfigError> {
        let api_token = self
            .webflow_api_token
            .clone()
            .ok_or(ConfigError::Missing("WEBFLOW_API_TOKEN"))?;
        let site_id = self
            .webflow_site_id
            .clone()
            .ok_or(ConfigError::Missing("WEBFLOW_SITE_ID"))?;
        let collection_id = self
            .webflow_collection_id
            .clone()
            .ok_or(ConfigError::Missing("WEBFLOW_COLLECTION_ID"))?;
        Ok(WebflowConfig {
            api_token,
            site_id,
            collection_id,
            publish_domains: self.webflow_publish_domains.clone(),
            post_url: self.webflow_post_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.feeds, FeedUrls::default());
        assert_eq!(cfg.openai_model, "gpt-4o");
        assert_eq!(cfg.max_links, 5);
        assert_eq!(cfg.post_delay, Duration::from_secs(3));
        assert_eq!(cfg.webflow_publish_domains, vec!["thebettinginsider.com"]);
        assert_eq!(cfg.out_dir, PathBuf::from("site"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config_from(&[("OPENAI_API_KEY", "   "), ("MLB_FEED_URL", "")]).unwrap();
        assert_eq!(cfg.openai_api_key, None);
        assert_eq!(cfg.feeds.mlb, DEFAULT_MLB_FEED_URL);
        assert_eq!(
            cfg.require_openai().unwrap_err(),
            ConfigError::Missing("OPENAI_API_KEY")
        );
    }

    #[test]
    fn webflow_reports_first_missing_variable() {
        let cfg = config_from(&[("WEBFLOW_API_TOKEN", "tok")]).unwrap();
        assert_eq!(
            cfg.require_webflow().unwrap_err(),
            ConfigError::Missing("WEBFLOW_SITE_ID")
        );
    }

    #[test]
    fn domains_split_on_commas() {
        let cfg = config_from(&[("WEBFLOW_PUBLISH_DOMAINS", "a.com, b.com,,")]).unwrap();
        assert_eq!(cfg.webflow_publish_domains, vec!["a.com", "b.com"]);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = config_from(&[("PREVIEW_MAX_LINKS", "many")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PREVIEW_MAX_LINKS",
                value: "many".to_string()
            }
        );
    }
}

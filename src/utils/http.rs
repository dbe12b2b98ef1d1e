// src/utils/http.rs

//! HTTP client utilities.

use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/pdf;q=0.9,*/*;q=0.8";

/// Pick one of the configured user agents at random.
pub fn pick_user_agent(config: &CrawlerConfig) -> Result<&str> {
    config
        .user_agents
        .iter()
        .map(String::as_str)
        .filter(|ua| !ua.trim().is_empty())
        .collect::<Vec<_>>()
        .choose(&mut rand::thread_rng())
        .copied()
        .ok_or_else(|| AppError::config("crawler.user_agents is empty"))
}

/// Create a configured asynchronous HTTP client with a cookie store.
///
/// Per-request timeouts are set by the caller; the client itself has none so
/// that large downloads are not cut short.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    let language = HeaderValue::from_str(&config.accept_language)
        .map_err(|e| AppError::config(format!("crawler.accept_language: {e}")))?;
    headers.insert(ACCEPT_LANGUAGE, language);

    let client = reqwest::Client::builder()
        .user_agent(pick_user_agent(config)?)
        .default_headers(headers)
        .cookie_store(true)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_user_agent_skips_blank_entries() {
        let config = CrawlerConfig {
            user_agents: vec!["  ".to_string(), "agent/1.0".to_string()],
            ..CrawlerConfig::default()
        };
        assert_eq!(pick_user_agent(&config).unwrap(), "agent/1.0");
    }

    #[test]
    fn test_pick_user_agent_requires_one() {
        let config = CrawlerConfig {
            user_agents: Vec::new(),
            ..CrawlerConfig::default()
        };
        assert!(pick_user_agent(&config).is_err());
    }

    #[test]
    fn test_create_async_client() {
        assert!(create_async_client(&CrawlerConfig::default()).is_ok());
    }
}

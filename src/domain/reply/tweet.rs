//! Tweet link validation and normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::domain::foundation::ValidationError;

const TWEET_HOSTS: [&str; 4] = ["twitter.com", "www.twitter.com", "x.com", "www.x.com"];

static STATUS_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/[^/]+/status/\d+$").unwrap());

/// A validated, normalized tweet link with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetLink {
    pub url: String,
    pub tweet_id: String,
}

impl TweetLink {
    /// Validates and normalizes raw user input.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if !is_valid_tweet_reference(raw) {
            return Err(ValidationError::invalid_format(
                "tweet_link",
                "expected https://x.com/<user>/status/<id>",
            ));
        }
        let url = normalize_tweet_link(raw)?;
        let tweet_id = extract_tweet_id(&url).to_string();
        Ok(Self { url, tweet_id })
    }
}

/// True when `raw` (trimmed) is an http(s) link to a single tweet.
pub fn is_valid_tweet_reference(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw.trim()) else {
        return false;
    };
    if url.scheme() != "https" && url.scheme() != "http" {
        return false;
    }
    match url.host_str() {
        Some(host) if TWEET_HOSTS.contains(&host) => STATUS_PATH.is_match(url.path()),
        _ => false,
    }
}

/// Drops the query string and fragment from a tweet link.
pub fn normalize_tweet_link(raw: &str) -> Result<String, ValidationError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ValidationError::invalid_format("tweet_link", e.to_string()))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Last `/`-separated segment of a normalized link.
pub fn extract_tweet_id(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

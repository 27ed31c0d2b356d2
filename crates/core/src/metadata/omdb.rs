//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key. A lookup is a single
//! `GET <base_url>?apikey=<key>&t=<title>` returning one movie.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::MovieMetadata;
use super::{MetadataError, MetadataLookup};

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required).
    pub api_key: String,
    /// Base URL (default: http://www.omdbapi.com/).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Retries after a transient failure (default: 2).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds, doubled on each retry (default: 500).
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    500
}

impl OmdbConfig {
    /// Config with the given key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.trim().is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Fetch a movie by title, retrying transient failures with backoff.
    pub async fn get_movie(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        let mut attempt = 0;
        let mut delay = self.retry_delay;

        loop {
            match self.fetch(title).await {
                Ok(movie) => return Ok(movie),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "OMDb lookup for '{}' failed ({}), retry {}/{} in {:?}",
                        title, e, attempt, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        debug!("OMDb lookup: title='{}'", title);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if status == 429 {
            return Err(MetadataError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: OmdbResponse = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse OMDb response: {}", e))
        })?;

        body.into_metadata(title)
    }
}

#[async_trait]
impl MetadataLookup for OmdbClient {
    async fn lookup(&self, title_fragment: &str) -> Result<MovieMetadata, MetadataError> {
        self.get_movie(title_fragment).await
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// OMDb uses this literal for missing values.
const NOT_AVAILABLE: &str = "N/A";

impl OmdbResponse {
    fn into_metadata(self, query: &str) -> Result<MovieMetadata, MetadataError> {
        let title = match self.title {
            Some(title) => title,
            None => {
                let reason = self.error.unwrap_or_else(|| "no title in response".to_string());
                return Err(MetadataError::NotFound(format!("{} ({})", query, reason)));
            }
        };

        let rating = self
            .imdb_rating
            .as_deref()
            .map(str::trim)
            .filter(|r| *r != NOT_AVAILABLE)
            .and_then(|r| r.parse::<f64>().ok())
            .ok_or_else(|| {
                MetadataError::ParseError(format!(
                    "'{}' has no usable rating: {:?}",
                    title, self.imdb_rating
                ))
            })?;

        let year = self.year.as_deref().and_then(leading_year);

        let poster = self
            .poster
            .filter(|p| p.trim() != NOT_AVAILABLE)
            .unwrap_or_default();

        Ok(MovieMetadata {
            title,
            rating,
            year,
            poster,
        })
    }
}

/// Parse the first four digits of an OMDb year such as `2010` or `2008–2013`.
fn leading_year(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

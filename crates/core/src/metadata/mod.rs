//! Remote movie metadata lookup.
//!
//! The document store uses a [`MetadataLookup`] to turn a title fragment
//! typed by the user into a full record. [`OmdbClient`] talks to the OMDb
//! API; tests use `testing::MockMetadataLookup`.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying a metadata provider.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// No movie matched the query.
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl MetadataError {
    /// Whether repeating the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimitExceeded => true,
            Self::ApiError { status, .. } => *status >= 500,
            Self::NotFound(_) | Self::ParseError(_) | Self::NotConfigured(_) => false,
        }
    }
}

/// A source of movie metadata keyed by (partial) title.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Look up the best match for `title_fragment`.
    async fn lookup(&self, title_fragment: &str) -> Result<MovieMetadata, MetadataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(MetadataError::RateLimitExceeded.is_retryable());
        assert!(MetadataError::ApiError {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());

        assert!(!MetadataError::ApiError {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
        assert!(!MetadataError::NotFound("Nope".to_string()).is_retryable());
        assert!(!MetadataError::ParseError("bad".to_string()).is_retryable());
        assert!(!MetadataError::NotConfigured("no key".to_string()).is_retryable());
    }
}

//! Types for the movie catalog.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::MetadataError;

/// Lowest rating accepted from user input or the metadata API.
pub const MIN_RATING: f64 = 0.0;

/// Highest rating accepted from user input or the metadata API.
pub const MAX_RATING: f64 = 10.0;

/// A single movie record. The title is the key in [`Catalog`].
///
/// Field names match the document file layout (`rating`, `year`, `Poster`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Rating, usually between 0 and 10.
    pub rating: f64,
    /// Release year, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Poster URL. Empty when there is none.
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

impl Movie {
    pub fn new(rating: f64, year: Option<u32>, poster: impl Into<String>) -> Self {
        Self {
            rating,
            year,
            poster: poster.into(),
        }
    }

    /// Poster URL, or `None` when the record has no poster.
    pub fn poster_url(&self) -> Option<&str> {
        let poster = self.poster.trim();
        if poster.is_empty() {
            None
        } else {
            Some(poster)
        }
    }
}

/// All movies currently loaded, keyed by title.
///
/// Iteration follows title order, so file output and tie-breaks are stable.
pub type Catalog = BTreeMap<String, Movie>;

/// Parse a rating typed by the user.
///
/// Accepts decimals in `MIN_RATING..=MAX_RATING`.
pub fn parse_rating(input: &str) -> Result<f64, StoreError> {
    let trimmed = input.trim();
    let rating: f64 = trimmed.parse().map_err(|_| StoreError::InvalidField {
        field: "rating",
        value: trimmed.to_string(),
        reason: "expected a decimal number".to_string(),
    })?;

    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(StoreError::InvalidField {
            field: "rating",
            value: trimmed.to_string(),
            reason: format!("must be between {} and {}", MIN_RATING, MAX_RATING),
        });
    }

    Ok(rating)
}

/// Parse a year typed by the user. An empty string means "unknown".
pub fn parse_year(input: &str) -> Result<Option<u32>, StoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| StoreError::InvalidField {
            field: "year",
            value: trimmed.to_string(),
            reason: "expected a whole number".to_string(),
        })
}

/// Errors for catalog store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No movie with this title.
    #[error("Movie '{0}' not found in the list")]
    NotFound(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row of the delimited-text file could not be parsed.
    #[error("Failed to parse {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// The document file is not valid.
    #[error("Invalid document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the delimited-text format failed.
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// A user-supplied value was rejected.
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The metadata lookup failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] MetadataError),

    /// This store has no metadata lookup configured.
    #[error("Metadata lookup is not available for the {0} store")]
    LookupUnavailable(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only means the requested movie does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

//! Types for metadata lookup results.

use serde::{Deserialize, Serialize};

use crate::catalog::Movie;

/// Metadata for one movie as returned by a lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    /// Canonical title.
    pub title: String,
    /// Rating on a 0-10 scale.
    pub rating: f64,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Poster URL, empty if unavailable.
    #[serde(default)]
    pub poster: String,
}

impl MovieMetadata {
    /// Split into the catalog key and record.
    pub fn into_entry(self) -> (String, Movie) {
        (self.title, Movie::new(self.rating, self.year, self.poster))
    }
}

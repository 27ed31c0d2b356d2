//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinelog_core::testing::{fixtures, MockMetadataLookup};
//!
//! let lookup = Arc::new(MockMetadataLookup::new());
//! lookup.add_movie(fixtures::movie_metadata("Heat", 8.3, 1995)).await;
//!
//! let store = JsonStore::with_lookup("data.json", lookup.clone())?;
//! ```

mod mock_metadata_lookup;

pub use mock_metadata_lookup::MockMetadataLookup;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Catalog, Movie};
    use crate::metadata::MovieMetadata;

    /// Create lookup metadata with a placeholder poster URL derived from the title.
    pub fn movie_metadata(title: &str, rating: f64, year: u32) -> MovieMetadata {
        MovieMetadata {
            title: title.to_string(),
            rating,
            year: Some(year),
            poster: format!(
                "https://posters.example.com/{}.jpg",
                title.to_lowercase().replace(' ', "-")
            ),
        }
    }

    /// Create a movie record without a poster.
    pub fn movie(rating: f64, year: u32) -> Movie {
        Movie::new(rating, Some(year), "")
    }

    /// Build a catalog from `(title, rating)` pairs, all released in 2000.
    pub fn catalog_with_ratings(entries: &[(&str, f64)]) -> Catalog {
        entries
            .iter()
            .map(|(title, rating)| (title.to_string(), movie(*rating, 2000)))
            .collect()
    }
}

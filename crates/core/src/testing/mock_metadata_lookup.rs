//! Mock metadata lookup for testing.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{MetadataError, MetadataLookup, MovieMetadata};

/// Mock implementation of the MetadataLookup trait.
///
/// Provides controllable behavior for testing:
/// - Return configured movies matched by case-insensitive title substring
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use cinelog_core::testing::{fixtures, MockMetadataLookup};
///
/// let lookup = MockMetadataLookup::new();
/// lookup.add_movie(fixtures::movie_metadata("Alien", 8.5, 1979)).await;
///
/// let movie = lookup.lookup("ali").await?;
/// assert_eq!(movie.title, "Alien");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockMetadataLookup {
    /// Known movies by title.
    movies: Arc<RwLock<BTreeMap<String, MovieMetadata>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl MockMetadataLookup {
    /// Create a new mock with no movies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a movie that lookups can match.
    pub async fn add_movie(&self, movie: MovieMetadata) {
        self.movies.write().await.insert(movie.title.clone(), movie);
    }

    /// Clear all movies.
    pub async fn clear_movies(&self) {
        self.movies.write().await.clear();
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<MetadataError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MetadataLookup for MockMetadataLookup {
    async fn lookup(&self, title_fragment: &str) -> Result<MovieMetadata, MetadataError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.queries.write().await.push(title_fragment.to_string());

        let needle = title_fragment.to_lowercase();
        self.movies
            .read()
            .await
            .values()
            .find(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .ok_or_else(|| MetadataError::NotFound(title_fragment.to_string()))
    }
}

//! Movie catalog storage.
//!
//! A catalog is loaded in full from its backing file when a store is
//! opened. Every mutation rewrites the whole file, so a store assumes it is
//! the only writer.

mod csv_store;
mod json_store;
mod persist;
mod types;

pub use csv_store::CsvStore;
pub use json_store::JsonStore;
pub use types::*;

use std::path::Path;

use async_trait::async_trait;

/// Trait for catalog persistence backends.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Short backend name for logs and messages.
    fn name(&self) -> &str;

    /// Path of the backing file.
    fn path(&self) -> &Path;

    /// Snapshot of every movie in the catalog.
    fn list_movies(&self) -> Catalog;

    /// Insert a movie, replacing any record with the same title.
    ///
    /// Persists immediately. Returns the replaced record, if there was one.
    fn add_movie(
        &self,
        title: &str,
        year: Option<u32>,
        rating: f64,
        poster: &str,
    ) -> Result<Option<Movie>, StoreError>;

    /// Remove a movie and persist. Returns the removed record.
    fn delete_movie(&self, title: &str) -> Result<Movie, StoreError>;

    /// Change only the rating of an existing movie and persist.
    fn update_movie(&self, title: &str, rating: f64) -> Result<(), StoreError>;

    /// Whether [`MovieStore::add_from_lookup`] can be used.
    fn supports_lookup(&self) -> bool {
        false
    }

    /// Fetch a movie's metadata remotely and add it.
    ///
    /// Like [`MovieStore::add_movie`], an existing record with the same title
    /// is replaced and handed back in [`LookupAdded::replaced`].
    async fn add_from_lookup(&self, _fragment: &str) -> Result<LookupAdded, StoreError> {
        Err(StoreError::LookupUnavailable(self.name().to_string()))
    }
}

/// A movie added through [`MovieStore::add_from_lookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct LookupAdded {
    /// Canonical title the record is stored under.
    pub title: String,
    pub movie: Movie,
    /// The record previously stored under `title`, if any.
    pub replaced: Option<Movie>,
}

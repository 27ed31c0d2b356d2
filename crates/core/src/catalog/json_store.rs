//! Structured-document (JSON) catalog backend.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use super::persist::{Codec, FileCatalog};
use super::{Catalog, LookupAdded, Movie, MovieStore, StoreError};
use crate::metadata::MetadataLookup;

pub(crate) struct JsonCodec;

impl Codec for JsonCodec {
    fn decode(path: &Path, bytes: &[u8]) -> Result<Catalog, StoreError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Catalog::new());
        }

        serde_json::from_slice(bytes).map_err(|e| StoreError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn encode(path: &Path, catalog: &Catalog) -> Result<Vec<u8>, StoreError> {
        let mut bytes = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        catalog
            .serialize(&mut serializer)
            .map_err(|e| StoreError::Json {
                path: path.to_path_buf(),
                source: e,
            })?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

/// Catalog stored as one JSON object mapping titles to records.
///
/// When built with [`JsonStore::with_lookup`], movies can also be added by
/// fetching their metadata remotely.
pub struct JsonStore {
    inner: FileCatalog<JsonCodec>,
    lookup: Option<Arc<dyn MetadataLookup>>,
}

impl JsonStore {
    /// Open the store, loading `path` if it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            inner: FileCatalog::open(path.as_ref())?,
            lookup: None,
        })
    }

    /// Open the store with a metadata lookup for [`MovieStore::add_from_lookup`].
    pub fn with_lookup(
        path: impl AsRef<Path>,
        lookup: Arc<dyn MetadataLookup>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            inner: FileCatalog::open(path.as_ref())?,
            lookup: Some(lookup),
        })
    }
}

#[async_trait]
impl MovieStore for JsonStore {
    fn name(&self) -> &str {
        "json"
    }

    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn list_movies(&self) -> Catalog {
        self.inner.snapshot()
    }

    fn add_movie(
        &self,
        title: &str,
        year: Option<u32>,
        rating: f64,
        poster: &str,
    ) -> Result<Option<Movie>, StoreError> {
        let previous = self.inner.insert(title, Movie::new(rating, year, poster))?;
        info!("Added '{}' to {}", title, self.path().display());
        Ok(previous)
    }

    fn delete_movie(&self, title: &str) -> Result<Movie, StoreError> {
        let removed = self.inner.remove(title)?;
        info!("Deleted '{}' from {}", title, self.path().display());
        Ok(removed)
    }

    fn update_movie(&self, title: &str, rating: f64) -> Result<(), StoreError> {
        self.inner.set_rating(title, rating)?;
        info!("Updated rating of '{}' to {}", title, rating);
        Ok(())
    }

    fn supports_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    async fn add_from_lookup(&self, fragment: &str) -> Result<LookupAdded, StoreError> {
        let lookup = self
            .lookup
            .as_ref()
            .ok_or_else(|| StoreError::LookupUnavailable(self.name().to_string()))?;

        let metadata = lookup.lookup(fragment.trim()).await.map_err(|e| {
            warn!("Lookup for '{}' failed: {}", fragment, e);
            StoreError::from(e)
        })?;

        let (title, movie) = metadata.into_entry();
        let replaced = self.inner.insert(&title, movie.clone())?;
        info!(
            "Added '{}' from lookup '{}' to {}",
            title,
            fragment,
            self.path().display()
        );

        Ok(LookupAdded {
            title,
            movie,
            replaced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataError;
    use crate::testing::{fixtures, MockMetadataLookup};
    use std::fs;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonStore {
        JsonStore::open(dir.path().join("data.json")).unwrap()
    }

    #[test]
    fn test_missing_or_blank_file_is_empty_catalog() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).list_movies().is_empty());

        fs::write(dir.path().join("data.json"), "  \n").unwrap();
        assert!(store_in(&dir).list_movies().is_empty());
    }

    #[test]
    fn test_document_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store
            .add_movie("Titanic", Some(1997), 7.9, "https://example.com/t.jpg")
            .unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("\n    \"Titanic\": {"));

        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["Titanic"]["rating"], 7.9);
        assert_eq!(value["Titanic"]["year"], 1997);
        assert_eq!(value["Titanic"]["Poster"], "https://example.com/t.jpg");
    }

    #[test]
    fn test_load_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{
                "Up": {"rating": 8.3, "year": 2009, "Poster": "up.jpg"},
                "Heat": {"rating": 8.3, "year": 1995}
            }"#,
        )
        .unwrap();

        let movies = JsonStore::open(&path).unwrap().list_movies();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies["Up"], Movie::new(8.3, Some(2009), "up.jpg"));
        assert_eq!(movies["Heat"].poster, "");
    }

    #[test]
    fn test_malformed_document_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"Up": {"rating": "high"}}"#).unwrap();

        assert!(matches!(
            JsonStore::open(&path),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn test_add_overwrites_and_returns_previous() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.add_movie("Up", Some(2009), 8.3, "").unwrap().is_none());
        let previous = store.add_movie("Up", Some(2009), 9.0, "").unwrap();

        assert_eq!(previous, Some(Movie::new(8.3, Some(2009), "")));
        assert_eq!(store.list_movies()["Up"].rating, 9.0);
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonStore::open(&path).unwrap();
        store.add_movie("Up", Some(2009), 8.3, "").unwrap();

        // Replace the file with a directory so the rename fails.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(store.add_movie("Heat", Some(1995), 8.3, "").is_err());
        assert!(store.update_movie("Up", 1.0).is_err());
        assert!(store.delete_movie("Up").is_err());

        let movies = store.list_movies();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies["Up"].rating, 8.3);
    }

    #[test]
    fn test_non_finite_rating_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add_movie("Up", Some(2009), 8.3, "").unwrap();

        for rating in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                store.add_movie("Heat", Some(1995), rating, ""),
                Err(StoreError::InvalidField { field: "rating", .. })
            ));
            assert!(matches!(
                store.update_movie("Up", rating),
                Err(StoreError::InvalidField { field: "rating", .. })
            ));
        }

        let reopened = store_in(&dir).list_movies();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened["Up"].rating, 8.3);
    }

    #[tokio::test]
    async fn test_add_from_lookup_stores_canonical_title() {
        let dir = TempDir::new().unwrap();
        let lookup = Arc::new(MockMetadataLookup::new());
        lookup
            .add_movie(fixtures::movie_metadata("The Matrix", 8.7, 1999))
            .await;

        let store =
            JsonStore::with_lookup(dir.path().join("data.json"), lookup.clone()).unwrap();
        assert!(store.supports_lookup());

        let added = store.add_from_lookup("matrix").await.unwrap();
        assert_eq!(added.title, "The Matrix");
        assert_eq!(added.movie.rating, 8.7);
        assert_eq!(added.movie.year, Some(1999));
        assert!(added.replaced.is_none());

        let reopened = store_in(&dir);
        assert_eq!(reopened.list_movies()["The Matrix"], added.movie);
        assert_eq!(lookup.recorded_queries().await, vec!["matrix".to_string()]);
    }

    #[tokio::test]
    async fn test_add_from_lookup_returns_replaced_record() {
        let dir = TempDir::new().unwrap();
        let lookup = Arc::new(MockMetadataLookup::new());
        lookup
            .add_movie(fixtures::movie_metadata("The Matrix", 8.7, 1999))
            .await;
        let store = JsonStore::with_lookup(dir.path().join("data.json"), lookup).unwrap();
        store
            .add_movie("The Matrix", Some(1999), 3.0, "mine.jpg")
            .unwrap();

        let added = store.add_from_lookup("matrix").await.unwrap();

        assert_eq!(
            added.replaced,
            Some(Movie::new(3.0, Some(1999), "mine.jpg"))
        );
        assert_eq!(store.list_movies()["The Matrix"].rating, 8.7);
    }

    #[tokio::test]
    async fn test_failed_lookup_leaves_catalog_unchanged() {
        let dir = TempDir::new().unwrap();
        let lookup = Arc::new(MockMetadataLookup::new());
        lookup
            .set_next_error(MetadataError::ApiError {
                status: 500,
                message: "boom".to_string(),
            })
            .await;

        let store = JsonStore::with_lookup(dir.path().join("data.json"), lookup).unwrap();

        let result = store.add_from_lookup("anything").await;
        assert!(matches!(result, Err(StoreError::Lookup(_))));
        assert!(store.list_movies().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_lookup_unavailable_without_client() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.supports_lookup());
        assert!(matches!(
            store.add_from_lookup("Up").await,
            Err(StoreError::LookupUnavailable(_))
        ));
    }
}

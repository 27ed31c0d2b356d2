//! Whole-file persistence shared by the catalog backends.

use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use super::{Catalog, Movie, StoreError};

/// Converts a catalog to and from the bytes of its backing file.
pub(crate) trait Codec: Send + Sync {
    fn decode(path: &Path, bytes: &[u8]) -> Result<Catalog, StoreError>;

    fn encode(path: &Path, catalog: &Catalog) -> Result<Vec<u8>, StoreError>;
}

/// An in-memory catalog mirrored to a single file.
///
/// Mutations that fail to persist are undone in memory.
pub(crate) struct FileCatalog<C: Codec> {
    path: PathBuf,
    movies: Mutex<Catalog>,
    _codec: PhantomData<C>,
}

impl<C: Codec> FileCatalog<C> {
    /// Load the catalog at `path`. A missing file yields an empty catalog.
    pub(crate) fn open(path: &Path) -> Result<Self, StoreError> {
        let movies = match fs::read(path) {
            Ok(bytes) => C::decode(path, &bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting with an empty catalog", path.display());
                Catalog::new()
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        debug!("Loaded {} movies from {}", movies.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            movies: Mutex::new(movies),
            _codec: PhantomData,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn snapshot(&self) -> Catalog {
        self.lock().clone()
    }

    pub(crate) fn insert(&self, title: &str, movie: Movie) -> Result<Option<Movie>, StoreError> {
        ensure_finite(movie.rating)?;
        let mut movies = self.lock();
        let previous = movies.insert(title.to_string(), movie);

        if let Err(e) = self.save(&movies) {
            match previous {
                Some(ref old) => movies.insert(title.to_string(), old.clone()),
                None => movies.remove(title),
            };
            return Err(e);
        }

        Ok(previous)
    }

    pub(crate) fn remove(&self, title: &str) -> Result<Movie, StoreError> {
        let mut movies = self.lock();
        let removed = movies
            .remove(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;

        if let Err(e) = self.save(&movies) {
            movies.insert(title.to_string(), removed);
            return Err(e);
        }

        Ok(removed)
    }

    pub(crate) fn set_rating(&self, title: &str, rating: f64) -> Result<(), StoreError> {
        ensure_finite(rating)?;
        let mut movies = self.lock();
        let movie = movies
            .get_mut(title)
            .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
        let old_rating = std::mem::replace(&mut movie.rating, rating);

        if let Err(e) = self.save(&movies) {
            if let Some(movie) = movies.get_mut(title) {
                movie.rating = old_rating;
            }
            return Err(e);
        }

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.movies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save(&self, movies: &Catalog) -> Result<(), StoreError> {
        let bytes = C::encode(&self.path, movies)?;
        write_atomic(&self.path, &bytes).map_err(|e| {
            warn!("Failed to save catalog to {}: {}", self.path.display(), e);
            StoreError::io(&self.path, e)
        })?;
        debug!("Saved {} movies to {}", movies.len(), self.path.display());
        Ok(())
    }
}

/// Non-finite ratings cannot be written to either file format.
fn ensure_finite(rating: f64) -> Result<(), StoreError> {
    if rating.is_finite() {
        Ok(())
    } else {
        Err(StoreError::InvalidField {
            field: "rating",
            value: rating.to_string(),
            reason: "must be a finite number".to_string(),
        })
    }
}

/// Write `bytes` to a sibling temporary file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

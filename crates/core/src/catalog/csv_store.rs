//! Delimited-text (CSV) catalog backend.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::persist::{Codec, FileCatalog};
use super::{Catalog, Movie, MovieStore, StoreError};

/// Column names written as the first row.
const HEADER: [&str; 4] = ["title", "rating", "year", "Poster"];

/// One data row of the CSV file.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    title: String,
    rating: f64,
    #[serde(default)]
    year: Option<u32>,
    #[serde(rename = "Poster", alias = "posterUrl", default)]
    poster: String,
}

pub(crate) struct CsvCodec;

impl Codec for CsvCodec {
    fn decode(path: &Path, bytes: &[u8]) -> Result<Catalog, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);
        let parse_error = |line: u64, message: String| StoreError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };
        let line_of = |e: &csv::Error| e.position().map(|p| p.line()).unwrap_or(0);

        let headers = reader
            .headers()
            .map_err(|e| parse_error(line_of(&e), e.to_string()))?
            .clone();
        let mut movies = Catalog::new();

        for record in reader.records() {
            let record = record.map_err(|e| parse_error(line_of(&e), e.to_string()))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row: CsvRow = record
                .deserialize(Some(&headers))
                .map_err(|e| parse_error(line, e.to_string()))?;

            if !row.rating.is_finite() {
                return Err(parse_error(
                    line,
                    format!("rating '{}' is not a finite number", row.rating),
                ));
            }
            movies.insert(row.title, Movie::new(row.rating, row.year, row.poster));
        }

        Ok(movies)
    }

    fn encode(path: &Path, catalog: &Catalog) -> Result<Vec<u8>, StoreError> {
        let encode_error = |e: csv::Error| StoreError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(HEADER).map_err(encode_error)?;

        for (title, movie) in catalog {
            writer
                .serialize(CsvRow {
                    title: title.clone(),
                    rating: movie.rating,
                    year: movie.year,
                    poster: movie.poster.clone(),
                })
                .map_err(encode_error)?;
        }

        writer.into_inner().map_err(|e| StoreError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Catalog stored as a CSV file with a `title,rating,year,Poster` header.
pub struct CsvStore {
    inner: FileCatalog<CsvCodec>,
}

impl CsvStore {
    /// Open the store, loading `path` if it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self {
            inner: FileCatalog::open(path.as_ref())?,
        })
    }
}

#[async_trait]
impl MovieStore for CsvStore {
    fn name(&self) -> &str {
        "csv"
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
}

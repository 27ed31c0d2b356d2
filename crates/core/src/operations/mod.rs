//! Read-only operations over a loaded catalog.
//!
//! None of these touch a store; callers pass a snapshot from
//! [`MovieStore::list_movies`](crate::catalog::MovieStore::list_movies).

mod stats;

pub use stats::{compute_stats, CatalogStats};

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::catalog::{Catalog, Movie};

/// Result of a title search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// The catalog has no movies at all.
    EmptyCatalog,
    /// The catalog has movies but none matched.
    NoMatch,
    /// Matching movies in catalog order.
    Matches(Vec<(&'a str, &'a Movie)>),
}

/// Case-insensitive substring search over titles.
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    if catalog.is_empty() {
        return SearchOutcome::EmptyCatalog;
    }

    let needle = query.trim().to_lowercase();
    let matches: Vec<_> = catalog
        .iter()
        .filter(|(title, _)| title.to_lowercase().contains(&needle))
        .map(|(title, movie)| (title.as_str(), movie))
        .collect();

    if matches.is_empty() {
        SearchOutcome::NoMatch
    } else {
        SearchOutcome::Matches(matches)
    }
}

/// Movies ordered by rating, highest first. Equal ratings are ordered by title.
pub fn sorted_by_rating(catalog: &Catalog) -> Vec<(&str, &Movie)> {
    let mut movies: Vec<_> = catalog
        .iter()
        .map(|(title, movie)| (title.as_str(), movie))
        .collect();
    // Stable sort over title-ordered input keeps ties in title order.
    movies.sort_by(|a, b| b.1.rating.total_cmp(&a.1.rating));
    movies
}

/// Pick one movie uniformly at random using `rng`.
pub fn pick_random<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    rng: &mut R,
) -> Option<(&'a str, &'a Movie)> {
    catalog
        .iter()
        .choose(rng)
        .map(|(title, movie)| (title.as_str(), movie))
}

/// Pick one movie uniformly at random using the thread-local RNG.
pub fn pick_random_movie(catalog: &Catalog) -> Option<(&str, &Movie)> {
    pick_random(catalog, &mut rand::thread_rng())
}

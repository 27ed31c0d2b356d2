//! Rating statistics over a catalog.

use serde::Serialize;

use crate::catalog::Catalog;

/// Summary statistics of a non-empty catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    /// Number of movies.
    pub count: usize,
    /// Mean rating, rounded to one decimal place.
    pub mean: f64,
    /// Median rating, rounded to one decimal place.
    pub median: f64,
    /// Highest rating.
    pub best_rating: f64,
    /// Titles sharing the highest rating, in catalog order.
    pub best: Vec<String>,
    /// Lowest rating.
    pub worst_rating: f64,
    /// Titles sharing the lowest rating, in catalog order.
    pub worst: Vec<String>,
}

/// Compute rating statistics. Returns `None` for an empty catalog.
pub fn compute_stats(catalog: &Catalog) -> Option<CatalogStats> {
    if catalog.is_empty() {
        return None;
    }

    let mut ratings: Vec<f64> = catalog.values().map(|m| m.rating).collect();
    let count = ratings.len();
    let mean = round1(ratings.iter().sum::<f64>() / count as f64);

    ratings.sort_by(f64::total_cmp);
    let half = count / 2;
    let median = round1(if count % 2 == 0 {
        (ratings[half - 1] + ratings[half]) / 2.0
    } else {
        ratings[half]
    });

    let worst_rating = ratings[0];
    let best_rating = ratings[count - 1];

    let titles_rated = |rating: f64| -> Vec<String> {
        catalog
            .iter()
            .filter(|(_, m)| m.rating == rating)
            .map(|(title, _)| title.clone())
            .collect()
    };

    Some(CatalogStats {
        count,
        mean,
        median,
        best_rating,
        best: titles_rated(best_rating),
        worst_rating,
        worst: titles_rated(worst_rating),
    })
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::catalog_with_ratings;

    #[test]
    fn test_stats_with_tied_best() {
        let catalog = catalog_with_ratings(&[("A", 8.0), ("B", 6.0), ("C", 8.0)]);
        let stats = compute_stats(&catalog).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 7.3);
        assert_eq!(stats.median, 8.0);
        assert_eq!(stats.best_rating, 8.0);
        assert_eq!(stats.best, vec!["A", "C"]);
        assert_eq!(stats.worst_rating, 6.0);
        assert_eq!(stats.worst, vec!["B"]);
    }

    #[test]
    fn test_even_count_median_averages_middle_values() {
        let catalog = catalog_with_ratings(&[("A", 5.0), ("B", 9.0), ("C", 9.0), ("D", 2.0)]);
        let stats = compute_stats(&catalog).unwrap();

        assert_eq!(stats.median, 7.0);
        assert_eq!(stats.mean, 6.3);
        assert_eq!(stats.best, vec!["B", "C"]);
        assert_eq!(stats.worst, vec!["D"]);
    }

    #[test]
    fn test_median_is_rounded_like_mean() {
        let catalog = catalog_with_ratings(&[("A", 7.0), ("B", 7.5)]);
        let stats = compute_stats(&catalog).unwrap();

        assert_eq!(stats.median, 7.3);
        assert_eq!(stats.mean, 7.3);
    }

    #[test]
    fn test_single_movie_is_best_and_worst() {
        let catalog = catalog_with_ratings(&[("Solo", 6.5)]);
        let stats = compute_stats(&catalog).unwrap();

        assert_eq!(stats.mean, 6.5);
        assert_eq!(stats.median, 6.5);
        assert_eq!(stats.best, vec!["Solo"]);
        assert_eq!(stats.worst, vec!["Solo"]);
    }

    #[test]
    fn test_empty_catalog_has_no_stats() {
        assert!(compute_stats(&Catalog::new()).is_none());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(7.333), 7.3);
        assert_eq!(round1(7.25), 7.3);
        assert_eq!(round1(8.0), 8.0);
    }
}

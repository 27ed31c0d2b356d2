pub mod catalog;
pub mod config;
pub mod metadata;
pub mod operations;
pub mod site;
pub mod testing;

pub use catalog::{
    parse_rating, parse_year, Catalog, CsvStore, JsonStore, LookupAdded, Movie, MovieStore,
    StoreError, MAX_RATING, MIN_RATING,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig, StorageBackend, StorageConfig,
};
pub use metadata::{MetadataError, MetadataLookup, MovieMetadata, OmdbClient, OmdbConfig};
pub use operations::{
    compute_stats, pick_random, pick_random_movie, search, sorted_by_rating, CatalogStats,
    SearchOutcome,
};
pub use site::{generate_site, movie_grid, render_page, SiteConfig, SiteError};

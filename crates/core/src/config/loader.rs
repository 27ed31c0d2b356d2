use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variables that override file values.
/// Nested keys use `__`, e.g. `CINELOG_OMDB__API_KEY`.
const ENV_PREFIX: &str = "CINELOG_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(figment(Some(path), env()))
}

/// Like [`load_config`], but a missing file means built-in defaults
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    let file = path.exists().then_some(path);
    extract(figment(file, env()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn env() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

fn figment(path: Option<&Path>, env: Env) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env)
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

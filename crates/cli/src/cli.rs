use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use cinelog_core::{Config, StorageBackend};

/// Config file used when neither `--config` nor `CINELOG_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "cinelog.toml";

/// Storage backends selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Csv,
    Json,
}

impl From<BackendArg> for StorageBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Csv => StorageBackend::Csv,
            BackendArg::Json => StorageBackend::Json,
        }
    }
}

/// Manage a movie catalog from the terminal
#[derive(Debug, Parser)]
#[command(name = "cinelog", version, about)]
pub struct Cli {
    /// Configuration file. Must exist when given explicitly.
    #[arg(short, long, env = "CINELOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storage backend, overriding the configuration
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Catalog file, overriding the configuration
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the effective configuration (secrets redacted) and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            let backend = StorageBackend::from(backend);
            // Switching backends without a file drops the other backend's path.
            if config.storage.backend != backend && self.file.is_none() {
                config.storage.path = None;
            }
            config.storage.backend = backend;
        }
        if let Some(file) = &self.file {
            config.storage.path = Some(file.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "cinelog",
            "--config",
            "custom.toml",
            "--backend",
            "csv",
            "--file",
            "films.csv",
            "--print-config",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.backend, Some(BackendArg::Csv));
        assert_eq!(cli.file, Some(PathBuf::from("films.csv")));
        assert!(cli.print_config);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Cli::try_parse_from(["cinelog", "--backend", "sqlite"]).is_err());
    }

    #[test]
    fn test_backend_override_resets_default_path() {
        let cli = Cli::try_parse_from(["cinelog", "--backend", "csv"]).unwrap();
        let mut config = Config::default();
        config.storage.path = Some(PathBuf::from("data.json"));

        cli.apply_overrides(&mut config);

        assert_eq!(config.storage.backend, StorageBackend::Csv);
        assert_eq!(config.storage.resolved_path(), PathBuf::from("movies.csv"));
    }

    #[test]
    fn test_file_override() {
        let cli = Cli::try_parse_from(["cinelog", "-b", "csv", "-f", "mine.csv"]).unwrap();
        let mut config = Config::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.storage.resolved_path(), PathBuf::from("mine.csv"));
    }
}

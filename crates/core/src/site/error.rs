//! Error types for the site module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating the movie page.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The template file does not exist.
    #[error("Template file not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// Failed to read the template.
    #[error("Failed to read template {path}")]
    TemplateReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the generated page.
    #[error("Failed to write page {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SiteError {
    /// Whether this error means the template is missing.
    pub fn is_template_missing(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }
}

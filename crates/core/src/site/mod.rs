//! Static HTML page generation from a catalog.

mod error;
mod render;

pub use error::SiteError;
pub use render::{
    movie_grid, render_page, GRID_PLACEHOLDER, PLACEHOLDER_POSTER, TITLE_PLACEHOLDER,
    UNKNOWN_YEAR,
};

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;

/// Where the page template is read from and the page is written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            output_path: default_output_path(),
            page_title: default_page_title(),
        }
    }
}

fn default_template_path() -> PathBuf {
    PathBuf::from("static/index_template.html")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("static/index.html")
}

fn default_page_title() -> String {
    "My Movie Page!".to_string()
}

/// Render `catalog` into the configured template and write the page.
///
/// Returns the path of the written page.
pub fn generate_site(catalog: &Catalog, config: &SiteConfig) -> Result<PathBuf, SiteError> {
    let template = fs::read_to_string(&config.template_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SiteError::TemplateNotFound {
                path: config.template_path.clone(),
            }
        } else {
            SiteError::TemplateReadFailed {
                path: config.template_path.clone(),
                source: e,
            }
        }
    })?;
    debug!("Read template {}", config.template_path.display());

    let page = render_page(&template, &config.page_title, catalog);

    let write_failed = |e: std::io::Error| SiteError::WriteFailed {
        path: config.output_path.clone(),
        source: e,
    };
    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
    }
    fs::write(&config.output_path, page).map_err(write_failed)?;

    info!(
        "Generated page with {} movies at {}",
        catalog.len(),
        config.output_path.display()
    );
    Ok(config.output_path.clone())
}

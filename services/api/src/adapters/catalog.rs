//! services/api/src/adapters/catalog.rs
//!
//! Loads the static college and scholarship catalog from a JSON file.

use college_path_core::Catalog;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Catalog {path} is invalid: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: Catalog = serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    info!(
        colleges = catalog.colleges.len(),
        scholarships = catalog.scholarships.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

//! Error types for document tour synchronization

use std::path::PathBuf;
use tour_catalog::CatalogError;
use tour_core::TourError;

/// Synchronization and configuration failures
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Definition was rejected before reaching the catalog
    #[error("invalid tour definition: {0}")]
    InvalidDefinition(#[from] TourError),

    /// Catalog refused the tour
    #[error("catalog rejected tour: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration text could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_error_display() {
        let err = SyncError::from(CatalogError::DuplicateTour("x".to_string()));
        assert!(err.to_string().contains("already registered"));

        let err = SyncError::io_error(
            "/nope.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("/nope.toml"));
    }
}

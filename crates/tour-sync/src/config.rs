//! Synchronizer configuration

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Namespace prefix of every document tour id
pub const DEFAULT_NAMESPACE: &str = "tour-documents";

/// Metadata key holding `{"tours": [...]}`
pub const DEFAULT_METADATA_KEY: &str = "tour";

/// Icon given to tours that do not declare one
pub const DEFAULT_ICON: &str = "document-tour";

/// Synchronizer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Feature namespace, first segment of namespaced ids
    pub namespace: String,
    /// Metadata key the tour list lives under
    pub metadata_key: String,
    /// Icon for tours without one
    pub default_icon: String,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With namespace
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// With metadata key
    #[inline]
    #[must_use]
    pub fn with_metadata_key(mut self, key: impl Into<String>) -> Self {
        self.metadata_key = key.into();
        self
    }

    /// With default icon
    #[inline]
    #[must_use]
    pub fn with_default_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_icon = icon.into();
        self
    }

    /// Parse from TOML; missing keys take their defaults
    ///
    /// # Errors
    /// Returns `SyncError::Config` if the text is not valid TOML for this shape
    pub fn from_toml_str(text: &str) -> Result<Self, SyncError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// - `SyncError::Io` if the file cannot be read
    /// - `SyncError::Config` if it cannot be parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SyncError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
            default_icon: DEFAULT_ICON.to_string(),
        }
    }
}

//! Document abstraction
//!
//! The synchronizer needs very little from a document: an id, read access
//! to its metadata, and two signals. [`TourDocument`] captures that;
//! [`MemoryDocument`] is a self-contained implementation used by the CLI
//! and by tests.

use parking_lot::RwLock;
use serde_json::{Map, Value as JsonValue};
use std::sync::atomic::{AtomicBool, Ordering};
use tour_core::Signal;

/// One metadata write
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataChange {
    /// Key that changed
    pub key: String,
    /// Value before the write
    pub old_value: Option<JsonValue>,
    /// Value after the write
    pub new_value: Option<JsonValue>,
}

/// What the synchronizer observes on a document
pub trait TourDocument: Send + Sync {
    /// Stable identity of the document
    fn id(&self) -> &str;

    /// Whether a model backs the document yet
    fn has_model(&self) -> bool;

    /// Read one metadata entry
    fn metadata(&self, key: &str) -> Option<JsonValue>;

    /// Fires after every metadata write; `None` without a model
    fn metadata_changed(&self) -> Option<&Signal<MetadataChange>>;

    /// Fires once, with the document id, when the document is closed
    fn disposed(&self) -> &Signal<String>;
}

/// Metadata store of a document model
#[derive(Debug, Default)]
pub struct DocumentModel {
    metadata: RwLock<Map<String, JsonValue>>,
    changed: Signal<MetadataChange>,
}

impl DocumentModel {
    /// Create model with metadata
    #[must_use]
    pub fn with_metadata(metadata: Map<String, JsonValue>) -> Self {
        Self {
            metadata: RwLock::new(metadata),
            changed: Signal::new(),
        }
    }

    /// Read one entry
    #[must_use]
    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.metadata.read().get(key).cloned()
    }

    /// Write one entry and notify
    pub fn set(&self, key: impl Into<String>, value: JsonValue) {
        let key = key.into();
        let old_value = self.metadata.write().insert(key.clone(), value.clone());
        self.changed.emit(&MetadataChange {
            key,
            old_value,
            new_value: Some(value),
        });
    }

    /// Delete one entry; notifies only if it existed
    pub fn remove(&self, key: &str) -> Option<JsonValue> {
        let old_value = self.metadata.write().remove(key)?;
        self.changed.emit(&MetadataChange {
            key: key.to_string(),
            old_value: Some(old_value.clone()),
            new_value: None,
        });
        Some(old_value)
    }

    /// Metadata write notifications
    #[inline]
    #[must_use]
    pub fn changed(&self) -> &Signal<MetadataChange> {
        &self.changed
    }
}

/// In-process document
#[derive(Debug)]
pub struct MemoryDocument {
    id: String,
    model: Option<DocumentModel>,
    disposed: Signal<String>,
    is_disposed: AtomicBool,
}

impl MemoryDocument {
    /// Create document with an empty model
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_model(id, Some(DocumentModel::default()))
    }

    /// Create document whose model is not loaded
    #[must_use]
    pub fn without_model(id: impl Into<String>) -> Self {
        Self::with_model(id, None)
    }

    /// Create document with initial metadata
    ///
    /// Non-object values give an empty metadata map.
    #[must_use]
    pub fn with_metadata(id: impl Into<String>, metadata: JsonValue) -> Self {
        let map = match metadata {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        };
        Self::with_model(id, Some(DocumentModel::with_metadata(map)))
    }

    fn with_model(id: impl Into<String>, model: Option<DocumentModel>) -> Self {
        Self {
            id: id.into(),
            model,
            disposed: Signal::new(),
            is_disposed: AtomicBool::new(false),
        }
    }

    /// Backing model
    #[inline]
    #[must_use]
    pub fn model(&self) -> Option<&DocumentModel> {
        self.model.as_ref()
    }

    /// Write one metadata entry; ignored without a model
    pub fn set_metadata(&self, key: impl Into<String>, value: JsonValue) {
        if let Some(model) = &self.model {
            model.set(key, value);
        }
    }

    /// Delete one metadata entry
    pub fn remove_metadata(&self, key: &str) -> Option<JsonValue> {
        self.model.as_ref()?.remove(key)
    }

    /// Close the document
    ///
    /// Emits `disposed` once, then drops every subscription.
    pub fn dispose(&self) {
        if self.is_disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.disposed.emit(&self.id);
        self.disposed.clear();
        if let Some(model) = &self.model {
            model.changed.clear();
        }
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.is_disposed.load(Ordering::SeqCst)
    }
}

impl TourDocument for MemoryDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn has_model(&self) -> bool {
        self.model.is_some()
    }

    fn metadata(&self, key: &str) -> Option<JsonValue> {
        self.model.as_ref()?.get(key)
    }

    fn metadata_changed(&self) -> Option<&Signal<MetadataChange>> {
        self.model.as_ref().map(DocumentModel::changed)
    }

    fn disposed(&self) -> &Signal<String> {
        &self.disposed
    }
}

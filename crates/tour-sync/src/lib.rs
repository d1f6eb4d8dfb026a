//! Tour Sync
//!
//! Keeps a [`tour_catalog::TourCatalog`] consistent with the tours declared
//! in document metadata.
//!
//! A document declares its tours under one metadata key:
//!
//! ```json
//! { "tour": { "tours": [ { "id": "intro", "label": "Introduction", "steps": [] } ] } }
//! ```
//!
//! Each declared tour is registered as `<namespace>:<document>:<id>`, so two
//! documents may declare the same id without clashing. The set is rebuilt on
//! every metadata change and removed when the document is disposed.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use tour_catalog::InMemoryTourCatalog;
//! use tour_sync::{DocumentTourSynchronizer, MemoryDocument, SyncConfig};
//!
//! let catalog = Arc::new(InMemoryTourCatalog::ready());
//! let sync = DocumentTourSynchronizer::new(catalog.clone(), SyncConfig::default());
//!
//! let doc = Arc::new(MemoryDocument::with_metadata("notebook.ipynb", json!({
//!     "tour": { "tours": [{
//!         "id": "intro",
//!         "label": "Introduction",
//!         "steps": [{ "target": "#cell-1", "content": "Start here" }]
//!     }]}
//! })));
//!
//! sync.attach(&doc);
//! assert_eq!(sync.tour_ids(doc.as_ref()), vec!["tour-documents:notebook.ipynb:intro"]);
//!
//! doc.dispose();
//! assert!(catalog.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod affordance;
pub mod config;
pub mod document;
pub mod error;
pub mod namespace;
pub mod synchronizer;

pub use affordance::{AffordanceEntry, TourAffordance};
pub use config::SyncConfig;
pub use document::{DocumentModel, MemoryDocument, MetadataChange, TourDocument};
pub use error::SyncError;
pub use namespace::NamespacedTourId;
pub use synchronizer::{
    DocumentTourSynchronizer, FailedDefinition, RecomputeReport, ToursChanged, TOURS_FIELD,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

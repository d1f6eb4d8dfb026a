//! Document tour synchronizer
//!
//! Derives a document's tours from its metadata and keeps the catalog
//! consistent with it.
//!
//! # Workflow
//! 1. Read `metadata[metadata_key]["tours"]` (absent means empty)
//! 2. Remove every tour previously registered for the document
//! 3. Register each declared tour under its namespaced id, in catalog order,
//!    and request a non-forced launch of it
//! 4. Log and skip definitions that fail, keep going with the rest
//! 5. Emit one [`ToursChanged`] notification
//!
//! The whole pass runs again on every metadata change. Disposing the
//! document removes its tours.

use crate::config::SyncConfig;
use crate::document::TourDocument;
use crate::error::SyncError;
use crate::namespace::NamespacedTourId;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tour_catalog::{LaunchFuture, TourCatalog};
use tour_core::{NullTranslator, Signal, SubscriptionId, TourDefinition, Translator};

/// Key inside the metadata entry that holds the definition list
pub const TOURS_FIELD: &str = "tours";

/// The tour set of a document was recomputed or cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToursChanged {
    /// Document whose tours changed
    pub document_id: String,
    /// Namespaced ids now registered for it
    pub tour_ids: Vec<String>,
}

/// A definition that did not make it into the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDefinition {
    /// Declared id, if one could be read
    pub id: Option<String>,
    /// Declared label, if one could be read
    pub label: Option<String>,
    /// Why it was rejected
    pub reason: String,
}

/// Outcome of one recompute pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Namespaced ids registered, in registration order
    pub registered: Vec<String>,
    /// Definitions that were skipped
    pub failed: Vec<FailedDefinition>,
}

#[derive(Debug)]
struct Attachment {
    metadata_subscription: Option<SubscriptionId>,
    disposed_subscription: SubscriptionId,
}

struct Inner {
    catalog: Arc<dyn TourCatalog>,
    config: SyncConfig,
    translator: Arc<dyn Translator>,
    attached: Mutex<HashMap<String, Attachment>>,
    tours_changed: Signal<ToursChanged>,
}

/// Keeps a catalog in line with the tours declared by open documents
///
/// Cloning yields another handle to the same synchronizer.
#[derive(Clone)]
pub struct DocumentTourSynchronizer {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DocumentTourSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentTourSynchronizer")
            .field("config", &self.inner.config)
            .field("attached", &self.inner.attached.lock().len())
            .finish_non_exhaustive()
    }
}

impl DocumentTourSynchronizer {
    /// Create synchronizer over `catalog`
    #[must_use]
    pub fn new(catalog: Arc<dyn TourCatalog>, config: SyncConfig) -> Self {
        Self::with_translator(catalog, config, Arc::new(NullTranslator))
    }

    /// Create synchronizer with a translator for user-facing strings
    #[must_use]
    pub fn with_translator(
        catalog: Arc<dyn TourCatalog>,
        config: SyncConfig,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                catalog,
                config,
                translator,
                attached: Mutex::new(HashMap::new()),
                tours_changed: Signal::new(),
            }),
        }
    }

    /// Catalog this synchronizer writes to
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn TourCatalog> {
        &self.inner.catalog
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Translator for user-facing strings
    #[inline]
    #[must_use]
    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.inner.translator
    }

    /// Notified after every recompute and detach
    #[inline]
    #[must_use]
    pub fn tours_changed(&self) -> &Signal<ToursChanged> {
        &self.inner.tours_changed
    }

    /// Start following a document
    ///
    /// Subscribes to metadata changes and disposal, then recomputes at once.
    /// Returns `None` without doing anything if the document is already
    /// attached or has no model.
    pub fn attach<D>(&self, document: &Arc<D>) -> Option<RecomputeReport>
    where
        D: TourDocument + 'static,
    {
        if !document.has_model() {
            tracing::debug!(document = %document.id(), "document has no model, not attaching");
            return None;
        }

        let document_id = document.id().to_string();
        let mut attached = self.inner.attached.lock();
        let Entry::Vacant(slot) = attached.entry(document_id.clone()) else {
            return None;
        };

        let metadata_subscription = document.metadata_changed().map(|signal| {
            let inner = Arc::downgrade(&self.inner);
            let weak_doc: Weak<D> = Arc::downgrade(document);
            signal.subscribe(move |_change| {
                if let (Some(inner), Some(doc)) = (inner.upgrade(), weak_doc.upgrade()) {
                    inner.recompute(doc.as_ref());
                }
            })
        });

        let disposed_subscription = {
            let inner = Arc::downgrade(&self.inner);
            document.disposed().subscribe(move |id: &String| {
                if let Some(inner) = inner.upgrade() {
                    inner.attached.lock().remove(id);
                    inner.clear(id);
                    inner.forget(id);
                }
            })
        };

        slot.insert(Attachment {
            metadata_subscription,
            disposed_subscription,
        });
        drop(attached);
        tracing::debug!(document = %document_id, "document attached");

        Some(self.inner.recompute(document.as_ref()))
    }

    /// Stop following a document and remove its tours
    ///
    /// Returns `false` if the document was not attached.
    pub fn detach(&self, document: &dyn TourDocument) -> bool {
        let Some(attachment) = self.inner.attached.lock().remove(document.id()) else {
            return false;
        };

        if let (Some(signal), Some(id)) = (
            document.metadata_changed(),
            attachment.metadata_subscription,
        ) {
            signal.unsubscribe(id);
        }
        document.disposed().unsubscribe(attachment.disposed_subscription);

        self.inner.clear(document.id());
        self.inner.forget(document.id());
        self.inner.tours_changed.emit(&ToursChanged {
            document_id: document.id().to_string(),
            tour_ids: Vec::new(),
        });
        true
    }

    /// Whether `document` is being followed
    #[must_use]
    pub fn is_attached(&self, document: &dyn TourDocument) -> bool {
        self.inner.attached.lock().contains_key(document.id())
    }

    /// Re-derive a document's tours now
    pub fn refresh(&self, document: &dyn TourDocument) -> RecomputeReport {
        self.inner.recompute(document)
    }

    /// Namespaced ids the catalog currently holds for `document`
    #[must_use]
    pub fn tour_ids(&self, document: &dyn TourDocument) -> Vec<String> {
        self.inner.tour_ids_for(document.id())
    }

    /// Show every tour of `document`, completed ones included
    pub fn launch_all(&self, document: &dyn TourDocument) -> LaunchFuture {
        let ids = self.tour_ids(document);
        tracing::debug!(document = %document.id(), tours = ids.len(), "launching all document tours");
        self.inner.catalog.launch(&ids, true)
    }

    /// Show one tour of `document`, even if it was completed
    ///
    /// `tour_id` is the namespaced id, as listed by [`Self::tour_ids`].
    /// Ids of other documents are ignored.
    pub fn launch_one(&self, document: &dyn TourDocument, tour_id: &str) -> LaunchFuture {
        let namespace = &self.inner.config.namespace;
        let ids = if NamespacedTourId::belongs_to(tour_id, namespace, document.id()) {
            vec![tour_id.to_string()]
        } else {
            tracing::warn!(document = %document.id(), tour = %tour_id, "tour does not belong to document");
            Vec::new()
        };
        self.inner.catalog.launch(&ids, true)
    }
}

impl Inner {
    fn tour_ids_for(&self, document_id: &str) -> Vec<String> {
        let prefix = NamespacedTourId::document_prefix(&self.config.namespace, document_id);
        self.catalog
            .keys()
            .into_iter()
            .filter(|id| id.starts_with(&prefix))
            .collect()
    }

    fn forget(&self, document_id: &str) {
        let prefix = NamespacedTourId::document_prefix(&self.config.namespace, document_id);
        self.catalog.forget_completed(&prefix);
    }

    fn clear(&self, document_id: &str) {
        for id in self.tour_ids_for(document_id) {
            self.catalog.remove_tour(&id);
        }
    }

    fn read_declared(&self, document: &dyn TourDocument) -> Vec<JsonValue> {
        let Some(entry) = document.metadata(&self.config.metadata_key) else {
            return Vec::new();
        };

        match entry.get(TOURS_FIELD) {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(list)) => list.clone(),
            Some(other) => {
                tracing::warn!(
                    document = %document.id(),
                    key = %self.config.metadata_key,
                    value = %other,
                    "tour list is not an array, ignoring"
                );
                Vec::new()
            }
        }
    }

    fn recompute(&self, document: &dyn TourDocument) -> RecomputeReport {
        let document_id = document.id();
        let declared = self.read_declared(document);

        self.clear(document_id);

        let mut report = RecomputeReport::default();
        let mut definitions = Vec::with_capacity(declared.len());

        for raw in declared {
            match TourDefinition::from_value(raw.clone()) {
                Ok(def) => definitions.push(def),
                Err(e) => {
                    let error = SyncError::from(e);
                    let id = raw.get("id").and_then(JsonValue::as_str).map(str::to_string);
                    let label = raw.get("label").and_then(JsonValue::as_str).map(str::to_string);
                    self.log_failure(
                        document_id,
                        id.as_deref().unwrap_or_default(),
                        label.as_deref().unwrap_or_default(),
                        raw.get("steps").unwrap_or(&JsonValue::Null),
                        raw.get("options").unwrap_or(&JsonValue::Null),
                        &error,
                    );
                    report.failed.push(FailedDefinition {
                        id,
                        label,
                        reason: error.to_string(),
                    });
                }
            }
        }

        for def in self.catalog.sort_tours(definitions) {
            let raw_id = def.id.clone();
            let label = def.label.clone();
            let steps = serde_json::to_value(&def.steps).unwrap_or_default();
            let options = serde_json::to_value(&def.options).unwrap_or_default();

            match self.register(document_id, def) {
                Ok(id) => {
                    drop(self.catalog.launch(std::slice::from_ref(&id), false));
                    report.registered.push(id);
                }
                Err(e) => {
                    self.log_failure(document_id, &raw_id, &label, &steps, &options, &e);
                    report.failed.push(FailedDefinition {
                        id: Some(raw_id),
                        label: Some(label),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            document = %document_id,
            registered = report.registered.len(),
            failed = report.failed.len(),
            "document tours recomputed"
        );

        self.tours_changed.emit(&ToursChanged {
            document_id: document_id.to_string(),
            tour_ids: report.registered.clone(),
        });

        report
    }

    fn register(&self, document_id: &str, mut def: TourDefinition) -> Result<String, SyncError> {
        def.validate()?;
        def.id = NamespacedTourId::new(&self.config.namespace, document_id, &def.id).to_string();
        def.icon.get_or_insert_with(|| self.config.default_icon.clone());
        Ok(self.catalog.add_tour(def)?)
    }

    fn log_failure(
        &self,
        document_id: &str,
        id: &str,
        label: &str,
        steps: &JsonValue,
        options: &JsonValue,
        error: &SyncError,
    ) {
        let message = self.translator.gettext(
            "Error encountered adding document tour %1 (%2)",
            &[label, id],
        );
        tracing::error!(
            document = %document_id,
            tour = %id,
            label = %label,
            steps = %steps,
            options = %options,
            error = %error,
            "{message}"
        );
    }
}

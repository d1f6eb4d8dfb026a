//! Testing utilities for the document tours workspace
//!
//! Shared fixtures, recorders and setup helpers.

#![allow(missing_docs)]

use parking_lot::Mutex;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tour_catalog::InMemoryTourCatalog;
use tour_core::{Signal, Step, TourDefinition};
use tour_sync::{DocumentTourSynchronizer, MemoryDocument, SyncConfig};

pub fn sample_steps() -> Vec<Step> {
    vec![
        Step::new("#toolbar", "Run cells from here"),
        Step::new("#sidebar", "Files live here").with_title("Files"),
    ]
}

pub fn sample_definition(id: &str) -> TourDefinition {
    TourDefinition::new(id, format!("Tour {id}")).with_steps(sample_steps())
}

/// Raw metadata entry for a well-formed tour
pub fn sample_definition_json(id: &str) -> JsonValue {
    json!({
        "id": id,
        "label": format!("Tour {id}"),
        "steps": [
            { "target": "#toolbar", "content": "Run cells from here" },
            { "target": "#sidebar", "content": "Files live here", "title": "Files" }
        ]
    })
}

pub fn ranked_definition_json(id: &str, rank: i32) -> JsonValue {
    let mut value = sample_definition_json(id);
    value["rank"] = json!(rank);
    value
}

/// Entry that fails to deserialize
pub fn malformed_definition_json(id: &str) -> JsonValue {
    json!({ "id": id, "label": format!("Broken {id}"), "steps": "not-a-list" })
}

/// Metadata object holding `tours` under the default key
pub fn tours_metadata(tours: Vec<JsonValue>) -> JsonValue {
    json!({ "tour": { "tours": tours } })
}

pub fn document_with_tours(id: &str, tours: Vec<JsonValue>) -> Arc<MemoryDocument> {
    Arc::new(MemoryDocument::with_metadata(id, tours_metadata(tours)))
}

pub fn set_tours(document: &MemoryDocument, tours: Vec<JsonValue>) {
    document.set_metadata("tour", json!({ "tours": tours }));
}

pub fn setup_synchronizer() -> (Arc<InMemoryTourCatalog>, DocumentTourSynchronizer) {
    let catalog = Arc::new(InMemoryTourCatalog::new());
    let sync = DocumentTourSynchronizer::new(catalog.clone(), SyncConfig::default());
    (catalog, sync)
}

pub fn doc_tour_id(document: &str, definition: &str) -> String {
    tour_sync::NamespacedTourId::new(tour_sync::config::DEFAULT_NAMESPACE, document, definition)
        .to_string()
}

/// Collects every payload a signal delivers
#[derive(Debug)]
pub struct Recorder<T> {
    seen: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn attach(signal: &Signal<T>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        signal.subscribe(move |value: &T| sink.lock().push(value.clone()));
        Self { seen }
    }

    pub fn events(&self) -> Vec<T> {
        self.seen.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

/// One event seen by [`capture_logs`]
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Default)]
struct FieldRecorder(BTreeMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

struct CaptureLayer(Arc<Mutex<Vec<CapturedEvent>>>);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        self.0.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: recorder.0,
        });
    }
}

/// Run `f` with a subscriber that records every event on this thread
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(Arc::clone(&events)));
    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().clone();
    (result, captured)
}

//! `sync` and `replay` subcommands

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tour_catalog::{InMemoryTourCatalog, TourCatalog};
use tour_core::{TourEvent, TourNotification, TourStatus};
use tour_sync::{
    AffordanceEntry, DocumentTourSynchronizer, FailedDefinition, MemoryDocument,
    NamespacedTourId, SyncConfig,
};

/// Inputs of `tourctl sync`
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// JSON file holding the document metadata object
    pub metadata: PathBuf,
    /// Document id; defaults to the metadata file name
    pub document_id: Option<String>,
    /// TOML file with synchronizer settings
    pub config: Option<PathBuf>,
    /// Print JSON instead of text
    pub json: bool,
}

/// Result of one synchronization
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    /// Document the tours were read from
    pub document_id: String,
    /// Launcher title
    pub title: String,
    /// Registered tours, in catalog order
    pub tours: Vec<AffordanceEntry>,
    /// Tour that would be shown first
    pub active: Option<String>,
    /// Definitions that were skipped
    pub failed: Vec<FailedDefinition>,
}

/// Inputs of `tourctl replay`
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// JSON file holding the document metadata object
    pub metadata: PathBuf,
    /// Definition id of the tour to drive
    pub tour: String,
    /// JSON file holding an array of renderer events
    pub events: PathBuf,
    /// Document id; defaults to the metadata file name
    pub document_id: Option<String>,
    /// TOML file with synchronizer settings
    pub config: Option<PathBuf>,
}

/// Result of replaying events against one tour
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    /// Namespaced tour id
    pub tour_id: String,
    /// Notifications in delivery order
    pub notifications: Vec<TourNotification>,
    /// Status after the last event
    pub status: TourStatus,
    /// Current step after the last event
    pub current_step: Option<usize>,
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    match path {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(SyncConfig::default()),
    }
}

fn read_json(path: &Path) -> Result<JsonValue> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn document_id_for(path: &Path, explicit: Option<&str>) -> String {
    explicit.map_or_else(
        || {
            path.file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
        },
        str::to_string,
    )
}

fn load_document(
    metadata: &Path,
    document_id: Option<&str>,
) -> Result<(String, Arc<MemoryDocument>)> {
    let value = read_json(metadata)?;
    if !value.is_object() {
        bail!("{} must hold a JSON object", metadata.display());
    }
    let id = document_id_for(metadata, document_id);
    let document = Arc::new(MemoryDocument::with_metadata(id.clone(), value));
    Ok((id, document))
}

/// Register the tours declared in a metadata file
///
/// # Errors
/// Fails if the metadata or config file cannot be read or parsed. Invalid
/// tour definitions are reported in the summary instead.
pub fn sync(options: &SyncOptions) -> Result<SyncSummary> {
    let config = load_config(options.config.as_deref())?;
    let (document_id, document) =
        load_document(&options.metadata, options.document_id.as_deref())?;

    let catalog = Arc::new(InMemoryTourCatalog::ready());
    let synchronizer = DocumentTourSynchronizer::new(catalog.clone(), config);
    let report = synchronizer.attach(&document).unwrap_or_default();
    let affordance = synchronizer.affordance(document.as_ref());

    tracing::info!(
        document = %document_id,
        tours = affordance.entries.len(),
        failed = report.failed.len(),
        "sync complete"
    );

    Ok(SyncSummary {
        document_id,
        title: affordance.title,
        tours: affordance.entries,
        active: catalog.active(),
        failed: report.failed,
    })
}

/// Drive one tour with a recorded event stream
///
/// # Errors
/// Fails if an input file cannot be read or parsed, or if the tour is not
/// registered for the document.
pub async fn replay(options: &ReplayOptions) -> Result<ReplaySummary> {
    let config = load_config(options.config.as_deref())?;
    let namespace = config.namespace.clone();
    let (document_id, document) =
        load_document(&options.metadata, options.document_id.as_deref())?;

    let events: Vec<TourEvent> = serde_json::from_value(read_json(&options.events)?)
        .with_context(|| format!("decoding events in {}", options.events.display()))?;

    let catalog = Arc::new(InMemoryTourCatalog::ready());
    let synchronizer = DocumentTourSynchronizer::new(catalog.clone(), config);
    synchronizer.attach(&document);

    let tour_id = NamespacedTourId::new(namespace, &document_id, &options.tour).to_string();
    let Some(tour) = catalog.get(&tour_id) else {
        bail!("document {document_id} declares no valid tour '{}'", options.tour);
    };

    catalog
        .launch(std::slice::from_ref(&tour_id), true)
        .await
        .context("launching tour")?;

    let mut notifications = Vec::new();
    for event in &events {
        if let Some(emitted) = catalog.dispatch_event(&tour_id, event) {
            notifications.extend(emitted);
        }
    }

    tracing::info!(
        tour = %tour_id,
        events = events.len(),
        status = %tour.status(),
        "replay complete"
    );

    Ok(ReplaySummary {
        tour_id,
        notifications,
        status: tour.status(),
        current_step: tour.current_step_index(),
    })
}

impl SyncSummary {
    /// Human-readable rendering
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("{} [{}]", self.title, self.document_id)];
        for entry in &self.tours {
            let marker = if self.active.as_deref() == Some(entry.id.as_str()) {
                '*'
            } else {
                ' '
            };
            lines.push(format!("{marker} {}  {}", entry.id, entry.label));
        }
        for failed in &self.failed {
            lines.push(format!(
                "! {} ({}): {}",
                failed.label.as_deref().unwrap_or("<no label>"),
                failed.id.as_deref().unwrap_or("<no id>"),
                failed.reason
            ));
        }
        lines.join("\n")
    }
}

impl ReplaySummary {
    /// Human-readable rendering
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("tour {}", self.tour_id)];
        for n in &self.notifications {
            lines.push(format!("  {} (index {})", n.kind, n.event.index));
        }
        let step = self
            .current_step
            .map_or_else(|| "none".to_string(), |i| i.to_string());
        lines.push(format!("status: {}, step: {step}", self.status));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_defaults_to_file_name() {
        let path = Path::new("/tmp/notebooks/intro.json");
        assert_eq!(document_id_for(path, None), "intro.json");
        assert_eq!(document_id_for(path, Some("custom")), "custom");
    }

    #[test]
    fn failed_entry_render_uses_placeholders() {
        let summary = SyncSummary {
            document_id: "d".to_string(),
            title: "Start a Document Tour".to_string(),
            tours: Vec::new(),
            active: None,
            failed: vec![FailedDefinition {
                id: None,
                label: None,
                reason: "bad".to_string(),
            }],
        };
        assert!(summary.render_text().contains("! <no label> (<no id>): bad"));
    }
}

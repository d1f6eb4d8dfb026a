//! Launcher summary for a document's tours
//!
//! What a toolbar button needs to render: a title, whether to enable it, and
//! the tours it can start. Choosing an entry maps to
//! [`DocumentTourSynchronizer::launch_one`], the run-all choice to
//! [`DocumentTourSynchronizer::launch_all`].

use crate::document::TourDocument;
use crate::synchronizer::DocumentTourSynchronizer;
use serde::Serialize;
use tour_core::Translator;

/// One launchable tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffordanceEntry {
    /// Namespaced catalog id
    pub id: String,
    /// Display name
    pub label: String,
    /// Icon name
    pub icon: Option<String>,
}

/// Launcher state for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourAffordance {
    /// Button title, with the tour count when there are tours
    pub title: String,
    /// Whether the launcher should be enabled
    pub has_tours: bool,
    /// Label of the choice that runs every tour, offered when there are tours
    pub run_all: Option<String>,
    /// Tours in catalog order
    pub entries: Vec<AffordanceEntry>,
}

impl TourAffordance {
    /// Build the summary for a list of entries
    #[must_use]
    pub fn new(entries: Vec<AffordanceEntry>, translator: &dyn Translator) -> Self {
        let mut title = translator.lookup("Start a Document Tour");
        if !entries.is_empty() {
            title = format!("{title} ({})", entries.len());
        }
        let run_all = (!entries.is_empty()).then(|| translator.lookup("Run all tours"));
        Self {
            title,
            has_tours: !entries.is_empty(),
            run_all,
            entries,
        }
    }
}

impl DocumentTourSynchronizer {
    /// Launcher summary for `document`
    #[must_use]
    pub fn affordance(&self, document: &dyn TourDocument) -> TourAffordance {
        let entries = self
            .tour_ids(document)
            .into_iter()
            .filter_map(|id| {
                let tour = self.catalog().get(&id)?;
                Some(AffordanceEntry {
                    label: tour.label().to_string(),
                    icon: tour.icon().map(str::to_string),
                    id,
                })
            })
            .collect();
        TourAffordance::new(entries, self.translator().as_ref())
    }
}

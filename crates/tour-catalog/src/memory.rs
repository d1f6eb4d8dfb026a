//! In-memory catalog
//!
//! Provides [`InMemoryTourCatalog`], an arena of tours keyed by id with a
//! launch queue. One tour is active at a time; when it reaches a terminal
//! status the next queued tour takes over.

use crate::catalog::{LaunchFuture, TourCatalog};
use crate::error::CatalogError;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::watch;
use tour_core::{Signal, Tour, TourDefinition, TourEvent, TourNotification, TourStatus};

/// Registry change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    /// A tour was registered
    Added(String),
    /// A tour was unregistered
    Removed(String),
}

#[derive(Debug, Default)]
struct Registry {
    tours: IndexMap<String, Arc<Tour>>,
    queue: VecDeque<String>,
    active: Option<String>,
    // Outlives `remove_tour` so re-registered tours stay completed;
    // cleared by `forget_completed`.
    completed: HashSet<String>,
}

impl Registry {
    fn activate_next(&mut self) -> Option<String> {
        while let Some(id) = self.queue.pop_front() {
            if self.tours.contains_key(&id) {
                self.active = Some(id.clone());
                return Some(id);
            }
        }
        self.active = None;
        None
    }
}

/// Thread-safe tour registry with a launch queue
#[derive(Debug)]
pub struct InMemoryTourCatalog {
    registry: Mutex<Registry>,
    ready: watch::Sender<bool>,
    changed: Signal<CatalogChange>,
}

impl InMemoryTourCatalog {
    /// Create empty catalog; the surface starts not ready
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            registry: Mutex::new(Registry::default()),
            ready,
            changed: Signal::new(),
        }
    }

    /// Create a catalog whose surface is already ready
    #[must_use]
    pub fn ready() -> Self {
        let catalog = Self::new();
        catalog.mark_ready();
        catalog
    }

    /// Report that the surface can show tours
    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Registry changes
    #[inline]
    #[must_use]
    pub fn changed(&self) -> &Signal<CatalogChange> {
        &self.changed
    }

    /// Tour currently shown
    #[must_use]
    pub fn active(&self) -> Option<String> {
        self.registry.lock().active.clone()
    }

    /// Tours waiting behind the active one
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.registry.lock().queue.iter().cloned().collect()
    }

    /// Whether the user finished or skipped a tour with this id
    #[must_use]
    pub fn is_completed(&self, id: &str) -> bool {
        self.registry.lock().completed.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.lock().tours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().tours.is_empty()
    }

    /// Forward a renderer callback to a tour
    ///
    /// Returns `None` for unknown ids. When the tour reaches a terminal
    /// status it stops being active; finished and skipped tours are also
    /// remembered as completed.
    pub fn dispatch_event(&self, id: &str, event: &TourEvent) -> Option<Vec<TourNotification>> {
        let tour = self.get(id)?;
        let notifications = tour.handle_event(event);

        let status = tour.status();
        if status.is_terminal() {
            let mut registry = self.registry.lock();
            if status != TourStatus::Error {
                registry.completed.insert(id.to_string());
            }
            if registry.active.as_deref() == Some(id) {
                if let Some(next) = registry.activate_next() {
                    tracing::info!(tour = %next, "activating next queued tour");
                }
            }
        }

        Some(notifications)
    }
}

impl Default for InMemoryTourCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TourCatalog for InMemoryTourCatalog {
    fn add_tour(&self, def: TourDefinition) -> Result<String, CatalogError> {
        let tour = Tour::from_definition(def)?;
        let id = tour.id().to_string();

        {
            let mut registry = self.registry.lock();
            if registry.tours.contains_key(&id) {
                return Err(CatalogError::DuplicateTour(id));
            }
            registry.tours.insert(id.clone(), Arc::new(tour));
        }

        tracing::debug!(tour = %id, "tour registered");
        self.changed.emit(&CatalogChange::Added(id.clone()));
        Ok(id)
    }

    fn remove_tour(&self, id: &str) -> Option<Arc<Tour>> {
        let removed = {
            let mut registry = self.registry.lock();
            let removed = registry.tours.shift_remove(id)?;
            registry.queue.retain(|q| q != id);
            if registry.active.as_deref() == Some(id) {
                registry.activate_next();
            }
            removed
        };

        tracing::debug!(tour = %id, "tour removed");
        self.changed.emit(&CatalogChange::Removed(id.to_string()));
        Some(removed)
    }

    fn get(&self, id: &str) -> Option<Arc<Tour>> {
        self.registry.lock().tours.get(id).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.registry.lock().tours.keys().cloned().collect()
    }

    fn forget_completed(&self, prefix: &str) {
        self.registry
            .lock()
            .completed
            .retain(|id| !id.starts_with(prefix));
    }

    fn launch(&self, ids: &[String], force: bool) -> LaunchFuture {
        {
            let mut registry = self.registry.lock();
            for id in ids {
                if !registry.tours.contains_key(id) {
                    tracing::debug!(tour = %id, "launch requested for unknown tour");
                    continue;
                }
                if !force && registry.completed.contains(id) {
                    tracing::debug!(tour = %id, "tour already completed, not relaunching");
                    continue;
                }
                if registry.active.as_ref() == Some(id) || registry.queue.contains(id) {
                    continue;
                }
                registry.queue.push_back(id.clone());
            }

            if registry.active.is_none() {
                if let Some(id) = registry.activate_next() {
                    tracing::info!(tour = %id, force, "launching tour");
                }
            }
        }

        let mut ready = self.ready.subscribe();
        Box::pin(async move {
            if ready.wait_for(|r| *r).await.is_err() {
                return Err(CatalogError::Closed);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use tour_core::Step;

    fn def(id: &str) -> TourDefinition {
        TourDefinition::new(id, format!("Tour {id}")).with_steps(vec![Step::new("#a", "a")])
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn add_get_remove() {
        let catalog = InMemoryTourCatalog::new();
        let id = catalog.add_tour(def("a")).unwrap();

        assert_eq!(id, "a");
        assert!(catalog.contains("a"));
        assert_eq!(catalog.get("a").unwrap().label(), "Tour a");

        let removed = catalog.remove_tour("a").unwrap();
        assert_eq!(removed.id(), "a");
        assert!(catalog.get("a").is_none());
        assert!(catalog.remove_tour("a").is_none());
    }

    #[test]
    fn add_rejects_duplicates_and_invalid() {
        let catalog = InMemoryTourCatalog::new();
        catalog.add_tour(def("a")).unwrap();

        assert!(matches!(
            catalog.add_tour(def("a")),
            Err(CatalogError::DuplicateTour(_))
        ));
        assert!(matches!(
            catalog.add_tour(TourDefinition::new("b", "B")),
            Err(CatalogError::InvalidTour(_))
        ));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn keys_follow_registration_order() {
        let catalog = InMemoryTourCatalog::new();
        for id in ["c", "a", "b"] {
            catalog.add_tour(def(id)).unwrap();
        }
        catalog.remove_tour("a");
        assert_eq!(catalog.keys(), ids(&["c", "b"]));
    }

    #[test]
    fn sort_tours_by_rank_then_declaration() {
        let catalog = InMemoryTourCatalog::new();
        let sorted = catalog.sort_tours(vec![
            def("unranked1"),
            def("r5").with_rank(5),
            def("unranked2"),
            def("r1").with_rank(1),
            def("r5b").with_rank(5),
        ]);
        let order: Vec<_> = sorted.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["r1", "r5", "r5b", "unranked1", "unranked2"]);
    }

    #[test]
    fn launch_activates_first_and_queues_rest() {
        let catalog = InMemoryTourCatalog::new();
        for id in ["a", "b", "c"] {
            catalog.add_tour(def(id)).unwrap();
        }

        drop(catalog.launch(&ids(&["a", "b", "missing"]), false));
        drop(catalog.launch(&ids(&["c", "b"]), false));

        assert_eq!(catalog.active().as_deref(), Some("a"));
        assert_eq!(catalog.pending(), ids(&["b", "c"]));
    }

    #[test]
    fn finishing_active_tour_advances_queue() {
        let catalog = InMemoryTourCatalog::new();
        catalog.add_tour(def("a")).unwrap();
        catalog.add_tour(def("b")).unwrap();
        drop(catalog.launch(&ids(&["a", "b"]), false));

        catalog.dispatch_event("a", &TourEvent::running(0));
        assert_eq!(catalog.active().as_deref(), Some("a"));

        catalog.dispatch_event("a", &TourEvent::finished(0));
        assert_eq!(catalog.active().as_deref(), Some("b"));
        assert!(catalog.is_completed("a"));
    }

    #[test]
    fn non_forced_launch_skips_completed() {
        let catalog = InMemoryTourCatalog::new();
        catalog.add_tour(def("a")).unwrap();
        drop(catalog.launch(&ids(&["a"]), false));
        catalog.dispatch_event("a", &TourEvent::running(0));
        catalog.dispatch_event("a", &TourEvent::skipped(0));
        assert_eq!(catalog.active(), None);

        drop(catalog.launch(&ids(&["a"]), false));
        assert_eq!(catalog.active(), None);

        drop(catalog.launch(&ids(&["a"]), true));
        assert_eq!(catalog.active().as_deref(), Some("a"));
    }

    #[test]
    fn completion_survives_removal_until_forgotten() {
        let catalog = InMemoryTourCatalog::new();
        for id in ["ns:a:1", "ns:b:1"] {
            catalog.add_tour(def(id)).unwrap();
            catalog.dispatch_event(id, &TourEvent::running(0));
            catalog.dispatch_event(id, &TourEvent::finished(0));
        }

        catalog.remove_tour("ns:a:1");
        assert!(catalog.is_completed("ns:a:1"));

        catalog.forget_completed("ns:a:");
        assert!(!catalog.is_completed("ns:a:1"));
        assert!(catalog.is_completed("ns:b:1"));
    }

    #[test]
    fn errored_tour_is_not_completed() {
        let catalog = InMemoryTourCatalog::new();
        catalog.add_tour(def("a")).unwrap();
        drop(catalog.launch(&ids(&["a"]), false));
        catalog.dispatch_event("a", &TourEvent::error(0));

        assert!(!catalog.is_completed("a"));
        assert_eq!(catalog.active(), None);
    }

    #[test]
    fn removing_active_tour_activates_next() {
        let catalog = InMemoryTourCatalog::new();
        catalog.add_tour(def("a")).unwrap();
        catalog.add_tour(def("b")).unwrap();
        drop(catalog.launch(&ids(&["a", "b"]), false));

        catalog.remove_tour("a");
        assert_eq!(catalog.active().as_deref(), Some("b"));
        assert!(catalog.pending().is_empty());
    }

    #[test]
    fn dispatch_to_unknown_tour_is_none() {
        let catalog = InMemoryTourCatalog::new();
        assert!(catalog.dispatch_event("nope", &TourEvent::running(0)).is_none());
    }

    #[test]
    fn changed_signal_reports_add_and_remove() {
        let catalog = InMemoryTourCatalog::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        catalog.changed().subscribe(move |c| s.lock().push(c.clone()));

        catalog.add_tour(def("a")).unwrap();
        catalog.remove_tour("a");

        assert_eq!(
            *seen.lock(),
            vec![
                CatalogChange::Added("a".to_string()),
                CatalogChange::Removed("a".to_string())
            ]
        );
    }

    #[test]
    fn launch_future_waits_for_ready() {
        let catalog = InMemoryTourCatalog::new();
        catalog.add_tour(def("a")).unwrap();

        let mut pending = catalog.launch(&ids(&["a"]), false);
        assert!((&mut pending).now_or_never().is_none());

        catalog.mark_ready();
        assert!(catalog.launch(&ids(&["a"]), false).now_or_never().is_some());
    }

    #[tokio::test]
    async fn launch_future_resolves_after_mark_ready() {
        let catalog = Arc::new(InMemoryTourCatalog::new());
        catalog.add_tour(def("a")).unwrap();

        let launch = catalog.launch(&ids(&["a"]), false);
        let c = Arc::clone(&catalog);
        tokio::spawn(async move { c.mark_ready() });

        assert!(launch.await.is_ok());
        assert!(catalog.is_ready());
    }
}

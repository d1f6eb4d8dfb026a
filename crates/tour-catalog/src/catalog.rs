//! The catalog interface
//!
//! [`TourCatalog`] is what the synchronizer and the UI talk to. It owns every
//! registered [`Tour`]; callers keep ids and look tours up when needed.

use crate::error::CatalogError;
use futures::future::BoxFuture;
use std::sync::Arc;
use tour_core::{Tour, TourDefinition};

/// Resolves once the launched tours can be shown
pub type LaunchFuture = BoxFuture<'static, Result<(), CatalogError>>;

/// Registry mapping tour id to tour
pub trait TourCatalog: Send + Sync {
    /// Build and register a tour; returns its id
    ///
    /// # Errors
    /// - `CatalogError::InvalidTour` if the definition fails validation
    /// - `CatalogError::DuplicateTour` if the id is taken
    fn add_tour(&self, def: TourDefinition) -> Result<String, CatalogError>;

    /// Unregister a tour, returning it if it existed
    fn remove_tour(&self, id: &str) -> Option<Arc<Tour>>;

    /// Look up a tour
    fn get(&self, id: &str) -> Option<Arc<Tour>>;

    /// Registered ids in registration order
    fn keys(&self) -> Vec<String>;

    /// Order definitions for registration and display
    ///
    /// Lower ranks first, unranked last; the sort is stable so equal ranks
    /// keep declaration order.
    fn sort_tours(&self, mut defs: Vec<TourDefinition>) -> Vec<TourDefinition> {
        defs.sort_by_key(|d| d.rank.map_or((1, 0), |r| (0, r)));
        defs
    }

    /// Request that tours be shown
    ///
    /// Without `force`, tours the user already completed are left alone.
    /// Bookkeeping happens before this returns; the future only waits for
    /// the surface to be ready.
    fn launch(&self, ids: &[String], force: bool) -> LaunchFuture;

    /// Drop completion records of ids starting with `prefix`
    ///
    /// Catalogs that do not track completion ignore this.
    fn forget_completed(&self, prefix: &str) {
        let _ = prefix;
    }

    /// Whether a tour is registered
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

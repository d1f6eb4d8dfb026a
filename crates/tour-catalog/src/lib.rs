//! Tour Catalog
//!
//! The process-wide registry that owns every [`tour_core::Tour`] by id.
//!
//! - [`TourCatalog`]: the interface consumers program against
//! - [`InMemoryTourCatalog`]: arena registry with a launch queue
//!
//! # Example
//!
//! ```rust
//! use tour_catalog::{InMemoryTourCatalog, TourCatalog};
//! use tour_core::{Step, TourDefinition, TourEvent};
//!
//! let catalog = InMemoryTourCatalog::ready();
//! let def = TourDefinition::new("intro", "Introduction")
//!     .with_steps(vec![Step::new("#toolbar", "Run cells from here")]);
//! let id = catalog.add_tour(def).unwrap();
//!
//! drop(catalog.launch(&[id.clone()], false));
//! assert_eq!(catalog.active().as_deref(), Some("intro"));
//!
//! catalog.dispatch_event(&id, &TourEvent::running(0));
//! assert!(catalog.get(&id).unwrap().is_running());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod error;
mod memory;

pub use catalog::{LaunchFuture, TourCatalog};
pub use error::CatalogError;
pub use memory::{CatalogChange, InMemoryTourCatalog};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

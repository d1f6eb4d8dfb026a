//! Tour Core
//!
//! Guided tours over an editing surface: the step model, display options,
//! and the status state machine driven by renderer callbacks.
//!
//! # Core Concepts
//!
//! - [`Tour`]: ordered steps plus a status machine fed by [`TourEvent`]s
//! - [`TourDefinition`]: plain record a tour is built from
//! - [`TourOptions`]: renderer preferences, merged field by field
//! - [`Signal`]: synchronous publish/subscribe used for every notification
//! - [`Menu`]: headless bookkeeping of launch entries
//!
//! # Example
//!
//! ```rust
//! use tour_core::{Step, Tour, TourEvent};
//!
//! let tour = Tour::new("intro", "Introduction", None);
//! tour.add_step(Step::new("#toolbar", "Run cells from here"));
//! tour.add_step(Step::new("#sidebar", "Files live here"));
//!
//! tour.handle_event(&TourEvent::running(0));
//! assert_eq!(tour.current_step_index(), Some(0));
//!
//! tour.handle_event(&TourEvent::finished(1));
//! assert!(!tour.is_running());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod definition;
pub mod error;
pub mod event;
pub mod menu;
pub mod options;
pub mod signal;
pub mod step;
pub mod tour;
pub mod translate;

// Re-exports
pub use definition::TourDefinition;
pub use error::TourError;
pub use event::{NotificationKind, TourEvent, TourNotification, TourStatus};
pub use menu::{Menu, MenuItem, MenuItemId};
pub use options::{
    BehaviorOptions, CssBlock, LocaleOptions, Merge, StyleOptions, TourOptions, TourStyles,
};
pub use signal::{Signal, SubscriptionId};
pub use step::{Placement, Step};
pub use tour::{Tour, TourSignals, LAUNCH_COMMAND};
pub use translate::{NullTranslator, Translator};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with tours
    pub use crate::{
        Merge, Signal, Step, Tour, TourDefinition, TourEvent, TourOptions, TourStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

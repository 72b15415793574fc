//! Session correlation.
//!
//! Recovers the id of the operator's embedded widget session from two
//! observation sources and tracks its lifecycle in an explicit state
//! machine. The id is a convenience for display and debugging, not a
//! trust boundary.

mod scan;
mod tracker;

pub use scan::{iframe_candidate, strategy_candidate};
pub use tracker::SessionTracker;

/// Element id of the widget container the console mounts.
pub const CONTAINER_ELEMENT_ID: &str = "shipwallet-container";
/// Element id of the widget iframe inside the container.
pub const IFRAME_ELEMENT_ID: &str = "shipwallet-iframe";

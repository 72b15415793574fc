//! # madtap Protocols
//!
//! Interface definitions for madtap's observation pipeline.
//! Contains only traits and data types - no implementations.
//!
//! ## Core Traits
//!
//! - [`PageTransport`] - the network-call primitive a console page issues its
//!   traffic through
//! - [`NetworkTap`] - the observation capability invoked for every completed
//!   call

pub mod error;
pub mod events;
pub mod tap;
pub mod transport;

// Re-export core traits and types
pub use error::TransportError;
pub use events::{DomSnapshot, SessionChange};
pub use tap::NetworkTap;
pub use transport::{header_value, HttpMethod, PageRequest, PageResponse, PageTransport};

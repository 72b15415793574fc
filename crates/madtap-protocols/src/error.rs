//! Error types for the transport layer.

use thiserror::Error;

/// Errors surfaced by a [`PageTransport`](crate::PageTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be built or sent as given.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying connection failed.
    #[error("Network error: {0}")]
    Network(String),
}

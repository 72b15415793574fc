//! Passive network observation.

use async_trait::async_trait;

use crate::transport::{PageRequest, PageResponse};

/// Observer of completed page HTTP calls.
///
/// A tap sees every request/response pair once the response has been
/// received; delivery to the caller does not wait for it. Taps must
/// never alter the exchange: the transport hands out shared views, and
/// any failure inside a tap stays inside the tap.
#[async_trait]
pub trait NetworkTap: Send + Sync {
    /// Called once per completed call. Errors must be handled (logged)
    /// internally; this method cannot fail the call it observes.
    async fn on_call(&self, request: &PageRequest, response: &PageResponse);
}

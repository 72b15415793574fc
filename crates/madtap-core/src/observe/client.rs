//! Pass-through transport decorator.

use std::sync::Arc;

use async_trait::async_trait;

use madtap_protocols::{HttpMethod, NetworkTap, PageRequest, PageResponse, PageTransport, TransportError};

use super::StagedRequest;

/// Transport decorator that shows every completed call to its taps.
///
/// The wrapped transport's result is returned unchanged. Taps receive
/// shared views of the exchange on their own tasks, so delivery of the
/// response never waits on them and nothing a tap does can fail the
/// call. A failed call is returned without tap invocation since there
/// is no response to inspect.
pub struct ObservedClient {
    inner: Arc<dyn PageTransport>,
    taps: Vec<Arc<dyn NetworkTap>>,
}

impl ObservedClient {
    /// Wrap a transport. Taps are fixed for the life of the client.
    pub fn new(inner: Arc<dyn PageTransport>, taps: Vec<Arc<dyn NetworkTap>>) -> Self {
        Self { inner, taps }
    }

    /// Begin an event-driven request bound to this client.
    pub fn stage(&self, method: HttpMethod, url: impl Into<String>) -> StagedRequest<'_> {
        StagedRequest::new(self, method, url.into())
    }
}

#[async_trait]
impl PageTransport for ObservedClient {
    async fn execute(&self, request: PageRequest) -> Result<PageResponse, TransportError> {
        let response = self.inner.execute(request.clone()).await?;

        for tap in &self.taps {
            let tap = tap.clone();
            let request = request.clone();
            let response = response.clone();
            tokio::spawn(async move {
                tap.on_call(&request, &response).await;
            });
        }

        Ok(response)
    }
}

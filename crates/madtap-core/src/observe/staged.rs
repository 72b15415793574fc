//! Event-driven request construction.

use bytes::Bytes;

use madtap_protocols::{HttpMethod, PageRequest, PageResponse, PageTransport, TransportError};

use super::ObservedClient;

/// A request under construction, bound to the client that will send it.
///
/// Mirrors the open/set-header/send shape of the console's own request
/// objects: each value is captured at the moment it is set, and the
/// completed call flows through the owning [`ObservedClient`] so its taps
/// see exactly what was staged.
pub struct StagedRequest<'a> {
    client: &'a ObservedClient,
    request: PageRequest,
}

impl<'a> StagedRequest<'a> {
    pub(super) fn new(client: &'a ObservedClient, method: HttpMethod, url: String) -> Self {
        Self {
            client,
            request: PageRequest::new(method, url),
        }
    }

    /// Record a header on the staged call.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Attach the request body.
    pub fn body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.request.body = Some(body.into());
        self
    }

    /// The request as staged so far.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Send the staged call through the owning client.
    pub async fn send(self) -> Result<PageResponse, TransportError> {
        self.client.execute(self.request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use async_trait::async_trait;

    struct EchoTransport;

    #[async_trait]
    impl PageTransport for EchoTransport {
        async fn execute(&self, request: PageRequest) -> Result<PageResponse, TransportError> {
            Ok(PageResponse::new(200).with_body(request.url))
        }
    }

    fn client() -> ObservedClient {
        ObservedClient::new(Arc::new(EchoTransport), Vec::new())
    }

    #[tokio::test]
    async fn test_headers_captured_at_set_time() {
        let client = client();
        let mut staged = client.stage(HttpMethod::Post, "https://mad.ingrid.com/graphql");
        staged.header("Authorization", "Bearer one");
        staged.header("Content-Type", "application/json");

        let request = staged.request();
        assert_eq!(request.header("authorization"), Some("Bearer one"));
        assert_eq!(request.headers.len(), 2);
    }

    #[tokio::test]
    async fn test_send_delivers_the_staged_request() {
        let client = client();
        let mut staged = client.stage(HttpMethod::Get, "https://mad.ingrid.com/api/things");
        staged.body("{}");

        let response = staged.send().await.unwrap();
        assert_eq!(
            response.body,
            Bytes::from("https://mad.ingrid.com/api/things")
        );
    }
}

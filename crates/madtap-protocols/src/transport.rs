//! Page-side HTTP transport abstraction.
//!
//! The merchant console page issues its traffic through a [`PageTransport`].
//! Decorators compose over this trait to observe calls without altering
//! them; the trait itself carries no observation semantics.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// HTTP method of a page call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound call, exactly as the page issues it.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header pairs in the order they were supplied. Names keep their
    /// original casing; lookups go through [`header_value`].
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl PageRequest {
    /// Create a request with no headers and no body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header pair.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// The response delivered back to the page.
///
/// The body is a shared [`Bytes`] buffer, so observers can inspect it
/// without consuming the caller's own read.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl PageResponse {
    /// Create an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Attach a response body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Case-insensitive lookup over raw header pairs. Returns the first match.
pub fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// The network-call primitive a page uses for its outbound traffic.
///
/// Implementations forward the call as given; they must not reorder, mutate,
/// or drop requests. Decorators built on top rely on receiving every call
/// exactly as issued.
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Execute one call and return its response.
    async fn execute(&self, request: PageRequest) -> Result<PageResponse, TransportError>;
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;

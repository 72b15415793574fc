//! Pass-through call observation.
//!
//! [`ObservedClient`] composes over any [`PageTransport`] and shows every
//! completed call to a fixed set of taps without altering the call itself.
//!
//! [`PageTransport`]: madtap_protocols::PageTransport

mod client;
mod http;
mod staged;

pub use client::ObservedClient;
pub use http::ReqwestTransport;
pub use staged::StagedRequest;

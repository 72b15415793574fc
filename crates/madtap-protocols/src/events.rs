//! Event types shared between the observer and its consumers.

use serde::{Deserialize, Serialize};

/// A point-in-time view of the widget mount in the page DOM.
///
/// Produced by whatever watches the page (a capture file, a live DOM
/// bridge) and consumed by the session tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomSnapshot {
    /// Whether the widget container element is currently in the DOM.
    pub container_present: bool,
    /// Address of the widget iframe, if one is mounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe_src: Option<String>,
}

/// A transition of the correlated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "change", content = "sessionId")]
pub enum SessionChange {
    /// A new session became active.
    Opened(String),
    /// The active session ended.
    Closed(String),
}

impl SessionChange {
    /// The session identifier this change refers to.
    pub fn id(&self) -> &str {
        match self {
            SessionChange::Opened(id) | SessionChange::Closed(id) => id,
        }
    }
}

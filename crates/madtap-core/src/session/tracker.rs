//! Session lifecycle state machine.

use madtap_protocols::{DomSnapshot, SessionChange};

use super::scan;

/// Tracks the operator's widget session.
///
/// A candidate only activates while the hosting container element is
/// present, and never when it matches the most recently closed id. The
/// tracker assumes the container absent until a snapshot reports it.
/// Exactly one closed id is remembered; closing two sessions in
/// succession forgets the first.
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Option<String>,
    last_closed: Option<String>,
    container_present: bool,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active session id.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Most recently closed session id.
    pub fn last_closed(&self) -> Option<&str> {
        self.last_closed.as_deref()
    }

    /// Whether the widget container was present in the last snapshot.
    pub fn container_present(&self) -> bool {
        self.container_present
    }

    /// Consider a session candidate for activation.
    pub fn note_candidate(&mut self, candidate: &str) -> Option<SessionChange> {
        if !self.container_present {
            return None;
        }
        if self.last_closed.as_deref() == Some(candidate) {
            return None;
        }
        if self.active.as_deref() == Some(candidate) {
            return None;
        }
        self.active = Some(candidate.to_string());
        Some(SessionChange::Opened(candidate.to_string()))
    }

    /// Apply a DOM snapshot: a disappeared container closes the active
    /// session, a present iframe address is re-scanned for a candidate.
    pub fn note_dom(&mut self, snapshot: &DomSnapshot) -> Option<SessionChange> {
        self.container_present = snapshot.container_present;
        if !snapshot.container_present {
            return self.close();
        }
        let address = snapshot.iframe_src.as_deref()?;
        let candidate = scan::iframe_candidate(address)?;
        self.note_candidate(&candidate)
    }

    /// The operator dismissed the session display.
    pub fn dismiss(&mut self) -> Option<SessionChange> {
        self.close()
    }

    fn close(&mut self) -> Option<SessionChange> {
        let id = self.active.take()?;
        self.last_closed = Some(id.clone());
        Some(SessionChange::Closed(id))
    }
}

//! Broadcast notifications for observer consumers.

use tokio::sync::broadcast;

use madtap_protocols::SessionChange;

/// Notification carrying the encoded private key, sent once per
/// successful acquisition.
#[derive(Clone)]
pub struct KeyReadySignal {
    sender: broadcast::Sender<String>,
}

impl KeyReadySignal {
    /// Create a new key signal.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Announce a stored key. Delivery is best-effort; without
    /// subscribers the value is dropped.
    pub(crate) fn notify(&self, encoded: String) {
        let _ = self.sender.send(encoded);
    }

    /// Subscribe to key notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for KeyReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-broadcast of session open/close transitions.
#[derive(Clone)]
pub struct SessionSignal {
    sender: broadcast::Sender<SessionChange>,
}

impl SessionSignal {
    /// Create a new session signal.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Announce a transition. Delivery is best-effort.
    pub(crate) fn notify(&self, change: SessionChange) {
        let _ = self.sender.send(change);
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.sender.subscribe()
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_key_signal_delivers() {
        let signal = KeyReadySignal::new();
        let mut rx = signal.subscribe();

        signal.notify("aHVudGVyMg==".to_string());
        assert_eq!(rx.recv().await.unwrap(), "aHVudGVyMg==");
    }

    #[test]
    fn test_notify_without_subscribers() {
        let signal = KeyReadySignal::new();
        // Must not panic or block
        signal.notify("value".to_string());
    }

    #[tokio::test]
    async fn test_session_signal_delivers_in_order() {
        let signal = SessionSignal::new();
        let mut rx = signal.subscribe();

        signal.notify(SessionChange::Opened("a".to_string()));
        signal.notify(SessionChange::Closed("a".to_string()));

        assert_eq!(rx.recv().await.unwrap(), SessionChange::Opened("a".into()));
        assert_eq!(rx.recv().await.unwrap(), SessionChange::Closed("a".into()));
    }
}

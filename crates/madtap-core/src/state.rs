//! Observed credential state.

use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug, Default)]
struct StateInner {
    bearer_token: Option<String>,
    site_id: Option<String>,
    private_key: Option<String>,
}

/// Shared handle to the recovered credential state.
///
/// Clones share one underlying store. Only the observer writes; setters
/// report whether the stored value actually changed, so re-observing an
/// identical value is a no-op that triggers no dependent work.
#[derive(Debug, Clone, Default)]
pub struct ObserverState {
    inner: Arc<RwLock<StateInner>>,
}

impl ObserverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently observed bearer token.
    pub fn bearer_token(&self) -> Option<String> {
        self.inner.read().bearer_token.clone()
    }

    /// Currently observed site id.
    pub fn site_id(&self) -> Option<String> {
        self.inner.read().site_id.clone()
    }

    /// Base64-encoded private key, if acquisition has succeeded.
    pub fn private_key(&self) -> Option<String> {
        self.inner.read().private_key.clone()
    }

    /// Both credential halves, read under one lock.
    pub fn credential(&self) -> (Option<String>, Option<String>) {
        let inner = self.inner.read();
        (inner.bearer_token.clone(), inner.site_id.clone())
    }

    /// Whether both credential halves are present.
    pub fn has_credential(&self) -> bool {
        let inner = self.inner.read();
        inner.bearer_token.is_some() && inner.site_id.is_some()
    }

    /// Store an observed token. Returns true if the stored value changed.
    pub(crate) fn set_bearer_token(&self, token: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.bearer_token.as_deref() == Some(token) {
            return false;
        }
        inner.bearer_token = Some(token.to_string());
        true
    }

    /// Store an observed site id. Returns true if the stored value changed.
    pub(crate) fn set_site_id(&self, site_id: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.site_id.as_deref() == Some(site_id) {
            return false;
        }
        inner.site_id = Some(site_id.to_string());
        true
    }

    pub(crate) fn set_private_key(&self, encoded: String) {
        self.inner.write().private_key = Some(encoded);
    }

    pub(crate) fn clear_private_key(&self) {
        self.inner.write().private_key = None;
    }
}

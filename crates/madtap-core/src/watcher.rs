//! The observer: credential extraction and session correlation.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info};
use url::Url;

use madtap_protocols::{DomSnapshot, NetworkTap, PageRequest, PageResponse, SessionChange};

use crate::config::{ConfigError, WatcherConfig};
use crate::env::Environment;
use crate::keys::KeyFetcher;
use crate::session::{self, SessionTracker};
use crate::signal::{KeyReadySignal, SessionSignal};
use crate::state::ObserverState;

/// URL substring marking a Proposal GraphQL call.
const PROPOSAL_MARKER: &str = "Proposal";
/// Query parameter carrying the site id on page calls.
const SITE_ID_PARAM: &str = "siteId";

/// Observes one console page's traffic and DOM activity.
///
/// Registered as a [`NetworkTap`] on the page's transport, the watcher
/// extracts the bearer token and site id from outbound calls, drives key
/// acquisition when the credential pair completes or changes, and feeds
/// Proposal responses and DOM snapshots into session correlation. No
/// observation path can fail the observed call.
pub struct PageWatcher {
    /// Parsed page URL; base for resolving relative call URLs.
    page_url: Url,
    state: ObserverState,
    keys: KeyFetcher,
    key_signal: KeyReadySignal,
    session_signal: SessionSignal,
    tracker: Mutex<SessionTracker>,
}

impl PageWatcher {
    /// Build a watcher for the configured console page.
    pub fn new(config: &WatcherConfig) -> Result<Self, ConfigError> {
        let page_url = Url::parse(&config.page_url).map_err(|e| ConfigError::InvalidValue {
            field: "page_url".to_string(),
            message: e.to_string(),
        })?;

        let api_base = if config.fetch_keys {
            config.api_base.clone().or_else(|| {
                Environment::from_page_url(&config.page_url)
                    .map(|env| env.api_base().to_string())
            })
        } else {
            None
        };
        if config.fetch_keys && api_base.is_none() {
            debug!("Unrecognized console origin, key acquisition disabled");
        }

        let state = ObserverState::new();
        let key_signal = KeyReadySignal::new();
        let keys = KeyFetcher::new(state.clone(), key_signal.clone(), api_base);

        Ok(Self {
            page_url,
            state,
            keys,
            key_signal,
            session_signal: SessionSignal::new(),
            tracker: Mutex::new(SessionTracker::new()),
        })
    }

    /// Shared handle to the recovered credentials.
    pub fn state(&self) -> ObserverState {
        self.state.clone()
    }

    /// Currently active session id, if any.
    pub fn session(&self) -> Option<String> {
        self.tracker.lock().active().map(str::to_string)
    }

    /// Whether a key acquisition is currently outstanding.
    pub fn key_fetch_in_flight(&self) -> bool {
        self.keys.in_flight()
    }

    /// Receiver of key-stored notifications.
    pub fn on_key_ready(&self) -> broadcast::Receiver<String> {
        self.key_signal.subscribe()
    }

    /// Receiver of session transitions.
    pub fn on_session_change(&self) -> broadcast::Receiver<SessionChange> {
        self.session_signal.subscribe()
    }

    /// Feed a DOM snapshot into session correlation.
    pub fn handle_dom(&self, snapshot: &DomSnapshot) {
        let change = self.tracker.lock().note_dom(snapshot);
        self.announce(change);
    }

    /// The operator dismissed the session display.
    pub fn dismiss_session(&self) {
        let change = self.tracker.lock().dismiss();
        self.announce(change);
    }

    /// Site id from the call URL, with relative URLs resolved against
    /// the observed page.
    fn site_id_of(&self, raw: &str) -> Option<String> {
        let url = match Url::options().base_url(Some(&self.page_url)).parse(raw) {
            Ok(url) => url,
            Err(e) => {
                debug!("Unparseable call URL {:?}: {}", raw, e);
                return None;
            }
        };
        url.query_pairs()
            .find(|(name, _)| name == SITE_ID_PARAM)
            .map(|(_, value)| value.into_owned())
    }

    fn scan_proposal(&self, response: &PageResponse) {
        let body: Value = match serde_json::from_slice(&response.body) {
            Ok(body) => body,
            Err(e) => {
                debug!("Proposal body is not JSON: {}", e);
                return;
            }
        };
        let Some(candidate) = session::strategy_candidate(&body) else {
            return;
        };
        debug!("Session candidate from Proposal body: {}", candidate);
        let change = self.tracker.lock().note_candidate(&candidate);
        self.announce(change);
    }

    fn announce(&self, change: Option<SessionChange>) {
        let Some(change) = change else { return };
        match &change {
            SessionChange::Opened(id) => info!("Session opened: {}", id),
            SessionChange::Closed(id) => info!("Session closed: {}", id),
        }
        self.session_signal.notify(change);
    }
}

#[async_trait]
impl NetworkTap for PageWatcher {
    async fn on_call(&self, request: &PageRequest, response: &PageResponse) {
        let mut changed = false;

        if let Some(token) = bearer_token(request) {
            if self.state.set_bearer_token(token) {
                info!("Observed bearer token");
                changed = true;
            }
        }
        if let Some(site_id) = self.site_id_of(&request.url) {
            if self.state.set_site_id(&site_id) {
                info!("Observed site id: {}", site_id);
                changed = true;
            }
        }
        if changed && self.state.has_credential() {
            self.keys.trigger();
        }

        if request.url.contains(PROPOSAL_MARKER) {
            self.scan_proposal(response);
        }
    }
}

/// Token from an `Authorization: Bearer <token>` request header.
fn bearer_token(request: &PageRequest) -> Option<&str> {
    request
        .header("authorization")?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;

//! Derived-secret acquisition.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::env::PRIVATE_KEY_PATH;
use crate::signal::KeyReadySignal;
use crate::state::ObserverState;

/// Errors internal to a single acquisition attempt. Never surfaced to
/// callers; every failure resets the stored key and is logged.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Key request failed: {0}")]
    Network(String),

    #[error("Key endpoint returned status {0}")]
    Status(u16),

    #[error("Key response body invalid: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Deserialize)]
struct PrivateKeyResponse {
    private_key: String,
}

/// Fetches the site private key once both credential halves are known.
///
/// At most one fetch is outstanding at a time; triggers during that
/// window are dropped. Every settled attempt either stores a freshly
/// encoded key or resets the stored key to absent. A request that never
/// settles leaves the guard taken until restart.
pub struct KeyFetcher {
    state: ObserverState,
    signal: KeyReadySignal,
    /// Full URL of the key endpoint. `None` disables acquisition.
    endpoint: Option<String>,
    client: reqwest::Client,
    in_flight: Arc<AtomicBool>,
}

impl KeyFetcher {
    /// Create a fetcher against the given API base. `None` makes every
    /// trigger a silent no-op.
    pub fn new(state: ObserverState, signal: KeyReadySignal, api_base: Option<String>) -> Self {
        Self {
            state,
            signal,
            endpoint: api_base.map(|base| format!("{}{}", base, PRIVATE_KEY_PATH)),
            client: reqwest::Client::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an acquisition is currently outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Begin an acquisition if one is due and none is outstanding.
    ///
    /// The fetch runs on its own task; this returns immediately.
    pub fn trigger(&self) {
        let (Some(token), Some(site_id)) = self.state.credential() else {
            return;
        };
        let Some(endpoint) = self.endpoint.clone() else {
            debug!("No key endpoint for this page, skipping acquisition");
            return;
        };
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("Key acquisition already in flight");
            return;
        }

        let state = self.state.clone();
        let signal = self.signal.clone();
        let client = self.client.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            match fetch_key(&client, &endpoint, &token, &site_id).await {
                Ok(raw) => {
                    let encoded = STANDARD.encode(raw.as_bytes());
                    state.set_private_key(encoded.clone());
                    info!("Private key stored");
                    signal.notify(encoded);
                }
                Err(e) => {
                    warn!("Key acquisition failed: {}", e);
                    state.clear_private_key();
                }
            }
            in_flight.store(false, Ordering::SeqCst);
        });
    }
}

async fn fetch_key(
    client: &reqwest::Client,
    endpoint: &str,
    token: &str,
    site_id: &str,
) -> Result<String, KeyError> {
    let response = client
        .get(endpoint)
        .query(&[("site_id", site_id)])
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| KeyError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(KeyError::Status(response.status().as_u16()));
    }

    let body: PrivateKeyResponse = response
        .json()
        .await
        .map_err(|e| KeyError::InvalidBody(e.to_string()))?;

    Ok(body.private_key)
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;

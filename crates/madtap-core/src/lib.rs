//! # madtap Core
//!
//! Passive recovery of credential and session state from an observed
//! merchant-console page.
//!
//! ## Components
//!
//! - [`ObservedClient`] - pass-through transport decorator that shows every
//!   completed call to registered taps
//! - [`PageWatcher`] - the observer: extracts credentials from page calls,
//!   drives key acquisition, correlates the widget session
//! - [`SessionTracker`] - state machine over the correlated session
//! - [`Replayer`] - feeds recorded console traffic through a watcher
//!
//! The watcher never alters, delays, or gates the traffic it observes; every
//! failure on an observation path degrades to plain pass-through.

pub mod capture;
pub mod config;
pub mod env;
pub mod keys;
pub mod observe;
pub mod replay;
pub mod session;
pub mod signal;
pub mod state;
pub mod watcher;

pub use capture::{CaptureError, CaptureEvent, CapturedCall};
pub use config::{ConfigError, WatcherConfig};
pub use env::Environment;
pub use keys::{KeyError, KeyFetcher};
pub use observe::{ObservedClient, ReqwestTransport, StagedRequest};
pub use replay::{ReplayReport, Replayer};
pub use session::SessionTracker;
pub use signal::{KeyReadySignal, SessionSignal};
pub use state::ObserverState;
pub use watcher::PageWatcher;

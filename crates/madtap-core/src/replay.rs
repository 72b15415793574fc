//! Replay of recorded console traffic through a watcher.

use std::time::{Duration, Instant};

use madtap_protocols::{NetworkTap, SessionChange};
use tracing::warn;

use crate::capture::CaptureEvent;
use crate::watcher::PageWatcher;

/// How often to poll for an outstanding key acquisition.
const SETTLE_POLL: Duration = Duration::from_millis(10);
/// How long to wait for an outstanding key acquisition before giving up.
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

/// What a replay recovered.
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    /// Number of call events fed through the watcher.
    pub calls: usize,
    pub bearer_token: Option<String>,
    pub site_id: Option<String>,
    /// Base64-encoded private key, when acquisition ran and succeeded.
    pub private_key: Option<String>,
    /// Session ids opened, in order.
    pub opened: Vec<String>,
    /// Session ids closed, in order.
    pub closed: Vec<String>,
}

/// Feeds capture events into a [`PageWatcher`] in recorded order.
///
/// Calls go through the watcher's tap exactly as live traffic would; DOM
/// snapshots and dismissals go through the watcher's session entry points.
/// Any key acquisition armed by the replayed credentials is left to finish
/// (bounded) before the report is assembled.
pub struct Replayer<'a> {
    watcher: &'a PageWatcher,
}

impl<'a> Replayer<'a> {
    pub fn new(watcher: &'a PageWatcher) -> Self {
        Self { watcher }
    }

    /// Run the capture and report what the watcher recovered.
    pub async fn run(&self, events: &[CaptureEvent]) -> ReplayReport {
        let mut changes = self.watcher.on_session_change();
        let mut report = ReplayReport::default();

        for event in events {
            match event {
                CaptureEvent::Call(call) => {
                    let (request, response) = call.to_exchange();
                    self.watcher.on_call(&request, &response).await;
                    report.calls += 1;
                }
                CaptureEvent::Dom(snapshot) => self.watcher.handle_dom(snapshot),
                CaptureEvent::Dismiss => self.watcher.dismiss_session(),
            }

            while let Ok(change) = changes.try_recv() {
                match change {
                    SessionChange::Opened(id) => report.opened.push(id),
                    SessionChange::Closed(id) => report.closed.push(id),
                }
            }
        }

        self.settle().await;

        let state = self.watcher.state();
        report.bearer_token = state.bearer_token();
        report.site_id = state.site_id();
        report.private_key = state.private_key();
        report
    }

    /// Wait for an in-flight key acquisition to complete.
    async fn settle(&self) {
        let started = Instant::now();
        while self.watcher.key_fetch_in_flight() {
            if started.elapsed() > SETTLE_LIMIT {
                warn!("Key acquisition still outstanding after replay");
                return;
            }
            tokio::time::sleep(SETTLE_POLL).await;
        }
    }
}

//! Recorded console traffic.
//!
//! Capture files are JSON Lines, one event per line, produced by the
//! tooling that watches a live console page (call completions, presence
//! of the [`shipwallet-container`](crate::session::CONTAINER_ELEMENT_ID)
//! element, the address of the
//! [`shipwallet-iframe`](crate::session::IFRAME_ELEMENT_ID), operator
//! dismissals). [`Replayer`](crate::Replayer) feeds them back through a
//! watcher in order.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use madtap_protocols::{DomSnapshot, HttpMethod, PageRequest, PageResponse};

/// Errors reading a capture file.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed capture line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// One line of a capture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum CaptureEvent {
    /// A completed page call.
    Call(CapturedCall),
    /// A DOM snapshot.
    Dom(DomSnapshot),
    /// The operator dismissed the session display.
    Dismiss,
}

/// A completed page call as recorded by the capture tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedCall {
    /// When the call completed.
    pub at: DateTime<Utc>,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub request_headers: BTreeMap<String, String>,
    pub status: u16,
    /// Response body, recorded when the response was JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl CapturedCall {
    /// Rebuild the request/response pair this record describes.
    pub fn to_exchange(&self) -> (PageRequest, PageResponse) {
        let mut request = PageRequest::new(self.method, self.url.clone());
        for (name, value) in &self.request_headers {
            request.headers.push((name.clone(), value.clone()));
        }

        let mut response = PageResponse::new(self.status);
        if let Some(body) = &self.body {
            response.body = Bytes::from(serde_json::to_vec(body).unwrap_or_default());
        }
        (request, response)
    }
}

/// Read and parse a JSON Lines capture file.
pub fn read_capture(path: &Path) -> Result<Vec<CaptureEvent>, CaptureError> {
    let content = fs::read_to_string(path)?;
    parse_capture(&content)
}

/// Parse capture text. Blank lines are skipped; a malformed line fails
/// the whole parse with its line number.
pub fn parse_capture(content: &str) -> Result<Vec<CaptureEvent>, CaptureError> {
    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|e| CaptureError::Malformed {
            line: index + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call_event() {
        let line = r#"{"event":"call","at":"2025-11-04T12:00:00Z","method":"GET","url":"https://mad.ingrid.com/api?siteId=42","requestHeaders":{"Authorization":"Bearer abc"},"status":200,"body":{"ok":true}}"#;
        let events = parse_capture(line).unwrap();
        assert_eq!(events.len(), 1);

        let CaptureEvent::Call(call) = &events[0] else {
            panic!("expected call event");
        };
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.status, 200);
        assert_eq!(
            call.request_headers.get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
    }

    #[test]
    fn test_parse_dom_and_dismiss_events() {
        let content = r#"
            {"event":"dom","containerPresent":true,"iframeSrc":"https://widget.ingrid.com/frame"}
            {"event":"dismiss"}
        "#;
        let events = parse_capture(content).unwrap();
        assert_eq!(events.len(), 2);

        let CaptureEvent::Dom(snapshot) = &events[0] else {
            panic!("expected dom event");
        };
        assert!(snapshot.container_present);
        assert!(matches!(events[1], CaptureEvent::Dismiss));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let content = "\n\n{\"event\":\"dismiss\"}\n\n";
        let events = parse_capture(content).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let content = "{\"event\":\"dismiss\"}\nnot json\n";
        let err = parse_capture(content).unwrap_err();
        match err {
            CaptureError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_event_rejected() {
        let content = r#"{"event":"screenshot"}"#;
        assert!(parse_capture(content).is_err());
    }

    #[test]
    fn test_to_exchange() {
        let line = r#"{"event":"call","at":"2025-11-04T12:00:00Z","method":"POST","url":"/graphql?op=Proposal","requestHeaders":{"Authorization":"Bearer abc"},"status":200,"body":{"availableDeliveryStrategies":[{"code":"ingrid[s]"}]}}"#;
        let events = parse_capture(line).unwrap();
        let CaptureEvent::Call(call) = &events[0] else {
            panic!("expected call event");
        };

        let (request, response) = call.to_exchange();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("authorization"), Some("Bearer abc"));
        assert_eq!(response.status, 200);

        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["availableDeliveryStrategies"][0]["code"], "ingrid[s]");
    }

    #[test]
    fn test_round_trip() {
        let event = CaptureEvent::Call(CapturedCall {
            at: "2025-11-04T12:00:00Z".parse().unwrap(),
            method: HttpMethod::Get,
            url: "https://mad.ingrid.com/api".to_string(),
            request_headers: BTreeMap::new(),
            status: 204,
            body: None,
        });

        let line = serde_json::to_string(&event).unwrap();
        assert!(line.contains("\"event\":\"call\""));

        let parsed = parse_capture(&line).unwrap();
        let CaptureEvent::Call(call) = &parsed[0] else {
            panic!("expected call event");
        };
        assert_eq!(call.status, 204);
        assert!(call.body.is_none());
    }

    #[test]
    fn test_read_capture_missing_file() {
        let result = read_capture(Path::new("/nonexistent/capture.jsonl"));
        assert!(matches!(result, Err(CaptureError::Io(_))));
    }
}

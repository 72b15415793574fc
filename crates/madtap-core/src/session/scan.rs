//! Session-candidate extraction.

use regex::Regex;
use serde_json::Value;

/// Array field scanned for in Proposal response bodies.
pub const STRATEGY_FIELD: &str = "availableDeliveryStrategies";
/// Prefix a qualifying strategy code starts with.
pub const CODE_PREFIX: &str = "ingrid";
/// Marker preceding the session id inside the widget iframe address.
pub const IFRAME_SESSION_MARKER: &str = "sessionId%22%3A%22";
/// Fixed width of a session identifier.
pub const SESSION_ID_LEN: usize = 36;

/// Extract a session candidate from a Proposal response body.
///
/// Searches the body depth-first for an `availableDeliveryStrategies`
/// array and takes the first entry whose `code` starts with `ingrid`. A
/// trailing bracketed suffix (`ingrid[abc]`) yields the bracket contents;
/// otherwise the whole code is the candidate.
pub fn strategy_candidate(body: &Value) -> Option<String> {
    let strategies = find_strategies(body)?;
    for entry in strategies {
        let Some(code) = entry.get("code").and_then(Value::as_str) else {
            continue;
        };
        if !code.starts_with(CODE_PREFIX) {
            continue;
        }
        return Some(bracket_suffix(code).unwrap_or_else(|| code.to_string()));
    }
    None
}

/// Depth-first search for the first strategies array anywhere in the body.
fn find_strategies(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(strategies)) = map.get(STRATEGY_FIELD) {
                return Some(strategies);
            }
            map.values().find_map(find_strategies)
        }
        Value::Array(items) => items.iter().find_map(find_strategies),
        _ => None,
    }
}

/// Contents of a trailing `[...]` suffix, if the code carries one.
fn bracket_suffix(code: &str) -> Option<String> {
    let re = Regex::new(r"\[([^\]]+)\]$").ok()?;
    re.captures(code).map(|cap| cap[1].to_string())
}

/// Extract the session id from a widget iframe address.
///
/// The id is the fixed-width run of characters directly after the
/// URL-encoded `"sessionId":"` marker. Addresses whose remainder is
/// shorter than the id width carry no candidate.
pub fn iframe_candidate(address: &str) -> Option<String> {
    let (_, rest) = address.split_once(IFRAME_SESSION_MARKER)?;
    rest.get(..SESSION_ID_LEN).map(str::to_string)
}

//! localStorage seeding.
//!
//! The seed is turned into a script registered to run at document creation,
//! so the entries exist before any page script reads them.

use serde_json::{Map, Value};

/// A seed payload that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("seed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("seed must be a JSON object, got {0}")]
    NotObject(&'static str),
}

/// Parse a single-line seed payload. Blank input means "no seeding".
pub fn parse_seed(payload: &str) -> Result<Map<String, Value>, SeedError> {
    if payload.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(payload)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(SeedError::NotObject("null")),
        Value::Bool(_) => Err(SeedError::NotObject("a boolean")),
        Value::Number(_) => Err(SeedError::NotObject("a number")),
        Value::String(_) => Err(SeedError::NotObject("a string")),
        Value::Array(_) => Err(SeedError::NotObject("an array")),
    }
}

/// Like [`parse_seed`], but a bad payload is logged and seeds nothing.
pub fn parse_seed_lenient(payload: &str) -> Map<String, Value> {
    parse_seed(payload).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring localStorage seed");
        Map::new()
    })
}

/// Escape `raw` for a single-quoted JS string literal.
///
/// Replacement order matters: backslashes first, so the escapes added for
/// quotes and line breaks are not doubled.
pub fn escape_single_quoted(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Build the seeding script, or `None` when there is nothing to seed.
///
/// Each value is stored as its raw JSON text, so string values keep their
/// quotes and the page reads them back with `JSON.parse`. Numbers keep the
/// literal they were written with (`1e2` stays `1e2`).
pub fn build_seed_script(seed: &Map<String, Value>) -> Option<String> {
    if seed.is_empty() {
        return None;
    }
    let mut body = String::new();
    for (key, value) in seed {
        body.push_str(&format!(
            "localStorage.setItem('{}', '{}');",
            escape_single_quoted(key),
            escape_single_quoted(&value.to_string()),
        ));
    }
    // about:blank and opaque origins throw on storage access.
    Some(format!("try {{ {body} }} catch (e) {{}}"))
}

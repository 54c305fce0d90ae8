//! Text and transfer encodings for JSON documents.
//!
//! Documents are always written with the same pretty printer (two-space
//! indentation, key order preserved) so that formatting a document twice
//! yields identical text.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Canonical text form of a JSON value.
pub fn to_pretty(value: &Value) -> String {
    // Serializing a `Value` into a string cannot fail.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::InvalidJson(e.to_string()))
}

/// Base64 of the canonical text, as expected in the `content` field of a write.
pub fn encode_content(value: &Value) -> String {
    STANDARD.encode(to_pretty(value).as_bytes())
}

/// Decodes a `content` field from the host.
///
/// The host wraps base64 at 60 columns, so line breaks are stripped first.
/// Empty content and a bare `null` decode to `None`. Bytes that are not UTF-8
/// text are reported as `InvalidJson`, like any other content that is not JSON.
pub fn decode_content(encoded: &str) -> Result<Option<Value>> {
    let compact: String = encoded
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::Decode(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| Error::InvalidJson(e.to_string()))?;

    if text.is_empty() {
        return Ok(None);
    }
    match parse(&text)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

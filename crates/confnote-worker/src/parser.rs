//! Recover structured fields from raw oracle output
//!
//! Oracles wrap their JSON in prose, markdown fences, or half-finished
//! sentences. The core owns this recovery step: scan for the first
//! well-formed JSON object substring (string- and escape-aware, so nested
//! braces and brace characters inside values do not confuse it), then map
//! the known keys onto the fixed field set.

use confnote_domain::CnFields;
use serde_json::Value;
use tracing::debug;

/// Parse raw oracle output into the fixed field set.
///
/// Unknown keys are ignored, not stored. JSON `null` and blank strings are
/// typed absence. A response whose first JSON object carries none of the
/// expected keys is a schema mismatch and fails as a whole: fields are never
/// partially populated from an unrecognized shape.
pub fn parse_oracle_response(response: &str) -> Result<CnFields, String> {
    let object =
        first_json_object(response).ok_or_else(|| "no JSON object in response".to_string())?;

    let mut fields = CnFields::default();
    let mut known = 0usize;

    for (key, value) in &object {
        if !CnFields::NAMES.contains(&key.as_str()) {
            debug!(key = %key, "ignoring unknown field");
            continue;
        }
        known += 1;
        if let Some(text) = scalar_to_string(value) {
            fields.set(key, text);
        }
    }

    if known == 0 {
        return Err("JSON object carries none of the expected fields".to_string());
    }
    Ok(fields)
}

/// Find the first substring that parses as a JSON object.
fn first_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let bytes = text.as_bytes();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'{' {
            if let Some(end) = matching_brace(bytes, index) {
                if let Ok(Value::Object(map)) = serde_json::from_str(&text[index..=end]) {
                    return Some(map);
                }
            }
        }
        index += 1;
    }
    None
}

/// Byte offset of the brace closing the one at `start`, honoring strings
/// and escapes.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Arrays and objects are not part of the flat schema.
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

//! Persistence codec
//!
//! Encodes a table's document map to JSON text and back. Every mutation is a
//! whole-file read-modify-write; there is no partial update or append log.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{JsontabError, Result};

/// Key → document mapping held by one table
pub type Documents = serde_json::Map<String, Value>;

/// Upper bound on nested "JSON inside a string" unwrapping
const MAX_VALUE_DEPTH: usize = 8;

/// Decode file contents into a document map.
///
/// Zero-length (or whitespace-only) input is an empty map, not an error.
pub fn decode(bytes: &[u8]) -> Result<Documents> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Documents::new());
    }

    match serde_json::from_slice::<Value>(bytes)? {
        Value::Object(map) => Ok(map),
        other => Err(JsontabError::Decode(format!(
            "table file holds {} instead of an object",
            kind_name(&other)
        ))),
    }
}

/// Encode a document map as compact JSON
pub fn encode(documents: &Documents) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(documents)?)
}

/// Read a table file.
///
/// Returns `None` when the file is zero-length, so callers can tell a table that
/// never received a document apart from one whose documents were all deleted.
pub fn load(path: &Path) -> Result<Option<Documents>> {
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    decode(&bytes).map(Some)
}

/// Read a table file, treating zero-length as an empty map
pub fn load_or_empty(path: &Path) -> Result<Documents> {
    Ok(load(path)?.unwrap_or_default())
}

/// Overwrite a table file with the encoded map
pub fn store(path: &Path, documents: &Documents) -> Result<()> {
    let bytes = encode(documents)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Turn textual-but-JSON-looking values into the structure they describe.
///
/// A string whose trimmed text starts like an object, array, or quoted literal is
/// parsed, and the result goes through the same check again. Any other value is
/// returned as given, so plain words stay strings.
pub fn decode_value(value: Value) -> Result<Value> {
    let mut current = value;
    for _ in 0..MAX_VALUE_DEPTH {
        let text = match &current {
            Value::String(s) if looks_like_json(s) => s.trim(),
            _ => return Ok(current),
        };
        current = serde_json::from_str(text).map_err(|e| {
            JsontabError::Decode(format!("value {:?} is not valid JSON: {}", text, e))
        })?;
    }
    Ok(current)
}

fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().chars().next(), Some('{' | '[' | '"'))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

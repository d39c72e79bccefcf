//! One JSON-Lines entry of the corpus.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A prompt/completion pair.
///
/// Unknown keys on input are ignored, and serialization always emits exactly
/// `prompt` and `completion`, so a converted corpus has a fixed two-key schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    pub prompt: String,
    pub completion: String,
}

impl Record {
    pub fn new(prompt: impl Into<String>, completion: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            completion: completion.into(),
        }
    }

    /// Parse one (untrimmed) line. `line_no` is 1-based and only used for the error.
    ///
    /// The line must be a JSON object with string `prompt` and `completion`;
    /// a repeated key keeps its last value.
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let malformed = |message: String| Error::MalformedRecord {
            line: line_no,
            message,
        };
        let map = match serde_json::from_str::<Value>(line.trim()) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(malformed(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
            Err(e) => return Err(malformed(e.to_string())),
        };
        Ok(Self {
            prompt: string_field(&map, "prompt").map_err(malformed)?,
            completion: string_field(&map, "completion").map_err(malformed)?,
        })
    }

    /// Serialize as a single JSON line, without the trailing newline.
    /// Non-ASCII characters are written verbatim.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> std::result::Result<String, String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(format!("field `{key}` must be a string, found {}", json_kind(other))),
        None => Err(format!("missing field `{key}`")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! # Error Types
//!
//! Field-level validation errors shared by both validation layers, and the
//! crate-level [`KglError`].
//!
//! A [`FieldError`] serializes to the same shape whether it came from the
//! request validators or from a record schema, so clients only ever parse
//! one error format:
//!
//! ```json
//! { "type": "field", "value": "Bean$", "msg": "...", "path": "produceName", "location": "body" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single violated field constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Always `"field"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The submitted value, omitted when the field was absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Human-readable message.
    pub msg: String,
    /// Name of the offending body field.
    pub path: String,
    /// Always `"body"`.
    pub location: String,
}

impl FieldError {
    /// Build an error for a body field.
    pub fn body(path: impl Into<String>, msg: impl Into<String>, value: Option<&Value>) -> Self {
        Self {
            kind: "field".to_string(),
            value: value.cloned(),
            msg: msg.into(),
            path: path.into(),
            location: "body".to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.msg)
    }
}

/// Top-level error type for record construction.
#[derive(Error, Debug)]
pub enum KglError {
    /// One or more fields violated the record schema.
    #[error("record validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// The payload was not a JSON object.
    #[error("payload must be a JSON object")]
    NotAnObject,

    /// A validated document could not be mapped onto its record type.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

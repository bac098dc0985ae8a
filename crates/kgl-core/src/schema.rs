//! # Record Schemas
//!
//! Rules enforced at the persistence boundary. A [`RecordSchema`] casts
//! each declared path to its [`FieldKind`], checks presence, then applies
//! the path's constraints in order.
//!
//! Unlike the request validators, a record schema reports **at most one
//! error per path**: the first of cast failure, missing required value, or
//! violated constraint. Every path is still checked, so the error list
//! covers all offending fields at once.
//!
//! The output of [`RecordSchema::apply`] is a normalized JSON document
//! holding only declared paths: text as strings, numbers as JSON numbers,
//! dates as RFC 3339 UTC strings.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{FieldError, KglError};
use crate::format::{self, CharClass};
use crate::request::number_text;

/// Storage type of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored as a string. Numbers and booleans are converted.
    Text,
    /// Stored as a number. Numeric strings are parsed.
    Number,
    /// Stored as a UTC instant. Accepts ISO-8601 text or epoch millis.
    Date,
}

impl FieldKind {
    fn cast_name(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "Number",
            Self::Date => "date",
        }
    }
}

/// When a path must carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always required.
    Required,
    /// Required only when another path holds the given text.
    RequiredWhen {
        /// Path whose raw value decides.
        path: &'static str,
        /// Text that makes this path required.
        equals: &'static str,
    },
    /// May be absent.
    Optional,
}

/// Textual shapes a stored string may be required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every character in the class.
    Class(CharClass),
    /// See [`format::is_loose_phone`].
    Phone,
    /// See [`format::is_nin`].
    Nin,
}

impl Pattern {
    /// Whether `s` has this shape.
    pub fn matches(self, s: &str) -> bool {
        match self {
            Self::Class(class) => class.matches(s),
            Self::Phone => format::is_loose_phone(s),
            Self::Nin => format::is_nin(s),
        }
    }
}

/// A restriction on a cast value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Text must have the given shape.
    Pattern(Pattern),
    /// Text must have at least this many characters.
    MinLength(usize),
    /// Number must not be below this bound.
    Min(f64),
    /// Text must be one of the listed values.
    OneOf(&'static [&'static str]),
}

/// A constraint paired with the message reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constrained {
    /// The restriction.
    pub constraint: Constraint,
    /// Reported as `msg` when the restriction fails.
    pub message: &'static str,
}

impl Constrained {
    /// Pair `constraint` with its failure message.
    pub const fn new(constraint: Constraint, message: &'static str) -> Self {
        Self {
            constraint,
            message,
        }
    }
}

/// Declaration of one stored path.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Document path, as sent on the wire.
    pub path: &'static str,
    /// Storage type the value is cast to.
    pub kind: FieldKind,
    /// When a value is mandatory.
    pub presence: Presence,
    /// Checked in order; the first failure is reported.
    pub constraints: &'static [Constrained],
}

/// The persistence-level schema of one record type.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    /// Declared paths. Anything else in a body is dropped.
    pub fields: &'static [FieldRule],
}

/// A value after casting to its path's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Cast {
    /// A [`FieldKind::Text`] value.
    Text(String),
    /// A [`FieldKind::Number`] value.
    Number(f64),
    /// A [`FieldKind::Date`] value.
    Date(DateTime<Utc>),
}

impl Cast {
    fn admits(&self, constraint: &Constraint) -> bool {
        match (constraint, self) {
            (Constraint::Pattern(p), Self::Text(s)) => p.matches(s),
            (Constraint::MinLength(min), Self::Text(s)) => format::char_len(s) >= *min,
            (Constraint::OneOf(allowed), Self::Text(s)) => allowed.contains(&s.as_str()),
            (Constraint::Min(min), Self::Number(n)) => n >= min,
            // A constraint declared on the wrong kind never rejects.
            _ => true,
        }
    }

    fn into_json(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s),
            Self::Number(n) => number_json(n),
            Self::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

fn number_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl RecordSchema {
    /// Cast and validate `body`, returning the normalized document or every
    /// per-path error.
    pub fn apply(&self, body: &Map<String, Value>) -> Result<Map<String, Value>, KglError> {
        let mut document = Map::new();
        let mut errors = Vec::new();

        for field in self.fields {
            let raw = body.get(field.path).filter(|v| !v.is_null());

            let cast = match raw.map(|v| cast(field.kind, v)).transpose() {
                Ok(cast) => cast.flatten(),
                Err(()) => {
                    errors.push(FieldError::body(
                        field.path,
                        cast_message(field.kind, field.path, raw),
                        raw,
                    ));
                    continue;
                }
            };

            let Some(cast) = cast else {
                if self.is_required(field, body) {
                    errors.push(FieldError::body(
                        field.path,
                        format!("Path `{}` is required.", field.path),
                        raw,
                    ));
                }
                continue;
            };

            if let Some(failed) = field.constraints.iter().find(|c| !cast.admits(&c.constraint)) {
                errors.push(FieldError::body(field.path, failed.message, raw));
                continue;
            }

            document.insert(field.path.to_string(), cast.into_json());
        }

        if errors.is_empty() {
            Ok(document)
        } else {
            Err(KglError::Validation(errors))
        }
    }

    fn is_required(&self, field: &FieldRule, body: &Map<String, Value>) -> bool {
        match field.presence {
            Presence::Required => true,
            Presence::RequiredWhen { path, equals } => {
                body.get(path).and_then(Value::as_str) == Some(equals)
            }
            Presence::Optional => false,
        }
    }
}

/// Cast a present value. `Ok(None)` means "present but empty", which the
/// caller treats like an absent value.
fn cast(kind: FieldKind, value: &Value) -> Result<Option<Cast>, ()> {
    match (kind, value) {
        (_, Value::Array(_) | Value::Object(_)) => Err(()),

        (FieldKind::Text, Value::String(s)) if s.is_empty() => Ok(None),
        (FieldKind::Text, Value::String(s)) => Ok(Some(Cast::Text(s.clone()))),
        (FieldKind::Text, Value::Number(n)) => Ok(Some(Cast::Text(number_text(n)))),
        (FieldKind::Text, Value::Bool(b)) => Ok(Some(Cast::Text(b.to_string()))),

        (FieldKind::Number, Value::Number(n)) => n.as_f64().map(|f| Some(Cast::Number(f))).ok_or(()),
        (FieldKind::Number, Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(Cast::Number(f))),
                _ => Err(()),
            }
        }
        (FieldKind::Number, Value::Bool(b)) => Ok(Some(Cast::Number(if *b { 1.0 } else { 0.0 }))),

        (FieldKind::Date, Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            format::parse_iso8601(trimmed).map(|d| Some(Cast::Date(d))).ok_or(())
        }
        (FieldKind::Date, Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|d| Some(Cast::Date(d)))
            .ok_or(()),
        (FieldKind::Date, Value::Bool(_)) => Err(()),

        (_, Value::Null) => Ok(None),
    }
}

fn cast_message(kind: FieldKind, path: &str, raw: Option<&Value>) -> String {
    let (shown, type_name) = match raw {
        Some(Value::String(s)) => (format!("\"{s}\""), "string"),
        Some(Value::Number(n)) => (format!("\"{n}\""), "number"),
        Some(Value::Bool(b)) => (format!("\"{b}\""), "boolean"),
        Some(Value::Array(_)) => (raw.map(Value::to_string).unwrap_or_default(), "Array"),
        Some(Value::Object(_)) => (raw.map(Value::to_string).unwrap_or_default(), "Object"),
        Some(Value::Null) | None => ("null".to_string(), "null"),
    };
    format!(
        "Cast to {} failed for value {} (type {}) at path \"{}\"",
        kind.cast_name(),
        shown,
        type_name,
        path
    )
}

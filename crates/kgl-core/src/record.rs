//! # Stored Records
//!
//! The [`Record`] trait ties a record type to its table and its
//! [`RecordSchema`], and [`Stored`] wraps a record with the identifier
//! assigned when it is persisted.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::KglError;
use crate::schema::RecordSchema;

/// A record type with a persistence-level schema.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the table holding this record type.
    const COLLECTION: &'static str;

    /// Persistence-level schema for this record type.
    fn schema() -> &'static RecordSchema;

    /// Cast and validate a request body against [`Record::schema`] and
    /// build the typed record.
    ///
    /// # Errors
    ///
    /// [`KglError::Validation`] with one entry per offending path.
    fn from_body(body: &Map<String, Value>) -> Result<Self, KglError> {
        let document = Self::schema().apply(body)?;
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}

/// A persisted record with its assigned identifier.
///
/// Serializes flat, with the identifier under `_id`:
/// `{"_id": "…", "produceName": "Maize", …}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    /// Assigned on creation, never reused.
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// The validated record.
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    /// Assign a fresh identifier to `record`.
    pub fn new(record: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
        }
    }
}

/// A tonnage or money amount.
///
/// Whole amounts serialize as JSON integers (`150`, not `150.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(pub f64);

impl Amount {
    /// The raw number.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() < 9_007_199_254_740_992.0 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Amount)
    }
}

//! The `_Any` representation record.
//!
//! A representation identifies one entity by its `__typename` plus whatever
//! key fields the owning type declares, e.g.
//! `{ "__typename": "User", "id": "1" }`.

use indexmap::IndexMap;
use serde_json::{Map as JsonMap, Value};
use thiserror::Error;

/// Name of the distinguished field every representation carries.
pub const TYPENAME_FIELD: &str = "__typename";

/// Errors raised while coercing raw JSON into a [`Representation`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepresentationError {
    #[error("representation must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("representation is missing a string `__typename` field")]
    MissingTypename,
}

/// An ordered field-name to value record naming one entity.
///
/// The typename is captured at construction and is guaranteed to be present;
/// it is also kept in `fields` under [`TYPENAME_FIELD`] so resolvers see the
/// record exactly as the caller sent it.
#[derive(Clone, Debug, PartialEq)]
pub struct Representation {
    typename: String,
    fields: IndexMap<String, Value>,
}

impl Representation {
    /// Creates a representation holding only its `__typename`.
    pub fn new(typename: impl Into<String>) -> Self {
        let typename = typename.into();
        let mut fields = IndexMap::new();
        fields.insert(TYPENAME_FIELD.to_string(), Value::String(typename.clone()));
        Self { typename, fields }
    }

    /// Adds a key field. The typename is fixed at construction, so a
    /// `__typename` entry passed here is ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != TYPENAME_FIELD {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Coerces an `_Any` scalar input into a representation.
    pub fn from_json(value: Value) -> Result<Self, RepresentationError> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(RepresentationError::NotAnObject {
                    found: json_type_name(&other),
                });
            }
        };
        let typename = object
            .get(TYPENAME_FIELD)
            .and_then(Value::as_str)
            .ok_or(RepresentationError::MissingTypename)?
            .to_string();
        Ok(Self {
            typename,
            fields: object.into_iter().collect(),
        })
    }

    pub fn typename(&self) -> &str {
        &self.typename
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Rebuilds the record with every field name passed through `rename`.
    ///
    /// Field order is preserved. When two names collapse onto the same new
    /// name the later value wins, keeping the position of the first.
    pub fn map_keys(self, rename: impl Fn(&str) -> String) -> Self {
        let fields = self
            .fields
            .into_iter()
            .map(|(key, value)| (rename(&key), value))
            .collect();
        Self {
            typename: self.typename,
            fields,
        }
    }

    /// Converts the record back into a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields.into_iter().collect::<JsonMap<String, Value>>())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

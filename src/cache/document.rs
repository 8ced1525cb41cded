//! Document Module
//!
//! Built-in mutable value: a JSON object updated by merge patch.

use serde_json::{Map, Value as JsonValue};

use crate::cache::MutableValue;
use crate::error::{CacheError, Result};

// == Document ==
/// JSON object cached as a mutable value.
///
/// Updates merge the patch's top-level fields into the document; a `null`
/// field removes the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Map<String, JsonValue>,
    /// Fetch time of the last applied patch
    last_patched: Option<i64>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a document from the state returned by `serialize`.
    pub fn from_state(state: JsonValue) -> Result<Self> {
        match state {
            JsonValue::Object(fields) => Ok(Self {
                fields,
                last_patched: None,
            }),
            other => Err(CacheError::UnsupportedValueType(format!(
                "Document state must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.fields.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn last_patched(&self) -> Option<i64> {
        self.last_patched
    }
}

impl MutableValue for Document {
    fn update(&mut self, new_value: &JsonValue, fetched_time: i64) -> Result<()> {
        let patch = new_value.as_object().ok_or_else(|| {
            CacheError::UnsupportedValueType(format!(
                "Document update expects an object, got {}",
                json_kind(new_value)
            ))
        })?;

        for (key, value) in patch {
            if value.is_null() {
                self.fields.remove(key);
            } else {
                self.fields.insert(key.clone(), value.clone());
            }
        }
        self.last_patched = Some(fetched_time);
        Ok(())
    }

    fn serialize(&self) -> JsonValue {
        JsonValue::Object(self.fields.clone())
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

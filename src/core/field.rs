//! Field contracts and JSON value types

use crate::core::error::ValidationError;
use crate::core::path::JsonPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The JSON type a field is expected to have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Number,
    Object,
    Array,
}

impl FieldType {
    /// Type of a JSON value, `None` for `null`
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Number(_) => Some(FieldType::Number),
            Value::String(_) => Some(FieldType::String),
            Value::Array(_) => Some(FieldType::Array),
            Value::Object(_) => Some(FieldType::Object),
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        Self::of(value) == Some(*self)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "String",
            FieldType::Boolean => "Boolean",
            FieldType::Number => "Number",
            FieldType::Object => "Object",
            FieldType::Array => "Array",
        };
        f.write_str(name)
    }
}

/// Expected presence, type and optionality of one field of a response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldContract {
    /// Dot/bracket path rooted at the response body (e.g. `_links.apps.href`)
    pub path: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Absent (or `null`) values are accepted
    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub description: String,
}

impl FieldContract {
    /// Create a required field contract
    pub fn new(
        path: impl Into<String>,
        field_type: FieldType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            field_type,
            optional: false,
            description: description.into(),
        }
    }

    /// Mark the field as optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Check the contract against a document, using the already parsed path
    ///
    /// Every value designated by the path must have the expected type. A
    /// `null` value counts as present but untyped: it is accepted for
    /// optional fields and reported as a type mismatch otherwise.
    pub fn check(&self, path: &JsonPath, document: &Value) -> Option<ValidationError> {
        let values = match path.resolve(document) {
            Some(values) if !values.is_empty() => values,
            _ if self.optional => return None,
            _ => return Some(ValidationError::missing(&self.path)),
        };

        values.into_iter().find_map(|value| {
            if self.field_type.matches(value) || (value.is_null() && self.optional) {
                None
            } else {
                Some(ValidationError::type_mismatch(
                    &self.path,
                    self.field_type,
                    FieldType::of(value),
                ))
            }
        })
    }
}

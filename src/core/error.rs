//! Typed error handling for the link registry
//!
//! Registration problems are fatal to building a registry and are returned
//! as [`RegistryError`]. Contract violations found while checking a document
//! are plain data ([`ValidationError`]) so a caller can assert on the whole
//! set at once.
//!
//! # Error Categories
//!
//! - [`RegistryError`]: Errors raised while declaring relations and fields
//! - [`PathError`]: Malformed JSON field paths
//! - [`ConfigError`]: Errors related to loading YAML declarations
//! - [`ValidationError`]: A single contract violation in a response body
//!
//! # Example
//!
//! ```rust,ignore
//! use linkset::prelude::*;
//!
//! match registry.register(Relation::new("apps", "Handle registered applications")) {
//!     Ok(()) => {}
//!     Err(RegistryError::DuplicateRelation { name }) => eprintln!("{} declared twice", name),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use crate::core::field::FieldType;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The umbrella error type of the crate
#[derive(Debug, Error)]
pub enum LinkSetError {
    /// Relation/field declaration errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Field path errors
    #[error(transparent)]
    Path(#[from] PathError),
}

impl LinkSetError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            LinkSetError::Registry(e) => e.error_code(),
            LinkSetError::Config(e) => e.error_code(),
            LinkSetError::Path(_) => "INVALID_PATH",
        }
    }
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors raised while building a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A relation with the same name is already registered
    #[error("Relation '{name}' is already registered")]
    DuplicateRelation { name: String },

    /// A relation was declared without a name
    #[error("Relation name must not be empty")]
    EmptyRelationName,

    /// A field contract with the same path is already registered
    #[error("Field '{path}' is already registered")]
    DuplicateField { path: String },

    /// The `template` flag disagrees with the placeholders in the name
    #[error("Relation '{name}' declares template={template}, but its name {}", template_hint(.template))]
    TemplateMismatch { name: String, template: bool },

    /// A field path could not be parsed
    #[error("Invalid field path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: PathError,
    },

    /// A URI template was expanded without a value for a required variable
    #[error("No value bound for placeholder '{placeholder}' of relation '{relation}'")]
    UnboundPlaceholder {
        relation: String,
        placeholder: String,
    },
}

fn template_hint(template: &bool) -> &'static str {
    if *template {
        "has no placeholder"
    } else {
        "contains a placeholder"
    }
}

impl RegistryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateRelation { .. } => "DUPLICATE_RELATION",
            RegistryError::EmptyRelationName => "EMPTY_RELATION_NAME",
            RegistryError::DuplicateField { .. } => "DUPLICATE_FIELD",
            RegistryError::TemplateMismatch { .. } => "TEMPLATE_MISMATCH",
            RegistryError::InvalidPath { .. } => "INVALID_PATH",
            RegistryError::UnboundPlaceholder { .. } => "UNBOUND_PLACEHOLDER",
        }
    }
}

// =============================================================================
// Path Errors
// =============================================================================

/// Errors produced by the field path parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("unterminated bracket starting at position {position}")]
    UnterminatedBracket { position: usize },

    #[error("invalid array index '{index}'")]
    InvalidIndex { index: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to loading declarations from YAML
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse config{}: {source}", file_hint(.file))]
    Parse {
        file: Option<String>,
        #[source]
        source: serde_yaml::Error,
    },
}

fn file_hint(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO_ERROR",
            ConfigError::Parse { .. } => "CONFIG_PARSE_ERROR",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// What went wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required field is absent
    MissingField,
    /// The field is present with a different JSON type
    TypeMismatch,
    /// The links object carries a relation nobody registered
    UndocumentedLink,
    /// The document carries a field no contract covers
    UndocumentedField,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingField => "MISSING_FIELD",
            ValidationErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ValidationErrorKind::UndocumentedLink => "UNDOCUMENTED_LINK",
            ValidationErrorKind::UndocumentedField => "UNDOCUMENTED_FIELD",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ValidationErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single contract violation found in a response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The contract path as it was registered
    pub field_path: String,
    pub kind: ValidationErrorKind,
    /// Human-readable description
    pub message: String,
}

impl ValidationError {
    pub fn missing(field_path: impl Into<String>) -> Self {
        let field_path = field_path.into();
        let message = format!("Required field '{}' is missing", field_path);
        Self {
            field_path,
            kind: ValidationErrorKind::MissingField,
            message,
        }
    }

    pub fn type_mismatch(
        field_path: impl Into<String>,
        expected: FieldType,
        actual: Option<FieldType>,
    ) -> Self {
        let field_path = field_path.into();
        let actual = actual.map_or_else(|| "Null".to_string(), |t| t.to_string());
        let message = format!(
            "Field '{}' should be of type {} but is {}",
            field_path, expected, actual
        );
        Self {
            field_path,
            kind: ValidationErrorKind::TypeMismatch,
            message,
        }
    }

    pub fn undocumented_link(field_path: impl Into<String>, name: &str) -> Self {
        Self {
            field_path: field_path.into(),
            kind: ValidationErrorKind::UndocumentedLink,
            message: format!("Link '{}' is not documented", name),
        }
    }

    pub fn undocumented_field(field_path: impl Into<String>) -> Self {
        let field_path = field_path.into();
        let message = format!("Field '{}' is not documented", field_path);
        Self {
            field_path,
            kind: ValidationErrorKind::UndocumentedField,
            message,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.kind == ValidationErrorKind::MissingField
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::missing("_links.apps.href");
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert_eq!(err.to_string(), "Required field '_links.apps.href' is missing");
        assert!(err.is_missing());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ValidationError::type_mismatch(
            "status",
            FieldType::Number,
            Some(FieldType::String),
        );
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(
            err.message,
            "Field 'status' should be of type Number but is String"
        );

        let null = ValidationError::type_mismatch("status", FieldType::Number, None);
        assert!(null.message.ends_with("but is Null"));
    }

    #[test]
    fn test_validation_error_serializes_kind() {
        let err = ValidationError::missing("error");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "MISSING_FIELD");
        assert_eq!(json["field_path"], "error");
    }

    #[test]
    fn test_kind_display_matches_serialized_form() {
        for kind in [
            ValidationErrorKind::MissingField,
            ValidationErrorKind::TypeMismatch,
            ValidationErrorKind::UndocumentedLink,
            ValidationErrorKind::UndocumentedField,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.to_string());
        }
        assert_eq!(ValidationErrorKind::UndocumentedField.as_str(), "UNDOCUMENTED_FIELD");
    }

    #[test]
    fn test_undocumented_messages() {
        let link = ValidationError::undocumented_link("_links.self", "self");
        assert_eq!(link.message, "Link 'self' is not documented");
        let field = ValidationError::undocumented_field("exception");
        assert_eq!(field.to_string(), "Field 'exception' is not documented");
        assert!(!field.is_missing());
    }

    #[test]
    fn test_template_mismatch_display() {
        let err = RegistryError::TemplateMismatch {
            name: "apps".to_string(),
            template: true,
        };
        assert_eq!(
            err.to_string(),
            "Relation 'apps' declares template=true, but its name has no placeholder"
        );
        assert_eq!(err.error_code(), "TEMPLATE_MISMATCH");
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: LinkSetError = RegistryError::DuplicateRelation {
            name: "apps".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "DUPLICATE_RELATION");
        assert_eq!(err.to_string(), "Relation 'apps' is already registered");
    }
}

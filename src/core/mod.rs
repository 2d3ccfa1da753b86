//! Core module containing the fundamental types of the registry

pub mod error;
pub mod field;
pub mod path;
pub mod relation;

pub use error::{
    ConfigError, LinkSetError, PathError, RegistryError, ValidationError, ValidationErrorKind,
};
pub use field::{FieldContract, FieldType};
pub use path::{JsonPath, Segment};
pub use relation::Relation;

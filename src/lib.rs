//! # linkset
//!
//! A hypermedia link registry and response contract validator for HAL REST APIs.
//!
//! ## Features
//!
//! - **Relation Registry**: Ordered, duplicate-free table of link relations
//! - **Link Contracts**: Every relation implies `href`/`templated` field contracts
//! - **Aggregated Validation**: All violations of a response body in one pass
//! - **Prefix Listing**: Lazy, restartable listing of `streams/deployments/*` style groups
//! - **URI Templates**: Placeholder discovery and expansion
//! - **Configuration-Based**: Declare relations and fields in YAML
//! - **Built-in Catalogue**: Root and error resources of the data flow server
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linkset::prelude::*;
//! use serde_json::json;
//!
//! let mut registry = LinkRegistry::new();
//! registry.register(Relation::new("apps", "Handle registered applications"))?;
//! registry.register(Relation::new(
//!     "streams/deployments/{name}",
//!     "Request un-deployment of an existing stream",
//! ))?;
//! registry.register_field(FieldContract::new("['api.revision']", FieldType::Number, "API revision"))?;
//!
//! let body = json!({ "_links": { "apps": { "href": "http://localhost:9393/apps" } } });
//! if let Err(errors) = registry.validate(&body) {
//!     for error in errors {
//!         println!("{}: {}", error.kind, error.message);
//!     }
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod links;

/// Re-exports of commonly used types
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        error::{
            ConfigError, LinkSetError, PathError, RegistryError, ValidationError,
            ValidationErrorKind,
        },
        field::{FieldContract, FieldType},
        path::{JsonPath, Segment},
        relation::Relation,
    };

    // === Registry ===
    pub use crate::links::registry::{DEFAULT_LINKS_KEY, LinkRegistry, RelationsUnder};

    // === Config ===
    pub use crate::config::{LinkSetConfig, RelationConfig};

    // === Catalogue ===
    pub use crate::catalog::{HAL_JSON, REVISION_KEY, error_registry, root_registry};
}

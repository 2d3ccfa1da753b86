//! Link registry module
//!
//! This module keeps the relation table of a resource and validates
//! response bodies against it.

pub mod registry;

pub use registry::{DEFAULT_LINKS_KEY, LinkRegistry, RelationsUnder};

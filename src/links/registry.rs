//! Relation registry and response contract validation
//!
//! The registry holds the authoritative list of relation names exposed by a
//! resource, together with the field contracts its response body must honour.
//! It is built once (from a static declaration or a YAML config) and then
//! only read, so it can be shared behind an `Arc` by any number of callers.

use crate::config::{LinkSetConfig, RelationConfig};
use crate::core::error::{RegistryError, ValidationError};
use crate::core::field::{FieldContract, FieldType};
use crate::core::path::{self, JsonPath};
use crate::core::relation::Relation;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// Default name of the HAL links object
pub const DEFAULT_LINKS_KEY: &str = "_links";

/// A field contract together with its parsed path
#[derive(Debug, Clone)]
struct CompiledField {
    contract: FieldContract,
    path: JsonPath,
    /// Derived from a relation rather than registered on its own
    derived: bool,
}

/// Registry of relations and field contracts for one resource
///
/// Relations and contracts are kept in registration order, which is also the
/// order in which listings and validation failures are reported. Contracts
/// are keyed by the canonical form of their path, so `_links['apps'].href`
/// and `_links.apps.href` are the same field.
#[derive(Debug, Clone)]
pub struct LinkRegistry {
    links_key: String,
    relations: IndexMap<String, Relation>,
    fields: IndexMap<String, CompiledField>,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkRegistry {
    /// Create an empty registry using the `_links` object
    pub fn new() -> Self {
        Self::with_links_key(DEFAULT_LINKS_KEY)
    }

    /// Create an empty registry whose links live under `links_key`
    pub fn with_links_key(links_key: impl Into<String>) -> Self {
        Self {
            links_key: links_key.into(),
            relations: IndexMap::new(),
            fields: IndexMap::new(),
        }
    }

    /// Build a registry from a configuration
    ///
    /// Relations are registered before free-standing fields.
    pub fn from_config(config: &LinkSetConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::with_links_key(&config.links_key);
        for relation in &config.relations {
            registry.register(relation.clone().into_relation())?;
        }
        for field in &config.fields {
            registry.register_field(field.clone())?;
        }
        Ok(registry)
    }

    /// Export the declaration this registry was built from
    ///
    /// Link contracts derived from relations are not listed; `from_config`
    /// derives them again.
    pub fn to_config(&self) -> LinkSetConfig {
        LinkSetConfig {
            links_key: self.links_key.clone(),
            relations: self.relations.values().map(RelationConfig::from).collect(),
            fields: self
                .fields
                .values()
                .filter(|field| !field.derived)
                .map(|field| field.contract.clone())
                .collect(),
        }
    }

    /// Register a relation
    ///
    /// Also registers the link contracts every HAL link carries:
    /// `<links_key>.<name>.href` (required string) and
    /// `<links_key>.<name>.templated` (optional boolean).
    pub fn register(&mut self, relation: Relation) -> Result<(), RegistryError> {
        if relation.name.trim().is_empty() {
            return Err(RegistryError::EmptyRelationName);
        }
        if self.relations.contains_key(&relation.name) {
            return Err(RegistryError::DuplicateRelation {
                name: relation.name,
            });
        }
        if relation.template != Relation::is_template_name(&relation.name) {
            return Err(RegistryError::TemplateMismatch {
                name: relation.name,
                template: relation.template,
            });
        }

        let href = self.link_field(&relation, "href");
        let templated = self.link_field(&relation, "templated");
        for compiled in [&href, &templated] {
            if self.fields.contains_key(&compiled.path.canonical()) {
                return Err(RegistryError::DuplicateField {
                    path: compiled.path.as_str().to_string(),
                });
            }
        }

        tracing::debug!(
            relation = %relation.name,
            template = relation.template,
            "Registered relation"
        );

        self.insert_field(href);
        self.insert_field(templated);
        self.relations.insert(relation.name.clone(), relation);
        Ok(())
    }

    /// Register a free-standing field contract (e.g. `['api.revision']`)
    pub fn register_field(&mut self, contract: FieldContract) -> Result<(), RegistryError> {
        let path =
            JsonPath::parse(&contract.path).map_err(|source| RegistryError::InvalidPath {
                path: contract.path.clone(),
                source,
            })?;
        if self.fields.contains_key(&path.canonical()) {
            return Err(RegistryError::DuplicateField {
                path: contract.path,
            });
        }

        tracing::debug!(path = %contract.path, field_type = %contract.field_type, "Registered field");

        self.insert_field(CompiledField {
            contract,
            path,
            derived: false,
        });
        Ok(())
    }

    fn insert_field(&mut self, compiled: CompiledField) {
        self.fields.insert(compiled.path.canonical(), compiled);
    }

    fn link_field(&self, relation: &Relation, attribute: &str) -> CompiledField {
        let path = JsonPath::from_keys([self.links_key.as_str(), relation.name.as_str(), attribute]);
        let contract = match attribute {
            "templated" => FieldContract::new(
                path.as_str(),
                FieldType::Boolean,
                format!("Link {} is templated", relation.name),
            )
            .optional(),
            _ => FieldContract::new(
                path.as_str(),
                FieldType::String,
                format!("Link to the {}", relation.name),
            ),
        };
        CompiledField {
            contract,
            path,
            derived: true,
        }
    }

    /// Validate a response body against every registered field contract
    ///
    /// Never stops at the first failure: all violations are returned, in
    /// contract registration order.
    pub fn validate(&self, document: &Value) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = self
            .fields
            .values()
            .filter_map(|field| field.contract.check(&field.path, document))
            .collect();

        tracing::debug!(
            fields = self.fields.len(),
            violations = errors.len(),
            "Validated document"
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Link names present in the document's links object but not registered
    ///
    /// Returns an empty list when the document has no links object.
    pub fn undocumented_links(&self, document: &Value) -> Vec<String> {
        document
            .get(&self.links_key)
            .and_then(Value::as_object)
            .map(|links| {
                links
                    .keys()
                    .filter(|name| !self.relations.contains_key(name.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fields present in the document that no contract documents
    ///
    /// Every leaf of the document must be designated by a contract or lie
    /// inside a field a contract designates (a `_links` OBJECT contract
    /// documents everything under it). Leaves on the way to a contracted
    /// field, such as an empty `_links` object, are left to [`validate`].
    /// Paths are returned in canonical form, in document order.
    ///
    /// [`validate`]: LinkRegistry::validate
    pub fn undocumented_fields(&self, document: &Value) -> Vec<String> {
        let undocumented: Vec<String> = path::leaf_paths(document)
            .into_iter()
            .filter(|leaf| {
                !self.fields.values().any(|field| {
                    field.path.covers(leaf) || field.path.passes_through(leaf)
                })
            })
            .map(|leaf| JsonPath::from_segments(leaf).to_string())
            .collect();

        if !undocumented.is_empty() {
            tracing::debug!(count = undocumented.len(), "Found undocumented fields");
        }
        undocumented
    }

    /// Relations whose name starts with `prefix`, in registration order
    pub fn relations_under<'a>(&'a self, prefix: &'a str) -> RelationsUnder<'a> {
        RelationsUnder {
            inner: self.relations.values(),
            prefix,
        }
    }

    /// Distinct first name segments, in order of first registration
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for relation in self.relations.values() {
            let group = relation.group();
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Render the links object a conforming server would return
    ///
    /// Each href is `base_url` followed by the relation target; links whose
    /// target has placeholders are flagged `templated`.
    pub fn render_links(&self, base_url: &str) -> Map<String, Value> {
        let base = base_url.trim_end_matches('/');
        self.relations
            .values()
            .map(|relation| {
                let target = relation.target();
                let href = if target.starts_with('/') {
                    format!("{}{}", base, target)
                } else {
                    format!("{}/{}", base, target)
                };
                let link = if relation.is_templated() {
                    json!({ "href": href, "templated": true })
                } else {
                    json!({ "href": href })
                };
                (relation.name.clone(), link)
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// All relations, in registration order
    pub fn relations(&self) -> impl ExactSizeIterator<Item = &Relation> + Clone {
        self.relations.values()
    }

    /// All field contracts (derived and free-standing), in registration order
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldContract> + Clone {
        self.fields.values().map(|field| &field.contract)
    }

    pub fn links_key(&self) -> &str {
        &self.links_key
    }

    /// Number of registered relations
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Lazy listing of the relations under a name prefix
///
/// A clone continues independently from the same position. Call
/// [`LinkRegistry::relations_under`] again to start over.
#[derive(Debug, Clone)]
pub struct RelationsUnder<'a> {
    inner: indexmap::map::Values<'a, String, Relation>,
    prefix: &'a str,
}

impl<'a> Iterator for RelationsUnder<'a> {
    type Item = &'a Relation;

    fn next(&mut self) -> Option<Self::Item> {
        let prefix = self.prefix;
        self.inner
            .by_ref()
            .find(|relation| relation.name.starts_with(prefix))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl std::iter::FusedIterator for RelationsUnder<'_> {}

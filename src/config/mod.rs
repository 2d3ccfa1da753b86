//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::field::FieldContract;
use crate::core::path::JsonPath;
use crate::core::relation::Relation;
use crate::links::registry::DEFAULT_LINKS_KEY;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declaration of a relation in a config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationConfig {
    /// Relation name (e.g., "streams/deployments/{name}")
    pub name: String,

    /// Optional explicit template flag; derived from the name when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,

    #[serde(default)]
    pub description: String,

    /// Target URI template (e.g., "/streams/deployments/{name}")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RelationConfig {
    /// Convert into a relation
    ///
    /// An explicit `template` flag is kept as written so that registration
    /// can reject it if it disagrees with the name.
    pub fn into_relation(self) -> Relation {
        let mut relation = Relation::new(self.name, self.description);
        if let Some(template) = self.template {
            relation.template = template;
        }
        relation.href = self.href;
        relation
    }
}

impl From<&Relation> for RelationConfig {
    fn from(relation: &Relation) -> Self {
        Self {
            name: relation.name.clone(),
            template: Some(relation.template),
            description: relation.description.clone(),
            href: relation.href.clone(),
        }
    }
}

fn default_links_key() -> String {
    DEFAULT_LINKS_KEY.to_string()
}

/// Complete declaration of one resource's hypermedia surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSetConfig {
    /// Name of the links object in the response body
    #[serde(default = "default_links_key")]
    pub links_key: String,

    /// Relations, in the order they should be listed
    #[serde(default)]
    pub relations: Vec<RelationConfig>,

    /// Free-standing field contracts
    #[serde(default)]
    pub fields: Vec<FieldContract>,
}

impl Default for LinkSetConfig {
    fn default() -> Self {
        Self {
            links_key: default_links_key(),
            relations: Vec::new(),
            fields: Vec::new(),
        }
    }
}

impl LinkSetConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            file: Some(path.to_string()),
            source,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse { file: None, source })
    }

    /// Merge several configurations into one
    ///
    /// When a relation name or field path appears more than once, the last
    /// definition wins but keeps the position of the first one. Field paths
    /// are compared in canonical form. The links key
    /// of the last configuration that changes it from the default wins.
    pub fn merge(configs: Vec<LinkSetConfig>) -> Self {
        let mut links_key = default_links_key();
        let mut relations: IndexMap<String, RelationConfig> = IndexMap::new();
        let mut fields: IndexMap<String, FieldContract> = IndexMap::new();

        for config in configs {
            if config.links_key != DEFAULT_LINKS_KEY {
                links_key = config.links_key;
            }
            for relation in config.relations {
                relations.insert(relation.name.clone(), relation);
            }
            for field in config.fields {
                let key = JsonPath::parse(&field.path)
                    .map(|path| path.canonical())
                    .unwrap_or_else(|_| field.path.clone());
                fields.insert(key, field);
            }
        }

        Self {
            links_key,
            relations: relations.into_values().collect(),
            fields: fields.into_values().collect(),
        }
    }
}

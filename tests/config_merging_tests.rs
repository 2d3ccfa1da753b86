//! Integration tests for config loading and merging

use linkset::prelude::*;
use std::io::Write;

#[test]
fn test_merge_empty_configs() {
    let merged = LinkSetConfig::merge(vec![]);

    assert_eq!(merged.links_key, "_links");
    assert_eq!(merged.relations.len(), 0);
    assert_eq!(merged.fields.len(), 0);
}

#[test]
fn test_merge_single_config() {
    let config = root_registry().unwrap().to_config();
    let original_relations = config.relations.len();
    let original_fields = config.fields.len();

    let merged = LinkSetConfig::merge(vec![config]);

    assert_eq!(merged.relations.len(), original_relations);
    assert_eq!(merged.fields.len(), original_fields);
}

#[test]
fn test_merge_multiple_configs_no_overlap() {
    let config1_yaml = r#"
relations:
  - name: streams/definitions
    description: Exposes the Streams resource
  - name: streams/definitions/definition
    href: /streams/definitions/{name}
    description: Handle a specific Stream definition
"#;

    let config2_yaml = r#"
relations:
  - name: tasks/definitions
    description: Provides the task definition resource

fields:
  - path: _links
    type: object
"#;

    let config1 = LinkSetConfig::from_yaml_str(config1_yaml).unwrap();
    let config2 = LinkSetConfig::from_yaml_str(config2_yaml).unwrap();

    let merged = LinkSetConfig::merge(vec![config1, config2]);

    // Should have all 3 relations, in declaration order
    let names: Vec<&str> = merged.relations.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "streams/definitions",
            "streams/definitions/definition",
            "tasks/definitions"
        ]
    );
    assert_eq!(merged.fields.len(), 1);
}

#[test]
fn test_merge_configs_with_relation_overlap() {
    let config1_yaml = r#"
relations:
  - name: apps
    description: "Handle registered applications (v1)"
  - name: about
    description: Access meta information
"#;

    let config2_yaml = r#"
relations:
  - name: apps
    href: /apps
    description: "Handle registered applications (v2)"
"#;

    let config1 = LinkSetConfig::from_yaml_str(config1_yaml).unwrap();
    let config2 = LinkSetConfig::from_yaml_str(config2_yaml).unwrap();

    let merged = LinkSetConfig::merge(vec![config1, config2]);

    // Should have only 1 apps relation (last one wins, first position kept)
    assert_eq!(merged.relations.len(), 2);

    let apps = &merged.relations[0];
    assert_eq!(apps.name, "apps");
    assert_eq!(apps.description, "Handle registered applications (v2)");
    assert_eq!(apps.href.as_deref(), Some("/apps"));
}

#[test]
fn test_merge_configs_with_field_overlap() {
    let config1_yaml = r#"
fields:
  - path: "['api.revision']"
    type: string
"#;

    let config2_yaml = r#"
fields:
  - path: "['api.revision']"
    type: number
    description: Incremented each time a change is implemented in this REST API
"#;

    let merged = LinkSetConfig::merge(vec![
        LinkSetConfig::from_yaml_str(config1_yaml).unwrap(),
        LinkSetConfig::from_yaml_str(config2_yaml).unwrap(),
    ]);

    assert_eq!(merged.fields.len(), 1);
    assert_eq!(merged.fields[0].field_type, FieldType::Number);
}

#[test]
fn test_merge_field_overlap_in_other_spelling() {
    let merged = LinkSetConfig::merge(vec![
        LinkSetConfig::from_yaml_str("fields:\n  - path: \"['status']\"\n    type: string\n")
            .unwrap(),
        LinkSetConfig::from_yaml_str("fields:\n  - path: status\n    type: number\n").unwrap(),
    ]);

    assert_eq!(merged.fields.len(), 1);
    assert_eq!(merged.fields[0].path, "status");
    assert_eq!(merged.fields[0].field_type, FieldType::Number);
    assert!(LinkRegistry::from_config(&merged).is_ok());
}

#[test]
fn test_merge_links_key() {
    let custom = LinkSetConfig::from_yaml_str("links_key: links\n").unwrap();
    let default = LinkSetConfig::from_yaml_str("relations: []\n").unwrap();

    let merged = LinkSetConfig::merge(vec![custom, default]);

    assert_eq!(merged.links_key, "links");
}

#[test]
fn test_merged_config_extends_catalogue() {
    let extension = LinkSetConfig::from_yaml_str(
        r#"
relations:
  - name: schema/versions
    href: /schema/versions
    description: List of Schema versions
"#,
    )
    .unwrap();

    let merged = LinkSetConfig::merge(vec![root_registry().unwrap().to_config(), extension]);
    let registry = LinkRegistry::from_config(&merged).unwrap();

    assert_eq!(registry.len(), 50);
    assert_eq!(
        registry.relations().last().map(|r| r.name.as_str()),
        Some("schema/versions")
    );
}

#[test]
fn test_registry_from_config_rejects_template_mismatch() {
    let config = LinkSetConfig::from_yaml_str(
        r#"
relations:
  - name: streams/deployments/{name}
    template: false
"#,
    )
    .unwrap();

    let err = LinkRegistry::from_config(&config).unwrap_err();
    assert!(matches!(err, RegistryError::TemplateMismatch { .. }));
}

#[test]
fn test_registry_from_config_rejects_bad_path() {
    let config = LinkSetConfig::from_yaml_str(
        r#"
fields:
  - path: "_links..href"
    type: string
"#,
    )
    .unwrap();

    let err = LinkRegistry::from_config(&config).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidPath { .. }));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "relations:\n  - name: apps\n    description: Handle registered applications\n"
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let config = LinkSetConfig::from_yaml_file(path).unwrap();
    assert_eq!(config.relations.len(), 1);

    let registry = LinkRegistry::from_config(&config).unwrap();
    assert!(registry.contains("apps"));
}

#[test]
fn test_catalogue_yaml_round_trip() {
    let registry = root_registry().unwrap();
    let yaml = serde_yaml::to_string(&registry.to_config()).unwrap();

    let parsed = LinkSetConfig::from_yaml_str(&yaml).unwrap();
    let rebuilt = LinkRegistry::from_config(&parsed).unwrap();

    assert_eq!(
        rebuilt.relations().collect::<Vec<_>>(),
        registry.relations().collect::<Vec<_>>()
    );
    assert_eq!(
        rebuilt.fields().collect::<Vec<_>>(),
        registry.fields().collect::<Vec<_>>()
    );
}

//! Built-in declarations for the data flow orchestration server
//!
//! The root resource (`GET /`) advertises every capability of the server as
//! a HAL link: stream and task definitions, deployments, job executions,
//! runtime status, counters and tooling. The error resource describes the
//! body returned with any failed request.

use crate::core::error::RegistryError;
use crate::core::field::{FieldContract, FieldType};
use crate::core::relation::Relation;
use crate::links::registry::LinkRegistry;

/// Content type served by the root resource
pub const HAL_JSON: &str = "application/hal+json";

/// Key of the REST API revision in the root resource
pub const REVISION_KEY: &str = "api.revision";

/// (name, href, description) of every relation of the root resource
const ROOT_RELATIONS: &[(&str, &str, &str)] = &[
    (
        "about",
        "/about",
        "Access meta information, including enabled features, security info, version information",
    ),
    ("dashboard", "/dashboard", "Access the dashboard UI"),
    ("audit-records", "/audit-records", "Provides audit trail information"),
    ("apps", "/apps", "Handle registered applications"),
    (
        "completions/stream",
        "/completions/stream{?start,detailLevel}",
        "Exposes the DSL completion features for Stream",
    ),
    (
        "completions/task",
        "/completions/task{?start,detailLevel}",
        "Exposes the DSL completion features for Task",
    ),
    ("runtime/streams", "/runtime/streams{?names}", "Exposes stream runtime status"),
    ("jobs/executions", "/jobs/executions", "Provides the JobExecution resource"),
    (
        "jobs/thinexecutions",
        "/jobs/thinexecutions",
        "Provides the JobExecution thin resource with no step executions included",
    ),
    (
        "jobs/executions/execution",
        "/jobs/executions/{id}",
        "Provides details for a specific JobExecution",
    ),
    (
        "jobs/executions/execution/steps",
        "/jobs/executions/{jobExecutionId}/steps",
        "Provides the steps for a JobExecution",
    ),
    (
        "jobs/executions/execution/steps/step",
        "/jobs/executions/{jobExecutionId}/steps/{stepId}",
        "Returns the details for a specific step",
    ),
    (
        "jobs/executions/execution/steps/step/progress",
        "/jobs/executions/{jobExecutionId}/steps/{stepId}/progress",
        "Provides progress information for a specific step",
    ),
    (
        "jobs/executions/name",
        "/jobs/executions{?name}",
        "Retrieve Job Executions by Job name",
    ),
    (
        "jobs/thinexecutions/name",
        "/jobs/thinexecutions{?name}",
        "Retrieve Job Executions by Job name with no step executions included",
    ),
    (
        "jobs/instances/instance",
        "/jobs/instances/{id}",
        "Provides the job instance resource for a specific job instance",
    ),
    (
        "jobs/instances/name",
        "/jobs/instances{?name}",
        "Provides the Job instance resource for a specific job name",
    ),
    ("runtime/apps", "/runtime/apps", "Provides the runtime application resource"),
    (
        "runtime/apps/app",
        "/runtime/apps/{appId}",
        "Exposes the runtime status for a specific app",
    ),
    (
        "runtime/apps/instances",
        "/runtime/apps/{appId}/instances",
        "Provides the status for app instances",
    ),
    ("tasks/definitions", "/tasks/definitions", "Provides the task definition resource"),
    (
        "tasks/definitions/definition",
        "/tasks/definitions/{name}",
        "Provides details for a specific task definition",
    ),
    (
        "tasks/validation",
        "/tasks/validation/{name}",
        "Provides the validation for a task definition",
    ),
    (
        "tasks/executions",
        "/tasks/executions",
        "Returns Task executions and allows launching of tasks",
    ),
    (
        "tasks/executions/current",
        "/tasks/executions/current",
        "Provides the current count of running tasks",
    ),
    ("tasks/schedules", "/tasks/schedules", "Provides schedule information of tasks"),
    (
        "tasks/schedules/instances",
        "/tasks/schedules/instances/{taskDefinitionName}",
        "Provides schedule information of a specific task",
    ),
    (
        "tasks/executions/name",
        "/tasks/executions{?name}",
        "Returns all task executions for a given Task name",
    ),
    (
        "tasks/executions/execution",
        "/tasks/executions/{id}",
        "Provides details for a specific task execution",
    ),
    (
        "tasks/platforms",
        "/tasks/platforms",
        "Provides platform accounts for launching tasks",
    ),
    ("streams/definitions", "/streams/definitions", "Exposes the Streams resource"),
    (
        "streams/definitions/definition",
        "/streams/definitions/{name}",
        "Handle a specific Stream definition",
    ),
    (
        "streams/validation",
        "/streams/validation/{name}",
        "Provides the validation for a stream definition",
    ),
    (
        "streams/deployments",
        "/streams/deployments",
        "Provides Stream deployment operations",
    ),
    (
        "streams/deployments/{name}",
        "/streams/deployments/{name}",
        "Request un-deployment of an existing stream",
    ),
    (
        "streams/deployments/deployment",
        "/streams/deployments/{name}{?reuse-deployment-properties}",
        "Request (un-)deployment of an existing stream definition",
    ),
    (
        "streams/deployments/manifest/{name}/{version}",
        "/streams/deployments/manifest/{name}/{version}",
        "Return a manifest info of a release version",
    ),
    (
        "streams/deployments/history/{name}",
        "/streams/deployments/history/{name}",
        "Get stream's deployment history as list or Releases for this release",
    ),
    (
        "streams/deployments/rollback/{name}/{version}",
        "/streams/deployments/rollback/{name}/{version}",
        "Rollback the stream to the previous or a specific version of the stream",
    ),
    (
        "streams/deployments/update/{name}",
        "/streams/deployments/update/{name}",
        "Update the stream.",
    ),
    (
        "streams/deployments/platform/list",
        "/streams/deployments/platform/list",
        "List of supported deployment platforms",
    ),
    (
        "counters",
        "/metrics/counters",
        "Exposes the resource for dealing with Counters",
    ),
    ("counters/counter", "/metrics/counters/{name}", "Handle a specific counter"),
    (
        "aggregate-counters",
        "/metrics/aggregate-counters",
        "Provides the resource for dealing with aggregate counters",
    ),
    (
        "aggregate-counters/counter",
        "/metrics/aggregate-counters/{name}",
        "Handle a specific aggregate counter",
    ),
    (
        "field-value-counters",
        "/metrics/field-value-counters",
        "Provides the resource for dealing with field-value-counters",
    ),
    (
        "field-value-counters/counter",
        "/metrics/field-value-counters/{name}",
        "Handle a specific field-value-counter",
    ),
    (
        "tools/parseTaskTextToGraph",
        "/tools/parseTaskTextToGraph",
        "Parse a task definition into a graph structure",
    ),
    (
        "tools/convertTaskGraphToText",
        "/tools/convertTaskGraphToText",
        "Convert a graph format into DSL text format",
    ),
];

/// Registry for the root resource
pub fn root_registry() -> Result<LinkRegistry, RegistryError> {
    let mut registry = LinkRegistry::new();

    for (name, href, description) in ROOT_RELATIONS {
        registry.register(Relation::new(*name, *description).with_href(*href))?;
    }

    registry.register_field(FieldContract::new(
        "_links",
        FieldType::Object,
        "Links to other resources",
    ))?;
    registry.register_field(FieldContract::new(
        format!("['{}']", REVISION_KEY),
        FieldType::Number,
        "Incremented each time a change is implemented in this REST API",
    ))?;

    Ok(registry)
}

/// Registry for the error resource
pub fn error_registry() -> Result<LinkRegistry, RegistryError> {
    let mut registry = LinkRegistry::new();

    let fields = [
        (
            "error",
            FieldType::String,
            "The HTTP error that occurred, e.g. `Bad Request`",
        ),
        (
            "message",
            FieldType::String,
            "A description of the cause of the error",
        ),
        (
            "path",
            FieldType::String,
            "The path to which the request was made",
        ),
        ("status", FieldType::Number, "The HTTP status code, e.g. `400`"),
        (
            "timestamp",
            FieldType::String,
            "The time at which the error occurred",
        ),
    ];
    for (path, field_type, description) in fields {
        registry.register_field(FieldContract::new(path, field_type, description))?;
    }

    Ok(registry)
}

/// Look up a built-in registry by name (`root` or `error`)
pub fn by_name(name: &str) -> Option<Result<LinkRegistry, RegistryError>> {
    match name {
        "root" => Some(root_registry()),
        "error" => Some(error_registry()),
        _ => None,
    }
}

/// Names accepted by [`by_name`]
pub const CATALOG_NAMES: &[&str] = &["root", "error"];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_root_registry_builds() {
        let registry = root_registry().unwrap();
        assert_eq!(registry.len(), 49);
        // href + templated per relation, plus `_links` and the revision
        assert_eq!(registry.fields().count(), 49 * 2 + 2);
    }

    #[test]
    fn test_root_template_relations() {
        let registry = root_registry().unwrap();
        let templates: Vec<_> = registry
            .relations()
            .filter(|r| r.template)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(
            templates,
            vec![
                "streams/deployments/{name}",
                "streams/deployments/manifest/{name}/{version}",
                "streams/deployments/history/{name}",
                "streams/deployments/rollback/{name}/{version}",
                "streams/deployments/update/{name}",
            ]
        );
    }

    #[test]
    fn test_root_groups() {
        let registry = root_registry().unwrap();
        assert_eq!(
            registry.groups(),
            vec![
                "about",
                "dashboard",
                "audit-records",
                "apps",
                "completions",
                "runtime",
                "jobs",
                "tasks",
                "streams",
                "counters",
                "aggregate-counters",
                "field-value-counters",
                "tools",
            ]
        );
    }

    #[test]
    fn test_rendered_root_document_validates() {
        let registry = root_registry().unwrap();
        let doc = json!({
            "_links": Value::Object(registry.render_links("http://localhost:9393")),
            "api.revision": 14,
        });
        assert!(registry.validate(&doc).is_ok());
        assert!(registry.undocumented_links(&doc).is_empty());
    }

    #[test]
    fn test_error_registry() {
        let registry = error_registry().unwrap();
        assert!(registry.is_empty());

        let doc = json!({
            "error": "Bad Request",
            "message": "The app 'http://localhost:8080/apps/123' does not exist",
            "path": "/apps",
            "status": 400,
            "timestamp": "2026-10-17T09:00:00.000+00:00",
        });
        assert!(registry.validate(&doc).is_ok());
    }

    #[test]
    fn test_by_name() {
        for name in CATALOG_NAMES {
            assert!(by_name(name).unwrap().is_ok());
        }
        assert!(by_name("unknown").is_none());
    }
}

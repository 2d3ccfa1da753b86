//! Hypermedia relations and their URI templates

use crate::core::error::RegistryError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A named hypermedia link exposed by a resource
///
/// Names are slash-delimited (`streams/deployments/{name}`) and double as the
/// key of the link inside the HAL `_links` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Unique relation name
    pub name: String,

    /// True iff `name` contains a `{placeholder}` segment
    pub template: bool,

    pub description: String,

    /// Target URI template relative to the server root (e.g. `/apps/{type}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Relation {
    /// Create a relation, deriving the `template` flag from the name
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            template: Self::is_template_name(&name),
            name,
            description: description.into(),
            href: None,
        }
    }

    /// Set the target URI template
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Whether a relation name contains a `{placeholder}` segment
    pub fn is_template_name(name: &str) -> bool {
        placeholder_regex().is_match(name)
    }

    /// The URI template this relation points to: its href, or its name
    pub fn target(&self) -> &str {
        self.href.as_deref().unwrap_or(&self.name)
    }

    /// First slash-delimited segment of the name (`streams` for `streams/validation`)
    pub fn group(&self) -> &str {
        self.name.split('/').next().unwrap_or(&self.name)
    }

    /// Variable names used by the target template, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder_regex()
            .captures_iter(self.target())
            .filter_map(|caps| caps.get(1))
            .flat_map(|expr| {
                let body = expr.as_str();
                body.strip_prefix('?').unwrap_or(body).split(',')
            })
            .map(str::trim)
            .filter(|var| !var.is_empty())
            .collect()
    }

    /// Whether the target has anything to substitute
    pub fn is_templated(&self) -> bool {
        placeholder_regex().is_match(self.target())
    }

    /// Substitute variables into the target template
    ///
    /// `{var}` expressions are required and percent-encoded; `{?a,b}`
    /// expressions become a query string built from the bound variables only.
    pub fn expand(&self, vars: &HashMap<String, String>) -> Result<String, RegistryError> {
        let template = self.target();
        let mut expanded = String::with_capacity(template.len());
        let mut last = 0;

        for caps in placeholder_regex().captures_iter(template) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            expanded.push_str(&template[last..whole.start()]);
            last = whole.end();

            if let Some(query) = body.as_str().strip_prefix('?') {
                let pairs: Vec<String> = query
                    .split(',')
                    .map(str::trim)
                    .filter_map(|var| vars.get(var).map(|value| (var, value)))
                    .map(|(var, value)| format!("{}={}", var, urlencoding::encode(value)))
                    .collect();
                if !pairs.is_empty() {
                    expanded.push('?');
                    expanded.push_str(&pairs.join("&"));
                }
                continue;
            }

            let var = body.as_str().trim();
            let value = vars
                .get(var)
                .ok_or_else(|| RegistryError::UnboundPlaceholder {
                    relation: self.name.clone(),
                    placeholder: var.to_string(),
                })?;
            expanded.push_str(&urlencoding::encode(value));
        }

        expanded.push_str(&template[last..]);
        Ok(expanded)
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([^{}]+)\}").unwrap())
}

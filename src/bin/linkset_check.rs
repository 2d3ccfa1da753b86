use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use linkset::catalog;
use linkset::prelude::*;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "linkset-check")]
#[command(about = "Validate HAL response bodies against a link registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

/// Where the registry comes from. Configs are merged after the catalogue.
#[derive(Args)]
struct Source {
    /// YAML declaration file (repeatable)
    #[arg(long)]
    config: Vec<String>,

    /// Built-in catalogue (`root` or `error`)
    #[arg(long)]
    catalog: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document and print every violation as a JSON line.
    Check {
        #[arg(long)]
        document: String,

        /// Also fail on links that are not registered
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        source: Source,
    },
    /// List registered relations, grouped by first name segment.
    List {
        /// Only relations whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,

        #[command(flatten)]
        source: Source,
    },
    /// Print the registry as a YAML declaration.
    Export {
        #[command(flatten)]
        source: Source,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            document,
            strict,
            source,
        } => {
            let registry = load_registry(&source)?;
            let content = std::fs::read_to_string(&document)
                .with_context(|| format!("Failed to read document '{}'", document))?;
            let body: Value = serde_json::from_str(&content)
                .with_context(|| format!("Document '{}' is not valid JSON", document))?;

            let violations = check_document(&registry, &body, strict);
            for line in violation_lines(&violations)? {
                println!("{}", line);
            }

            if !violations.is_empty() {
                tracing::warn!(document = %document, violations = violations.len(), "Document does not conform");
                bail!("{} violation(s) found in '{}'", violations.len(), document);
            }
            println!("{} conforms ({} relations)", document, registry.len());
        }
        Commands::List { prefix, source } => {
            let registry = load_registry(&source)?;
            for line in listing(&registry, prefix.as_deref()) {
                println!("{}", line);
            }
        }
        Commands::Export { source } => {
            let registry = load_registry(&source)?;
            print!("{}", serde_yaml::to_string(&registry.to_config())?);
        }
    }

    Ok(())
}

/// Every violation of `body`, in reporting order
///
/// Contract violations come first. With `strict`, unregistered links follow,
/// then fields no contract documents. Fields inside an unregistered link are
/// reported once, as the link.
fn check_document(registry: &LinkRegistry, body: &Value, strict: bool) -> Vec<ValidationError> {
    let mut violations = registry.validate(body).err().unwrap_or_default();
    if !strict {
        return violations;
    }

    let mut links = Vec::new();
    for name in registry.undocumented_links(body) {
        let path = JsonPath::from_keys([registry.links_key(), name.as_str()]).to_string();
        violations.push(ValidationError::undocumented_link(path.as_str(), &name));
        links.push(path);
    }

    for field in registry.undocumented_fields(body) {
        let inside_link = links.iter().any(|link| {
            field == *link
                || field.starts_with(&format!("{}.", link))
                || field.starts_with(&format!("{}[", link))
        });
        if !inside_link {
            violations.push(ValidationError::undocumented_field(field));
        }
    }
    violations
}

/// One JSON object per line
fn violation_lines(violations: &[ValidationError]) -> Result<Vec<String>> {
    violations
        .iter()
        .map(|violation| serde_json::to_string(violation).context("Failed to serialize violation"))
        .collect()
}

/// Relations under `prefix`, or every relation grouped by first name segment
fn listing(registry: &LinkRegistry, prefix: Option<&str>) -> Vec<String> {
    match prefix {
        Some(prefix) => registry.relations_under(prefix).map(relation_line).collect(),
        None => registry
            .groups()
            .into_iter()
            .flat_map(move |group| {
                std::iter::once(group.to_string()).chain(
                    registry
                        .relations()
                        .filter(move |r| r.group() == group)
                        .map(relation_line),
                )
            })
            .collect(),
    }
}

fn relation_line(relation: &Relation) -> String {
    let marker = if relation.template { " (template)" } else { "" };
    format!("  {}{} - {}", relation.name, marker, relation.description)
}

fn load_registry(source: &Source) -> Result<LinkRegistry> {
    let mut configs = Vec::new();

    if let Some(name) = &source.catalog {
        let registry = catalog::by_name(name).with_context(|| {
            format!(
                "Unknown catalogue '{}' (expected one of: {})",
                name,
                catalog::CATALOG_NAMES.join(", ")
            )
        })??;
        configs.push(registry.to_config());
    }
    for path in &source.config {
        configs.push(LinkSetConfig::from_yaml_file(path)?);
    }
    if configs.is_empty() {
        bail!("No declarations given: pass --catalog and/or --config");
    }

    let config = LinkSetConfig::merge(configs);
    Ok(LinkRegistry::from_config(&config)?)
}

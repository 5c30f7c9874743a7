use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keyway_entities::{
    EntitiesResolver, ResolvedEntities,
    config::{load_config, load_config_from_path},
};
use keyway_schema::SchemaRegistry;
use keyway_types::RequestContext;
use serde::Deserialize;
use serde_json::{Value, json};

mod fixture;

use fixture::{RecordTypeResolver, build_registry, load_fixture};

#[derive(Debug, Parser)]
#[command(name = "keyway", version, about = "Resolve federation entity representations against a subgraph fixture")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve an `_entities` representations file and print the response
    Resolve {
        /// Subgraph fixture describing types, keys and records
        #[arg(long)]
        schema: PathBuf,
        /// JSON array of representations, or an object with a `representations` array
        #[arg(long)]
        representations: PathBuf,
        /// Optional resolution settings file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        request_id: Option<String>,
    },
    /// Print the `_Entity` union and `_entities` field for a fixture
    Sdl {
        #[arg(long)]
        schema: PathBuf,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepresentationsInput {
    List(Vec<Value>),
    Variables { representations: Vec<Value> },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            schema,
            representations,
            config,
            request_id,
        } => run_resolve(schema, representations, config, request_id).await,
        Command::Sdl { schema } => run_sdl(schema),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_resolve(schema: PathBuf, representations: PathBuf, config: Option<PathBuf>, request_id: Option<String>) -> Result<()> {
    let registry = Arc::new(build_registry(load_fixture(&schema)?)?);
    let config = match config {
        Some(path) => load_config_from_path(&path)?,
        None => load_config()?,
    };

    let content = fs::read_to_string(&representations)
        .with_context(|| format!("Failed to read representations file: {}", representations.display()))?;
    let raw = parse_representations(&content).with_context(|| format!("Invalid representations file: {}", representations.display()))?;

    let resolver = EntitiesResolver::new(registry.clone())
        .with_config(config)?
        .with_type_resolver(Arc::new(RecordTypeResolver::new(registry)));
    let context = RequestContext {
        request_id,
        ..RequestContext::default()
    };
    let resolved = resolver.resolve_entities_json(raw, &context).await?;

    println!("{}", serde_json::to_string_pretty(&entities_envelope(&resolved))?);
    Ok(())
}

fn run_sdl(schema: PathBuf) -> Result<()> {
    let registry = build_registry(load_fixture(&schema)?)?;
    let sdl = render_sdl(&registry).with_context(|| format!("Cannot print SDL for fixture {}", schema.display()))?;
    println!("{sdl}");
    Ok(())
}

/// Accepts a bare representations array or a variables object carrying one.
fn parse_representations(content: &str) -> serde_json::Result<Vec<Value>> {
    let input: RepresentationsInput = serde_json::from_str(content)?;
    Ok(match input {
        RepresentationsInput::List(list) => list,
        RepresentationsInput::Variables { representations } => representations,
    })
}

fn entities_envelope(resolved: &ResolvedEntities) -> Value {
    json!({ "data": { "_entities": resolved.to_response() } })
}

fn render_sdl(registry: &SchemaRegistry) -> Result<String> {
    let Some(field) = registry.entities_field() else {
        anyhow::bail!("no entity object types are declared");
    };
    Ok(format!("{}\ntype Query {{\n  {}\n}}", field.union_sdl(), field.field_sdl()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureDocument;

    fn accounts_registry() -> Arc<SchemaRegistry> {
        let document: FixtureDocument = serde_json::from_str(include_str!("../tests/data/accounts.json")).expect("fixture parses");
        Arc::new(build_registry(document).expect("registry builds"))
    }

    #[test]
    fn representations_parse_from_list_or_variables() {
        let list = parse_representations(r#"[{ "__typename": "Money", "currency": "EUR" }]"#).expect("list");
        let variables = parse_representations(r#"{ "representations": [{ "__typename": "Money", "currency": "EUR" }] }"#).expect("variables");
        assert_eq!(list, variables);
        assert_eq!(list, vec![json!({ "__typename": "Money", "currency": "EUR" })]);
    }

    #[test]
    fn representations_reject_other_shapes() {
        assert!(parse_representations(r#"{ "reps": [] }"#).is_err());
        assert!(parse_representations(r#""Money""#).is_err());
    }

    #[tokio::test]
    async fn envelope_wraps_entities_under_data() {
        let registry = accounts_registry();
        let resolver = EntitiesResolver::new(registry.clone()).with_type_resolver(Arc::new(RecordTypeResolver::new(registry)));
        let resolved = resolver
            .resolve_entities_json(
                vec![
                    json!({ "__typename": "Money", "currency": "USD", "amount": 1 }),
                    json!({ "__typename": "Account", "id": "missing" }),
                ],
                &RequestContext::default(),
            )
            .await
            .expect("resolve entities");

        assert_eq!(
            entities_envelope(&resolved),
            json!({ "data": { "_entities": [
                { "__typename": "Money", "currency": "USD", "amount": 1 },
                null
            ] } })
        );
    }

    #[test]
    fn sdl_lists_entity_objects() {
        let sdl = render_sdl(&accounts_registry()).expect("sdl");
        assert!(sdl.starts_with("union _Entity = Admin | Customer | Product | Money\n"));
        assert!(sdl.contains("_entities(representations: [_Any!]!): [_Entity]!"));
    }

    #[test]
    fn sdl_requires_an_entity_object() {
        let document: FixtureDocument =
            serde_json::from_str(r#"{ "types": [{ "name": "Upc", "kind": "scalar" }] }"#).expect("fixture parses");
        let registry = build_registry(document).expect("registry builds");
        let error = render_sdl(&registry).unwrap_err();
        assert!(error.to_string().contains("no entity object types"));
    }
}

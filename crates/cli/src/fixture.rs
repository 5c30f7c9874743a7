//! JSON subgraph fixtures: type declarations plus in-memory entity records.

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result, anyhow};
use keyway_schema::{BatchResolver, SchemaRegistry, SingleResolver, TypeDescriptor, TypeResolution, TypeResolver};
use keyway_types::{EntityValue, KeyCasing, Representation, RequestContext, Resolved, TYPENAME_FIELD, TypeKind};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FixtureDocument {
    pub types: Vec<FixtureType>,
}

/// One type declaration in a fixture.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FixtureType {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    pub normalize_keys: Option<KeyCasing>,
    /// Entity records served by a record-table resolver. Types without
    /// records resolve references to themselves.
    pub records: Option<Vec<Value>>,
    #[serde(default)]
    pub resolve: ResolveMode,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolveMode {
    #[default]
    Batch,
    Single,
}

pub fn load_fixture(path: &Path) -> Result<FixtureDocument> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read fixture file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid fixture file: {}", path.display()))
}

pub fn build_registry(document: FixtureDocument) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    for fixture_type in document.types {
        let mut builder = TypeDescriptor::builder(&fixture_type.name, fixture_type.kind);
        for key in &fixture_type.keys {
            builder = builder.key(key.as_str());
        }
        for interface in fixture_type.implements {
            builder = builder.implements(interface);
        }
        if let Some(casing) = fixture_type.normalize_keys {
            builder = builder.normalize_keys(casing);
        }
        if let Some(records) = fixture_type.records {
            let table = Arc::new(RecordTable::new(&fixture_type.keys, records));
            debug!(type_name = %fixture_type.name, record_count = table.records.len(), "loaded fixture records");
            builder = match fixture_type.resolve {
                ResolveMode::Batch => builder.batch_resolver(RecordTableResolver(table)),
                ResolveMode::Single => builder.single_resolver(RecordTableResolver(table)),
            };
        }
        registry.register(builder.build())?;
    }
    Ok(registry)
}

/// Records of one type, matched against references by key fields.
#[derive(Debug)]
struct RecordTable {
    keys: Vec<Vec<String>>,
    records: Vec<EntityValue>,
}

impl RecordTable {
    fn new(keys: &[String], records: Vec<Value>) -> Self {
        let keys = keys
            .iter()
            .map(|key| {
                keyway_schema::KeyFields::new(key)
                    .top_level_fields()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        Self {
            keys,
            records: records.into_iter().map(EntityValue::new).collect(),
        }
    }

    /// First record agreeing with the reference on every field of some key.
    fn find(&self, reference: &Representation) -> Option<EntityValue> {
        self.records
            .iter()
            .find(|record| {
                self.keys.iter().any(|fields| {
                    fields
                        .iter()
                        .all(|field| reference.get(field).is_some_and(|wanted| record.get(field) == Some(wanted)))
                })
            })
            .cloned()
    }
}

struct RecordTableResolver(Arc<RecordTable>);

#[async_trait::async_trait]
impl BatchResolver for RecordTableResolver {
    async fn resolve_references(&self, references: Vec<Representation>, _context: &RequestContext) -> Result<Vec<Resolved>> {
        Ok(references
            .iter()
            .map(|reference| Resolved::from(self.0.find(reference)))
            .collect())
    }
}

#[async_trait::async_trait]
impl SingleResolver for RecordTableResolver {
    async fn resolve_reference(&self, reference: Representation, _context: &RequestContext) -> Result<Resolved> {
        Ok(Resolved::from(self.0.find(&reference)))
    }
}

/// Host type-resolution hook reading the concrete `__typename` a record carries.
pub struct RecordTypeResolver {
    registry: Arc<SchemaRegistry>,
}

impl RecordTypeResolver {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }
}

impl TypeResolver for RecordTypeResolver {
    fn resolve_type(&self, abstract_type: &TypeDescriptor, value: &EntityValue, _context: &RequestContext) -> Result<TypeResolution> {
        let typename = value
            .get(TYPENAME_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("record resolved for {} carries no {TYPENAME_FIELD}", abstract_type.name()))?;
        let concrete = self
            .registry
            .get_type(typename)
            .filter(|descriptor| descriptor.kind() == TypeKind::Object && descriptor.implements(abstract_type.name()))
            .ok_or_else(|| anyhow!("{typename} is not an object type implementing {}", abstract_type.name()))?;
        Ok(TypeResolution::Type(concrete))
    }
}

//! In-memory schema registry answering type lookups by name.

use std::sync::Arc;

use indexmap::IndexMap;
use keyway_types::TypeKind;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{EntitiesField, ResolutionStrategy, TypeDescriptor};

/// Resolves a type name to its descriptor.
pub trait TypeLookup: Send + Sync {
    fn get_type(&self, name: &str) -> Option<Arc<TypeDescriptor>>;
}

/// Errors raised while registering types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Type already registered: {name}")]
    DuplicateType { name: String },

    #[error("Type {name} declares a key with no fields")]
    EmptyKey { name: String },
}

impl SchemaError {
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }

    pub fn empty_key(name: impl Into<String>) -> Self {
        Self::EmptyKey { name: name.into() }
    }
}

/// Registered types keyed by name, in registration order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: IndexMap<String, Arc<TypeDescriptor>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type and returns the shared descriptor.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<Arc<TypeDescriptor>, SchemaError> {
        let name = descriptor.name().to_string();
        if self.types.contains_key(&name) {
            return Err(SchemaError::duplicate_type(name));
        }
        if descriptor.keys().iter().any(|key| key.top_level_fields().is_empty()) {
            return Err(SchemaError::empty_key(name));
        }
        if descriptor.is_entity() && matches!(descriptor.strategy(), ResolutionStrategy::InterfaceRequiresResolver) {
            warn!(type_name = %name, "entity interface registered without a reference resolver");
        }
        debug!(
            type_name = %name,
            kind = %descriptor.kind(),
            key_count = descriptor.keys().len(),
            strategy = descriptor.strategy().label(),
            "registered schema type"
        );

        let descriptor = Arc::new(descriptor);
        self.types.insert(name, Arc::clone(&descriptor));
        Ok(descriptor)
    }

    pub fn get_type(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Object types declaring at least one key, in registration order.
    ///
    /// These are the possible types of the `_Entity` union.
    pub fn entity_types(&self) -> Vec<Arc<TypeDescriptor>> {
        self.types
            .values()
            .filter(|descriptor| descriptor.kind() == TypeKind::Object && descriptor.is_entity())
            .cloned()
            .collect()
    }

    /// Object types implementing the named interface.
    pub fn implementations(&self, interface: &str) -> Vec<Arc<TypeDescriptor>> {
        self.types
            .values()
            .filter(|descriptor| descriptor.kind() == TypeKind::Object && descriptor.implements(interface))
            .cloned()
            .collect()
    }

    /// The `_entities` root field, or `None` when the schema has no entities.
    pub fn entities_field(&self) -> Option<EntitiesField> {
        let possible_types: Vec<String> = self
            .entity_types()
            .iter()
            .map(|descriptor| descriptor.name().to_string())
            .collect();
        if possible_types.is_empty() {
            return None;
        }
        Some(EntitiesField::new(possible_types))
    }
}

impl TypeLookup for SchemaRegistry {
    fn get_type(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        SchemaRegistry::get_type(self, name)
    }
}

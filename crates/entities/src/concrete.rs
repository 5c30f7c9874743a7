//! Concrete type bookkeeping for resolved entity values.

use std::{collections::HashMap, sync::Arc};

use keyway_schema::{TypeDescriptor, TypeResolver};
use keyway_types::{EntityValue, RequestContext, ValueIdentity};
use tracing::trace;

use crate::EntitiesError;

/// Per-call side table from resolved value to its concrete type.
///
/// The table is filled while composing results and read later by the
/// `_Entity` union's type resolution, so the value itself never has to carry
/// its type.
#[derive(Debug, Default, Clone)]
pub struct TypeAssociations {
    types: HashMap<ValueIdentity, Arc<TypeDescriptor>>,
}

impl TypeAssociations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the concrete type of `value`, returning any previous association.
    pub fn record(&mut self, value: &EntityValue, descriptor: Arc<TypeDescriptor>) -> Option<Arc<TypeDescriptor>> {
        let previous = self.types.insert(value.identity(), descriptor);
        if let Some(previous) = &previous {
            trace!(previous = %previous.name(), "replaced concrete type association");
        }
        previous
    }

    pub fn get(&self, value: &EntityValue) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(&value.identity())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Determines the concrete type of a value resolved for `declared`.
///
/// Object types are their own concrete type. For an interface entity the host
/// hook is asked; when it answers with a type and an adjusted value, only the
/// type is used and the resolved value is left as the resolver returned it.
pub fn resolve_concrete_type(
    declared: &Arc<TypeDescriptor>,
    value: &EntityValue,
    type_resolver: Option<&dyn TypeResolver>,
    context: &RequestContext,
) -> Result<Arc<TypeDescriptor>, EntitiesError> {
    if !declared.is_interface_entity() {
        return Ok(Arc::clone(declared));
    }
    let type_resolver = type_resolver.ok_or_else(|| EntitiesError::missing_type_resolver(declared.name()))?;
    let resolution = type_resolver.resolve_type(declared, value, context)?;
    Ok(resolution.into_type())
}

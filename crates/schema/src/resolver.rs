//! Resolver contracts implemented by subgraph authors and the host schema.

use std::sync::Arc;

use keyway_types::{EntityValue, Representation, RequestContext, Resolved};

use crate::TypeDescriptor;

/// Resolves every reference of one type in a single call.
///
/// Implementations must return exactly one [`Resolved`] per reference, in the
/// order the references were given.
#[async_trait::async_trait]
pub trait BatchResolver: Send + Sync {
    async fn resolve_references(&self, references: Vec<Representation>, context: &RequestContext) -> anyhow::Result<Vec<Resolved>>;
}

/// Resolves one reference at a time.
#[async_trait::async_trait]
pub trait SingleResolver: Send + Sync {
    async fn resolve_reference(&self, reference: Representation, context: &RequestContext) -> anyhow::Result<Resolved>;
}

/// Answer of the host's polymorphic type-resolution hook.
#[derive(Clone, Debug)]
pub enum TypeResolution {
    /// The concrete type of the value.
    Type(Arc<TypeDescriptor>),
    /// A concrete type together with an adjusted value. Only the type is
    /// taken into account by entity resolution.
    TypeWithValue(Arc<TypeDescriptor>, EntityValue),
}

impl TypeResolution {
    pub fn into_type(self) -> Arc<TypeDescriptor> {
        match self {
            TypeResolution::Type(descriptor) | TypeResolution::TypeWithValue(descriptor, _) => descriptor,
        }
    }
}

/// Host hook mapping a value of an abstract (interface or union) type to its
/// concrete object type.
pub trait TypeResolver: Send + Sync {
    fn resolve_type(&self, abstract_type: &TypeDescriptor, value: &EntityValue, context: &RequestContext) -> anyhow::Result<TypeResolution>;
}

impl<F> TypeResolver for F
where
    F: Fn(&TypeDescriptor, &EntityValue, &RequestContext) -> anyhow::Result<TypeResolution> + Send + Sync,
{
    fn resolve_type(&self, abstract_type: &TypeDescriptor, value: &EntityValue, context: &RequestContext) -> anyhow::Result<TypeResolution> {
        self(abstract_type, value, context)
    }
}

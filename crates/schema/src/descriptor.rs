//! Type descriptors and the resolution strategy attached to each one.

use std::{fmt, sync::Arc};

use keyway_types::{KeyCasing, TypeKind};

use crate::{BatchResolver, KeyFields, SingleResolver};

/// How references to a type are turned into values.
///
/// Chosen once when the descriptor is built, by priority: a batch resolver
/// wins over a single resolver; an interface with neither cannot be resolved;
/// an object with neither resolves to its own representation.
#[derive(Clone)]
pub enum ResolutionStrategy {
    Batch(Arc<dyn BatchResolver>),
    Single(Arc<dyn SingleResolver>),
    InterfaceRequiresResolver,
    Passthrough,
}

impl ResolutionStrategy {
    /// Short name used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionStrategy::Batch(_) => "batch",
            ResolutionStrategy::Single(_) => "single",
            ResolutionStrategy::InterfaceRequiresResolver => "interface_requires_resolver",
            ResolutionStrategy::Passthrough => "passthrough",
        }
    }
}

impl fmt::Debug for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A schema type as seen by entity resolution.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    keys: Vec<KeyFields>,
    interfaces: Vec<String>,
    normalize_key_casing: Option<KeyCasing>,
    strategy: ResolutionStrategy,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>, kind: TypeKind) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            name: name.into(),
            kind,
            keys: Vec::new(),
            interfaces: Vec::new(),
            normalize_key_casing: None,
            batch_resolver: None,
            single_resolver: None,
        }
    }

    pub fn object(name: impl Into<String>) -> TypeDescriptorBuilder {
        Self::builder(name, TypeKind::Object)
    }

    pub fn interface(name: impl Into<String>) -> TypeDescriptorBuilder {
        Self::builder(name, TypeKind::Interface)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn keys(&self) -> &[KeyFields] {
        &self.keys
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|name| name == interface)
    }

    /// Convention representation keys are rewritten into before dispatch, if any.
    pub fn normalize_key_casing(&self) -> Option<KeyCasing> {
        self.normalize_key_casing
    }

    pub fn strategy(&self) -> &ResolutionStrategy {
        &self.strategy
    }

    pub fn has_batch_resolver(&self) -> bool {
        matches!(self.strategy, ResolutionStrategy::Batch(_))
    }

    pub fn has_single_resolver(&self) -> bool {
        matches!(self.strategy, ResolutionStrategy::Single(_))
    }

    /// Interface entities are referenced by the interface name, so the
    /// concrete type of a resolved value has to be asked of the host.
    pub fn is_interface_entity(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// A type declaring at least one key participates in federation.
    pub fn is_entity(&self) -> bool {
        !self.keys.is_empty()
    }

    /// `@key` directives in declaration order.
    pub fn key_directives(&self) -> Vec<String> {
        self.keys.iter().map(KeyFields::directive).collect()
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeDescriptorBuilder {
    name: String,
    kind: TypeKind,
    keys: Vec<KeyFields>,
    interfaces: Vec<String>,
    normalize_key_casing: Option<KeyCasing>,
    batch_resolver: Option<Arc<dyn BatchResolver>>,
    single_resolver: Option<Arc<dyn SingleResolver>>,
}

impl TypeDescriptorBuilder {
    /// Declares a key, e.g. `.key("id")` or `.key("id organization { id }")`.
    pub fn key(mut self, fields: impl Into<KeyFields>) -> Self {
        self.keys.push(fields.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn normalize_keys(mut self, casing: KeyCasing) -> Self {
        self.normalize_key_casing = Some(casing);
        self
    }

    pub fn batch_resolver(self, resolver: impl BatchResolver + 'static) -> Self {
        self.shared_batch_resolver(Arc::new(resolver))
    }

    pub fn shared_batch_resolver(mut self, resolver: Arc<dyn BatchResolver>) -> Self {
        self.batch_resolver = Some(resolver);
        self
    }

    pub fn single_resolver(self, resolver: impl SingleResolver + 'static) -> Self {
        self.shared_single_resolver(Arc::new(resolver))
    }

    pub fn shared_single_resolver(mut self, resolver: Arc<dyn SingleResolver>) -> Self {
        self.single_resolver = Some(resolver);
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let strategy = match (self.batch_resolver, self.single_resolver) {
            (Some(batch), _) => ResolutionStrategy::Batch(batch),
            (None, Some(single)) => ResolutionStrategy::Single(single),
            (None, None) if self.kind == TypeKind::Interface => ResolutionStrategy::InterfaceRequiresResolver,
            (None, None) => ResolutionStrategy::Passthrough,
        };
        TypeDescriptor {
            name: self.name,
            kind: self.kind,
            keys: self.keys,
            interfaces: self.interfaces,
            normalize_key_casing: self.normalize_key_casing,
            strategy,
        }
    }
}

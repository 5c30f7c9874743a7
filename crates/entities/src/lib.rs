//! # Keyway Entities
//!
//! Resolution core of the federation `_entities` root field. A router sends a
//! batch of `_Any` representations; each one names an entity by `__typename`
//! plus key fields, and this crate turns the batch into resolved values in
//! exactly the caller's order.
//!
//! ## Flow
//!
//! 1. **`group`**: representations are partitioned by typename, remembering
//!    each one's input position
//! 2. **`lookup`**: every typename must name an object or interface type
//! 3. **`normalize`**: keys are rewritten when the type asks for a casing convention
//! 4. **`dispatch`**: the type's strategy runs (batch resolver, per-item
//!    resolver or passthrough)
//! 5. **`compose`**: results are counted, deferred values flattened, concrete
//!    types recorded, and each value written back at its input position
//!
//! Any failure aborts the whole call; partial results are never returned.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use keyway_entities::EntitiesResolver;
//! use keyway_schema::{SchemaRegistry, TypeDescriptor};
//! use keyway_types::{Representation, RequestContext};
//!
//! # tokio_test_block(async {
//! let mut registry = SchemaRegistry::new();
//! registry.register(TypeDescriptor::object("Money").key("currency amount").build())?;
//!
//! let resolver = EntitiesResolver::new(Arc::new(registry));
//! let resolved = resolver
//!     .resolve_entities(
//!         vec![Representation::new("Money").with_field("currency", "EUR").with_field("amount", 5)],
//!         &RequestContext::default(),
//!     )
//!     .await?;
//! assert_eq!(resolved.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! # fn tokio_test_block<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```

mod compose;
mod concrete;
pub mod config;
mod dispatch;
mod error;
mod group;
mod lookup;
mod normalize;
mod response;

use std::sync::Arc;

use futures_util::future::try_join_all;
use keyway_schema::{TypeDescriptor, TypeLookup, TypeResolver};
use keyway_types::{Representation, RequestContext};
use serde_json::Value;
use tracing::{debug, warn};

pub use compose::flatten_resolved;
pub use concrete::{TypeAssociations, resolve_concrete_type};
pub use config::{ConfigError, EntitiesConfig};
pub use error::EntitiesError;
pub use group::{ResolutionGroup, group_representations};
pub use lookup::lookup_entity_type;
pub use normalize::normalize_reference;
pub use response::ResolvedEntities;

use compose::{CallState, GroupComposer};
use dispatch::Dispatch;

/// Entry point for `_entities` resolution against one schema.
#[derive(Clone)]
pub struct EntitiesResolver {
    lookup: Arc<dyn TypeLookup>,
    type_resolver: Option<Arc<dyn TypeResolver>>,
    config: EntitiesConfig,
}

/// A group whose type has been validated and whose references are ready to dispatch.
struct PlannedGroup {
    descriptor: Arc<TypeDescriptor>,
    dispatch: Dispatch,
    references: Vec<Representation>,
    indices: Vec<usize>,
}

impl EntitiesResolver {
    pub fn new(lookup: Arc<dyn TypeLookup>) -> Self {
        Self {
            lookup,
            type_resolver: None,
            config: EntitiesConfig::default(),
        }
    }

    /// Replaces the resolution settings after validating them.
    pub fn with_config(mut self, config: EntitiesConfig) -> Result<Self, ConfigError> {
        config::validate_config(&config)?;
        self.config = config;
        Ok(self)
    }

    /// Installs the host hook used to find concrete types of interface entities.
    pub fn with_type_resolver(mut self, type_resolver: Arc<dyn TypeResolver>) -> Self {
        self.type_resolver = Some(type_resolver);
        self
    }

    pub fn config(&self) -> &EntitiesConfig {
        &self.config
    }

    pub fn type_resolver(&self) -> Option<&dyn TypeResolver> {
        self.type_resolver.as_deref()
    }

    /// Resolves every representation, returning values in input order.
    ///
    /// All groups are validated before any resolver runs. Groups then resolve
    /// concurrently; the first fatal error ends the call.
    ///
    /// # Errors
    ///
    /// - [`EntitiesError::UnknownEntityType`] when a typename is not an object or interface type
    /// - [`EntitiesError::MissingInterfaceResolver`] for an interface entity without resolvers
    /// - [`EntitiesError::ResultCountMismatch`] when a batch resolver returns the wrong number of values
    /// - [`EntitiesError::DeferralDepthExceeded`] when a value stays deferred past the configured depth
    /// - [`EntitiesError::MissingTypeResolver`] when an interface entity resolves but no hook is installed
    /// - [`EntitiesError::Resolver`] for any failure raised by a resolver or the hook
    pub async fn resolve_entities(
        &self,
        representations: Vec<Representation>,
        context: &RequestContext,
    ) -> Result<ResolvedEntities, EntitiesError> {
        let representation_count = representations.len();
        let groups = group_representations(representations);
        debug!(
            request_id = context.request_id.as_deref().unwrap_or("-"),
            representation_count,
            group_count = groups.len(),
            "resolving entities"
        );

        let planned = groups
            .into_iter()
            .map(|group| self.plan_group(group))
            .collect::<Result<Vec<_>, _>>()?;

        let state = CallState::new(representation_count);
        let state_ref = &state;
        let type_resolver = self.type_resolver.as_deref();
        let max_deferral_depth = self.config.max_deferral_depth;

        let composing = planned.into_iter().map(move |group| async move {
            let PlannedGroup {
                descriptor,
                dispatch,
                references,
                indices,
            } = group;
            let composer = GroupComposer {
                descriptor: &descriptor,
                type_resolver,
                context,
                max_deferral_depth,
                state: state_ref,
            };
            composer
                .compose(indices, dispatch.run(descriptor.name(), references, context))
                .await
        });
        try_join_all(composing).await?;

        Ok(state.finish())
    }

    /// Coerces raw `_Any` inputs into representations, then resolves them.
    pub async fn resolve_entities_json(
        &self,
        representations: Vec<Value>,
        context: &RequestContext,
    ) -> Result<ResolvedEntities, EntitiesError> {
        let representations = representations
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Representation::from_json(raw).map_err(|source| EntitiesError::invalid_representation(index, source)))
            .collect::<Result<Vec<_>, _>>()?;
        self.resolve_entities(representations, context).await
    }

    fn plan_group(&self, group: ResolutionGroup) -> Result<PlannedGroup, EntitiesError> {
        let descriptor = lookup_entity_type(self.lookup.as_ref(), group.typename()).inspect_err(|_| {
            warn!(typename = %group.typename(), "no entity type found for representation typename");
        })?;
        let dispatch = Dispatch::for_type(&descriptor)?;

        let (_, references, indices) = group.into_parts();
        let references = references
            .into_iter()
            .map(|reference| normalize_reference(reference, &descriptor))
            .collect();
        Ok(PlannedGroup {
            descriptor,
            dispatch,
            references,
            indices,
        })
    }
}

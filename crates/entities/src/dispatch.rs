//! Invocation of the resolution strategy attached to a type.

use std::sync::Arc;

use futures_util::future::try_join_all;
use keyway_schema::{BatchResolver, ResolutionStrategy, SingleResolver, TypeDescriptor};
use keyway_types::{Representation, RequestContext, Resolved};
use tracing::{debug, warn};

use crate::EntitiesError;

/// A strategy that can actually produce values for a group.
#[derive(Clone)]
pub(crate) enum Dispatch {
    Batch(Arc<dyn BatchResolver>),
    Single(Arc<dyn SingleResolver>),
    Passthrough,
}

impl Dispatch {
    /// Picks the dispatch for a type, rejecting interface entities that
    /// carry no resolver.
    pub(crate) fn for_type(descriptor: &TypeDescriptor) -> Result<Self, EntitiesError> {
        match descriptor.strategy() {
            ResolutionStrategy::Batch(resolver) => Ok(Dispatch::Batch(Arc::clone(resolver))),
            ResolutionStrategy::Single(resolver) => Ok(Dispatch::Single(Arc::clone(resolver))),
            ResolutionStrategy::Passthrough => Ok(Dispatch::Passthrough),
            ResolutionStrategy::InterfaceRequiresResolver => {
                warn!(typename = %descriptor.name(), "entity interface has no reference resolver");
                Err(EntitiesError::missing_interface_resolver(descriptor.name()))
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Dispatch::Batch(_) => "batch",
            Dispatch::Single(_) => "single",
            Dispatch::Passthrough => "passthrough",
        }
    }

    /// Runs the strategy over the group's references.
    ///
    /// Yields one [`Resolved`] per reference in reference order (the batch case
    /// is checked by the composer). Individual results may still be deferred.
    pub(crate) async fn run(
        &self,
        typename: &str,
        references: Vec<Representation>,
        context: &RequestContext,
    ) -> Result<Vec<Resolved>, EntitiesError> {
        debug!(
            typename = %typename,
            strategy = self.label(),
            reference_count = references.len(),
            "dispatching entity references"
        );
        match self {
            Dispatch::Batch(resolver) => Ok(resolver.resolve_references(references, context).await?),
            Dispatch::Single(resolver) => {
                let pending = references
                    .into_iter()
                    .map(|reference| resolver.resolve_reference(reference, context));
                Ok(try_join_all(pending).await?)
            }
            Dispatch::Passthrough => Ok(references.into_iter().map(Resolved::value).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn interface_without_resolver_has_no_dispatch() {
        let descriptor = TypeDescriptor::interface("Node").key("id").build();
        let error = Dispatch::for_type(&descriptor).err().expect("no dispatch");
        assert!(matches!(&error, EntitiesError::MissingInterfaceResolver { typename } if typename == "Node"));
    }

    #[tokio::test]
    async fn passthrough_hands_references_back() {
        let descriptor = TypeDescriptor::object("Money").key("currency").build();
        let dispatch = Dispatch::for_type(&descriptor).expect("passthrough");
        let results = dispatch
            .run("Money", vec![Representation::new("Money").with_field("currency", "EUR")], &RequestContext::default())
            .await
            .expect("dispatch");

        assert_eq!(results.len(), 1);
        match &results[0] {
            Resolved::Value(value) => assert_eq!(value.get("currency"), Some(&json!("EUR"))),
            other => panic!("unexpected result {other:?}"),
        }
    }
}

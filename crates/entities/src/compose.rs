//! Composition of (possibly deferred) group results into the ordered output.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures_util::future::try_join_all;
use keyway_schema::{TypeDescriptor, TypeResolver};
use keyway_types::{EntityValue, RequestContext, Resolved};
use tracing::{trace, warn};

use crate::{EntitiesError, ResolvedEntities, TypeAssociations, resolve_concrete_type};

/// Awaits deferred layers until a concrete value (or null) is reached.
///
/// At most `limit` deferred layers are followed.
pub async fn flatten_resolved(typename: &str, resolved: Resolved, limit: usize) -> Result<Option<EntityValue>, EntitiesError> {
    let mut current = resolved;
    let mut depth = 0;
    loop {
        match current {
            Resolved::Value(value) => return Ok(Some(value)),
            Resolved::Null => return Ok(None),
            Resolved::Deferred(pending) => {
                if depth == limit {
                    warn!(typename = %typename, limit, "deferred value nesting exceeded the configured limit");
                    return Err(EntitiesError::deferral_depth_exceeded(typename, limit));
                }
                depth += 1;
                trace!(typename = %typename, depth, "awaiting deferred value");
                current = pending.await?;
            }
        }
    }
}

/// One output slot per input representation, each written exactly once.
#[derive(Debug)]
struct ResultCollection {
    slots: Vec<Option<EntityValue>>,
    filled: Vec<bool>,
}

impl ResultCollection {
    fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
            filled: vec![false; len],
        }
    }

    fn fill(&mut self, index: usize, value: Option<EntityValue>) {
        debug_assert!(!self.filled[index], "result slot {index} written twice");
        self.slots[index] = value;
        self.filled[index] = true;
    }
}

/// Shared mutable state of one resolution call.
#[derive(Debug)]
pub(crate) struct CallState {
    results: Mutex<ResultCollection>,
    associations: Mutex<TypeAssociations>,
}

impl CallState {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            results: Mutex::new(ResultCollection::with_len(len)),
            associations: Mutex::new(TypeAssociations::new()),
        }
    }

    fn fill(&self, index: usize, value: Option<EntityValue>) {
        lock(&self.results).fill(index, value);
    }

    fn associate(&self, value: &EntityValue, descriptor: Arc<TypeDescriptor>) {
        lock(&self.associations).record(value, descriptor);
    }

    pub(crate) fn finish(self) -> ResolvedEntities {
        let results = self.results.into_inner().unwrap_or_else(PoisonError::into_inner);
        let associations = self.associations.into_inner().unwrap_or_else(PoisonError::into_inner);
        ResolvedEntities::new(results.slots, associations)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settles one group's results into the shared call state.
pub(crate) struct GroupComposer<'a> {
    pub(crate) descriptor: &'a Arc<TypeDescriptor>,
    pub(crate) type_resolver: Option<&'a dyn TypeResolver>,
    pub(crate) context: &'a RequestContext,
    pub(crate) max_deferral_depth: usize,
    pub(crate) state: &'a CallState,
}

impl GroupComposer<'_> {
    /// Waits for the group's results, checks their count against the group's
    /// indices, then flattens each value and writes it at its input position.
    pub(crate) async fn compose<F>(&self, indices: Vec<usize>, pending: F) -> Result<(), EntitiesError>
    where
        F: Future<Output = Result<Vec<Resolved>, EntitiesError>>,
    {
        let results = pending.await?;
        if results.len() != indices.len() {
            warn!(
                typename = %self.descriptor.name(),
                expected = indices.len(),
                actual = results.len(),
                "resolver returned wrong number of results"
            );
            return Err(EntitiesError::result_count_mismatch(self.descriptor.name(), indices.len(), results.len()));
        }

        let settling = results
            .into_iter()
            .zip(indices)
            .map(|(resolved, index)| self.settle(resolved, index));
        try_join_all(settling).await?;
        Ok(())
    }

    async fn settle(&self, resolved: Resolved, index: usize) -> Result<(), EntitiesError> {
        let value = flatten_resolved(self.descriptor.name(), resolved, self.max_deferral_depth).await?;
        if let Some(value) = &value {
            let concrete = resolve_concrete_type(self.descriptor, value, self.type_resolver, self.context)?;
            self.state.associate(value, concrete);
        }
        self.state.fill(index, value);
        Ok(())
    }
}

//! # Keyway Types
//!
//! Shared value types for federated entity resolution. These are the shapes
//! that flow between the schema registry, caller-supplied resolvers and the
//! `_entities` resolution core:
//!
//! - **`Representation`**: an `_Any` record naming an entity by `__typename`
//!   plus its key fields
//! - **`EntityValue`** / **`Resolved`**: resolved domain values and the
//!   possibly-deferred results resolvers hand back
//! - **`TypeKind`** / **`KeyCasing`**: schema type kinds and key naming conventions
//! - **`RequestContext`**: the request-scoped bag passed to every callback

mod casing;
mod context;
mod kind;
mod representation;
mod value;

pub use casing::KeyCasing;
pub use context::RequestContext;
pub use kind::TypeKind;
pub use representation::{Representation, RepresentationError, TYPENAME_FIELD};
pub use value::{DeferredFuture, EntityValue, Resolved, ValueIdentity};

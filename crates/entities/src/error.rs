//! Error taxonomy for an `_entities` resolution call.
//!
//! Every variant is fatal for the whole call: the response either mirrors the
//! input list exactly or is replaced by a single error.

use keyway_types::RepresentationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntitiesError {
    #[error(
        "The _entities resolver tried to load an entity for type \"{typename}\", but no object or interface type of that name was found in the schema"
    )]
    UnknownEntityType { typename: String },

    #[error(
        "The _entities resolver was asked to resolve type '{typename}', which is an entity interface, but the interface defines no reference resolver"
    )]
    MissingInterfaceResolver { typename: String },

    #[error("The entities resolver for type '{typename}' returned wrong number of results: expected {expected}, received {actual}")]
    ResultCountMismatch { typename: String, expected: usize, actual: usize },

    #[error("A value resolved for type '{typename}' was still deferred after {limit} levels")]
    DeferralDepthExceeded { typename: String, limit: usize },

    #[error("Type '{typename}' is an entity interface, but no type resolver was configured to find its concrete type")]
    MissingTypeResolver { typename: String },

    #[error("Invalid representation at index {index}: {source}")]
    InvalidRepresentation {
        index: usize,
        #[source]
        source: RepresentationError,
    },

    /// Failure raised by a reference resolver or the type-resolution hook,
    /// passed through untouched.
    #[error(transparent)]
    Resolver(#[from] anyhow::Error),
}

impl EntitiesError {
    pub fn unknown_entity_type(typename: impl Into<String>) -> Self {
        Self::UnknownEntityType { typename: typename.into() }
    }

    pub fn missing_interface_resolver(typename: impl Into<String>) -> Self {
        Self::MissingInterfaceResolver { typename: typename.into() }
    }

    pub fn result_count_mismatch(typename: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ResultCountMismatch {
            typename: typename.into(),
            expected,
            actual,
        }
    }

    pub fn deferral_depth_exceeded(typename: impl Into<String>, limit: usize) -> Self {
        Self::DeferralDepthExceeded {
            typename: typename.into(),
            limit,
        }
    }

    pub fn missing_type_resolver(typename: impl Into<String>) -> Self {
        Self::MissingTypeResolver { typename: typename.into() }
    }

    pub fn invalid_representation(index: usize, source: RepresentationError) -> Self {
        Self::InvalidRepresentation { index, source }
    }
}

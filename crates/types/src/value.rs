//! Resolved entity values and the deferred results resolvers produce.

use std::{fmt, future::Future, sync::Arc};

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::Representation;

/// Future produced by an asynchronous resolver. It may settle to yet another
/// deferred value.
pub type DeferredFuture = BoxFuture<'static, anyhow::Result<Resolved>>;

/// A resolved domain object.
///
/// Values are shared behind an [`Arc`]; clones point at the same allocation
/// and therefore share one [`ValueIdentity`].
#[derive(Clone, Debug)]
pub struct EntityValue(Arc<Value>);

/// Identity of an [`EntityValue`] allocation, used to key per-call side tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueIdentity(usize);

impl EntityValue {
    pub fn new(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn identity(&self) -> ValueIdentity {
        ValueIdentity(Arc::as_ptr(&self.0) as usize)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Looks up a top-level field when the value is a JSON object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|object| object.get(key))
    }

    /// True when both handles point at the same allocation.
    pub fn same_value(&self, other: &EntityValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Value> for EntityValue {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl From<Representation> for EntityValue {
    fn from(representation: Representation) -> Self {
        Self::new(representation.into_value())
    }
}

/// Outcome of a resolver for a single reference.
pub enum Resolved {
    /// The entity was found.
    Value(EntityValue),
    /// The entity does not exist; its output slot is `null`.
    Null,
    /// The result is not available yet.
    Deferred(DeferredFuture),
}

impl Resolved {
    pub fn value(value: impl Into<EntityValue>) -> Self {
        Self::Value(value.into())
    }

    pub fn null() -> Self {
        Self::Null
    }

    /// Wraps a future that settles to another [`Resolved`].
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = anyhow::Result<Resolved>> + Send + 'static,
    {
        Self::Deferred(future.boxed())
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Resolved::Deferred(_))
    }
}

impl From<Option<EntityValue>> for Resolved {
    fn from(value: Option<EntityValue>) -> Self {
        value.map_or(Resolved::Null, Resolved::Value)
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolved::Null => f.write_str("Null"),
            Resolved::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clones_share_identity() {
        let value = EntityValue::new(json!({ "id": "1" }));
        let clone = value.clone();
        assert_eq!(value.identity(), clone.identity());
        assert!(value.same_value(&clone));

        let twin = EntityValue::new(json!({ "id": "1" }));
        assert_ne!(value.identity(), twin.identity());
    }

    #[tokio::test]
    async fn deferred_settles_to_nested_value() {
        let resolved = Resolved::deferred(async { Ok(Resolved::value(json!({ "id": "7" }))) });
        assert!(resolved.is_deferred());

        let Resolved::Deferred(future) = resolved else {
            panic!("expected deferred");
        };
        match future.await.expect("settled") {
            Resolved::Value(value) => assert_eq!(value.get("id"), Some(&json!("7"))),
            other => panic!("unexpected {other:?}"),
        }
    }
}

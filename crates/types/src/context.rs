//! Request-scoped context handed to resolvers and type-resolution hooks.

use serde_json::{Map as JsonMap, Value};

/// Per-request data available to every resolver invocation.
///
/// The context is read-only from the resolution core's point of view; it is
/// forwarded untouched to batch resolvers, single resolvers and the host's
/// type-resolution hook.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
    /// Optional correlation identifier, included in log events.
    pub request_id: Option<String>,

    /// Free-form request values (viewer, locale, feature flags, ...).
    pub values: JsonMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that tags the context with a request identifier.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Builder-style helper that adds one request value.
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_request_values() {
        let context = RequestContext::new()
            .with_request_id("req-7")
            .with_value("viewer", json!({ "id": "u-1" }))
            .with_value("locale", json!("en"));

        assert_eq!(context.request_id.as_deref(), Some("req-7"));
        assert_eq!(context.get("locale"), Some(&json!("en")));
        assert_eq!(context.get("viewer").and_then(|viewer| viewer.get("id")), Some(&json!("u-1")));
        assert!(context.get("missing").is_none());
    }
}

//! Key casing normalisation applied before references reach a resolver.

use keyway_schema::TypeDescriptor;
use keyway_types::Representation;

/// Rewrites every field name into the type's configured convention.
///
/// `__typename` is rewritten like any other key; leading underscores are kept
/// by [`KeyCasing`](keyway_types::KeyCasing), so it keeps its name.
pub fn normalize_reference(reference: Representation, descriptor: &TypeDescriptor) -> Representation {
    match descriptor.normalize_key_casing() {
        Some(casing) => reference.map_keys(|key| casing.apply(key)),
        None => reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyway_types::{KeyCasing, TYPENAME_FIELD};
    use serde_json::json;

    #[test]
    fn untouched_without_casing_flag() {
        let descriptor = TypeDescriptor::object("User").key("id").build();
        let reference = Representation::new("User").with_field("user_id", "1");
        assert_eq!(normalize_reference(reference.clone(), &descriptor), reference);
    }

    #[test]
    fn snake_casing_underscores_camel_keys() {
        let descriptor = TypeDescriptor::object("User").key("id").normalize_keys(KeyCasing::Snake).build();
        let reference = Representation::new("User").with_field("accountId", "1").with_field("displayName", "Ada");

        let normalized = normalize_reference(reference, &descriptor);
        let keys: Vec<_> = normalized.keys().collect();
        assert_eq!(keys, vec![TYPENAME_FIELD, "account_id", "display_name"]);
        assert_eq!(normalized.get("account_id"), Some(&json!("1")));
        assert_eq!(normalized.typename(), "User");
    }

    #[test]
    fn normalisation_is_idempotent() {
        let descriptor = TypeDescriptor::object("User").key("id").normalize_keys(KeyCasing::Camel).build();
        let reference = Representation::new("User").with_field("account_id", "1");

        let once = normalize_reference(reference, &descriptor);
        let twice = normalize_reference(once.clone(), &descriptor);
        assert_eq!(once, twice);
    }
}

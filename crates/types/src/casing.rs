//! Naming conventions applied to representation keys before dispatch.

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

/// Target naming convention for representation field names.
///
/// Leading underscores are kept as-is, so meta fields such as `__typename`
/// map onto themselves under every convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyCasing {
    /// `userId` -> `user_id`
    Snake,
    /// `user_id` -> `userId`
    Camel,
}

impl KeyCasing {
    /// Rewrites a single field name into this convention.
    ///
    /// The transform is idempotent: applying it to its own output is a no-op.
    pub fn apply(self, key: &str) -> String {
        let body = key.trim_start_matches('_');
        if body.is_empty() {
            return key.to_string();
        }
        let prefix = &key[..key.len() - body.len()];
        let converted = match self {
            KeyCasing::Snake => body.to_snake_case(),
            KeyCasing::Camel => body.to_lower_camel_case(),
        };
        format!("{prefix}{converted}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_rewrites_camel_keys() {
        assert_eq!(KeyCasing::Snake.apply("userId"), "user_id");
        assert_eq!(KeyCasing::Snake.apply("organizationSlugName"), "organization_slug_name");
    }

    #[test]
    fn camel_rewrites_delimited_keys() {
        assert_eq!(KeyCasing::Camel.apply("user_id"), "userId");
        assert_eq!(KeyCasing::Camel.apply("billing-account-id"), "billingAccountId");
    }

    #[test]
    fn leading_underscores_survive_both_directions() {
        assert_eq!(KeyCasing::Snake.apply("__typename"), "__typename");
        assert_eq!(KeyCasing::Camel.apply("__typename"), "__typename");
        assert_eq!(KeyCasing::Camel.apply("_internal_id"), "_internalId");
        assert_eq!(KeyCasing::Snake.apply("___"), "___");
    }

    #[test]
    fn conversion_is_idempotent() {
        for key in ["userId", "user_id", "__typename", "sku"] {
            for casing in [KeyCasing::Snake, KeyCasing::Camel] {
                let once = casing.apply(key);
                assert_eq!(casing.apply(&once), once, "casing {casing:?} on {key}");
            }
        }
    }
}

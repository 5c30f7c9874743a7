//! Definition of the `_entities` root field and its `_Entity` union.

pub const ENTITIES_FIELD: &str = "_entities";
pub const ENTITY_UNION: &str = "_Entity";
pub const ANY_SCALAR: &str = "_Any";
pub const REPRESENTATIONS_ARGUMENT: &str = "representations";

/// The `_entities(representations: [_Any!]!): [_Entity]!` field.
///
/// Only exists when at least one entity object type is registered; its union
/// members are exactly those types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitiesField {
    possible_types: Vec<String>,
}

impl EntitiesField {
    pub(crate) fn new(possible_types: Vec<String>) -> Self {
        Self { possible_types }
    }

    pub fn possible_types(&self) -> &[String] {
        &self.possible_types
    }

    pub fn is_possible_type(&self, name: &str) -> bool {
        self.possible_types.iter().any(|candidate| candidate == name)
    }

    pub fn union_sdl(&self) -> String {
        format!("union {ENTITY_UNION} = {}", self.possible_types.join(" | "))
    }

    pub fn field_sdl(&self) -> String {
        format!("{ENTITIES_FIELD}({REPRESENTATIONS_ARGUMENT}: [{ANY_SCALAR}!]!): [{ENTITY_UNION}]!")
    }
}

#[cfg(test)]
mod tests {
    use crate::{SchemaRegistry, TypeDescriptor};

    #[test]
    fn renders_union_and_field() {
        let mut registry = SchemaRegistry::new();
        registry.register(TypeDescriptor::object("Product").key("upc").build()).unwrap();
        registry.register(TypeDescriptor::object("Review").key("id").build()).unwrap();

        let field = registry.entities_field().expect("entities field");
        assert_eq!(field.union_sdl(), "union _Entity = Product | Review");
        assert_eq!(field.field_sdl(), "_entities(representations: [_Any!]!): [_Entity]!");
        assert!(field.is_possible_type("Review"));
        assert!(!field.is_possible_type("Query"));
    }
}

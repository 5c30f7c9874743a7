//! Type lookup adapter over the schema registry.

use std::sync::Arc;

use keyway_schema::{TypeDescriptor, TypeLookup};

use crate::EntitiesError;

/// Finds the descriptor a representation's typename refers to.
///
/// Only object and interface types can be entities; anything else, or a name
/// the schema does not know, is an unknown entity type.
pub fn lookup_entity_type(lookup: &dyn TypeLookup, typename: &str) -> Result<Arc<TypeDescriptor>, EntitiesError> {
    lookup
        .get_type(typename)
        .filter(|descriptor| descriptor.kind().can_be_entity())
        .ok_or_else(|| EntitiesError::unknown_entity_type(typename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyway_schema::SchemaRegistry;
    use keyway_types::TypeKind;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(TypeDescriptor::object("Product").key("upc").build()).unwrap();
        registry.register(TypeDescriptor::interface("Node").key("id").build()).unwrap();
        registry.register(TypeDescriptor::builder("Upc", TypeKind::Scalar).build()).unwrap();
        registry.register(TypeDescriptor::builder("Media", TypeKind::Union).build()).unwrap();
        registry
    }

    #[test]
    fn accepts_objects_and_interfaces() {
        let registry = registry();
        assert_eq!(lookup_entity_type(&registry, "Product").unwrap().name(), "Product");
        assert_eq!(lookup_entity_type(&registry, "Node").unwrap().name(), "Node");
    }

    #[test]
    fn rejects_other_kinds_and_unknown_names() {
        let registry = registry();
        for typename in ["Upc", "Media", "Ghost"] {
            let error = lookup_entity_type(&registry, typename).unwrap_err();
            assert!(
                matches!(&error, EntitiesError::UnknownEntityType { typename: name } if name == typename),
                "unexpected error for {typename}: {error}"
            );
        }
    }
}

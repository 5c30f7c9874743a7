//! The ordered result of an `_entities` call and the `_Entity` union hook.

use std::sync::Arc;

use keyway_schema::{TypeDescriptor, TypeResolver};
use keyway_types::{EntityValue, RequestContext, TYPENAME_FIELD};
use serde_json::Value;

use crate::{EntitiesError, TypeAssociations};

/// Entities in input order, plus the concrete type recorded for each value.
#[derive(Debug)]
pub struct ResolvedEntities {
    entities: Vec<Option<EntityValue>>,
    associations: TypeAssociations,
}

impl ResolvedEntities {
    pub(crate) fn new(entities: Vec<Option<EntityValue>>, associations: TypeAssociations) -> Self {
        Self { entities, associations }
    }

    /// One entry per input representation; `None` where a resolver found nothing.
    pub fn entities(&self) -> &[Option<EntityValue>] {
        &self.entities
    }

    pub fn get(&self, index: usize) -> Option<&EntityValue> {
        self.entities.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn associations(&self) -> &TypeAssociations {
        &self.associations
    }

    /// The concrete type recorded for `value` during this call.
    pub fn concrete_type(&self, value: &EntityValue) -> Option<&Arc<TypeDescriptor>> {
        self.associations.get(value)
    }

    /// Type resolution for the `_Entity` union.
    ///
    /// Returns the recorded concrete type. If what was recorded is still an
    /// interface, the host hook is consulted once more and only the type part
    /// of its answer is used.
    pub fn entity_type(
        &self,
        value: &EntityValue,
        type_resolver: Option<&dyn TypeResolver>,
        context: &RequestContext,
    ) -> Result<Option<Arc<TypeDescriptor>>, EntitiesError> {
        let Some(recorded) = self.associations.get(value) else {
            return Ok(None);
        };
        if !recorded.is_interface_entity() {
            return Ok(Some(Arc::clone(recorded)));
        }
        let type_resolver = type_resolver.ok_or_else(|| EntitiesError::missing_type_resolver(recorded.name()))?;
        let resolution = type_resolver.resolve_type(recorded, value, context)?;
        Ok(Some(resolution.into_type()))
    }

    /// Serialises the entity list, stamping each object copy with the
    /// `__typename` of its recorded concrete type.
    pub fn to_response(&self) -> Value {
        let entities = self
            .entities
            .iter()
            .map(|entity| match entity {
                Some(value) => self.stamped(value),
                None => Value::Null,
            })
            .collect();
        Value::Array(entities)
    }

    fn stamped(&self, value: &EntityValue) -> Value {
        let mut json = value.as_json().clone();
        if let (Value::Object(object), Some(descriptor)) = (&mut json, self.associations.get(value)) {
            object.insert(TYPENAME_FIELD.to_string(), Value::String(descriptor.name().to_string()));
        }
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyway_schema::TypeResolution;
    use serde_json::json;

    #[test]
    fn response_stamps_concrete_typename_on_copies() {
        let admin = Arc::new(TypeDescriptor::object("Admin").key("id").build());
        let value = EntityValue::new(json!({ "__typename": "User", "id": "1" }));
        let mut associations = TypeAssociations::new();
        associations.record(&value, admin);

        let resolved = ResolvedEntities::new(vec![Some(value.clone()), None], associations);
        assert_eq!(
            resolved.to_response(),
            json!([{ "__typename": "Admin", "id": "1" }, null])
        );
        assert_eq!(value.get(TYPENAME_FIELD), Some(&json!("User")));
    }

    #[test]
    fn entity_type_resolves_recorded_interfaces_again() {
        let user = Arc::new(TypeDescriptor::interface("User").key("id").build());
        let customer = Arc::new(TypeDescriptor::object("Customer").key("id").implements("User").build());
        let value = EntityValue::new(json!({ "id": "2" }));
        let mut associations = TypeAssociations::new();
        associations.record(&value, Arc::clone(&user));
        let resolved = ResolvedEntities::new(vec![Some(value.clone())], associations);

        let hook = move |_: &TypeDescriptor, _: &EntityValue, _: &RequestContext| -> anyhow::Result<TypeResolution> {
            Ok(TypeResolution::Type(Arc::clone(&customer)))
        };
        let context = RequestContext::default();
        let concrete = resolved.entity_type(&value, Some(&hook), &context).unwrap().expect("type");
        assert_eq!(concrete.name(), "Customer");

        let error = resolved.entity_type(&value, None, &context).unwrap_err();
        assert!(matches!(error, EntitiesError::MissingTypeResolver { .. }));
    }

    #[test]
    fn entity_type_is_none_for_unknown_values() {
        let resolved = ResolvedEntities::new(Vec::new(), TypeAssociations::new());
        let stranger = EntityValue::new(json!({}));
        assert!(resolved.entity_type(&stranger, None, &RequestContext::default()).unwrap().is_none());
    }
}

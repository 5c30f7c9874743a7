//! # Keyway Schema
//!
//! The schema-side collaborators of entity resolution: type descriptors with
//! their key fields and resolution strategy, the resolver contracts callers
//! implement, and an in-memory registry that answers type lookups.
//!
//! ```rust
//! use keyway_schema::{SchemaRegistry, TypeDescriptor};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(TypeDescriptor::object("Product").key("upc").build())?;
//!
//! let field = registry.entities_field().expect("Product is an entity");
//! assert_eq!(field.union_sdl(), "union _Entity = Product");
//! # Ok::<(), keyway_schema::SchemaError>(())
//! ```

mod descriptor;
mod entities_field;
mod key_fields;
mod registry;
mod resolver;

pub use descriptor::{ResolutionStrategy, TypeDescriptor, TypeDescriptorBuilder};
pub use entities_field::{ANY_SCALAR, ENTITIES_FIELD, ENTITY_UNION, EntitiesField, REPRESENTATIONS_ARGUMENT};
pub use key_fields::KeyFields;
pub use registry::{SchemaError, SchemaRegistry, TypeLookup};
pub use resolver::{BatchResolver, SingleResolver, TypeResolution, TypeResolver};

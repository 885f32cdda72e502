//! The typed entity model: slots, property descriptors, lazy references,
//! and the vocabulary class registry.

pub mod entity;
pub mod entity_ref;
pub mod property;
pub mod registry;

pub use entity::{Entity, EntityBuilder, Slot, SlotItem, ValueMap};
pub use entity_ref::{EntityRef, resolve_refs};
pub use property::{Property, PropertyKind, SlotValue, ValueTypeExpr};
pub use registry::{ClassDescriptor, ENTITY_ROOT};

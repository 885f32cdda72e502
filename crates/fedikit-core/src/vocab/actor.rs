//! The `Actor` family — `Actor extends Object`.
//!
//! `Actor` itself is abstract — it can own inherited properties and be a
//! `resolve_refs`/parse target, but never a concrete document's `@type`.
//! `Person`, `Service`, `Application`, `Group`, `Organization` are its five
//! concrete subtypes, structurally identical, so one [`VocabActor`] wrapper
//! serves all of them.

use crate::model::entity::{Entity, EntityBuilder, SlotItem};
use crate::model::property::{Property, PropertyKind, ValueTypeExpr};
use crate::model::registry::ClassDescriptor;
use crate::scalars::{Scalar, ScalarKind, Uri};

use super::object::{OBJECT_PROPERTIES, OBJECT_TYPE};

pub const ACTOR_TYPE: &str = "https://www.w3.org/ns/activitystreams#Actor";
pub const PERSON_TYPE: &str = "https://www.w3.org/ns/activitystreams#Person";
pub const SERVICE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Service";
pub const APPLICATION_TYPE: &str = "https://www.w3.org/ns/activitystreams#Application";
pub const GROUP_TYPE: &str = "https://www.w3.org/ns/activitystreams#Group";
pub const ORGANIZATION_TYPE: &str = "https://www.w3.org/ns/activitystreams#Organization";

fn actor_properties() -> Vec<Property> {
    let mut props: Vec<Property> = OBJECT_PROPERTIES.to_vec();
    props.extend([
        Property { name: "inbox", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#inbox", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
        Property { name: "outbox", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#outbox", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
        Property { name: "following", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#following", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
        Property { name: "followers", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#followers", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
        Property { name: "liked", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#liked", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
        Property { name: "streams", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#streams", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
        Property { name: "preferred_username", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#preferredUsername", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::String) },
        Property { name: "endpoints", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#endpoints", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
        Property { name: "manually_approves_followers", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#manuallyApprovesFollowers", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Bool) },
    ]);
    props
}

static ACTOR_PROPERTIES: once_cell::sync::Lazy<Vec<Property>> = once_cell::sync::Lazy::new(actor_properties);

pub(crate) fn classes() -> Vec<ClassDescriptor> {
    let props: &'static [Property] = &ACTOR_PROPERTIES;
    let mut out = vec![ClassDescriptor { type_uri: ACTOR_TYPE, is_abstract: true, ancestors: &[OBJECT_TYPE], properties: props }];
    for type_uri in [PERSON_TYPE, SERVICE_TYPE, APPLICATION_TYPE, GROUP_TYPE, ORGANIZATION_TYPE] {
        out.push(ClassDescriptor { type_uri, is_abstract: false, ancestors: &[ACTOR_TYPE, OBJECT_TYPE], properties: props });
    }
    out
}

/// Any concrete `Actor` subtype (`Person`, `Service`, `Application`,
/// `Group`, `Organization`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabActor(Entity);

impl VocabActor {
    pub fn from_entity(entity: Entity) -> Self {
        VocabActor(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    pub fn entity(&self) -> &Entity {
        &self.0
    }

    pub fn preferred_username(&self) -> Option<&str> {
        self.0.get_singular_str("preferred_username")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get_singular_str("name")
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get_singular_str("summary")
    }

    pub fn inbox(&self) -> Option<&SlotItem> {
        self.0.get_singular("inbox")
    }

    pub fn outbox(&self) -> Option<&SlotItem> {
        self.0.get_singular("outbox")
    }
}

/// Build a minimal actor: id, `preferredUsername`, and a display `name`.
pub fn new_actor(
    type_uri: &'static str,
    id: Uri,
    preferred_username: &str,
    name: &str,
) -> Result<VocabActor, crate::error::FedikitError> {
    let entity = EntityBuilder::new(type_uri)
        .with_id(id)?
        .with("preferred_username", SlotItem::Scalar(Scalar::String(preferred_username.to_string())))?
        .with("name", SlotItem::Scalar(Scalar::String(name.to_string())))?
        .build();
    Ok(VocabActor::from_entity(entity))
}

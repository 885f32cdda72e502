//! The `Activity` family — `Activity extends Object`.
//!
//! `IntransitiveActivity` and every concrete verb (`Create`, `Follow`,
//! `Like`, ...) share one property table — `Activity`'s own `actor`/
//! `object`/`target`/`result`/`origin`/`instrument` layered on top of
//! [`object::OBJECT_PROPERTIES`]. `IntransitiveActivity` subtypes
//! (`Arrive`, `Travel`) conventionally leave `object` unset rather than
//! have it rejected outright — a usage convention here, not a checked one.

use crate::model::entity::{Entity, EntityBuilder, SlotItem};
use crate::model::property::{Property, PropertyKind, ValueTypeExpr};
use crate::model::registry::ClassDescriptor;

use super::link::LINK_TYPE;
use super::object::{OBJECT_PROPERTIES, OBJECT_TYPE};

pub const ACTIVITY_TYPE: &str = "https://www.w3.org/ns/activitystreams#Activity";
pub const INTRANSITIVE_ACTIVITY_TYPE: &str = "https://www.w3.org/ns/activitystreams#IntransitiveActivity";

pub const CREATE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Create";
pub const UPDATE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Update";
pub const DELETE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Delete";
pub const FOLLOW_TYPE: &str = "https://www.w3.org/ns/activitystreams#Follow";
pub const ACCEPT_TYPE: &str = "https://www.w3.org/ns/activitystreams#Accept";
pub const REJECT_TYPE: &str = "https://www.w3.org/ns/activitystreams#Reject";
pub const ADD_TYPE: &str = "https://www.w3.org/ns/activitystreams#Add";
pub const REMOVE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Remove";
pub const LIKE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Like";
pub const ANNOUNCE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Announce";
pub const UNDO_TYPE: &str = "https://www.w3.org/ns/activitystreams#Undo";
pub const BLOCK_TYPE: &str = "https://www.w3.org/ns/activitystreams#Block";
pub const FLAG_TYPE: &str = "https://www.w3.org/ns/activitystreams#Flag";
pub const ARRIVE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Arrive";
pub const TRAVEL_TYPE: &str = "https://www.w3.org/ns/activitystreams#Travel";
pub const VIEW_TYPE: &str = "https://www.w3.org/ns/activitystreams#View";

const ID_TO_LINK: ValueTypeExpr = ValueTypeExpr::Union(&[ValueTypeExpr::Class(OBJECT_TYPE), ValueTypeExpr::Class(LINK_TYPE)]);

fn activity_properties() -> Vec<Property> {
    let mut props: Vec<Property> = OBJECT_PROPERTIES.to_vec();
    props.extend([
        Property { name: "actor", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#actor", subproperties: &[], value_type: ID_TO_LINK },
        Property { name: "object", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#object", subproperties: &[], value_type: ID_TO_LINK },
        Property { name: "target", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#target", subproperties: &[], value_type: ID_TO_LINK },
        Property { name: "result", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#result", subproperties: &[], value_type: ID_TO_LINK },
        Property { name: "origin", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#origin", subproperties: &[], value_type: ID_TO_LINK },
        Property { name: "instrument", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#instrument", subproperties: &[], value_type: ID_TO_LINK },
    ]);
    props
}

static ACTIVITY_PROPERTIES: once_cell::sync::Lazy<Vec<Property>> = once_cell::sync::Lazy::new(activity_properties);

pub(crate) fn classes() -> Vec<ClassDescriptor> {
    let props: &'static [Property] = &ACTIVITY_PROPERTIES;
    let mut out = vec![
        ClassDescriptor { type_uri: ACTIVITY_TYPE, is_abstract: true, ancestors: &[OBJECT_TYPE], properties: props },
        ClassDescriptor {
            type_uri: INTRANSITIVE_ACTIVITY_TYPE,
            is_abstract: true,
            ancestors: &[ACTIVITY_TYPE, OBJECT_TYPE],
            properties: props,
        },
    ];
    for type_uri in [CREATE_TYPE, UPDATE_TYPE, DELETE_TYPE, FOLLOW_TYPE, ACCEPT_TYPE, REJECT_TYPE, ADD_TYPE, REMOVE_TYPE, LIKE_TYPE, ANNOUNCE_TYPE, UNDO_TYPE, BLOCK_TYPE, FLAG_TYPE, VIEW_TYPE] {
        out.push(ClassDescriptor { type_uri, is_abstract: false, ancestors: &[ACTIVITY_TYPE, OBJECT_TYPE], properties: props });
    }
    for type_uri in [ARRIVE_TYPE, TRAVEL_TYPE] {
        out.push(ClassDescriptor {
            type_uri,
            is_abstract: false,
            ancestors: &[INTRANSITIVE_ACTIVITY_TYPE, ACTIVITY_TYPE, OBJECT_TYPE],
            properties: props,
        });
    }
    out
}

/// Any concrete `Activity`/`IntransitiveActivity` verb.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabActivity(Entity);

impl VocabActivity {
    pub fn from_entity(entity: Entity) -> Self {
        VocabActivity(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    pub fn entity(&self) -> &Entity {
        &self.0
    }

    pub fn actor(&self) -> Vec<&SlotItem> {
        self.0.get_plural("actor")
    }

    pub fn object(&self) -> Vec<&SlotItem> {
        self.0.get_plural("object")
    }

    pub fn target(&self) -> Vec<&SlotItem> {
        self.0.get_plural("target")
    }
}

/// Build a verb activity with an actor and a direct object — the shape
/// almost every outbox entry (`Create`, `Like`, `Follow`, ...) takes.
pub fn new_activity(
    type_uri: &'static str,
    actor: SlotItem,
    object: SlotItem,
) -> Result<VocabActivity, crate::error::FedikitError> {
    let entity = EntityBuilder::new(type_uri).with("actor", actor)?.with("object", object)?.build();
    Ok(VocabActivity::from_entity(entity))
}

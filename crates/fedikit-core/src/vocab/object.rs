//! The `Object` root and its simple subtypes.
//!
//! `Object` owns the addressing, attachment, and temporal properties every
//! other family (`Activity`, `Actor`, `Collection`) inherits. The concrete
//! leaf types here (`Note`, `Article`, ...) add nothing of their own, so a
//! single [`VocabObject`] wrapper serves all of them — the `@type` carried
//! on the underlying [`Entity`] is what tells them apart, not the Rust
//! type — tagged variants over one struct per class.

use crate::model::entity::{Entity, EntityBuilder, SlotItem};
use crate::model::property::{Property, PropertyKind, ValueTypeExpr};
use crate::model::registry::ClassDescriptor;
use crate::scalars::{LanguageString, Scalar, ScalarKind, Timestamp};

use super::link::LINK_TYPE;

pub const OBJECT_TYPE: &str = "https://www.w3.org/ns/activitystreams#Object";
pub const NOTE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Note";
pub const ARTICLE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Article";
pub const IMAGE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Image";
pub const AUDIO_TYPE: &str = "https://www.w3.org/ns/activitystreams#Audio";
pub const VIDEO_TYPE: &str = "https://www.w3.org/ns/activitystreams#Video";
pub const PAGE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Page";
pub const DOCUMENT_TYPE: &str = "https://www.w3.org/ns/activitystreams#Document";
pub const EVENT_TYPE: &str = "https://www.w3.org/ns/activitystreams#Event";
pub const PLACE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Place";
pub const PROFILE_TYPE: &str = "https://www.w3.org/ns/activitystreams#Profile";
pub const RELATIONSHIP_TYPE: &str = "https://www.w3.org/ns/activitystreams#Relationship";

const ID_TO_LINK: ValueTypeExpr = ValueTypeExpr::Union(&[ValueTypeExpr::Class(OBJECT_TYPE), ValueTypeExpr::Class(LINK_TYPE)]);
const TEXT: ValueTypeExpr = ValueTypeExpr::Union(&[ValueTypeExpr::Scalar(ScalarKind::LanguageString), ValueTypeExpr::PlainString]);

/// The full property table inherited by `Activity`, `Actor`, and
/// `Collection` alike.
pub static OBJECT_PROPERTIES: &[Property] = &[
    Property { name: "id", kind: PropertyKind::Id, uri: "@id", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Uri) },
    Property { name: "attachment", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#attachment", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
    Property { name: "attributed_to", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#attributedTo", subproperties: &["https://www.w3.org/ns/activitystreams#actor"], value_type: ID_TO_LINK },
    Property { name: "audience", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#audience", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
    Property { name: "content", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#content", subproperties: &[], value_type: TEXT },
    Property { name: "context", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#context", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
    Property { name: "name", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#name", subproperties: &[], value_type: TEXT },
    Property { name: "end_time", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#endTime", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Timestamp) },
    Property { name: "generator", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#generator", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
    Property { name: "icon", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#icon", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "image", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#image", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "in_reply_to", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#inReplyTo", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
    Property { name: "location", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#location", subproperties: &[], value_type: ValueTypeExpr::Class(OBJECT_TYPE) },
    Property { name: "preview", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#preview", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "published", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#published", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Timestamp) },
    Property { name: "replies", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#replies", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
    Property { name: "start_time", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#startTime", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Timestamp) },
    Property { name: "summary", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#summary", subproperties: &[], value_type: TEXT },
    Property { name: "tag", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#tag", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "updated", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#updated", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Timestamp) },
    Property { name: "url", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#url", subproperties: &[], value_type: ValueTypeExpr::Class(LINK_TYPE) },
    Property { name: "to", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#to", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "bto", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#bto", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "cc", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#cc", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "bcc", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#bcc", subproperties: &[], value_type: ID_TO_LINK },
    Property { name: "media_type", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#mediaType", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::MediaType) },
    Property { name: "duration", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#duration", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Duration) },
    Property { name: "source", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#source", subproperties: &[], value_type: TEXT },
    Property { name: "likes", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#likes", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
    Property { name: "shares", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#shares", subproperties: &[], value_type: ValueTypeExpr::Class(super::collection::COLLECTION_TYPE) },
    Property { name: "sensitive", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#sensitive", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Bool) },
];

pub(crate) fn classes() -> Vec<ClassDescriptor> {
    let mut out = vec![ClassDescriptor {
        type_uri: OBJECT_TYPE,
        is_abstract: true,
        ancestors: &[],
        properties: OBJECT_PROPERTIES,
    }];
    for type_uri in [NOTE_TYPE, ARTICLE_TYPE, EVENT_TYPE, PLACE_TYPE, PROFILE_TYPE, RELATIONSHIP_TYPE] {
        out.push(ClassDescriptor {
            type_uri,
            is_abstract: false,
            ancestors: &[OBJECT_TYPE],
            properties: OBJECT_PROPERTIES,
        });
    }
    out.push(ClassDescriptor {
        type_uri: DOCUMENT_TYPE,
        is_abstract: false,
        ancestors: &[OBJECT_TYPE],
        properties: OBJECT_PROPERTIES,
    });
    for type_uri in [IMAGE_TYPE, AUDIO_TYPE, VIDEO_TYPE, PAGE_TYPE] {
        out.push(ClassDescriptor {
            type_uri,
            is_abstract: false,
            ancestors: &[DOCUMENT_TYPE, OBJECT_TYPE],
            properties: OBJECT_PROPERTIES,
        });
    }
    out
}

/// A generic `Object`-family entity: `Note`, `Article`, `Image`, `Document`,
/// or any other leaf whose `@type` resolves under [`OBJECT_TYPE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabObject(Entity);

impl VocabObject {
    pub fn from_entity(entity: Entity) -> Self {
        VocabObject(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    pub fn entity(&self) -> &Entity {
        &self.0
    }

    pub fn builder(type_uri: &'static str) -> EntityBuilder {
        EntityBuilder::new(type_uri)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get_singular_str("name")
    }

    pub fn content(&self) -> Option<&str> {
        self.0.get_singular_str("content")
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get_singular_str("summary")
    }

    pub fn published(&self) -> Option<Timestamp> {
        match self.0.get_singular("published")? {
            SlotItem::Scalar(Scalar::Timestamp(t)) => Some(t.clone()),
            _ => None,
        }
    }

    pub fn attributed_to(&self) -> Vec<&SlotItem> {
        self.0.get_plural("attributed_to")
    }
}

/// Build a `Note` from the common construction path used throughout the
/// test suite and the blog demo: id, content, and optional attribution.
pub fn new_note(id: crate::scalars::Uri, content: LanguageString) -> Result<VocabObject, crate::error::FedikitError> {
    let entity = EntityBuilder::new(NOTE_TYPE)
        .with_id(id)?
        .with("content", SlotItem::Scalar(Scalar::LanguageString(content)))?
        .build();
    Ok(VocabObject::from_entity(entity))
}

//! The `Link` root — a distinct root, not an `Object` subtype.
//!
//! Unlike every other family, `Link` does not extend `Object` — it has its
//! own flat property table and exists purely to point at something (an
//! anchor, a media asset) without itself carrying content.

use crate::model::entity::{Entity, EntityBuilder, SlotItem};
use crate::model::property::{Property, PropertyKind, ValueTypeExpr};
use crate::model::registry::ClassDescriptor;
use crate::scalars::{LanguageTag, Scalar, ScalarKind, Uri};

use super::object::OBJECT_TYPE;

pub const LINK_TYPE: &str = "https://www.w3.org/ns/activitystreams#Link";
pub const MENTION_TYPE: &str = "https://www.w3.org/ns/activitystreams#Mention";

const TEXT: ValueTypeExpr = ValueTypeExpr::Union(&[ValueTypeExpr::Scalar(ScalarKind::LanguageString), ValueTypeExpr::PlainString]);
const ID_TO_LINK: ValueTypeExpr = ValueTypeExpr::Union(&[ValueTypeExpr::Class(OBJECT_TYPE), ValueTypeExpr::Class(LINK_TYPE)]);

pub static LINK_PROPERTIES: &[Property] = &[
    Property { name: "id", kind: PropertyKind::Id, uri: "@id", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Uri) },
    Property { name: "href", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#href", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Uri) },
    Property { name: "rel", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#rel", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::String) },
    Property { name: "media_type", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#mediaType", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::MediaType) },
    Property { name: "name", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#name", subproperties: &[], value_type: TEXT },
    Property { name: "hreflang", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#hreflang", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::LanguageTag) },
    Property { name: "height", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#height", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Integer) },
    Property { name: "width", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#width", subproperties: &[], value_type: ValueTypeExpr::Scalar(ScalarKind::Integer) },
    Property { name: "preview", kind: PropertyKind::Plural, uri: "https://www.w3.org/ns/activitystreams#preview", subproperties: &[], value_type: ID_TO_LINK },
];

pub(crate) fn classes() -> Vec<ClassDescriptor> {
    vec![
        ClassDescriptor { type_uri: LINK_TYPE, is_abstract: false, ancestors: &[], properties: LINK_PROPERTIES },
        ClassDescriptor { type_uri: MENTION_TYPE, is_abstract: false, ancestors: &[LINK_TYPE], properties: LINK_PROPERTIES },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabLink(Entity);

impl VocabLink {
    pub fn from_entity(entity: Entity) -> Self {
        VocabLink(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    pub fn entity(&self) -> &Entity {
        &self.0
    }

    pub fn href(&self) -> Option<&Uri> {
        self.0.get_singular_uri("href")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get_singular_str("name")
    }
}

pub fn new_link(type_uri: &'static str, href: Uri) -> Result<VocabLink, crate::error::FedikitError> {
    let entity = EntityBuilder::new(type_uri)
        .with("href", SlotItem::Scalar(Scalar::Uri(href)))?
        .build();
    Ok(VocabLink::from_entity(entity))
}

pub fn new_link_with_lang(
    type_uri: &'static str,
    href: Uri,
    hreflang: LanguageTag,
) -> Result<VocabLink, crate::error::FedikitError> {
    let entity = EntityBuilder::new(type_uri)
        .with("href", SlotItem::Scalar(Scalar::Uri(href)))?
        .with("hreflang", SlotItem::Scalar(Scalar::LanguageTag(hreflang)))?
        .build();
    Ok(VocabLink::from_entity(entity))
}

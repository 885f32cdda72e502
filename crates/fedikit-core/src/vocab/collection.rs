//! The `Collection` family.
//!
//! Four concrete classes, all directly usable as a document's `@type`:
//! `Collection`, `OrderedCollection`, `CollectionPage`, and
//! `OrderedCollectionPage` — the last a diamond over both `OrderedCollection`
//! and `CollectionPage`.

use crate::model::entity::{Entity, EntityBuilder, SlotItem};
use crate::model::property::{Property, PropertyKind, ValueTypeExpr};
use crate::model::registry::ClassDescriptor;
use crate::scalars::Scalar;

use super::object::{OBJECT_PROPERTIES, OBJECT_TYPE};

pub const COLLECTION_TYPE: &str = "https://www.w3.org/ns/activitystreams#Collection";
pub const ORDERED_COLLECTION_TYPE: &str = "https://www.w3.org/ns/activitystreams#OrderedCollection";
pub const COLLECTION_PAGE_TYPE: &str = "https://www.w3.org/ns/activitystreams#CollectionPage";
pub const ORDERED_COLLECTION_PAGE_TYPE: &str = "https://www.w3.org/ns/activitystreams#OrderedCollectionPage";

fn paging_properties() -> Vec<Property> {
    vec![
        Property { name: "total_items", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#totalItems", subproperties: &[], value_type: ValueTypeExpr::Scalar(crate::scalars::ScalarKind::Integer) },
        Property { name: "current", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#current", subproperties: &[], value_type: ValueTypeExpr::Class(COLLECTION_TYPE) },
        Property { name: "first", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#first", subproperties: &[], value_type: ValueTypeExpr::Class(COLLECTION_TYPE) },
        Property { name: "last", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#last", subproperties: &[], value_type: ValueTypeExpr::Class(COLLECTION_TYPE) },
    ]
}

fn collection_properties() -> Vec<Property> {
    let mut props: Vec<Property> = OBJECT_PROPERTIES.to_vec();
    props.extend(paging_properties());
    props.push(Property {
        name: "items",
        kind: PropertyKind::Plural,
        uri: "https://www.w3.org/ns/activitystreams#items",
        subproperties: &[],
        value_type: ValueTypeExpr::Class(OBJECT_TYPE),
    });
    props
}

fn ordered_collection_properties() -> Vec<Property> {
    let mut props: Vec<Property> = OBJECT_PROPERTIES.to_vec();
    props.extend(paging_properties());
    props.push(Property {
        name: "ordered_items",
        kind: PropertyKind::Plural,
        uri: "https://www.w3.org/ns/activitystreams#orderedItems",
        subproperties: &[],
        value_type: ValueTypeExpr::Class(OBJECT_TYPE),
    });
    props
}

fn paging_extra() -> Vec<Property> {
    vec![
        Property { name: "part_of", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#partOf", subproperties: &[], value_type: ValueTypeExpr::Class(COLLECTION_TYPE) },
        Property { name: "next", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#next", subproperties: &[], value_type: ValueTypeExpr::Class(COLLECTION_TYPE) },
        Property { name: "prev", kind: PropertyKind::Singular, uri: "https://www.w3.org/ns/activitystreams#prev", subproperties: &[], value_type: ValueTypeExpr::Class(COLLECTION_TYPE) },
    ]
}

fn collection_page_properties() -> Vec<Property> {
    let mut props = collection_properties();
    props.extend(paging_extra());
    props
}

fn ordered_collection_page_properties() -> Vec<Property> {
    let mut props = ordered_collection_properties();
    props.extend(paging_extra());
    props
}

static COLLECTION_PROPERTIES: once_cell::sync::Lazy<Vec<Property>> = once_cell::sync::Lazy::new(collection_properties);
static ORDERED_COLLECTION_PROPERTIES: once_cell::sync::Lazy<Vec<Property>> =
    once_cell::sync::Lazy::new(ordered_collection_properties);
static COLLECTION_PAGE_PROPERTIES: once_cell::sync::Lazy<Vec<Property>> =
    once_cell::sync::Lazy::new(collection_page_properties);
static ORDERED_COLLECTION_PAGE_PROPERTIES: once_cell::sync::Lazy<Vec<Property>> =
    once_cell::sync::Lazy::new(ordered_collection_page_properties);

pub(crate) fn classes() -> Vec<ClassDescriptor> {
    vec![
        ClassDescriptor {
            type_uri: COLLECTION_TYPE,
            is_abstract: false,
            ancestors: &[OBJECT_TYPE],
            properties: &COLLECTION_PROPERTIES,
        },
        ClassDescriptor {
            type_uri: ORDERED_COLLECTION_TYPE,
            is_abstract: false,
            ancestors: &[COLLECTION_TYPE, OBJECT_TYPE],
            properties: &ORDERED_COLLECTION_PROPERTIES,
        },
        ClassDescriptor {
            type_uri: COLLECTION_PAGE_TYPE,
            is_abstract: false,
            ancestors: &[COLLECTION_TYPE, OBJECT_TYPE],
            properties: &COLLECTION_PAGE_PROPERTIES,
        },
        ClassDescriptor {
            type_uri: ORDERED_COLLECTION_PAGE_TYPE,
            is_abstract: false,
            ancestors: &[ORDERED_COLLECTION_TYPE, COLLECTION_PAGE_TYPE, COLLECTION_TYPE, OBJECT_TYPE],
            properties: &ORDERED_COLLECTION_PAGE_PROPERTIES,
        },
    ]
}

/// Any concrete `Collection` family member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocabCollection(Entity);

impl VocabCollection {
    pub fn from_entity(entity: Entity) -> Self {
        VocabCollection(entity)
    }

    pub fn into_entity(self) -> Entity {
        self.0
    }

    pub fn entity(&self) -> &Entity {
        &self.0
    }

    pub fn total_items(&self) -> Option<i64> {
        match self.0.get_singular("total_items")? {
            SlotItem::Scalar(Scalar::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn items(&self) -> Vec<&SlotItem> {
        self.0.get_plural("items")
    }

    pub fn ordered_items(&self) -> Vec<&SlotItem> {
        self.0.get_plural("ordered_items")
    }
}

/// Build an inline (non-paged) `OrderedCollection` holding `items` directly
/// — the fallback path when there is no cursor supplier: an
/// `OrderedCollection` whose `totalItems` is the counter's result.
/// `total_items` is the counter supplier's result when registered; falls
/// back to `items.len()` otherwise.
pub fn new_inline_ordered_collection(
    items: Vec<SlotItem>,
    total_items: Option<i64>,
) -> Result<VocabCollection, crate::error::FedikitError> {
    let total = total_items.unwrap_or(items.len() as i64);
    let entity = EntityBuilder::new(ORDERED_COLLECTION_TYPE)
        .with("total_items", SlotItem::Scalar(Scalar::Integer(total)))?
        .with_many("ordered_items", items)?
        .build();
    Ok(VocabCollection::from_entity(entity))
}

/// Build an index `OrderedCollection` pointing at cursor-addressed pages
/// — the first-cursor path.
pub fn new_paged_ordered_collection_index(
    total_items: Option<i64>,
    first: Option<SlotItem>,
    last: Option<SlotItem>,
) -> Result<VocabCollection, crate::error::FedikitError> {
    let mut builder = EntityBuilder::new(ORDERED_COLLECTION_TYPE);
    if let Some(n) = total_items {
        builder = builder.with("total_items", SlotItem::Scalar(Scalar::Integer(n)))?;
    }
    if let Some(f) = first {
        builder = builder.with("first", f)?;
    }
    if let Some(l) = last {
        builder = builder.with("last", l)?;
    }
    Ok(VocabCollection::from_entity(builder.build()))
}

/// Build a single `OrderedCollectionPage`.
pub fn new_ordered_collection_page(
    items: Vec<SlotItem>,
    part_of: Option<SlotItem>,
    next: Option<SlotItem>,
    prev: Option<SlotItem>,
) -> Result<VocabCollection, crate::error::FedikitError> {
    let mut builder = EntityBuilder::new(ORDERED_COLLECTION_PAGE_TYPE).with_many("ordered_items", items)?;
    if let Some(p) = part_of {
        builder = builder.with("part_of", p)?;
    }
    if let Some(n) = next {
        builder = builder.with("next", n)?;
    }
    if let Some(p) = prev {
        builder = builder.with("prev", p)?;
    }
    Ok(VocabCollection::from_entity(builder.build()))
}

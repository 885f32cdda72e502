//! Declarative property descriptors.
//!
//! A [`Property`] is a static description of one named attribute: its
//! cardinality, its property URI, the subproperty URIs folded in when
//! reading, and the type expression governing JSON-LD parsing. Vocabulary
//! classes (`crate::vocab`) are built from `&'static [Property]` tables
//! rather than runtime attribute lookup — polymorphic property dispatch via
//! declarative descriptors.

use serde_json::Value;

use crate::error::ParseError;
use crate::model::entity::{Slot, SlotItem};
use crate::model::registry;
use crate::scalars::{self, ScalarKind};

/// The cardinality of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// The `@id` property — exactly one URI, no subproperties.
    Id,
    /// Zero-or-one value, represented as a 0- or 1-element slot sequence.
    Singular,
    /// Zero-or-more values.
    Plural,
}

/// A type expression describing the allowed value type(s) of a property.
#[derive(Debug, Clone)]
pub enum ValueTypeExpr {
    Scalar(ScalarKind),
    /// A concrete or abstract vocabulary class, named by its `TYPE_URI`.
    Class(&'static str),
    /// A plain string with no further shape constraints — strings that
    /// don't carry a more specific shape degrade to a plain string accept.
    PlainString,
    Union(&'static [ValueTypeExpr]),
}

/// A declarative property descriptor.
#[derive(Debug, Clone)]
pub struct Property {
    /// The field name this property is exposed as on its owning class
    /// (e.g. `"attributed_to"`), used by [`crate::model::entity_ref::resolve_refs`]
    /// to match `property_names`.
    pub name: &'static str,
    pub kind: PropertyKind,
    /// The property URI (for `kind = Id` this is conceptually `@id`, but
    /// the field still carries the nominal URI used for diagnostics).
    pub uri: &'static str,
    /// Additional URIs folded in when reading, in declaration order (the
    /// subproperty fold). Empty for `kind = Id`.
    pub subproperties: &'static [&'static str],
    pub value_type: ValueTypeExpr,
}

impl Property {
    /// Normalize a bare construction-time value into a [`Slot`].
    pub fn normalize(&self, value: SlotValue) -> Result<Slot, ParseError> {
        match (self.kind, value) {
            (PropertyKind::Id, SlotValue::IdValue(uri)) => Ok(Slot::Id(uri)),
            (PropertyKind::Singular, SlotValue::Single(item)) => Ok(Slot::Seq(vec![item])),
            (PropertyKind::Plural, SlotValue::Many(items)) => Ok(Slot::Seq(items)),
            (kind, value) => Err(ParseError::TypeMismatch {
                expected: format!("{kind:?}"),
                found: format!("{value:?}"),
            }),
        }
    }

    /// Whether `slot` has the shape this property's cardinality expects —
    /// used to decide which named property should be reported when more
    /// than one name aliases the same URI.
    pub fn check_slot(&self, slot: &Slot) -> bool {
        match (self.kind, slot) {
            (PropertyKind::Id, Slot::Id(_)) => true,
            (PropertyKind::Id, Slot::Seq(_)) => false,
            (PropertyKind::Singular, Slot::Seq(items)) => items.len() == 1,
            (PropertyKind::Plural, Slot::Seq(items)) => items.len() != 1,
            (_, Slot::Id(_)) => false,
        }
    }

    /// Read this property's singular view: the first non-reference value
    /// found across `(uri, *subproperties)` in declaration order.
    pub fn read_singular<'e>(&self, values: &'e crate::model::entity::ValueMap) -> Option<&'e SlotItem> {
        self.read_plural(values).into_iter().next()
    }

    /// Read this property's plural view: non-reference values concatenated
    /// across the property and all its subproperties, in order.
    pub fn read_plural<'e>(&self, values: &'e crate::model::entity::ValueMap) -> Vec<&'e SlotItem> {
        let mut out = Vec::new();
        for uri in std::iter::once(self.uri).chain(self.subproperties.iter().copied()) {
            if let Some(Slot::Seq(items)) = values.get(uri) {
                out.extend(items.iter().filter(|item| !matches!(item, SlotItem::Ref(_))));
            }
        }
        out
    }

    /// Drive the JSON-LD to entity conversion for this property. A shape
    /// that doesn't fit `self.value_type` at all (wrong arity, wrong kind
    /// of node) fails with [`ParseError::TypeMismatch`], so the caller can
    /// try the next candidate property sharing this URI; a shape that fits
    /// but whose scalar literal doesn't decode fails with
    /// [`ParseError::Scalar`] instead, which the caller treats the same way.
    pub fn parse_jsonld(&self, json_items: &[Value]) -> Result<Slot, ParseError> {
        match self.kind {
            PropertyKind::Id => {
                let [single] = json_items else {
                    return Err(ParseError::TypeMismatch {
                        expected: "exactly one @id value".to_string(),
                        found: format!("{} values", json_items.len()),
                    });
                };
                let uri = single
                    .get("@id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| ParseError::TypeMismatch {
                        expected: "@id".to_string(),
                        found: single.to_string(),
                    })?;
                Ok(Slot::Id(scalars::Uri::parse(uri)?))
            }
            PropertyKind::Singular => {
                if json_items.len() > 1 {
                    return Err(ParseError::TypeMismatch {
                        expected: "at most one value".to_string(),
                        found: format!("{} values", json_items.len()),
                    });
                }
                let items = parse_items(&self.value_type, json_items)?;
                Ok(Slot::Seq(items))
            }
            PropertyKind::Plural => {
                let items = parse_items(&self.value_type, json_items)?;
                Ok(Slot::Seq(items))
            }
        }
    }
}

/// The shape of a bare value passed at construction time, mirroring
/// `Property::normalize`'s three cases.
#[derive(Debug)]
pub enum SlotValue {
    IdValue(crate::scalars::Uri),
    Single(SlotItem),
    Many(Vec<SlotItem>),
}

fn parse_items(expr: &ValueTypeExpr, json_items: &[Value]) -> Result<Vec<SlotItem>, ParseError> {
    json_items.iter().map(|item| parse_one(expr, item)).collect()
}

fn parse_one(expr: &ValueTypeExpr, item: &Value) -> Result<SlotItem, ParseError> {
    // The @id shape test precedes all type attempts.
    if let Some(obj) = item.as_object() {
        if obj.len() == 1 {
            if let Some(id) = obj.get("@id").and_then(|v| v.as_str()) {
                return Ok(SlotItem::Ref(crate::model::entity_ref::EntityRef::new(
                    scalars::Uri::parse(id)?,
                )));
            }
        }
    }
    parse_non_ref(expr, item)
}

fn parse_non_ref(expr: &ValueTypeExpr, item: &Value) -> Result<SlotItem, ParseError> {
    match expr {
        ValueTypeExpr::Scalar(kind) => {
            scalars::decode_scalar(*kind, item).map(SlotItem::Scalar).map_err(Into::into)
        }
        ValueTypeExpr::PlainString => item
            .get("@value")
            .and_then(|v| v.as_str())
            .map(|s| SlotItem::Scalar(crate::scalars::Scalar::String(s.to_string())))
            .ok_or_else(|| ParseError::TypeMismatch {
                expected: "plain string".to_string(),
                found: item.to_string(),
            }),
        ValueTypeExpr::Class(type_uri) => {
            let entity = registry::parse_expanded_sync(type_uri, item)?;
            Ok(SlotItem::Entity(Box::new(entity)))
        }
        ValueTypeExpr::Union(members) => {
            for member in *members {
                if let Ok(v) = parse_non_ref(member, item) {
                    return Ok(v);
                }
            }
            Err(ParseError::TypeMismatch {
                expected: format!("{expr:?}"),
                found: item.to_string(),
            })
        }
    }
}

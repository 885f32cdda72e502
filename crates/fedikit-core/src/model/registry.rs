//! The vocabulary class registry.
//!
//! Every concrete and abstract ActivityStreams class registers a
//! [`ClassDescriptor`] naming its type URI, its full (inherited) property
//! table, and its ancestor chain. `@type`-driven dispatch — "pick the most
//! specific subtype of the target present in the document" — is resolved
//! here, once, against a flat table rather than walking live trait objects.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ParseError;
use crate::model::entity::{Entity, Slot, ValueMap};
use crate::model::property::{Property, PropertyKind};
use crate::scalars::Uri;

/// Static description of one vocabulary class.
pub struct ClassDescriptor {
    pub type_uri: &'static str,
    /// Abstract classes (`Object`, `Link`, `Activity`, `Actor`, `Collection`,
    /// `CollectionPage`, `Document`) can own inherited properties and serve
    /// as `resolve_refs`/parse targets, but can never be the resolved
    /// `@type` of a concrete document.
    pub is_abstract: bool,
    /// Every proper ancestor's type URI, transitively, in no particular
    /// order. Hand-listed per class rather than walked at runtime, since
    /// the vocabulary's inheritance graph (including `OrderedCollectionPage`'s
    /// diamond over `Collection`) is fixed and small.
    pub ancestors: &'static [&'static str],
    /// The class's full property table: its own declarations plus every
    /// inherited property, flattened.
    pub properties: &'static [Property],
}

/// The sentinel target type meaning "any registered concrete class" — the
/// abstract entity root used by [`crate::model::entity_ref::resolve_refs`]
/// when eagerly loading a reference with no declared value-type constraint.
pub const ENTITY_ROOT: &str = "";

static REGISTRY: Lazy<HashMap<&'static str, ClassDescriptor>> =
    Lazy::new(|| crate::vocab::all_classes().into_iter().map(|d| (d.type_uri, d)).collect());

/// All declared properties for `type_uri`, or an empty slice if
/// unregistered.
pub fn properties_for(type_uri: &str) -> &'static [Property] {
    REGISTRY.get(type_uri).map(|d| d.properties).unwrap_or(&[])
}

fn is_abstract_class(type_uri: &str) -> bool {
    REGISTRY.get(type_uri).map(|d| d.is_abstract).unwrap_or(false)
}

/// Whether `candidate` is `target` or a registered descendant of it.
/// `target == ENTITY_ROOT` matches every registered class.
fn is_subtype(candidate: &str, target: &str) -> bool {
    if target == ENTITY_ROOT || candidate == target {
        return true;
    }
    REGISTRY.get(candidate).map(|d| d.ancestors.contains(&target)).unwrap_or(false)
}

/// Resolve an already-expanded JSON-LD node into an [`Entity`].
/// `target_type` constrains which registered class may be chosen; pass
/// [`ENTITY_ROOT`] to accept the most specific class the `@type` array
/// names, unconstrained.
///
/// This performs no network I/O and recurses through nested `Class`-typed
/// property values synchronously — expansion and remote-context resolution
/// happen once, at the top of [`Entity::parse`](crate::model::entity::Entity::parse),
/// not per nested node.
pub fn parse_expanded_sync(target_type: &'static str, expanded: &Value) -> Result<Entity, ParseError> {
    let obj = expanded
        .as_object()
        .ok_or_else(|| ParseError::TypeMismatch { expected: "a JSON object".to_string(), found: expanded.to_string() })?;

    let types: Vec<&str> = obj
        .get("@type")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let resolved = resolve_class(&types, target_type)?;
    let props = properties_for(resolved);

    let mut values = ValueMap::new();
    let mut extra = IndexMap::new();

    if let Some(id_str) = obj.get("@id").and_then(|v| v.as_str()) {
        if let Some(idp) = props.iter().find(|p| p.kind == PropertyKind::Id) {
            values.insert(idp.uri, Slot::Id(Uri::parse(id_str)?));
        }
    }

    for (key, raw_value) in obj {
        if key == "@type" || key == "@id" {
            continue;
        }
        let json_items: Vec<Value> = raw_value.as_array().cloned().unwrap_or_else(|| vec![raw_value.clone()]);

        let mut candidates: Vec<&Property> = props.iter().filter(|p| p.uri == key.as_str()).collect();
        // Try plural first when a URI is aliased by both a singular and a
        // plural named property.
        candidates.sort_by_key(|p| match p.kind {
            PropertyKind::Plural => 0,
            PropertyKind::Singular => 1,
            PropertyKind::Id => 2,
        });

        let mut resolved_slot = None;
        for candidate in &candidates {
            match candidate.parse_jsonld(&json_items) {
                Ok(slot) => {
                    resolved_slot = Some((candidate.uri, slot));
                    break;
                }
                // A type mismatch means some other same-URI candidate might
                // still fit; a scalar value error means this candidate's
                // shape was right but a literal in the list didn't decode —
                // neither aborts the whole entity, both fall through to the
                // next candidate and, failing all of them, to `extra` below.
                Err(ParseError::TypeMismatch { .. }) | Err(ParseError::Scalar(_)) => continue,
                Err(other) => return Err(other),
            }
        }

        match resolved_slot {
            Some((uri, slot)) => {
                values.insert(uri, slot);
            }
            // Unknown URI, or every same-URI candidate rejected the shape:
            // preserve the raw expanded value rather than drop data.
            None => {
                extra.insert(key.clone(), raw_value.clone());
            }
        }
    }

    Ok(Entity::from_parts(resolved, values, extra))
}

fn resolve_class(types: &[&str], target_type: &'static str) -> Result<&'static str, ParseError> {
    if target_type != ENTITY_ROOT && types.contains(&target_type) && !is_abstract_class(target_type) {
        return Ok(target_type);
    }

    let mut best: Option<&'static ClassDescriptor> = None;
    for type_uri in types {
        let Some(descriptor) = REGISTRY.get(*type_uri) else { continue };
        if descriptor.is_abstract || !is_subtype(descriptor.type_uri, target_type) {
            continue;
        }
        best = match best {
            None => Some(descriptor),
            Some(current) if descriptor.ancestors.len() > current.ancestors.len() => Some(descriptor),
            Some(current) => Some(current),
        };
    }

    best.map(|d| d.type_uri).ok_or_else(|| ParseError::UnknownType {
        types: types.iter().map(|s| s.to_string()).collect(),
        target: target_type,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    pub const NOTE_TYPE: &str = crate::vocab::object::NOTE_TYPE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_most_specific_registered_subtype() {
        let expanded = json!({
            "@type": [crate::vocab::object::NOTE_TYPE],
            "@id": "https://example.test/notes/1",
        });
        let entity = parse_expanded_sync(ENTITY_ROOT, &expanded).unwrap();
        assert_eq!(entity.type_uri(), crate::vocab::object::NOTE_TYPE);
    }

    #[test]
    fn unregistered_type_fails_with_unknown_type() {
        let expanded = json!({ "@type": ["https://example.test/ns#Bogus"] });
        let err = parse_expanded_sync(ENTITY_ROOT, &expanded);
        assert!(matches!(err, Err(ParseError::UnknownType { .. })));
    }

    /// A scalar decode failure on one property's value list must not abort
    /// the whole entity: the property falls back to `extra`, and every
    /// other property still parses.
    #[test]
    fn scalar_value_error_on_one_property_falls_back_to_extra_not_abort() {
        let expanded = json!({
            "@type": [crate::vocab::link::LINK_TYPE],
            "https://www.w3.org/ns/activitystreams#href": [{ "@value": "https://example.test/target" }],
            "https://www.w3.org/ns/activitystreams#rel": [
                { "@value": "alternate" },
                { "@value": 42 },
            ],
        });
        let entity = parse_expanded_sync(ENTITY_ROOT, &expanded).unwrap();
        assert_eq!(entity.type_uri(), crate::vocab::link::LINK_TYPE);
        assert!(entity.get_singular("href").is_some());
        assert!(entity.get_plural("rel").is_empty(), "malformed rel value should not be parsed into a slot");
        assert!(entity.extra().contains_key("https://www.w3.org/ns/activitystreams#rel"));
    }
}

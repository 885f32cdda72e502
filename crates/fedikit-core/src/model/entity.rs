//! The entity model.
//!
//! An [`Entity`] is the untyped backing store behind every vocabulary
//! wrapper in `crate::vocab`: a resolved `@type`, a map from property URI to
//! [`Slot`], and an `extra` bag preserving whatever the declared properties
//! didn't claim.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::error::FedikitError;
use crate::jsonld::{ContextProcessor, JsonLdProcessor};
use crate::model::entity_ref::EntityRef;
use crate::model::property::{Property, PropertyKind, SlotValue};
use crate::model::registry;
use crate::scalars::{Scalar, Uri, encode_scalar};

/// A property's stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The `@id` slot: exactly one URI.
    Id(Uri),
    /// Every other slot, singular or plural, is an ordered sequence —
    /// cardinality is enforced by [`Property::check_slot`], not by the
    /// slot's own shape.
    Seq(Vec<SlotItem>),
}

/// One element of a [`Slot::Seq`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotItem {
    Scalar(Scalar),
    /// A fully resolved, nested entity.
    Entity(Box<Entity>),
    /// An unresolved reference, as produced by a bare `{"@id": "..."}` node
    /// during parsing until [`crate::model::entity_ref::resolve_refs`]
    /// replaces it.
    Ref(EntityRef),
}

/// Property URI to slot. Keys are the `'static` URIs from the owning
/// class's property table, so no allocation is needed for lookups.
pub type ValueMap = IndexMap<&'static str, Slot>;

/// The untyped entity backing every vocabulary wrapper.
#[derive(Debug, Clone)]
pub struct Entity {
    type_uri: &'static str,
    values: ValueMap,
    extra: IndexMap<String, Value>,
}

impl Entity {
    pub(crate) fn from_parts(type_uri: &'static str, values: ValueMap, extra: IndexMap<String, Value>) -> Self {
        Entity { type_uri, values, extra }
    }

    pub fn type_uri(&self) -> &'static str {
        self.type_uri
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueMap {
        &mut self.values
    }

    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// The entity's own `@id`, if its class declares an `id` property and a
    /// value was set.
    pub fn id(&self) -> Option<&Uri> {
        let idp = registry::properties_for(self.type_uri)
            .iter()
            .find(|p| p.kind == PropertyKind::Id)?;
        match self.values.get(idp.uri) {
            Some(Slot::Id(uri)) => Some(uri),
            _ => None,
        }
    }

    fn property(&self, name: &str) -> Option<&'static Property> {
        registry::properties_for(self.type_uri).iter().find(|p| p.name == name)
    }

    /// Read a named property's singular view.
    pub fn get_singular(&self, name: &str) -> Option<&SlotItem> {
        self.property(name)?.read_singular(&self.values)
    }

    /// Read a named property's plural view.
    pub fn get_plural(&self, name: &str) -> Vec<&SlotItem> {
        match self.property(name) {
            Some(p) => p.read_plural(&self.values),
            None => Vec::new(),
        }
    }

    /// Convenience: a singular string-ish scalar (`String` or
    /// `LanguageString`'s text), ignoring language tagging.
    pub fn get_singular_str(&self, name: &str) -> Option<&str> {
        match self.get_singular(name)? {
            SlotItem::Scalar(Scalar::String(s)) => Some(s),
            SlotItem::Scalar(Scalar::LanguageString(ls)) => Some(&ls.text),
            _ => None,
        }
    }

    /// Convenience: a singular URI-shaped scalar.
    pub fn get_singular_uri(&self, name: &str) -> Option<&Uri> {
        match self.get_singular(name)? {
            SlotItem::Scalar(Scalar::Uri(u)) => Some(u),
            _ => None,
        }
    }

    /// Build the raw, already-expanded-shaped JSON document for this entity:
    /// `@type`, each declared slot under its property URI, then the `extra`
    /// bag, verbatim.
    pub fn to_raw_document(&self) -> Value {
        let mut map = Map::new();
        map.insert("@type".to_string(), json!([self.type_uri]));
        for (uri, slot) in &self.values {
            match slot {
                Slot::Id(u) => {
                    map.insert("@id".to_string(), json!(u.as_str()));
                }
                Slot::Seq(items) => {
                    let arr: Vec<Value> = items.iter().map(slot_item_to_raw).collect();
                    map.insert((*uri).to_string(), Value::Array(arr));
                }
            }
        }
        for (uri, raw) in &self.extra {
            map.insert(uri.clone(), raw.clone());
        }
        Value::Object(map)
    }

    /// Serialize to JSON-LD: build the raw document, then either expand it
    /// or compact it against the class's default context via `processor`.
    pub async fn serialize(&self, expand: bool, processor: &dyn JsonLdProcessor) -> Result<Value, FedikitError> {
        let raw = self.to_raw_document();
        if expand {
            Ok(processor.expand(&raw).await?)
        } else {
            Ok(processor.compact(&raw, &Value::Null).await?)
        }
    }

    /// Serialize using the crate's built-in [`ContextProcessor`] — the
    /// common case; a caller with its own JSON-LD processor can use
    /// [`Entity::serialize`] instead.
    pub async fn serialize_default(&self, expand: bool) -> Result<Value, FedikitError> {
        self.serialize(expand, &ContextProcessor).await
    }

    /// Parse a JSON-LD document into an `Entity` whose resolved `@type` is
    /// the most specific registered subtype of `target_type` present in
    /// the document. `target_type` may be [`registry::ENTITY_ROOT`] to
    /// accept any registered class.
    ///
    /// `document` is expanded as-is: if it carries its own `@context`, that
    /// wins. A caller that fetched `document` remotely and has a
    /// loader-suggested context to fall back on (e.g. a `Link` header) is
    /// expected to set `@context` on `document` before calling this, as
    /// [`crate::model::entity_ref::EntityRef::load`] does.
    pub async fn parse(target_type: &'static str, document: &Value) -> Result<Entity, FedikitError> {
        let expanded = ContextProcessor.expand(document).await?;
        registry::parse_expanded_sync(target_type, &expanded).map_err(Into::into)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.type_uri == other.type_uri && self.values == other.values && self.extra == other.extra
    }
}

impl Eq for Entity {}

impl std::hash::Hash for Entity {
    /// Hashes `values` and `extra` by their sorted keys so that two entities
    /// built via different insertion orders hash identically.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_uri.hash(state);

        let mut value_keys: Vec<&&'static str> = self.values.keys().collect();
        value_keys.sort();
        for k in value_keys {
            k.hash(state);
            self.values.get(k).unwrap().hash(state);
        }

        let mut extra_keys: Vec<&String> = self.extra.keys().collect();
        extra_keys.sort();
        for k in extra_keys {
            k.hash(state);
            self.extra.get(k).unwrap().to_string().hash(state);
        }
    }
}

fn slot_item_to_raw(item: &SlotItem) -> Value {
    match item {
        SlotItem::Scalar(s) => encode_scalar(s),
        SlotItem::Ref(r) => json!({ "@id": r.uri().as_str() }),
        SlotItem::Entity(e) => e.to_raw_document(),
    }
}

/// Builds an [`Entity`] from named, already-typed values, enforcing "each
/// construction-time keyword targets a distinct property URI".
pub struct EntityBuilder {
    type_uri: &'static str,
    values: ValueMap,
}

impl EntityBuilder {
    pub fn new(type_uri: &'static str) -> Self {
        EntityBuilder { type_uri, values: ValueMap::new() }
    }

    fn find(&self, name: &str) -> Result<&'static Property, FedikitError> {
        registry::properties_for(self.type_uri)
            .iter()
            .find(|p| p.name == name)
            .copied()
            .ok_or_else(|| FedikitError::NoSuchProperty { name: name.to_string() })
    }

    fn insert(&mut self, prop: &'static Property, slot: Slot) -> Result<(), FedikitError> {
        if self.values.contains_key(prop.uri) {
            return Err(FedikitError::DuplicateProperty { uri: prop.uri.to_string() });
        }
        self.values.insert(prop.uri, slot);
        Ok(())
    }

    pub fn with_id(mut self, uri: Uri) -> Result<Self, FedikitError> {
        let prop = self.find("id")?;
        let slot = prop.normalize(SlotValue::IdValue(uri))?;
        self.insert(prop, slot)?;
        Ok(self)
    }

    /// Set a singular or plural property to one value (a plural property
    /// becomes a one-element sequence).
    pub fn with(mut self, name: &str, item: SlotItem) -> Result<Self, FedikitError> {
        let prop = self.find(name)?;
        let slot = match prop.kind {
            PropertyKind::Singular => prop.normalize(SlotValue::Single(item))?,
            PropertyKind::Plural => prop.normalize(SlotValue::Many(vec![item]))?,
            PropertyKind::Id => return Err(FedikitError::NoSuchProperty { name: name.to_string() }),
        };
        self.insert(prop, slot)?;
        Ok(self)
    }

    /// Set a plural property to many values.
    pub fn with_many(mut self, name: &str, items: Vec<SlotItem>) -> Result<Self, FedikitError> {
        let prop = self.find(name)?;
        if prop.kind != PropertyKind::Plural {
            return Err(FedikitError::NoSuchProperty { name: name.to_string() });
        }
        let slot = prop.normalize(SlotValue::Many(items))?;
        self.insert(prop, slot)?;
        Ok(self)
    }

    pub fn build(self) -> Entity {
        Entity::from_parts(self.type_uri, self.values, IndexMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_hash_equal_regardless_of_insertion_order() {
        let a = EntityBuilder::new(registry::test_support::NOTE_TYPE)
            .with_id(Uri::parse("https://example.test/notes/1").unwrap())
            .unwrap()
            .with("content", SlotItem::Scalar(Scalar::String("hi".into())))
            .unwrap()
            .build();
        let b = EntityBuilder::new(registry::test_support::NOTE_TYPE)
            .with("content", SlotItem::Scalar(Scalar::String("hi".into())))
            .unwrap()
            .with_id(Uri::parse("https://example.test/notes/1").unwrap())
            .unwrap()
            .build();
        assert_eq!(a, b);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn duplicate_property_at_construction_is_rejected() {
        let err = EntityBuilder::new(registry::test_support::NOTE_TYPE)
            .with("content", SlotItem::Scalar(Scalar::String("a".into())))
            .unwrap()
            .with("content", SlotItem::Scalar(Scalar::String("b".into())));
        assert!(matches!(err, Err(FedikitError::DuplicateProperty { .. })));
    }

    /// Subproperty fold: `Object.attributed_to` folds in `Activity.actor`
    /// (same co-located URI set declared as a subproperty), so reading the
    /// singular and plural views of `attributed_to` on an `Activity` both
    /// surface a value only ever set under `actor`.
    #[test]
    fn reading_attributed_to_folds_in_activity_actor() {
        use crate::vocab::activity::CREATE_TYPE;

        // EntityRef items are filtered out of `read`, so use a resolved
        // entity to observe the fold.
        let actor_entity = SlotItem::Entity(Box::new(
            EntityBuilder::new(registry::test_support::NOTE_TYPE)
                .with_id(Uri::parse("https://example.test/actors/alice").unwrap())
                .unwrap()
                .build(),
        ));
        let entity = EntityBuilder::new(CREATE_TYPE).with("actor", actor_entity.clone()).unwrap().build();

        assert_eq!(entity.get_singular("attributed_to"), Some(&actor_entity));
        assert!(entity.get_plural("attributed_to").contains(&&actor_entity));
    }
}

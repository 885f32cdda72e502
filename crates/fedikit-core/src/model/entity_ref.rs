//! Entity references and lazy loading.

use std::collections::HashSet;

use serde_json::Value;

use crate::docloader::DocumentLoader;
use crate::error::FedikitError;
use crate::model::entity::{Entity, Slot, SlotItem};
use crate::model::registry;
use crate::scalars::Uri;

/// A lightweight placeholder for an entity whose full representation has
/// not been fetched. Equality and hash are by URI alone.
#[derive(Debug, Clone)]
pub struct EntityRef {
    uri: Uri,
}

impl EntityRef {
    pub fn new(uri: Uri) -> Self {
        EntityRef { uri }
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Fetch and parse the referenced entity as `target_type`: load the
    /// document, fall back to the loader's suggested context (its `Link:
    /// rel="http://www.w3.org/ns/json-ld#context"` target) when the
    /// document carries no `@context` of its own, then delegate to
    /// `Entity::parse`.
    pub async fn load(
        &self,
        target_type: &'static str,
        loader: &dyn DocumentLoader,
    ) -> Result<Entity, FedikitError> {
        let remote = loader
            .load(&self.uri)
            .await?
            .ok_or_else(|| FedikitError::LoadFailure {
                uri: self.uri.to_string(),
                reason: "document not found".to_string(),
            })?;
        let document = with_suggested_context(remote.document, remote.context_url.as_deref());
        Entity::parse(target_type, &document).await
    }
}

/// Set `@context` to `context_url` when `document` doesn't already declare
/// one of its own — the document's own `@context` always wins. Expansion
/// still only resolves the well-known ActivityStreams context URL; a
/// `context_url` pointing anywhere else surfaces as a `ContextResolution`
/// error rather than being silently ignored.
fn with_suggested_context(mut document: Value, context_url: Option<&str>) -> Value {
    if let (Value::Object(map), Some(url)) = (&mut document, context_url) {
        map.entry("@context").or_insert_with(|| Value::String(url.to_string()));
    }
    document
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for EntityRef {}

impl std::hash::Hash for EntityRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

/// Walk `entity`'s declared properties (or the subset named in
/// `property_names`), replacing `EntityRef` slot items in place with the
/// result of loading them as the abstract entity root.
///
/// Unknown property names fail with [`FedikitError::NoSuchProperty`].
pub async fn resolve_refs(
    entity: &mut Entity,
    property_names: Option<&[&str]>,
    loader: &dyn DocumentLoader,
) -> Result<(), FedikitError> {
    let declared = registry::properties_for(entity.type_uri());
    let selected: Vec<&'static crate::model::property::Property> = match property_names {
        None => declared.iter().collect(),
        Some(names) => {
            let known: HashSet<&str> = declared.iter().map(|p| p.name).collect();
            for name in names {
                if !known.contains(name) {
                    return Err(FedikitError::NoSuchProperty { name: name.to_string() });
                }
            }
            declared.iter().filter(|p| names.contains(&p.name)).collect()
        }
    };

    for prop in selected {
        let Some(slot) = entity.values_mut().get_mut(prop.uri) else { continue };
        if let Slot::Seq(items) = slot {
            for item in items.iter_mut() {
                if let SlotItem::Ref(r) = item {
                    let loaded = r.load(registry::ENTITY_ROOT, loader).await?;
                    *item = SlotItem::Entity(Box::new(loaded));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ref_equality_is_by_uri() {
        let a = EntityRef::new(Uri::parse("https://example.test/a").unwrap());
        let b = EntityRef::new(Uri::parse("https://example.test/a").unwrap());
        let c = EntityRef::new(Uri::parse("https://example.test/b").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);

        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}

//! JSON-LD compaction — the inverse of [`super::expand`].

use serde_json::{Map, Value, json};

use super::context::{Coercion, Container, Context};
use crate::error::JsonLdError;

/// Compact an already-expanded document against `context`, inserting a
/// top-level `@context` pointing at the ActivityStreams context URL.
pub fn compact(expanded: &Value, context: &Context) -> Result<Value, JsonLdError> {
    let mut node = compact_node(context, expanded)?;
    if let Value::Object(map) = &mut node {
        let mut with_context = Map::new();
        with_context.insert("@context".to_string(), json!(super::context::AS_CONTEXT_URL));
        with_context.append(map);
        return Ok(Value::Object(with_context));
    }
    Ok(node)
}

fn compact_node(context: &Context, node: &Value) -> Result<Value, JsonLdError> {
    let map = node
        .as_object()
        .ok_or_else(|| JsonLdError::Malformed(format!("expected expanded object, got {node}")))?;

    let mut out = Map::new();

    if let Some(id) = map.get("@id").and_then(|v| v.as_str()) {
        out.insert("id".to_string(), json!(id));
    }

    if let Some(Value::Array(types)) = map.get("@type") {
        let compacted: Vec<String> = types
            .iter()
            .map(|t| {
                let iri = t.as_str().unwrap_or_default();
                context.term_for_iri(iri).unwrap_or(iri).to_string()
            })
            .collect();
        match compacted.as_slice() {
            [] => {}
            [one] => {
                out.insert("type".to_string(), json!(one));
            }
            many => {
                out.insert("type".to_string(), json!(many));
            }
        }
    }

    for (key, value) in map.iter() {
        if key == "@id" || key == "@type" {
            continue;
        }
        let term = context.term_for_iri(key).unwrap_or(key);
        let term_def = context.term(term);
        let coercion = term_def.map(|d| d.coercion).unwrap_or(Coercion::None);
        let is_set = term_def.map(|d| d.container == Container::Set).unwrap_or(false);

        let items = value
            .as_array()
            .ok_or_else(|| JsonLdError::Malformed(format!("expected array for property {key}")))?;
        let compacted_items = items
            .iter()
            .map(|item| compact_value(context, coercion, item))
            .collect::<Result<Vec<_>, _>>()?;

        if !is_set && compacted_items.len() == 1 {
            out.insert(term.to_string(), compacted_items.into_iter().next().unwrap());
        } else {
            out.insert(term.to_string(), Value::Array(compacted_items));
        }
    }

    Ok(Value::Object(out))
}

fn compact_value(context: &Context, coercion: Coercion, item: &Value) -> Result<Value, JsonLdError> {
    let Some(map) = item.as_object() else {
        return Ok(item.clone());
    };

    if let Some(id) = map.get("@id").and_then(|v| v.as_str()) {
        if map.len() == 1 {
            return Ok(if coercion == Coercion::Id {
                json!(id)
            } else {
                json!({ "id": id })
            });
        }
        // A nested node with more than just `@id` is a full entity, not a
        // bare reference — compact it recursively rather than collapsing.
        return compact_node(context, item);
    }

    if map.contains_key("@value") {
        let only_value = map.len() == 1;
        let value_and_xsd_type = map.len() == 2 && map.contains_key("@type");
        if only_value || value_and_xsd_type {
            return Ok(map.get("@value").unwrap().clone());
        }
        // Has `@language` (or an unrecognized `@type`) — keep the explicit
        // value object so language tags survive the round trip.
        return Ok(item.clone());
    }

    compact_node(context, item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::context::activitystreams_context;
    use crate::jsonld::expand::expand;

    #[test]
    fn compacts_expanded_document_back_to_terms() {
        let ctx = activitystreams_context();
        let doc = json!({
            "@context": "https://www.w3.org/ns/activitystreams",
            "type": "Person",
            "id": "https://example.test/alice",
            "name": "Alice",
        });
        let expanded = expand(&doc, &ctx).unwrap();
        let compacted = compact(&expanded, &ctx).unwrap();
        assert_eq!(compacted["type"], json!("Person"));
        assert_eq!(compacted["id"], json!("https://example.test/alice"));
        assert_eq!(compacted["name"], json!("Alice"));
    }

    #[test]
    fn set_container_properties_stay_arrays_even_with_one_item() {
        let ctx = activitystreams_context();
        let doc = json!({
            "type": "Create",
            "actor": "https://example.test/alice",
        });
        let expanded = expand(&doc, &ctx).unwrap();
        let compacted = compact(&expanded, &ctx).unwrap();
        assert_eq!(compacted["actor"], json!(["https://example.test/alice"]));
    }
}

//! JSON-LD expansion.

use serde_json::{Map, Value, json};

use super::context::{Coercion, Context};
use crate::error::JsonLdError;

/// Expand `document` against its (possibly absent) `@context`, falling
/// back to `default_context` when none is present or the `@context` value
/// is the well-known ActivityStreams context URL.
pub fn expand(document: &Value, default_context: &Context) -> Result<Value, JsonLdError> {
    let context = resolve_context(document.get("@context"), default_context)?;
    expand_node(&context, document)
}

fn resolve_context(ctx_value: Option<&Value>, default_context: &Context) -> Result<Context, JsonLdError> {
    match ctx_value {
        None => Ok(default_context.clone()),
        Some(Value::String(s)) if s == super::context::AS_CONTEXT_URL => {
            Ok(default_context.clone())
        }
        Some(Value::String(other)) => Err(JsonLdError::ContextResolution(format!(
            "unsupported remote context {other}; only the built-in ActivityStreams context is resolved without a document loader"
        ))),
        Some(Value::Array(items)) => {
            let mut merged = default_context.clone();
            for item in items {
                if let Value::Object(map) = item {
                    merged = merge_inline_context(merged, map);
                } else if matches!(item, Value::String(s) if s == super::context::AS_CONTEXT_URL) {
                    // already the default
                } else if let Value::String(other) = item {
                    return Err(JsonLdError::ContextResolution(format!(
                        "unsupported remote context {other}"
                    )));
                }
            }
            Ok(merged)
        }
        Some(Value::Object(map)) => Ok(merge_inline_context(default_context.clone(), map)),
        Some(other) => Err(JsonLdError::Malformed(format!("invalid @context value: {other}"))),
    }
}

fn merge_inline_context(base: Context, map: &Map<String, Value>) -> Context {
    let mut b = Context::builder();
    for (term, def) in base.terms() {
        b = match (def.coercion, def.container) {
            (Coercion::Id, super::context::Container::Set) => b.set_id_set(term, &def.iri),
            (Coercion::Id, super::context::Container::None) => b.set_id(term, &def.iri),
            (Coercion::None, super::context::Container::Set) => b.set_set(term, &def.iri),
            (Coercion::None, super::context::Container::None) => b.set(term, &def.iri),
        };
    }
    for (term, value) in map {
        if let Some(iri) = value.as_str() {
            b = b.set(term, iri);
        } else if let Some(obj) = value.as_object() {
            if let Some(id) = obj.get("@id").and_then(|v| v.as_str()) {
                if obj.get("@type").and_then(|v| v.as_str()) == Some("@id") {
                    b = b.set_id(term, id);
                } else {
                    b = b.set(term, id);
                }
            }
        }
    }
    b.build()
}

fn expand_node(context: &Context, node: &Value) -> Result<Value, JsonLdError> {
    let map = node
        .as_object()
        .ok_or_else(|| JsonLdError::Malformed(format!("expected a JSON object, got {node}")))?;

    let mut out = Map::new();

    if let Some(id) = map.get("id").or_else(|| map.get("@id")) {
        let id = id
            .as_str()
            .ok_or_else(|| JsonLdError::Malformed("@id must be a string".to_string()))?;
        out.insert("@id".to_string(), json!(id));
    }

    if let Some(type_value) = map.get("type").or_else(|| map.get("@type")) {
        let types = expand_types(context, type_value)?;
        out.insert("@type".to_string(), Value::Array(types));
    }

    for (key, value) in map.iter() {
        if matches!(key.as_str(), "@context" | "id" | "@id" | "type" | "@type") {
            continue;
        }
        let term_def = context.term(key);
        let property_uri = term_def.map(|d| d.iri.clone()).unwrap_or_else(|| key.clone());
        let coercion = term_def.map(|d| d.coercion).unwrap_or(Coercion::None);
        let items = expand_property_value(context, coercion, value)?;
        out.insert(property_uri, Value::Array(items));
    }

    Ok(Value::Object(out))
}

fn expand_types(context: &Context, value: &Value) -> Result<Vec<Value>, JsonLdError> {
    let names: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().ok_or_else(|| JsonLdError::Malformed("@type entries must be strings".to_string())))
            .collect::<Result<_, _>>()?,
        other => return Err(JsonLdError::Malformed(format!("invalid @type value: {other}"))),
    };
    Ok(names
        .into_iter()
        .map(|name| {
            let iri = context.term(name).map(|d| d.iri.clone()).unwrap_or_else(|| name.to_string());
            json!(iri)
        })
        .collect())
}

fn expand_property_value(context: &Context, coercion: Coercion, value: &Value) -> Result<Vec<Value>, JsonLdError> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(expand_single(context, coercion, item)?);
            }
            Ok(out)
        }
        other => Ok(vec![expand_single(context, coercion, other)?]),
    }
}

fn expand_single(context: &Context, coercion: Coercion, value: &Value) -> Result<Value, JsonLdError> {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
            let is_bare_ref = (keys == ["id"] || keys == ["@id"])
                && map.get("id").or_else(|| map.get("@id")).map(|v| v.is_string()).unwrap_or(false);
            if is_bare_ref {
                let id = map.get("id").or_else(|| map.get("@id")).unwrap();
                Ok(json!({ "@id": id }))
            } else if map.contains_key("@value") {
                Ok(Value::Object(map.clone()))
            } else {
                expand_node(context, value)
            }
        }
        Value::String(s) => {
            if coercion == Coercion::Id {
                Ok(json!({ "@id": s }))
            } else {
                Ok(json!({ "@value": s }))
            }
        }
        Value::Bool(_) | Value::Number(_) => Ok(json!({ "@value": value })),
        Value::Null => Err(JsonLdError::Malformed("null is not a valid property value".to_string())),
        Value::Array(_) => unreachable!("arrays are flattened by the caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::context::activitystreams_context;

    #[test]
    fn expands_compact_term_names() {
        let ctx = activitystreams_context();
        let doc = json!({
            "@context": "https://www.w3.org/ns/activitystreams",
            "type": "Person",
            "id": "https://example.test/alice",
            "preferredUsername": "alice",
        });
        let expanded = expand(&doc, &ctx).unwrap();
        assert_eq!(expanded["@type"], json!(["https://www.w3.org/ns/activitystreams#Person"]));
        assert_eq!(expanded["@id"], json!("https://example.test/alice"));
        let puser = &expanded["https://www.w3.org/ns/activitystreams#preferredUsername"];
        assert_eq!(puser[0]["@value"], json!("alice"));
    }

    #[test]
    fn id_coerced_property_becomes_id_object() {
        let ctx = activitystreams_context();
        let doc = json!({
            "type": "Create",
            "actor": "https://example.test/alice",
        });
        let expanded = expand(&doc, &ctx).unwrap();
        let actor = &expanded["https://www.w3.org/ns/activitystreams#actor"][0];
        assert_eq!(actor, &json!({ "@id": "https://example.test/alice" }));
    }
}

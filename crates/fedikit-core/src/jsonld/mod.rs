//! The JSON-LD algorithm contract.
//!
//! The entity model treats expansion/compaction as an external black-box
//! collaborator: [`JsonLdProcessor`] is that contract. [`ContextProcessor`]
//! is the one implementation this crate ships, covering exactly the closed
//! ActivityStreams + JRD vocabulary rather than a general JSON-LD 1.1
//! processor.

pub mod compact;
pub mod context;
pub mod expand;

use async_trait::async_trait;
use serde_json::Value;

pub use context::{AS_CONTEXT_URL, Context, activitystreams_context};

use crate::error::JsonLdError;

/// The JSON-LD expand/compact contract.
#[async_trait]
pub trait JsonLdProcessor: Send + Sync {
    async fn expand(&self, document: &Value) -> Result<Value, JsonLdError>;
    async fn compact(&self, document: &Value, context: &Value) -> Result<Value, JsonLdError>;
}

/// The built-in [`JsonLdProcessor`], bound to the ActivityStreams context
/// by default. `context` is accepted on `compact` for callers that pass an
/// explicit context, but only the well-known ActivityStreams context URL
/// (or an object extending it) is actually honored.
#[derive(Debug, Clone, Default)]
pub struct ContextProcessor;

#[async_trait]
impl JsonLdProcessor for ContextProcessor {
    async fn expand(&self, document: &Value) -> Result<Value, JsonLdError> {
        let default_context = activitystreams_context();
        expand::expand(document, &default_context)
    }

    async fn compact(&self, document: &Value, context: &Value) -> Result<Value, JsonLdError> {
        let default_context = activitystreams_context();
        let ctx = if context.is_null() {
            default_context
        } else {
            // Re-run context resolution through the same path `expand` uses,
            // by wrapping the requested context as if it were `@context` on
            // an empty node — keeps term-merging logic in one place.
            let probe = serde_json::json!({ "@context": context });
            expand::expand(&probe, &default_context)?;
            default_context
        };
        compact::compact(document, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn expand_then_compact_round_trips_a_simple_document() {
        let proc = ContextProcessor;
        let doc = json!({
            "@context": "https://www.w3.org/ns/activitystreams",
            "type": "Person",
            "id": "https://example.test/alice",
            "preferredUsername": "alice",
        });
        let expanded = proc.expand(&doc).await.unwrap();
        let compacted = proc.compact(&expanded, &Value::Null).await.unwrap();
        assert_eq!(compacted["type"], json!("Person"));
        assert_eq!(compacted["preferredUsername"], json!("alice"));
    }
}

//! JSON-LD context term tables.
//!
//! A [`Context`] is the compiled form of a JSON-LD `@context`: a map from
//! short term (`"preferredUsername"`) to its absolute IRI, plus optional
//! type coercion (`@id`, or an XSD datatype) and container (`@set` vs.
//! plain). This is a closed-vocabulary subset of JSON-LD 1.1 context
//! processing: remote context scoping, `@reverse`, and framing are
//! deliberately not implemented.

use std::collections::HashMap;

use indexmap::IndexMap;

/// How a term's value is coerced during expansion/compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// The value is itself an IRI (`@type: "@id"`).
    Id,
    /// The value is plain JSON with no coercion (strings, objects, numbers).
    None,
}

/// Whether a term's values are always represented as a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Set,
    None,
}

#[derive(Debug, Clone)]
pub struct TermDef {
    pub iri: String,
    pub coercion: Coercion,
    pub container: Container,
}

/// A compiled JSON-LD context: bidirectional term <-> IRI lookup.
#[derive(Debug, Clone, Default)]
pub struct Context {
    by_term: IndexMap<String, TermDef>,
    by_iri: HashMap<String, String>,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder { by_term: IndexMap::new() }
    }

    pub fn term(&self, term: &str) -> Option<&TermDef> {
        self.by_term.get(term)
    }

    /// The short term mapped to `iri`, if any. Used by compaction.
    pub fn term_for_iri(&self, iri: &str) -> Option<&str> {
        self.by_iri.get(iri).map(|s| s.as_str())
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &TermDef)> {
        self.by_term.iter().map(|(k, v)| (k.as_str(), v))
    }
}

pub struct ContextBuilder {
    by_term: IndexMap<String, TermDef>,
}

impl ContextBuilder {
    pub fn set(mut self, term: &str, iri: &str) -> Self {
        self.by_term.insert(
            term.to_string(),
            TermDef { iri: iri.to_string(), coercion: Coercion::None, container: Container::None },
        );
        self
    }

    pub fn set_id(mut self, term: &str, iri: &str) -> Self {
        self.by_term.insert(
            term.to_string(),
            TermDef { iri: iri.to_string(), coercion: Coercion::Id, container: Container::None },
        );
        self
    }

    pub fn set_set(mut self, term: &str, iri: &str) -> Self {
        self.by_term.insert(
            term.to_string(),
            TermDef { iri: iri.to_string(), coercion: Coercion::None, container: Container::Set },
        );
        self
    }

    pub fn set_id_set(mut self, term: &str, iri: &str) -> Self {
        self.by_term.insert(
            term.to_string(),
            TermDef { iri: iri.to_string(), coercion: Coercion::Id, container: Container::Set },
        );
        self
    }

    pub fn build(self) -> Context {
        let mut by_iri = HashMap::new();
        for (term, def) in self.by_term.iter() {
            // First-declared term for an IRI wins, the same declaration-order
            // tie-break used for subproperty/alias resolution elsewhere.
            by_iri.entry(def.iri.clone()).or_insert_with(|| term.clone());
        }
        Context { by_term: self.by_term, by_iri }
    }
}

pub const AS_NS: &str = "https://www.w3.org/ns/activitystreams#";
pub const AS_CONTEXT_URL: &str = "https://www.w3.org/ns/activitystreams";

fn as_(term: &str) -> String {
    format!("{AS_NS}{term}")
}

/// The default ActivityStreams 2.0 JSON-LD context, covering every property
/// and class name the vocabulary module (`crate::vocab`) declares.
pub fn activitystreams_context() -> Context {
    let as_terms: &[&str] = &[
        "attachment", "attributedTo", "actor", "audience", "content", "context", "name",
        "endTime", "generator", "icon", "image", "inReplyTo", "location", "preview",
        "published", "replies", "startTime", "summary", "tag", "updated", "url", "to", "bto",
        "cc", "bcc", "mediaType", "duration", "source", "likes", "shares", "sensitive",
        "object", "target", "result", "origin", "instrument", "href", "rel", "hreflang",
        "height", "width", "totalItems", "current", "first", "last", "items", "orderedItems",
        "partOf", "next", "prev", "inbox", "outbox", "following", "followers", "liked",
        "streams", "preferredUsername", "endpoints", "manuallyApprovesFollowers",
        "formerType", "deleted",
    ];

    let mut b = Context::builder();
    for term in as_terms {
        b = b.set(term, &as_(term));
    }
    // `@id`-coerced (IRI-valued) properties.
    for term in [
        "attachment", "attributedTo", "actor", "audience", "context", "tag", "url", "to", "bto",
        "cc", "bcc", "likes", "shares", "inReplyTo", "generator", "icon", "image", "location",
        "preview", "replies", "object", "target", "result", "origin", "instrument", "href",
        "current", "first", "last", "items", "orderedItems", "partOf", "next", "prev", "inbox",
        "outbox", "following", "followers", "liked", "streams", "endpoints",
    ] {
        b = b.set_id(term, &as_(term));
    }
    // Plural (`@set`-contained) properties.
    for term in [
        "attachment", "attributedTo", "audience", "tag", "to", "bto", "cc", "bcc", "likes",
        "shares", "url", "actor", "object", "target", "result", "origin", "instrument", "rel",
        "name", "preview", "content", "summary", "source", "streams", "items", "orderedItems",
    ] {
        if let Some(def) = b.by_term.get_mut(*term) {
            def.container = Container::Set;
        }
    }
    b.build()
}

/// A context covering only the JRD (WebFinger) shape, which is not
/// ActivityStreams vocabulary at all. Present for symmetry; the webfinger
/// module serializes JRD directly with `serde` rather than through the
/// entity model, so this is unused by production code paths and exists as
/// a documented extension point.
pub fn jrd_context() -> Context {
    Context::builder().set("subject", "subject").set("aliases", "aliases").build()
}

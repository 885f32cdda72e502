//! WebFinger JRD wire types.
//!
//! RFC 7033 JRD is its own small schema, not ActivityStreams vocabulary, so
//! it is modeled as a plain `serde`-derived struct rather than routed
//! through the entity model, independent of `vocab/`.

use serde::Serialize;

/// A JSON Resource Descriptor (RFC 6415 / 7033). Field order on the wire
/// (`subject`, `aliases?`, `properties?`, `links?`) follows `serde`'s
/// field-declaration order, since `serde_json`'s default map preserves
/// insertion order with the `preserve_order` feature this crate enables.
#[derive(Debug, Clone, Serialize)]
pub struct Jrd {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<indexmap::IndexMap<String, Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<JrdLink>>,
}

impl Jrd {
    pub fn new(subject: impl Into<String>) -> Self {
        Jrd { subject: subject.into(), aliases: None, properties: None, links: None }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = Some(aliases);
        self
    }

    pub fn with_links(mut self, links: Vec<JrdLink>) -> Self {
        self.links = Some(links);
        self
    }
}

/// One `links` entry in a [`Jrd`] (RFC 7033 §4.4.4).
#[derive(Debug, Clone, Serialize)]
pub struct JrdLink {
    pub rel: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titles: Option<indexmap::IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<indexmap::IndexMap<String, Option<String>>>,
}

impl JrdLink {
    pub fn new(rel: impl Into<String>) -> Self {
        JrdLink { rel: rel.into(), media_type: None, href: None, titles: None, properties: None }
    }

    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_on_the_wire_follows_declaration_order() {
        let jrd = Jrd::new("acct:alice@fedikit.test")
            .with_aliases(vec!["http://fedikit.test/actors/alice".to_string()])
            .with_links(vec![
                JrdLink::new("self").media_type("application/activity+json").href("http://fedikit.test/actors/alice"),
            ]);
        let value = serde_json::to_value(&jrd).unwrap();
        let obj = value.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(|s| s.as_str()).collect();
        assert_eq!(keys, vec!["subject", "aliases", "links"]);

        let link = &obj["links"][0];
        let link_keys: Vec<&str> = link.as_object().unwrap().keys().map(|s| s.as_str()).collect();
        assert_eq!(link_keys, vec!["rel", "type", "href"]);
    }

    #[test]
    fn absent_optional_fields_are_omitted() {
        let jrd = Jrd::new("acct:nobody@fedikit.test");
        let value = serde_json::to_value(&jrd).unwrap();
        assert_eq!(value, serde_json::json!({ "subject": "acct:nobody@fedikit.test" }));
    }
}

//! A minimal HTTP abstraction.
//!
//! The request adapter works against "receive a request, return a
//! response" — no transport dependency. [`Scope`] is everything a decoded
//! inbound request delivers; [`Response`] is the plain `(status, headers,
//! body)` triple it returns. A host application (e.g. `demos/blog`) binds
//! these to its real transport (axum, hypercorn/ASGI, ...).

use indexmap::IndexMap;

/// Case-insensitively keyed request/response headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    entries: IndexMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        HeaderMap::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// One decoded inbound request. Transport-agnostic: a host binding is
/// responsible for populating this from its real request type.
#[derive(Debug, Clone)]
pub struct Scope {
    pub scheme: String,
    /// `(host, port)`, when the transport exposes a bound server address —
    /// used as a fallback when no `Host` header is present.
    pub server: Option<(String, u16)>,
    /// The mount prefix this server is served under (script root / root
    /// path in ASGI terms).
    pub script_root: String,
    pub method: String,
    /// The path, already stripped of `script_root`.
    pub path_info: String,
    /// The raw query string, without a leading `?`.
    pub query_string: String,
    pub headers: HeaderMap,
    /// The connecting client's address, if known.
    pub client_addr: Option<String>,
}

impl Scope {
    /// The `Host` header value, if present.
    pub fn host_header(&self) -> Option<&str> {
        self.headers.get("host")
    }

    /// A single query parameter's first value, if present (the WebFinger
    /// `resource` and Outbox `cursor` parameters use this).
    pub fn query_param(&self, name: &str) -> Option<String> {
        url::form_urlencoded::parse(self.query_string.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

/// A plain HTTP response: status, headers, and a fully-buffered body — no
/// streaming required.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", content_type);
        Response { status, headers, body }
    }

    pub fn text(status: u16, content_type: &str, body: impl Into<String>) -> Self {
        Response::new(status, content_type, body.into().into_bytes())
    }

    pub fn json(status: u16, content_type: &str, value: &serde_json::Value) -> Self {
        Response::new(status, content_type, serde_json::to_vec(value).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("Host", "fedikit.test");
        assert_eq!(headers.get("host"), Some("fedikit.test"));
        assert_eq!(headers.get("HOST"), Some("fedikit.test"));
    }

    #[test]
    fn query_param_decodes_a_single_value() {
        let scope = Scope {
            scheme: "http".to_string(),
            server: None,
            script_root: String::new(),
            method: "GET".to_string(),
            path_info: "/.well-known/webfinger".to_string(),
            query_string: "resource=acct%3Aalice%40fedikit.test".to_string(),
            headers: HeaderMap::new(),
            client_addr: None,
        };
        assert_eq!(scope.query_param("resource").as_deref(), Some("acct:alice@fedikit.test"));
        assert_eq!(scope.query_param("missing"), None);
    }
}

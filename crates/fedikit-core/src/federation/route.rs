//! Pattern-to-endpoint route map.
//!
//! Rules are matched in declaration order. A pattern segment written
//! `<name>` captures a string; `<int:name>` captures and validates an
//! integer. The same map builds external absolute URLs back from an
//! endpoint name and parameters, honoring a bound host/scheme/script root —
//! rule storage and request-bound URL building live in the same type rather
//! than split across two.

use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::RouteError;

const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One segment of a compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `<name>` or `<int:name>`.
    Param { name: String, kind: ParamKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    String,
    Int,
}

/// A value captured from (or destined for) a route placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    Int(i64),
}

impl ParamValue {
    fn render(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Int(n) => n.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

/// Route-captured arguments, by placeholder name.
pub type Captures = indexmap::IndexMap<String, ParamValue>;

fn compile_pattern(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let mut segments = Vec::new();
    for raw in pattern.split('/') {
        if raw.is_empty() {
            continue;
        }
        if let Some(inner) = raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            let (kind, name) = match inner.split_once(':') {
                Some(("int", name)) => (ParamKind::Int, name),
                Some((other, _)) => {
                    return Err(RouteError::MalformedPattern(format!(
                        "unknown placeholder type {other} in {pattern}"
                    )));
                }
                None => (ParamKind::String, inner),
            };
            if name.is_empty() {
                return Err(RouteError::MalformedPattern(format!("empty placeholder name in {pattern}")));
            }
            segments.push(Segment::Param { name: name.to_string(), kind });
        } else {
            segments.push(Segment::Literal(raw.to_string()));
        }
    }
    Ok(segments)
}

/// One registered rule: a compiled path pattern paired with its endpoint id
/// and the HTTP methods it accepts (empty = all methods).
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    segments: Vec<Segment>,
    endpoint: String,
    methods: Vec<String>,
}

/// Why [`RouteMap::match_path`] did not resolve to an endpoint. First-match
/// wins on path; if a pattern matches for some but not the current method,
/// a `MethodNotAllowed` distinction is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched { endpoint: String, captures: Captures },
    MethodNotAllowed,
    NotFound,
}

/// An ordered list of `(path-pattern, endpoint-id)` rules.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    rules: Vec<Rule>,
}

impl RouteMap {
    pub fn new() -> Self {
        RouteMap { rules: Vec::new() }
    }

    /// Register a rule. `methods` empty means "any method". Re-registering
    /// the same `(pattern, endpoint)` pair is idempotent from the caller's
    /// perspective but still appends — callers (the server registry) are
    /// expected to register each endpoint at most once.
    pub fn add_rule(&mut self, pattern: &str, endpoint: &str, methods: &[&str]) -> Result<(), RouteError> {
        let segments = compile_pattern(pattern)?;
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            segments,
            endpoint: endpoint.to_string(),
            methods: methods.iter().map(|m| m.to_ascii_uppercase()).collect(),
        });
        Ok(())
    }

    /// Match `path` (already stripped of the script root) and `method`
    /// against the rule list, first-match-wins.
    pub fn match_path(&self, method: &str, path: &str) -> MatchOutcome {
        let method = method.to_ascii_uppercase();
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut path_matched_some_rule = false;
        for rule in &self.rules {
            let Some(captures) = match_segments(&rule.segments, &path_segments) else { continue };
            path_matched_some_rule = true;
            if rule.methods.is_empty() || rule.methods.iter().any(|m| m == &method) {
                return MatchOutcome::Matched { endpoint: rule.endpoint.clone(), captures };
            }
        }
        if path_matched_some_rule {
            MatchOutcome::MethodNotAllowed
        } else {
            MatchOutcome::NotFound
        }
    }

    /// Build an absolute external URL for `endpoint` with `params`, bound to
    /// `scheme`/`host`/`script_root` — the reverse of `match_path`.
    pub fn build_url(
        &self,
        endpoint: &str,
        params: &Captures,
        scheme: &str,
        host: &str,
        script_root: &str,
    ) -> Result<String, RouteError> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.endpoint == endpoint)
            .ok_or_else(|| RouteError::NoSuchEndpoint(endpoint.to_string()))?;

        let mut path = String::new();
        for segment in &rule.segments {
            path.push('/');
            match segment {
                Segment::Literal(lit) => path.push_str(lit),
                Segment::Param { name, kind } => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| RouteError::MissingParameter(name.clone()))?;
                    check_param_kind(name, *kind, value)?;
                    write!(path, "{}", utf8_percent_encode(&value.render(), PATH_SEGMENT_SET)).unwrap();
                }
            }
        }

        let root = script_root.trim_end_matches('/');
        Ok(format!("{scheme}://{host}{root}{path}"))
    }
}

fn check_param_kind(name: &str, kind: ParamKind, value: &ParamValue) -> Result<(), RouteError> {
    match (kind, value) {
        (ParamKind::Int, ParamValue::Int(_)) => Ok(()),
        (ParamKind::String, ParamValue::String(_)) => Ok(()),
        _ => Err(RouteError::ParameterTypeMismatch {
            name: name.to_string(),
            kind: format!("{kind:?}"),
            value: value.render(),
        }),
    }
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> Option<Captures> {
    if pattern.len() != path.len() {
        return None;
    }
    let mut captures = Captures::new();
    for (seg, part) in pattern.iter().zip(path.iter()) {
        match seg {
            Segment::Literal(lit) => {
                if lit != part {
                    return None;
                }
            }
            Segment::Param { name, kind: ParamKind::String } => {
                captures.insert(name.clone(), ParamValue::String(part.to_string()));
            }
            Segment::Param { name, kind: ParamKind::Int } => {
                let n: i64 = part.parse().ok()?;
                captures.insert(name.clone(), ParamValue::Int(n));
            }
        }
    }
    Some(captures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_on_path() {
        let mut map = RouteMap::new();
        map.add_rule("/actors/<handle>", "actor", &["GET"]).unwrap();
        map.add_rule("/actors/<handle>/outbox", "outbox", &["GET"]).unwrap();
        match map.match_path("GET", "/actors/alice/outbox") {
            MatchOutcome::Matched { endpoint, .. } => assert_eq!(endpoint, "outbox"),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn unknown_method_on_known_path_is_method_not_allowed() {
        let mut map = RouteMap::new();
        map.add_rule("/actors/<handle>", "actor", &["GET"]).unwrap();
        assert_eq!(map.match_path("POST", "/actors/alice"), MatchOutcome::MethodNotAllowed);
    }

    #[test]
    fn unmatched_path_is_not_found() {
        let map = RouteMap::new();
        assert_eq!(map.match_path("GET", "/nope"), MatchOutcome::NotFound);
    }

    #[test]
    fn build_url_percent_encodes_params() {
        let mut map = RouteMap::new();
        map.add_rule("/actors/<handle>", "actor", &["GET"]).unwrap();
        let mut params = Captures::new();
        params.insert("handle".to_string(), ParamValue::String("al ice".to_string()));
        let url = map.build_url("actor", &params, "https", "fedikit.test", "").unwrap();
        assert_eq!(url, "https://fedikit.test/actors/al%20ice");
    }

    #[test]
    fn int_typed_placeholder_rejects_non_numeric_segments() {
        let mut map = RouteMap::new();
        map.add_rule("/posts/<int:id>", "post", &["GET"]).unwrap();
        assert_eq!(map.match_path("GET", "/posts/abc"), MatchOutcome::NotFound);
        match map.match_path("GET", "/posts/42") {
            MatchOutcome::Matched { captures, .. } => {
                assert_eq!(captures.get("id"), Some(&ParamValue::Int(42)));
            }
            other => panic!("expected match, got {other:?}"),
        }
    }
}

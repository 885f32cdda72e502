//! Scalar value types and their JSON-LD value-object encoding.
//!
//! Each scalar is a thin newtype so that equality matches the intended
//! semantics exactly (string equality for URI/MediaType, normalized-form
//! equality for LanguageTag, pair equality for LanguageString) rather than
//! whatever a bare `String`/`chrono` comparison would give.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};

use crate::error::ScalarError;

const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// An absolute URI. Equality is string equality on the normalized form
/// `url::Url` already gives us.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uri(url::Url);

impl Uri {
    pub fn parse(s: &str) -> Result<Self, ScalarError> {
        url::Url::parse(s)
            .map(Uri)
            .map_err(|_| ScalarError::InvalidUri(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_url(self) -> url::Url {
        self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Uri {
    type Err = ScalarError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

impl serde::Serialize for Uri {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Uri {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Uri::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An IANA media type, e.g. `application/activity+json`.
#[derive(Debug, Clone, Eq)]
pub struct MediaType {
    type_: String,
    subtype: String,
    raw: String,
}

static MEDIA_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9!#$&^_.+-]+)/([a-zA-Z0-9!#$&^_.+-]+)").unwrap());

impl MediaType {
    pub fn parse(s: &str) -> Result<Self, ScalarError> {
        let caps = MEDIA_TYPE_RE
            .captures(s)
            .ok_or_else(|| ScalarError::InvalidMediaType(s.to_string()))?;
        Ok(MediaType {
            type_: caps[1].to_ascii_lowercase(),
            subtype: caps[2].to_ascii_lowercase(),
            raw: s.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.type_ == other.type_ && self.subtype == other.subtype
    }
}

impl std::hash::Hash for MediaType {
    // Consistent with `PartialEq`: only `type_`/`subtype` participate, not
    // the original casing kept in `raw`.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_.hash(state);
        self.subtype.hash(state);
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for MediaType {
    type Err = ScalarError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s)
    }
}

/// A BCP-47 language tag, equality on the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

static LANG_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{2,8}(-[a-zA-Z0-9]{1,8})*$").unwrap());

impl LanguageTag {
    pub fn parse(s: &str) -> Result<Self, ScalarError> {
        if !LANG_TAG_RE.is_match(s) {
            return Err(ScalarError::InvalidLanguageTag(s.to_string()));
        }
        Ok(LanguageTag(normalize_tag(s)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize_tag(s: &str) -> String {
    s.split('-')
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                part.to_ascii_lowercase()
            } else if part.len() == 2 {
                part.to_ascii_uppercase()
            } else {
                part.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LanguageTag {
    type Err = ScalarError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageTag::parse(s)
    }
}

/// A language-tagged string: `(text, lang)`, equal only when both match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageString {
    pub text: String,
    pub lang: LanguageTag,
}

impl LanguageString {
    pub fn new(text: impl Into<String>, lang: LanguageTag) -> Self {
        LanguageString { text: text.into(), lang }
    }
}

impl From<(String, LanguageTag)> for LanguageString {
    fn from((text, lang): (String, LanguageTag)) -> Self {
        LanguageString { text, lang }
    }
}

/// An ISO-8601 duration, e.g. `PT1H30M`. No corpus crate models ISO-8601
/// durations (chrono models instants and clock deltas, not the calendar
/// duration grammar); validated with a small dedicated regex instead of a
/// hand-rolled parser that re-derives chrono's date arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Duration(String);

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?P(?:\d+Y)?(?:\d+M)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:\.\d+)?S)?)?$")
        .unwrap()
});

impl Duration {
    pub fn parse(s: &str) -> Result<Self, ScalarError> {
        if s == "P" || s == "-P" || !DURATION_RE.is_match(s) {
            return Err(ScalarError::InvalidDuration(s.to_string()));
        }
        Ok(Duration(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Duration {
    type Err = ScalarError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Duration::parse(s)
    }
}

/// An instant with timezone, ISO-8601 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(chrono::DateTime<chrono::FixedOffset>);

impl Timestamp {
    pub fn parse(s: &str) -> Result<Self, ScalarError> {
        chrono::DateTime::parse_from_rfc3339(s)
            .map(Timestamp)
            .map_err(|_| ScalarError::ShapeMismatch(format!("invalid timestamp: {s}")))
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    pub fn inner(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.0
    }
}

impl From<chrono::DateTime<chrono::FixedOffset>> for Timestamp {
    fn from(d: chrono::DateTime<chrono::FixedOffset>) -> Self {
        Timestamp(d)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

/// A scalar value that can appear as a slot item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Integer(i64),
    Timestamp(Timestamp),
    LanguageTag(LanguageTag),
    LanguageString(LanguageString),
    Duration(Duration),
    Uri(Uri),
    MediaType(MediaType),
}

/// Encode a scalar to its JSON-LD value-object form.
pub fn encode_scalar(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::String(s) => json!({ "@value": s }),
        Scalar::Bool(b) => json!({ "@value": b }),
        Scalar::Integer(i) => {
            let xsd_type = if *i >= 0 {
                format!("{XSD_NS}nonNegativeInteger")
            } else {
                format!("{XSD_NS}integer")
            };
            json!({ "@value": i, "@type": xsd_type })
        }
        Scalar::Timestamp(t) => json!({
            "@type": format!("{XSD_NS}dateTime"),
            "@value": t.to_rfc3339(),
        }),
        Scalar::LanguageTag(tag) => json!({ "@value": tag.as_str() }),
        Scalar::LanguageString(ls) => json!({
            "@value": ls.text,
            "@language": ls.lang.as_str(),
        }),
        Scalar::Duration(d) => json!({ "@value": d.as_str() }),
        Scalar::Uri(u) => json!({ "@value": u.as_str() }),
        Scalar::MediaType(m) => json!({ "@value": m.as_str() }),
    }
}

/// The target scalar shape a [`decode_scalar`] call is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bool,
    Integer,
    Timestamp,
    LanguageTag,
    LanguageString,
    Duration,
    Uri,
    MediaType,
}

/// Decode a JSON-LD value node into the requested scalar shape (inverse of
/// [`encode_scalar`]).
pub fn decode_scalar(kind: ScalarKind, node: &Value) -> Result<Scalar, ScalarError> {
    let obj = node
        .as_object()
        .ok_or_else(|| ScalarError::ShapeMismatch(format!("expected value object, got {node}")))?;
    let value = obj
        .get("@value")
        .ok_or_else(|| ScalarError::ShapeMismatch("missing @value".to_string()))?;

    match kind {
        ScalarKind::String => value
            .as_str()
            .map(|s| Scalar::String(s.to_string()))
            .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string())),
        ScalarKind::Bool => value
            .as_bool()
            .map(Scalar::Bool)
            .ok_or_else(|| ScalarError::ShapeMismatch("expected bool @value".to_string())),
        ScalarKind::Integer => value
            .as_i64()
            .map(Scalar::Integer)
            .ok_or_else(|| ScalarError::ShapeMismatch("expected integer @value".to_string())),
        ScalarKind::Timestamp => {
            let s = value
                .as_str()
                .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string()))?;
            Timestamp::parse(s).map(Scalar::Timestamp)
        }
        ScalarKind::LanguageTag => {
            let s = value
                .as_str()
                .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string()))?;
            LanguageTag::parse(s).map(Scalar::LanguageTag)
        }
        ScalarKind::LanguageString => {
            let text = value
                .as_str()
                .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string()))?;
            let lang = obj
                .get("@language")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ScalarError::ShapeMismatch("missing @language".to_string()))?;
            Ok(Scalar::LanguageString(LanguageString::new(
                text,
                LanguageTag::parse(lang)?,
            )))
        }
        ScalarKind::Duration => {
            let s = value
                .as_str()
                .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string()))?;
            Duration::parse(s).map(Scalar::Duration)
        }
        ScalarKind::Uri => {
            let s = value
                .as_str()
                .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string()))?;
            Uri::parse(s).map(Scalar::Uri)
        }
        ScalarKind::MediaType => {
            let s = value
                .as_str()
                .ok_or_else(|| ScalarError::ShapeMismatch("expected string @value".to_string()))?;
            MediaType::parse(s).map(Scalar::MediaType)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_equality_is_string_equality() {
        let a = Uri::parse("https://example.test/a").unwrap();
        let b = Uri::parse("https://example.test/a").unwrap();
        let c = Uri::parse("https://example.test/b").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn language_tag_normalizes_region() {
        let a = LanguageTag::parse("en-us").unwrap();
        let b = LanguageTag::parse("EN-US").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "en-US");
    }

    #[test]
    fn integer_encoding_picks_xsd_type_by_sign() {
        let pos = encode_scalar(&Scalar::Integer(3));
        assert_eq!(pos["@type"], format!("{XSD_NS}nonNegativeInteger"));
        let neg = encode_scalar(&Scalar::Integer(-3));
        assert_eq!(neg["@type"], format!("{XSD_NS}integer"));
    }

    #[test]
    fn duration_round_trips() {
        let d = Duration::parse("PT1H30M").unwrap();
        assert_eq!(d.as_str(), "PT1H30M");
        assert!(Duration::parse("garbage").is_err());
    }

    #[test]
    fn language_string_decode_round_trip() {
        let ls = Scalar::LanguageString(LanguageString::new(
            "hola",
            LanguageTag::parse("es").unwrap(),
        ));
        let encoded = encode_scalar(&ls);
        let decoded = decode_scalar(ScalarKind::LanguageString, &encoded).unwrap();
        assert_eq!(decoded, ls);
    }
}

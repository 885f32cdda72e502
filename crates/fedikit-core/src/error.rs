//! Error taxonomy for the entity model, federation router, and scalar codec.
//!
//! Narrower errors (`ScalarError`, `ParseError`, `RouteError`) convert into
//! [`FedikitError`] via `#[from]` at module boundaries, mirroring a layered
//! exception hierarchy (`UnknownType`, `TypeMismatch`, `NoSuchProperty`, ...).

/// Top-level error surfaced across crate boundaries.
#[derive(Debug, thiserror::Error)]
pub enum FedikitError {
    /// A JSON-LD `@type` did not resolve to any registered vocabulary class
    /// that is a subtype of the requested target.
    #[error("unknown type: none of {types:?} is a subtype of {target}")]
    UnknownType { types: Vec<String>, target: &'static str },

    /// Two keyword arguments at construction time targeted the same
    /// property URI.
    #[error("duplicate value for property {uri}")]
    DuplicateProperty { uri: String },

    /// A construction-time keyword, or a `resolve_refs` property name, is
    /// not declared on the entity's class.
    #[error("no such property: {name}")]
    NoSuchProperty { name: String },

    /// The document loader returned nothing, or failed, for a URI that was
    /// required (e.g. a remote context, or `EntityRef::load`).
    #[error("failed to load document at {uri}: {reason}")]
    LoadFailure { uri: String, reason: String },

    /// No route pattern matched the request path.
    #[error("no route matched {path}")]
    NotRouted { path: String },

    /// A route pattern matched the path but not the HTTP method.
    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { path: String, method: String },

    /// The request's `Accept` header rejected JSON-LD.
    #[error("not acceptable: {accept}")]
    NotAcceptable { accept: String },

    /// A malformed scalar literal (URI, media type, language tag, duration).
    #[error(transparent)]
    Scalar(#[from] ScalarError),

    /// A JSON-LD parse/expand/compact failure.
    #[error(transparent)]
    JsonLd(#[from] JsonLdError),

    /// A property value rejected every candidate type: no `TypeMismatch`
    /// was recoverable by trying the next same-URI candidate.
    #[error("{0}")]
    Parse(String),

    /// Route-map construction or matching failure.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Errors from the scalar codec.
#[derive(Debug, thiserror::Error)]
pub enum ScalarError {
    #[error("invalid URI literal: {0}")]
    InvalidUri(String),
    #[error("invalid media type literal: {0}")]
    InvalidMediaType(String),
    #[error("invalid BCP-47 language tag: {0}")]
    InvalidLanguageTag(String),
    #[error("invalid ISO-8601 duration: {0}")]
    InvalidDuration(String),
    #[error("value does not fit the expected scalar shape: {0}")]
    ShapeMismatch(String),
}

impl From<ParseError> for FedikitError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnknownType { types, target } => FedikitError::UnknownType { types, target },
            ParseError::TypeMismatch { expected, found } => {
                FedikitError::Parse(format!("expected {expected}, found {found}"))
            }
            ParseError::Scalar(s) => FedikitError::Scalar(s),
            ParseError::Fedikit(b) => *b,
        }
    }
}

/// Local, retryable error used while parsing a single property's JSON-LD
/// value. `TypeMismatch` is caught internally by the candidate-type
/// iteration in [`crate::model::property::Property::parse_jsonld`] and is
/// never meant to surface past that loop; it is public only because
/// property implementations across modules need to construct it.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("value does not fit type {expected}: {found}")]
    TypeMismatch { expected: String, found: String },

    #[error(transparent)]
    Scalar(#[from] ScalarError),

    #[error(transparent)]
    Fedikit(#[from] Box<FedikitError>),
}

impl From<FedikitError> for ParseError {
    fn from(e: FedikitError) -> Self {
        ParseError::Fedikit(Box::new(e))
    }
}

/// Errors from route-map construction and matching.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("malformed path pattern: {0}")]
    MalformedPattern(String),
    #[error("no such endpoint registered: {0}")]
    NoSuchEndpoint(String),
    #[error("missing URL parameter {0}")]
    MissingParameter(String),
    #[error("parameter {name} does not fit type {kind}: {value}")]
    ParameterTypeMismatch { name: String, kind: String, value: String },
}

/// Errors surfaced by a [`crate::jsonld::JsonLdProcessor`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum JsonLdError {
    #[error("context could not be resolved: {0}")]
    ContextResolution(String),
    #[error("malformed JSON-LD document: {0}")]
    Malformed(String),
}

//! Typed ActivityStreams/JSON-LD entity model and federation request router
//! for building ActivityPub servers.
//!
//! Two halves, matching the two concerns a federated server actually has:
//! [`model`] (plus [`scalars`], [`jsonld`], [`vocab`], [`docloader`]) is the
//! typed document layer — parsing, building, and serializing
//! ActivityStreams JSON-LD. [`federation`] (plus [`http_abstraction`] and
//! [`webfinger`]) is the transport-agnostic request router that answers
//! WebFinger, actor, and outbox requests against host-supplied dispatchers.
//!
//! Neither half performs network I/O on its own: a [`docloader::DocumentLoader`]
//! fetches remote documents, and a host application's transport binding
//! drives [`federation::RequestAdapter`] from its real request/response
//! types via [`http_abstraction::Scope`]/[`http_abstraction::Response`].

pub mod docloader;
pub mod error;
pub mod federation;
pub mod http_abstraction;
pub mod jsonld;
pub mod model;
pub mod scalars;
pub mod vocab;
pub mod webfinger;

pub use error::{FedikitError, JsonLdError, ParseError, RouteError, ScalarError};
pub use model::{Entity, EntityBuilder, EntityRef, Slot, SlotItem};

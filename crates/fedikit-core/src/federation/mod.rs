//! The federation request router.
//!
//! [`route`] and [`server`] are the two static structures a host application
//! assembles at startup; [`request`] is the state machine that runs each
//! incoming request against them. [`collection`] and [`config`] are small
//! supporting types shared across the three.

pub mod collection;
pub mod config;
pub mod request;
pub mod route;
pub mod server;

pub use collection::Page;
pub use config::{FederationConfig, FederationConfigBuilder};
pub use request::{ErrorHook, Hooks, RequestAdapter, ACTIVITYSTREAMS_CONTENT_TYPE};
pub use route::{Captures, MatchOutcome, ParamValue, RouteMap};
pub use server::{
    ActorDispatcher, OutboxCounter, OutboxCursorSupplier, OutboxDispatcher, Server, ACTOR_ENDPOINT,
    OUTBOX_ENDPOINT, WEBFINGER_ENDPOINT,
};

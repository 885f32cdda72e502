//! Server registry.
//!
//! A [`Server`] holds the optional dispatcher/supplier handles a host
//! application registers, plus the [`RouteMap`](super::route::RouteMap) that
//! grows as actor/outbox endpoints are registered. Registration is the only
//! way these handles are set; registering a role a second time replaces the
//! previous handle without affecting the others.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FedikitError;
use crate::federation::collection::Page;
use crate::federation::route::RouteMap;
use crate::vocab::{VocabActivity, VocabActor};

/// Dispatches an actor document for a local handle.
///
/// Returns `Ok(None)` when the handle is unknown — distinct from `Err`,
/// which propagates as a host-application failure rather than a 404.
#[async_trait]
pub trait ActorDispatcher: Send + Sync {
    async fn dispatch(&self, handle: &str) -> Result<Option<VocabActor>, FedikitError>;
}

/// Dispatches one outbox page for a local handle, optionally after a
/// cursor. `cursor = None` requests the first page.
#[async_trait]
pub trait OutboxDispatcher: Send + Sync {
    async fn dispatch(&self, handle: &str, cursor: Option<&str>) -> Result<Option<Page<VocabActivity>>, FedikitError>;
}

/// Supplies the total item count, or the first/last page cursor, for a
/// handle's outbox. Each is independently optional.
#[async_trait]
pub trait OutboxCounter: Send + Sync {
    async fn count(&self, handle: &str) -> Result<Option<i64>, FedikitError>;
}

#[async_trait]
pub trait OutboxCursorSupplier: Send + Sync {
    async fn cursor(&self, handle: &str) -> Result<Option<String>, FedikitError>;
}

/// Endpoint ids the route map pre-registers and the registry wires up.
pub const WEBFINGER_ENDPOINT: &str = "webfinger";
pub const ACTOR_ENDPOINT: &str = "actor";
pub const OUTBOX_ENDPOINT: &str = "outbox";

const WEBFINGER_PATH: &str = "/.well-known/webfinger";

/// The server registry: optional dispatcher/supplier handles plus the route
/// map they register endpoints into.
///
/// `clone()` (via [`Clone`]) produces an independent server sharing the same
/// handles (cheaply, via `Arc`) with its own copy of the rule set — "no
/// bindings" means the clone is not yet bound to any request's host/scheme.
#[derive(Clone)]
pub struct Server {
    routes: RouteMap,
    actor_dispatcher: Option<Arc<dyn ActorDispatcher>>,
    outbox_dispatcher: Option<Arc<dyn OutboxDispatcher>>,
    outbox_counter: Option<Arc<dyn OutboxCounter>>,
    outbox_first_cursor: Option<Arc<dyn OutboxCursorSupplier>>,
    outbox_last_cursor: Option<Arc<dyn OutboxCursorSupplier>>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    pub fn new() -> Self {
        let mut routes = RouteMap::new();
        routes.add_rule(WEBFINGER_PATH, WEBFINGER_ENDPOINT, &["GET"]).expect("well-known pattern is valid");
        Server {
            routes,
            actor_dispatcher: None,
            outbox_dispatcher: None,
            outbox_counter: None,
            outbox_first_cursor: None,
            outbox_last_cursor: None,
        }
    }

    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    /// Register the actor dispatcher, adding its URL pattern to the route
    /// map under the `actor` endpoint. `path` must contain a `<handle>`
    /// placeholder.
    pub fn set_actor_dispatcher(
        &mut self,
        path: &str,
        dispatcher: impl ActorDispatcher + 'static,
    ) -> Result<(), FedikitError> {
        self.routes.add_rule(path, ACTOR_ENDPOINT, &["GET"])?;
        self.actor_dispatcher = Some(Arc::new(dispatcher));
        Ok(())
    }

    /// Register the outbox dispatcher, adding its URL pattern under the
    /// `outbox` endpoint. `path` must contain a `<handle>` placeholder.
    pub fn set_outbox_dispatcher(
        &mut self,
        path: &str,
        dispatcher: impl OutboxDispatcher + 'static,
    ) -> Result<(), FedikitError> {
        self.routes.add_rule(path, OUTBOX_ENDPOINT, &["GET"])?;
        self.outbox_dispatcher = Some(Arc::new(dispatcher));
        Ok(())
    }

    pub fn set_outbox_counter(&mut self, counter: impl OutboxCounter + 'static) {
        self.outbox_counter = Some(Arc::new(counter));
    }

    pub fn set_outbox_first_cursor(&mut self, supplier: impl OutboxCursorSupplier + 'static) {
        self.outbox_first_cursor = Some(Arc::new(supplier));
    }

    pub fn set_outbox_last_cursor(&mut self, supplier: impl OutboxCursorSupplier + 'static) {
        self.outbox_last_cursor = Some(Arc::new(supplier));
    }

    pub fn actor_dispatcher(&self) -> Option<&Arc<dyn ActorDispatcher>> {
        self.actor_dispatcher.as_ref()
    }

    pub fn outbox_dispatcher(&self) -> Option<&Arc<dyn OutboxDispatcher>> {
        self.outbox_dispatcher.as_ref()
    }

    pub fn outbox_counter(&self) -> Option<&Arc<dyn OutboxCounter>> {
        self.outbox_counter.as_ref()
    }

    pub fn outbox_first_cursor(&self) -> Option<&Arc<dyn OutboxCursorSupplier>> {
        self.outbox_first_cursor.as_ref()
    }

    pub fn outbox_last_cursor(&self) -> Option<&Arc<dyn OutboxCursorSupplier>> {
        self.outbox_last_cursor.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::federation::route::MatchOutcome;

    struct NoopActors;

    #[async_trait]
    impl ActorDispatcher for NoopActors {
        async fn dispatch(&self, _handle: &str) -> Result<Option<VocabActor>, FedikitError> {
            Ok(None)
        }
    }

    #[test]
    fn registering_actor_dispatcher_adds_a_route() {
        let mut server = Server::new();
        server.set_actor_dispatcher("/actors/<handle>", NoopActors).unwrap();
        match server.routes().match_path("GET", "/actors/alice") {
            MatchOutcome::Matched { endpoint, .. } => assert_eq!(endpoint, ACTOR_ENDPOINT),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn webfinger_is_preregistered() {
        let server = Server::new();
        match server.routes().match_path("GET", "/.well-known/webfinger") {
            MatchOutcome::Matched { endpoint, .. } => assert_eq!(endpoint, WEBFINGER_ENDPOINT),
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn clone_shares_dispatchers_but_not_accidentally_the_same_instance_identity() {
        let mut server = Server::new();
        server.set_actor_dispatcher("/actors/<handle>", NoopActors).unwrap();
        let cloned = server.clone();
        assert!(cloned.actor_dispatcher().is_some());
        match cloned.routes().match_path("GET", "/actors/bob") {
            MatchOutcome::Matched { endpoint, .. } => assert_eq!(endpoint, ACTOR_ENDPOINT),
            other => panic!("expected match, got {other:?}"),
        }
    }
}

//! Actor documents and outbox rendering.

use async_trait::async_trait;

use fedikit_core::error::FedikitError;
use fedikit_core::federation::collection::Page;
use fedikit_core::federation::{ActorDispatcher, FederationConfig, OutboxCounter, OutboxCursorSupplier, OutboxDispatcher, RequestAdapter, Server};
use fedikit_core::http_abstraction::{HeaderMap, Scope};
use fedikit_core::model::entity::{EntityBuilder, SlotItem};
use fedikit_core::scalars::{Scalar, Uri};
use fedikit_core::vocab::activity::CREATE_TYPE;
use fedikit_core::vocab::actor::PERSON_TYPE;
use fedikit_core::vocab::object::NOTE_TYPE;
use fedikit_core::vocab::{VocabActivity, VocabActor};

fn actor_uri(handle: &str) -> Uri {
    Uri::parse(&format!("http://fedikit.test/actors/{handle}")).unwrap()
}

fn build_alice() -> VocabActor {
    let entity = EntityBuilder::new(PERSON_TYPE)
        .with_id(actor_uri("alice"))
        .unwrap()
        .with("preferred_username", SlotItem::Scalar(Scalar::String("alice".to_string())))
        .unwrap()
        .with("name", SlotItem::Scalar(Scalar::String("Alice".to_string())))
        .unwrap()
        .build();
    VocabActor::from_entity(entity)
}

fn build_create(n: usize) -> VocabActivity {
    let note = EntityBuilder::new(NOTE_TYPE)
        .with_id(Uri::parse(&format!("http://fedikit.test/notes/{n}")).unwrap())
        .unwrap()
        .with("content", SlotItem::Scalar(Scalar::String(format!("post {n}"))))
        .unwrap()
        .build();
    let actor_ref = SlotItem::Entity(Box::new(build_alice().into_entity()));
    let entity = EntityBuilder::new(CREATE_TYPE)
        .with("actor", actor_ref)
        .unwrap()
        .with("object", SlotItem::Entity(Box::new(note)))
        .unwrap()
        .build();
    VocabActivity::from_entity(entity)
}

struct FixtureActors;

#[async_trait]
impl ActorDispatcher for FixtureActors {
    async fn dispatch(&self, handle: &str) -> Result<Option<VocabActor>, FedikitError> {
        Ok(if handle == "alice" { Some(build_alice()) } else { None })
    }
}

struct FixtureOutbox;

#[async_trait]
impl OutboxDispatcher for FixtureOutbox {
    async fn dispatch(&self, handle: &str, _cursor: Option<&str>) -> Result<Option<Page<VocabActivity>>, FedikitError> {
        if handle != "alice" {
            return Ok(None);
        }
        let items = vec![build_create(1), build_create(2), build_create(3)];
        Ok(Some(Page::new(items, None, None)))
    }
}

struct FixtureCounter;

#[async_trait]
impl OutboxCounter for FixtureCounter {
    async fn count(&self, _handle: &str) -> Result<Option<i64>, FedikitError> {
        Ok(Some(3))
    }
}

struct FixedCursor(&'static str);

#[async_trait]
impl OutboxCursorSupplier for FixedCursor {
    async fn cursor(&self, _handle: &str) -> Result<Option<String>, FedikitError> {
        Ok(Some(self.0.to_string()))
    }
}

fn scope_for(path: &str) -> Scope {
    let mut headers = HeaderMap::new();
    headers.insert("Host", "fedikit.test");
    Scope {
        scheme: "http".to_string(),
        server: None,
        script_root: String::new(),
        method: "GET".to_string(),
        path_info: path.to_string(),
        query_string: String::new(),
        headers,
        client_addr: None,
    }
}

#[tokio::test]
async fn actor_document_renders_compacted_jsonld() {
    let mut server = Server::new();
    server.set_actor_dispatcher("/actors/<handle>", FixtureActors).unwrap();
    let adapter = RequestAdapter::new(server, FederationConfig::default());

    let response = adapter.handle(&scope_for("/actors/alice")).await;

    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers.get("content-type"),
        Some(r#"application/ld+json; profile="https://www.w3.org/ns/activitystreams""#)
    );
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["type"], serde_json::json!("Person"));
    assert_eq!(body["preferredUsername"], serde_json::json!("alice"));
    assert_eq!(body["name"], serde_json::json!("Alice"));
}

#[tokio::test]
async fn outbox_with_no_cursor_suppliers_renders_items_inline() {
    let mut server = Server::new();
    server.set_actor_dispatcher("/actors/<handle>", FixtureActors).unwrap();
    server.set_outbox_dispatcher("/actors/<handle>/outbox", FixtureOutbox).unwrap();
    server.set_outbox_counter(FixtureCounter);
    let adapter = RequestAdapter::new(server, FederationConfig::default());

    let response = adapter.handle(&scope_for("/actors/alice/outbox")).await;

    assert_eq!(response.status, 200);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["type"], serde_json::json!("OrderedCollection"));
    assert_eq!(body["totalItems"], serde_json::json!(3));
    assert_eq!(body["orderedItems"].as_array().unwrap().len(), 3);
    assert!(body.get("first").is_none());
}

#[tokio::test]
async fn outbox_with_cursor_suppliers_renders_an_index_pointing_at_pages() {
    let mut server = Server::new();
    server.set_actor_dispatcher("/actors/<handle>", FixtureActors).unwrap();
    server.set_outbox_dispatcher("/actors/<handle>/outbox", FixtureOutbox).unwrap();
    server.set_outbox_counter(FixtureCounter);
    server.set_outbox_first_cursor(FixedCursor("0"));
    server.set_outbox_last_cursor(FixedCursor("2"));
    let adapter = RequestAdapter::new(server, FederationConfig::default());

    let response = adapter.handle(&scope_for("/actors/alice/outbox")).await;

    assert_eq!(response.status, 200);
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["type"], serde_json::json!("OrderedCollection"));
    assert_eq!(body["totalItems"], serde_json::json!(3));
    assert_eq!(body["first"], serde_json::json!("http://fedikit.test/actors/alice/outbox?cursor=0"));
    assert_eq!(body["last"], serde_json::json!("http://fedikit.test/actors/alice/outbox?cursor=2"));
    assert!(body.get("orderedItems").is_none());
}

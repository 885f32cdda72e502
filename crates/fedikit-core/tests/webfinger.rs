//! WebFinger resolution.

use async_trait::async_trait;

use fedikit_core::error::FedikitError;
use fedikit_core::federation::{ActorDispatcher, FederationConfig, RequestAdapter, Server};
use fedikit_core::http_abstraction::{HeaderMap, Scope};
use fedikit_core::model::entity::{EntityBuilder, SlotItem};
use fedikit_core::scalars::{LanguageString, LanguageTag, Scalar, Timestamp, Uri};
use fedikit_core::vocab::actor::PERSON_TYPE;
use fedikit_core::vocab::VocabActor;

struct FixtureActors;

fn actor_uri(handle: &str) -> Uri {
    Uri::parse(&format!("http://fedikit.test/actors/{handle}")).unwrap()
}

fn build_person(handle: &str, display_name: &str, published: &str) -> VocabActor {
    let entity = EntityBuilder::new(PERSON_TYPE)
        .with_id(actor_uri(handle))
        .unwrap()
        .with("preferred_username", SlotItem::Scalar(Scalar::String(handle.to_string())))
        .unwrap()
        .with("name", SlotItem::Scalar(Scalar::String(display_name.to_string())))
        .unwrap()
        .with("summary", SlotItem::Scalar(Scalar::LanguageString(LanguageString::new(
            "<p>Alice's summary</p>",
            LanguageTag::parse("en").unwrap(),
        ))))
        .unwrap()
        .with("published", SlotItem::Scalar(Scalar::Timestamp(Timestamp::parse(published).unwrap())))
        .unwrap()
        .build();
    VocabActor::from_entity(entity)
}

#[async_trait]
impl ActorDispatcher for FixtureActors {
    async fn dispatch(&self, handle: &str) -> Result<Option<VocabActor>, FedikitError> {
        Ok(match handle {
            "alice" => Some(build_person("alice", "Alice", "2021-01-01T00:00:00Z")),
            "bob" => Some(build_person("bob", "Bob", "2022-01-01T00:00:00Z")),
            _ => None,
        })
    }
}

fn adapter() -> RequestAdapter {
    let mut server = Server::new();
    server.set_actor_dispatcher("/actors/<handle>", FixtureActors).unwrap();
    RequestAdapter::new(server, FederationConfig::default())
}

fn scope_for(path: &str, query: &str) -> Scope {
    let mut headers = HeaderMap::new();
    headers.insert("Host", "fedikit.test");
    Scope {
        scheme: "http".to_string(),
        server: None,
        script_root: String::new(),
        method: "GET".to_string(),
        path_info: path.to_string(),
        query_string: query.to_string(),
        headers,
        client_addr: None,
    }
}

#[tokio::test]
async fn webfinger_resolves_a_known_actor() {
    let adapter = adapter();
    let scope = scope_for("/.well-known/webfinger", "resource=acct%3Aalice%40fedikit.test");
    let response = adapter.handle(&scope).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.headers.get("content-type"), Some("application/jrd+json"));

    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "subject": "acct:alice@fedikit.test",
            "aliases": ["http://fedikit.test/actors/alice"],
            "links": [{
                "rel": "self",
                "type": "application/activity+json",
                "href": "http://fedikit.test/actors/alice",
            }],
        })
    );
}

#[tokio::test]
async fn webfinger_on_an_unknown_handle_is_404() {
    let adapter = adapter();
    let scope = scope_for("/.well-known/webfinger", "resource=acct%3Anobody%40fedikit.test");
    let response = adapter.handle(&scope).await;
    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn webfinger_on_a_foreign_host_is_404() {
    let adapter = adapter();
    let scope = scope_for("/.well-known/webfinger", "resource=acct%3Aalice%40other.host");
    let response = adapter.handle(&scope).await;
    assert_eq!(response.status, 404);
}

/// No actor dispatcher registered means WebFinger always 404s, regardless
/// of input.
#[tokio::test]
async fn webfinger_with_no_actor_dispatcher_is_always_404() {
    let server = Server::new();
    let adapter = RequestAdapter::new(server, FederationConfig::default());
    let scope = scope_for("/.well-known/webfinger", "resource=acct%3Aalice%40fedikit.test");
    let response = adapter.handle(&scope).await;
    assert_eq!(response.status, 404);
}

/// Dispatcher absence is checked before the `resource` parameter: a request
/// missing `resource` with no actor dispatcher registered is still a 404,
/// never the 400 that a missing `resource` would otherwise produce.
#[tokio::test]
async fn webfinger_with_no_actor_dispatcher_and_missing_resource_is_404_not_400() {
    let server = Server::new();
    let adapter = RequestAdapter::new(server, FederationConfig::default());
    let scope = scope_for("/.well-known/webfinger", "");
    let response = adapter.handle(&scope).await;
    assert_eq!(response.status, 404);
}

//! Round-trip, extras-preservation, and `EntityRef` identity invariants,
//! over hand-built `Person`/`Note`/`Create` entities.

use fedikit_core::model::entity::{Entity, EntityBuilder, SlotItem};
use fedikit_core::model::entity_ref::EntityRef;
use fedikit_core::model::registry::ENTITY_ROOT;
use fedikit_core::scalars::{LanguageString, LanguageTag, Scalar, Uri};
use fedikit_core::vocab::activity::CREATE_TYPE;
use fedikit_core::vocab::actor::PERSON_TYPE;
use fedikit_core::vocab::object::NOTE_TYPE;

fn alice() -> Uri {
    Uri::parse("https://example.test/actors/alice").unwrap()
}

fn build_person() -> Entity {
    EntityBuilder::new(PERSON_TYPE)
        .with_id(alice())
        .unwrap()
        .with("preferred_username", SlotItem::Scalar(Scalar::String("alice".to_string())))
        .unwrap()
        .with(
            "name",
            SlotItem::Scalar(Scalar::LanguageString(LanguageString::new("Alice", LanguageTag::parse("en").unwrap()))),
        )
        .unwrap()
        .build()
}

fn build_note() -> Entity {
    EntityBuilder::new(NOTE_TYPE)
        .with_id(Uri::parse("https://example.test/notes/1").unwrap())
        .unwrap()
        .with("content", SlotItem::Scalar(Scalar::String("hello, fediverse".to_string())))
        .unwrap()
        .build()
}

fn build_create() -> Entity {
    EntityBuilder::new(CREATE_TYPE)
        .with("actor", SlotItem::Ref(EntityRef::new(alice())))
        .unwrap()
        .with("object", SlotItem::Entity(Box::new(build_note())))
        .unwrap()
        .build()
}

#[tokio::test]
async fn person_round_trips_through_compacted_serialization() {
    let person = build_person();
    let doc = person.serialize_default(false).await.unwrap();
    let parsed = Entity::parse(PERSON_TYPE, &doc).await.unwrap();
    assert_eq!(parsed, person);
}

#[tokio::test]
async fn person_round_trips_through_expanded_serialization() {
    let person = build_person();
    let doc = person.serialize_default(true).await.unwrap();
    let parsed = Entity::parse(PERSON_TYPE, &doc).await.unwrap();
    assert_eq!(parsed, person);
}

/// The `actor` slot holds an unresolved `EntityRef`, not a fetched entity:
/// round-tripping must preserve that, never silently resolving it.
#[tokio::test]
async fn create_activity_round_trips_with_actor_left_as_a_reference() {
    let create = build_create();
    let doc = create.serialize_default(false).await.unwrap();
    let parsed = Entity::parse(CREATE_TYPE, &doc).await.unwrap();
    assert_eq!(parsed, create);
    assert_eq!(parsed.get_singular("actor"), None, "unresolved refs are excluded from read()");
}

#[tokio::test]
async fn parsing_with_entity_root_accepts_any_registered_class() {
    let note = build_note();
    let doc = note.serialize_default(true).await.unwrap();
    let parsed = Entity::parse(ENTITY_ROOT, &doc).await.unwrap();
    assert_eq!(parsed.type_uri(), NOTE_TYPE);
    assert_eq!(parsed, note);
}

/// A top-level property URI that no registered property of the target
/// class claims round-trips through its raw expanded JSON-LD value,
/// unchanged, via the `extra` bag.
#[tokio::test]
async fn unknown_top_level_properties_survive_parse_then_serialize() {
    let doc = serde_json::json!({
        "@type": ["https://www.w3.org/ns/activitystreams#Note"],
        "@id": "https://example.test/notes/2",
        "https://www.w3.org/ns/activitystreams#content": [{ "@value": "hi" }],
        "https://example.test/vocab#customField": [{ "@value": "untouched" }],
    });

    let parsed = Entity::parse(NOTE_TYPE, &doc).await.unwrap();
    assert_eq!(
        parsed.extra().get("https://example.test/vocab#customField"),
        Some(&serde_json::json!([{ "@value": "untouched" }]))
    );

    let reserialized = parsed.serialize_default(true).await.unwrap();
    assert_eq!(
        reserialized["https://example.test/vocab#customField"],
        serde_json::json!([{ "@value": "untouched" }])
    );
}

#[test]
fn entity_ref_identity_is_by_uri_alone() {
    let a = EntityRef::new(Uri::parse("https://example.test/a").unwrap());
    let b = EntityRef::new(Uri::parse("https://example.test/a").unwrap());
    let c = EntityRef::new(Uri::parse("https://example.test/c").unwrap());

    assert_eq!(a, b);
    assert_ne!(a, c);

    let hash = |r: &EntityRef| {
        use std::hash::{Hash, Hasher};
        let mut h = std::collections::hash_map::DefaultHasher::new();
        r.hash(&mut h);
        h.finish()
    };
    assert_eq!(hash(&a), hash(&b));
}

//! Wires the blog's single author and its posts into `fedikit_core`'s
//! federation dispatcher traits — the same kind of state/capability wiring
//! `AppState` does for the blog's own (non-federation) handlers.

use std::sync::Arc;

use async_trait::async_trait;
use fedikit_core::error::FedikitError;
use fedikit_core::federation::collection::Page;
use fedikit_core::federation::{ActorDispatcher, FederationConfig, OutboxCounter, OutboxCursorSupplier, OutboxDispatcher, RequestAdapter, Server};
use fedikit_core::model::entity::SlotItem;
use fedikit_core::model::entity_ref::EntityRef;
use fedikit_core::scalars::{LanguageString, LanguageTag, Uri};
use fedikit_core::vocab::activity::{new_activity, CREATE_TYPE, VocabActivity};
use fedikit_core::vocab::actor::{new_actor, PERSON_TYPE, VocabActor};
use fedikit_core::vocab::object::new_note;

use crate::db::Db;

/// The one author every request resolves to — blogs here have no signup
/// flow, just the handle the process was started with.
pub struct BlogConfig {
    pub handle: String,
    pub display_name: String,
    /// `scheme://host`, no trailing slash — used to build actor/note/activity ids.
    pub base_url: String,
}

impl BlogConfig {
    pub fn actor_uri(&self) -> Uri {
        Uri::parse(&format!("{}/actors/{}", self.base_url, self.handle)).unwrap()
    }

    fn post_uri(&self, id: i64) -> Uri {
        Uri::parse(&format!("{}/posts/{}", self.base_url, id)).unwrap()
    }

    fn build_actor(&self) -> Result<VocabActor, FedikitError> {
        new_actor(PERSON_TYPE, self.actor_uri(), &self.handle, &self.display_name)
    }

    fn build_create(&self, post: &crate::db::Post) -> Result<VocabActivity, FedikitError> {
        let note = new_note(self.post_uri(post.id), LanguageString::new(post.content.clone(), LanguageTag::parse("en").unwrap()))?;
        let actor_ref = SlotItem::Ref(EntityRef::new(self.actor_uri()));
        let object = SlotItem::Entity(Box::new(note.into_entity()));
        new_activity(CREATE_TYPE, actor_ref, object)
    }
}

pub struct BlogActors(pub Arc<BlogConfig>);

#[async_trait]
impl ActorDispatcher for BlogActors {
    async fn dispatch(&self, handle: &str) -> Result<Option<VocabActor>, FedikitError> {
        if handle != self.0.handle {
            return Ok(None);
        }
        Ok(Some(self.0.build_actor()?))
    }
}

pub struct BlogOutbox {
    pub config: Arc<BlogConfig>,
    pub db: Arc<Db>,
}

#[async_trait]
impl OutboxDispatcher for BlogOutbox {
    async fn dispatch(&self, handle: &str, cursor: Option<&str>) -> Result<Option<Page<VocabActivity>>, FedikitError> {
        if handle != self.config.handle {
            return Ok(None);
        }
        let before_id = match cursor {
            Some(c) => c.parse::<i64>().map_err(|_| FedikitError::LoadFailure {
                uri: format!("outbox cursor {c}"),
                reason: "cursor is not a post id".to_string(),
            })?,
            None => self.db.first_id().map_err(db_err)?.unwrap_or(0),
        };
        let (posts, next_cursor) = self.db.page_before(before_id).map_err(db_err)?;
        let items = posts.iter().map(|p| self.config.build_create(p)).collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Page::new(items, None, next_cursor.map(|c| c.to_string()))))
    }
}

pub struct BlogOutboxCounter(pub Arc<Db>);

#[async_trait]
impl OutboxCounter for BlogOutboxCounter {
    async fn count(&self, _handle: &str) -> Result<Option<i64>, FedikitError> {
        Ok(Some(self.0.count().map_err(db_err)?))
    }
}

pub struct BlogFirstCursor(pub Arc<Db>);

#[async_trait]
impl OutboxCursorSupplier for BlogFirstCursor {
    async fn cursor(&self, _handle: &str) -> Result<Option<String>, FedikitError> {
        Ok(self.0.first_id().map_err(db_err)?.map(|id| id.to_string()))
    }
}

pub struct BlogLastCursor(pub Arc<Db>);

#[async_trait]
impl OutboxCursorSupplier for BlogLastCursor {
    async fn cursor(&self, _handle: &str) -> Result<Option<String>, FedikitError> {
        Ok(self.0.last_id().map_err(db_err)?.map(|id| id.to_string()))
    }
}

fn db_err(e: rusqlite::Error) -> FedikitError {
    FedikitError::LoadFailure { uri: "sqlite".to_string(), reason: e.to_string() }
}

/// Assemble the `fedikit_core` request adapter for this blog: one actor
/// route, one outbox route, both dispatching against `db`.
pub fn build_adapter(config: Arc<BlogConfig>, db: Arc<Db>) -> RequestAdapter {
    let mut server = Server::new();
    server.set_actor_dispatcher("/actors/<handle>", BlogActors(config.clone())).unwrap();
    server.set_outbox_dispatcher("/actors/<handle>/outbox", BlogOutbox { config: config.clone(), db: db.clone() }).unwrap();
    server.set_outbox_counter(BlogOutboxCounter(db.clone()));
    server.set_outbox_first_cursor(BlogFirstCursor(db.clone()));
    server.set_outbox_last_cursor(BlogLastCursor(db));

    let fed_config = FederationConfig::builder().default_scheme("https").build();
    RequestAdapter::new(server, fed_config)
}

//! HTML + human-readable handlers: the blog's own REST surface, separate
//! from the federation adapter mounted alongside it in `server.rs`.

use std::sync::Arc;

use askama::Template;
use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;

use crate::db::Db;
use crate::federation::BlogConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub config: Arc<BlogConfig>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    display_name: String,
    handle: String,
    posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "post.html")]
struct PostTemplate {
    display_name: String,
    note_url: String,
    post: PostView,
}

struct PostView {
    id: i64,
    content: String,
    published: String,
}

impl From<crate::db::Post> for PostView {
    fn from(p: crate::db::Post) -> Self {
        PostView { id: p.id, content: p.content, published: p.published.to_rfc2822() }
    }
}

/// GET / — the last 20 posts, newest first.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let posts = state.db.recent(20).unwrap_or_default().into_iter().map(PostView::from).collect();
    IndexTemplate { display_name: state.config.display_name.clone(), handle: state.config.handle.clone(), posts }
}

/// GET /posts/:id — the same URL the `Note`'s `@id` names. Content
/// negotiation here (not through the federation adapter, which only owns
/// actor/outbox/webfinger) decides HTML vs JSON-LD, the common
/// ActivityPub "same URL, different representation" pattern.
pub async fn show_post(State(state): State<AppState>, Path(id): Path<i64>, headers: HeaderMap) -> axum::response::Response {
    let Ok(Some(post)) = state.db.get(id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let wants_activitypub = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("activity+json") || v.contains("ld+json"))
        .unwrap_or(false);

    if wants_activitypub {
        let note = fedikit_core::vocab::object::new_note(
            state.config_post_uri(id),
            fedikit_core::scalars::LanguageString::new(
                post.content.clone(),
                fedikit_core::scalars::LanguageTag::parse("en").unwrap(),
            ),
        );
        let note = match note {
            Ok(n) => n,
            Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
        return match note.entity().serialize_default(false).await {
            Ok(doc) => axum::response::Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "application/ld+json; profile=\"https://www.w3.org/ns/activitystreams\"")
                .body(axum::body::Body::from(serde_json::to_vec(&doc).unwrap_or_default()))
                .unwrap(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
    }

    let note_url = format!("{}/posts/{}", state.config.base_url, id);
    PostTemplate { display_name: state.config.display_name.clone(), note_url, post: post.into() }.into_response()
}

impl AppState {
    fn config_post_uri(&self, id: i64) -> fedikit_core::scalars::Uri {
        fedikit_core::scalars::Uri::parse(&format!("{}/posts/{}", self.config.base_url, id)).unwrap()
    }
}

#[derive(Deserialize)]
pub struct NewPost {
    pub content: String,
}

/// POST /posts — publish a new post from the HTML form.
pub async fn create_post(State(state): State<AppState>, Form(body): Form<NewPost>) -> impl IntoResponse {
    if body.content.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "post content must not be empty").into_response();
    }
    match state.db.insert(body.content.trim()) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

//! A small federated blog — a worked example of a host application built
//! on `fedikit_core`'s federation module and entity model.
//!
//! Persists posts in SQLite, renders them as HTML, and exposes the single
//! author as an ActivityPub actor (WebFinger-discoverable, with a paged
//! outbox of `Create` activities) at the same base URL.

mod adapter;
mod db;
mod federation;
mod web;

pub use db::Db;
pub use federation::BlogConfig;
pub use web::AppState;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

/// Build the full router: the blog's own HTML routes, merged with the
/// federation adapter mounted as a fallback.
pub fn build_router(app_state: AppState, fed_adapter: Arc<fedikit_core::federation::RequestAdapter>) -> Router {
    let html_routes = Router::new()
        .route("/", get(web::index))
        .route("/posts", post(web::create_post))
        .route("/posts/{id}", get(web::show_post))
        .with_state(app_state);

    let federation_routes = Router::new().fallback(adapter::federation_fallback).with_state(fed_adapter);

    html_routes.merge(federation_routes)
}

/// Convenience used by both `main` and the test suite: open `db_path`,
/// assemble the federation adapter, and build the router in one call.
pub fn build_app(config: Arc<BlogConfig>, db_path: &str) -> Result<Router, String> {
    let db = Arc::new(Db::open(db_path).map_err(|e| format!("failed to open {db_path}: {e}"))?);
    let fed_adapter = Arc::new(federation::build_adapter(config.clone(), db.clone()));
    let app_state = AppState { db, config };
    Ok(build_router(app_state, fed_adapter))
}

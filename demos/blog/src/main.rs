//! Binary entry point for the blog demo. See `lib.rs` for the router and
//! federation wiring; this file is just argument parsing and startup.
//!
//! # Usage
//!
//! ```bash
//! fedikit-blog-demo --handle alice --display-name "Alice's Blog" --base-url https://alice.example --port 8080
//! ```

use std::sync::Arc;

use clap::Parser;
use fedikit_blog_demo::BlogConfig;
use tower_http::trace::TraceLayer;

/// A small federated blog.
#[derive(Parser)]
#[command(about = "A small federated blog built on fedikit-core")]
struct Args {
    /// The blog's single author handle, e.g. `alice`.
    #[arg(long)]
    handle: String,

    /// Display name shown in the actor document and HTML.
    #[arg(long, default_value = "A fedikit blog")]
    display_name: String,

    /// The externally-visible `scheme://host[:port]` this blog is served
    /// under — used to build actor/note/activity ids, so it must match
    /// what remote servers will actually resolve.
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,

    /// Path to the SQLite database file.
    #[arg(long, default_value = "blog.sqlite3")]
    db_path: String,

    /// Port to bind the HTTP server to.
    #[arg(long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Arc::new(BlogConfig { handle: args.handle, display_name: args.display_name, base_url: args.base_url });
    let router = fedikit_blog_demo::build_app(config, &args.db_path)?.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .map_err(|e| format!("failed to bind port {}: {e}", args.port))?;
    tracing::info!(port = args.port, "blog listening");
    axum::serve(listener, router).await.map_err(|e| e.to_string())
}

//! The axum binding for `fedikit_core`'s transport-agnostic request adapter:
//! decode an axum `Request` into a `Scope`, run the federation state
//! machine, encode the `Response` back.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::Response as AxumResponse;
use fedikit_core::federation::RequestAdapter;
use fedikit_core::http_abstraction::{HeaderMap as FedikitHeaderMap, Scope};

/// Mounted as the fallback route so every path the blog's own HTML routes
/// don't claim (`/.well-known/webfinger`, `/actors/<handle>`,
/// `/actors/<handle>/outbox`) reaches the federation adapter.
pub async fn federation_fallback(State(adapter): State<Arc<RequestAdapter>>, req: Request) -> AxumResponse {
    let scope = decode_scope(&req);
    let response = adapter.handle(&scope).await;
    encode_response(response)
}

fn decode_scope(req: &Request) -> Scope {
    let mut headers = FedikitHeaderMap::new();
    for (name, value) in req.headers() {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str(), value);
        }
    }
    let scheme = headers.get("x-forwarded-proto").unwrap_or("http").to_string();

    Scope {
        scheme,
        server: None,
        script_root: String::new(),
        method: req.method().to_string(),
        path_info: req.uri().path().to_string(),
        query_string: req.uri().query().unwrap_or("").to_string(),
        headers,
        client_addr: None,
    }
}

fn encode_response(response: fedikit_core::http_abstraction::Response) -> AxumResponse {
    let mut builder = AxumResponse::builder().status(StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    for (name, value) in response.headers.iter() {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            builder = builder.header(name, value);
        }
    }
    builder.body(Body::from(response.body)).unwrap_or_else(|_| {
        AxumResponse::builder().status(StatusCode::INTERNAL_SERVER_ERROR).body(Body::empty()).unwrap()
    })
}

//! The request adapter: the federation-aware HTTP entry point. Decodes a
//! [`Scope`], negotiates content type, matches it against the server's
//! route map, and runs the matched endpoint's pipeline (WebFinger / actor /
//! outbox), rendering JSON-LD via the entity model.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FedikitError;
use crate::federation::config::FederationConfig;
use crate::federation::route::{Captures, MatchOutcome, ParamValue};
use crate::federation::server::{ACTOR_ENDPOINT, OUTBOX_ENDPOINT, Server, WEBFINGER_ENDPOINT};
use crate::http_abstraction::{Response, Scope};
use crate::model::entity::SlotItem;
use crate::model::entity_ref::EntityRef;
use crate::vocab::collection::{
    new_inline_ordered_collection, new_ordered_collection_page, new_paged_ordered_collection_index,
};
use crate::vocab::VocabActivity;
use crate::webfinger::{Jrd, JrdLink};

/// The compacted JSON-LD content type every actor/collection response is
/// rendered with.
pub const ACTIVITYSTREAMS_CONTENT_TYPE: &str =
    r#"application/ld+json; profile="https://www.w3.org/ns/activitystreams""#;
const JRD_CONTENT_TYPE: &str = "application/jrd+json";
const PLAIN_TEXT: &str = "text/plain";

/// A pluggable response for one of the adapter's terminal error states.
/// User-visible failures in the request adapter are always mapped through
/// the corresponding hook, which may be replaced to delegate to a host
/// application.
#[async_trait]
pub trait ErrorHook: Send + Sync {
    async fn call(&self, scope: &Scope) -> Response;
}

struct StaticTextHook {
    status: u16,
    body: &'static str,
}

#[async_trait]
impl ErrorHook for StaticTextHook {
    async fn call(&self, _scope: &Scope) -> Response {
        Response::text(self.status, PLAIN_TEXT, self.body)
    }
}

/// The three replaceable hooks: `not_found` (404), `method_not_allowed`
/// (405), `not_acceptable` (406). There is no hook for non-HTTP transport
/// events — this adapter's `Scope` already represents a decoded HTTP
/// request; a host binding is responsible for routing non-HTTP transport
/// events before ever constructing one.
pub struct Hooks {
    pub not_found: Box<dyn ErrorHook>,
    pub method_not_allowed: Box<dyn ErrorHook>,
    pub not_acceptable: Box<dyn ErrorHook>,
}

impl Default for Hooks {
    fn default() -> Self {
        Hooks {
            not_found: Box::new(StaticTextHook { status: 404, body: "Not Found" }),
            method_not_allowed: Box::new(StaticTextHook { status: 405, body: "Method Not Allowed" }),
            not_acceptable: Box::new(StaticTextHook { status: 406, body: "Not Acceptable" }),
        }
    }
}

/// The federation-aware HTTP entry point.
pub struct RequestAdapter {
    server: Server,
    config: FederationConfig,
    hooks: Hooks,
}

impl RequestAdapter {
    pub fn new(server: Server, config: FederationConfig) -> Self {
        RequestAdapter { server, config, hooks: Hooks::default() }
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Run the full decode/negotiate/match/dispatch state machine over one
    /// decoded request.
    #[tracing::instrument(skip_all, fields(method = %scope.method, path = %scope.path_info))]
    pub async fn handle(&self, scope: &Scope) -> Response {
        if !is_acceptable(scope) {
            tracing::debug!("request not acceptable");
            return self.hooks.not_acceptable.call(scope).await;
        }

        let host = self.resolve_host(scope);

        match self.server.routes().match_path(&scope.method, &scope.path_info) {
            MatchOutcome::NotFound => {
                tracing::debug!("no route matched");
                self.hooks.not_found.call(scope).await
            }
            MatchOutcome::MethodNotAllowed => {
                tracing::debug!("route matched but method did not");
                self.hooks.method_not_allowed.call(scope).await
            }
            MatchOutcome::Matched { endpoint, captures } => match endpoint.as_str() {
                WEBFINGER_ENDPOINT => self.webfinger_flow(scope, &host).await,
                ACTOR_ENDPOINT => self.actor_flow(scope, &captures, &host).await,
                OUTBOX_ENDPOINT => self.outbox_flow(scope, &captures, &host).await,
                _ => self.hooks.not_found.call(scope).await,
            },
        }
    }

    /// The `Host` header if present, else the bound server address, else
    /// the configured default.
    fn resolve_host(&self, scope: &Scope) -> String {
        if let Some(host) = scope.host_header() {
            return host.to_string();
        }
        if let Some((host, port)) = &scope.server {
            let default_port = match scope.scheme.as_str() {
                "https" => 443,
                _ => 80,
            };
            return if *port == default_port { host.clone() } else { format!("{host}:{port}") };
        }
        self.config.default_host.clone().unwrap_or_default()
    }

    fn scheme(&self, scope: &Scope) -> String {
        if scope.scheme.is_empty() { self.config.default_scheme.clone() } else { scope.scheme.clone() }
    }

    fn build_url(&self, scope: &Scope, host: &str, endpoint: &str, params: &Captures) -> Result<String, FedikitError> {
        self.server
            .routes()
            .build_url(endpoint, params, &self.scheme(scope), host, &self.config.script_root)
            .map_err(Into::into)
    }

    /// Resolve an `acct:` resource to an actor and render its WebFinger JRD.
    #[tracing::instrument(skip_all)]
    async fn webfinger_flow(&self, scope: &Scope, host: &str) -> Response {
        let Some(dispatcher) = self.server.actor_dispatcher() else {
            // No actor dispatcher registered means 404 regardless of input.
            return self.hooks.not_found.call(scope).await;
        };

        let Some(resource) = scope.query_param("resource") else {
            return Response::text(400, PLAIN_TEXT, "Missing resource parameter");
        };

        let Some(handle) = extract_acct_handle(&resource, host) else {
            return self.hooks.not_found.call(scope).await;
        };

        let actor = match dispatcher.dispatch(&handle).await {
            Ok(Some(actor)) => actor,
            Ok(None) => return self.hooks.not_found.call(scope).await,
            Err(e) => {
                tracing::error!(error = %e, "actor dispatcher failed");
                return self.hooks.not_found.call(scope).await;
            }
        };

        let mut handle_params = Captures::new();
        handle_params.insert("handle".to_string(), ParamValue::String(handle.clone()));
        let actor_url = match self.build_url(scope, host, ACTOR_ENDPOINT, &handle_params) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "failed to build actor URL");
                return self.hooks.not_found.call(scope).await;
            }
        };

        let mut links = vec![JrdLink::new("self").media_type("application/activity+json").href(actor_url.clone())];
        for url_item in actor.entity().get_plural("url") {
            links.push(webfinger_link_for(url_item));
        }

        let jrd = Jrd::new(resource).with_aliases(vec![actor_url]).with_links(links);
        Response::json(200, JRD_CONTENT_TYPE, &serde_json::to_value(&jrd).unwrap_or_default())
    }

    /// Dispatch an actor document for a local handle and render it.
    #[tracing::instrument(skip_all)]
    async fn actor_flow(&self, scope: &Scope, captures: &Captures, _host: &str) -> Response {
        let Some(ParamValue::String(handle)) = captures.get("handle") else {
            return self.hooks.not_found.call(scope).await;
        };
        let Some(dispatcher) = self.server.actor_dispatcher() else {
            return self.hooks.not_found.call(scope).await;
        };

        let actor = match dispatcher.dispatch(handle).await {
            Ok(Some(actor)) => actor,
            Ok(None) => return self.hooks.not_found.call(scope).await,
            Err(e) => {
                tracing::error!(error = %e, "actor dispatcher failed");
                return self.hooks.not_found.call(scope).await;
            }
        };

        match actor.entity().serialize_default(false).await {
            Ok(doc) => Response::json(200, ACTIVITYSTREAMS_CONTENT_TYPE, &doc),
            Err(e) => {
                tracing::error!(error = %e, "failed to render actor");
                self.hooks.not_found.call(scope).await
            }
        }
    }

    /// Dispatch and render a handle's outbox, index or page depending on
    /// whether a `cursor` query parameter is present.
    #[tracing::instrument(skip_all)]
    async fn outbox_flow(&self, scope: &Scope, captures: &Captures, host: &str) -> Response {
        let Some(ParamValue::String(handle)) = captures.get("handle") else {
            return self.hooks.not_found.call(scope).await;
        };
        let Some(dispatcher) = self.server.outbox_dispatcher() else {
            return self.hooks.not_found.call(scope).await;
        };

        let cursor = scope.query_param("cursor");

        let result = match &cursor {
            None => self.outbox_index(scope, handle, host, dispatcher.as_ref()).await,
            Some(cursor) => self.outbox_page(scope, handle, cursor, host, dispatcher.as_ref()).await,
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "failed to render outbox");
                self.hooks.not_found.call(scope).await
            }
        }
    }

    async fn outbox_index(
        &self,
        scope: &Scope,
        handle: &str,
        host: &str,
        dispatcher: &(dyn crate::federation::server::OutboxDispatcher),
    ) -> Result<Response, FedikitError> {
        let first_cursor = match self.server.outbox_first_cursor() {
            Some(s) => s.cursor(handle).await?,
            None => None,
        };
        let last_cursor = match self.server.outbox_last_cursor() {
            Some(s) => s.cursor(handle).await?,
            None => None,
        };
        let total_items = match self.server.outbox_counter() {
            Some(c) => c.count(handle).await?,
            None => None,
        };

        let collection = if first_cursor.is_none() {
            let Some(page) = dispatcher.dispatch(handle, None).await? else {
                return Ok(self.hooks.not_found.call(scope).await);
            };
            let items: Vec<SlotItem> = page.items.into_iter().map(activity_to_slot_item).collect();
            new_inline_ordered_collection(items, total_items)?
        } else {
            let mut handle_params = Captures::new();
            handle_params.insert("handle".to_string(), ParamValue::String(handle.to_string()));
            let outbox_url = self.build_url(scope, host, OUTBOX_ENDPOINT, &handle_params)?;

            let first = Some(cursor_ref_slot_item(&outbox_url, first_cursor.as_deref().unwrap())?);
            let last = last_cursor.as_deref().map(|c| cursor_ref_slot_item(&outbox_url, c)).transpose()?;
            new_paged_ordered_collection_index(total_items, first, last)?
        };

        let doc = collection.entity().serialize_default(false).await?;
        Ok(Response::json(200, ACTIVITYSTREAMS_CONTENT_TYPE, &doc))
    }

    async fn outbox_page(
        &self,
        scope: &Scope,
        handle: &str,
        cursor: &str,
        host: &str,
        dispatcher: &(dyn crate::federation::server::OutboxDispatcher),
    ) -> Result<Response, FedikitError> {
        let Some(page) = dispatcher.dispatch(handle, Some(cursor)).await? else {
            return Ok(self.hooks.not_found.call(scope).await);
        };

        let mut handle_params = Captures::new();
        handle_params.insert("handle".to_string(), ParamValue::String(handle.to_string()));
        let outbox_url = self.build_url(scope, host, OUTBOX_ENDPOINT, &handle_params)?;

        let prev = page.prev_cursor.as_deref().map(|c| cursor_ref_slot_item(&outbox_url, c)).transpose()?;
        let next = page.next_cursor.as_deref().map(|c| cursor_ref_slot_item(&outbox_url, c)).transpose()?;
        let items: Vec<SlotItem> = page.items.into_iter().map(activity_to_slot_item).collect();

        let collection = new_ordered_collection_page(items, None, next, prev)?;
        let doc = collection.entity().serialize_default(false).await?;
        Ok(Response::json(200, ACTIVITYSTREAMS_CONTENT_TYPE, &doc))
    }
}

fn activity_to_slot_item(activity: VocabActivity) -> SlotItem {
    SlotItem::Entity(Box::new(activity.into_entity()))
}

/// Cursor strings are URL-encoded when embedded in link URLs.
fn cursor_ref_slot_item(outbox_url: &str, cursor: &str) -> Result<SlotItem, FedikitError> {
    let encoded: String = url::form_urlencoded::byte_serialize(cursor.as_bytes()).collect();
    let uri = crate::scalars::Uri::parse(&format!("{outbox_url}?cursor={encoded}"))?;
    Ok(SlotItem::Ref(EntityRef::new(uri)))
}

fn webfinger_link_for(item: &SlotItem) -> JrdLink {
    match item {
        SlotItem::Entity(entity) if entity.type_uri() == crate::vocab::link::LINK_TYPE => {
            let link = crate::vocab::VocabLink::from_entity((**entity).clone());
            let href = link.href().map(|u| u.to_string()).unwrap_or_default();
            let rel = entity
                .get_singular_str("rel")
                .map(|s| s.to_string())
                .unwrap_or_else(|| "http://webfinger.net/rel/profile-page".to_string());
            let mut out = JrdLink::new(rel).href(href);
            if let Some(media_type) = entity.get_singular("media_type") {
                if let SlotItem::Scalar(crate::scalars::Scalar::MediaType(m)) = media_type {
                    out = out.media_type(m.to_string());
                }
            }
            out
        }
        SlotItem::Scalar(crate::scalars::Scalar::Uri(u)) => {
            JrdLink::new("http://webfinger.net/rel/profile-page").media_type("application/activity+json").href(u.to_string())
        }
        SlotItem::Ref(r) => {
            JrdLink::new("http://webfinger.net/rel/profile-page").media_type("application/activity+json").href(r.uri().to_string())
        }
        _ => JrdLink::new("http://webfinger.net/rel/profile-page"),
    }
}

static ACCEPTABLE_TYPES: &[&str] = &["application/ld+json", "application/activity+json", "application/json"];

/// Acceptable if the `Accept` header is empty/absent, or lists any of the
/// JSON-LD-ish media types (substring match, ignoring `q` weights).
fn is_acceptable(scope: &Scope) -> bool {
    match scope.headers.get("accept") {
        None => true,
        Some(accept) if accept.trim().is_empty() => true,
        Some(accept) => {
            let accept = accept.to_ascii_lowercase();
            ACCEPTABLE_TYPES.iter().any(|t| accept.contains(t))
        }
    }
}

static ACCT_RESOURCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^acct:([^@]+)@(.+)$").unwrap());

/// `resource` must be `acct:<handle>@<host>` with the host compared
/// literally against the request's `Host`.
fn extract_acct_handle(resource: &str, host: &str) -> Option<String> {
    let caps = ACCT_RESOURCE_RE.captures(resource)?;
    if &caps[2] != host {
        return None;
    }
    Some(caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_abstraction::HeaderMap;

    fn scope_with_accept(accept: Option<&str>) -> Scope {
        let mut headers = HeaderMap::new();
        if let Some(a) = accept {
            headers.insert("Accept", a);
        }
        Scope {
            scheme: "http".to_string(),
            server: None,
            script_root: String::new(),
            method: "GET".to_string(),
            path_info: "/actors/alice".to_string(),
            query_string: String::new(),
            headers,
            client_addr: None,
        }
    }

    #[test]
    fn empty_or_absent_accept_is_acceptable() {
        assert!(is_acceptable(&scope_with_accept(None)));
        assert!(is_acceptable(&scope_with_accept(Some(""))));
    }

    #[test]
    fn jsonld_family_accept_headers_are_acceptable() {
        assert!(is_acceptable(&scope_with_accept(Some("application/activity+json"))));
        assert!(is_acceptable(&scope_with_accept(Some("text/html, application/ld+json;q=0.9"))));
    }

    #[test]
    fn unrelated_accept_header_is_not_acceptable() {
        assert!(!is_acceptable(&scope_with_accept(Some("text/html"))));
    }

    #[test]
    fn extracts_handle_only_when_host_matches_literally() {
        assert_eq!(extract_acct_handle("acct:alice@fedikit.test", "fedikit.test").as_deref(), Some("alice"));
        assert_eq!(extract_acct_handle("acct:alice@other.host", "fedikit.test"), None);
        assert_eq!(extract_acct_handle("http://fedikit.test/actors/alice", "fedikit.test"), None);
    }
}

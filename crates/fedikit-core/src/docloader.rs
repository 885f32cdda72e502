//! Remote document loader contract.
//!
//! A pluggable fetcher returning `(content-type, context-url, final-url,
//! json)`. The core never performs I/O itself — it is handed a
//! [`DocumentLoader`] implementation by the host application, the same
//! way an async capability is handed to a caller that invokes it rather
//! than owning it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FedikitError;
use crate::scalars::Uri;

/// The result of successfully loading a remote JSON-LD document.
#[derive(Debug, Clone)]
pub struct RemoteDocument {
    /// The `Content-Type` response header, e.g. `application/activity+json`.
    pub content_type: String,
    /// The `Link: rel="http://www.w3.org/ns/json-ld#context"` target, if any.
    pub context_url: Option<String>,
    /// The final URL after following redirects — used as the document base.
    pub url: String,
    /// The parsed JSON body.
    pub document: Value,
}

/// A pluggable fetcher for remote JSON-LD documents (and, by the same
/// contract, remote JSON-LD context documents).
///
/// Implementations are expected to set an `Accept` header preferring
/// `application/ld+json` and to follow redirects.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Fetch `url`. Returns `Ok(None)` for a definitive "not found"; `Err`
    /// for any other failure (network error, non-2xx, malformed JSON).
    async fn load(&self, url: &Uri) -> Result<Option<RemoteDocument>, FedikitError>;
}

/// An in-memory loader backed by a fixed map, for tests and for host
/// applications that serve a closed set of known contexts.
#[derive(Debug, Default, Clone)]
pub struct StaticLoader {
    documents: std::collections::HashMap<String, RemoteDocument>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: impl Into<String>, document: RemoteDocument) -> Self {
        self.documents.insert(url.into(), document);
        self
    }
}

#[async_trait]
impl DocumentLoader for StaticLoader {
    async fn load(&self, url: &Uri) -> Result<Option<RemoteDocument>, FedikitError> {
        Ok(self.documents.get(url.as_str()).cloned())
    }
}

/// A loader that never resolves anything, for entity trees that are known
/// to contain no remote references.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLoader;

#[async_trait]
impl DocumentLoader for NullLoader {
    async fn load(&self, _url: &Uri) -> Result<Option<RemoteDocument>, FedikitError> {
        Ok(None)
    }
}

#[cfg(feature = "reqwest-loader")]
pub use reqwest_loader::ReqwestLoader;

#[cfg(feature = "reqwest-loader")]
mod reqwest_loader {
    use super::*;

    /// A [`DocumentLoader`] backed by `reqwest`, preferring
    /// `application/ld+json` and following redirects by default (the
    /// `reqwest::Client` default policy).
    #[derive(Debug, Clone)]
    pub struct ReqwestLoader {
        client: reqwest::Client,
    }

    impl Default for ReqwestLoader {
        fn default() -> Self {
            ReqwestLoader { client: reqwest::Client::new() }
        }
    }

    #[async_trait]
    impl DocumentLoader for ReqwestLoader {
        async fn load(&self, url: &Uri) -> Result<Option<RemoteDocument>, FedikitError> {
            let resp = self
                .client
                .get(url.as_str())
                .header("Accept", "application/ld+json, application/activity+json, application/json")
                .send()
                .await
                .map_err(|e| FedikitError::LoadFailure {
                    uri: url.to_string(),
                    reason: e.to_string(),
                })?;

            if resp.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !resp.status().is_success() {
                return Err(FedikitError::LoadFailure {
                    uri: url.to_string(),
                    reason: format!("status {}", resp.status()),
                });
            }

            let content_type = resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/ld+json")
                .to_string();
            let context_url = resp
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_context_link);
            let final_url = resp.url().to_string();

            let document: Value = resp.json().await.map_err(|e| FedikitError::LoadFailure {
                uri: url.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

            Ok(Some(RemoteDocument { content_type, context_url, url: final_url, document }))
        }
    }

    fn parse_context_link(header: &str) -> Option<String> {
        header.split(',').find_map(|part| {
            let part = part.trim();
            if !part.contains("rel=\"http://www.w3.org/ns/json-ld#context\"") {
                return None;
            }
            let start = part.find('<')?;
            let end = part.find('>')?;
            Some(part[start + 1..end].to_string())
        })
    }
}

//! Federation binding configuration.
//!
//! A small builder consumed by
//! [`RequestAdapter::new`](super::request::RequestAdapter::new), so the
//! scheme/host/script-root derivation that would otherwise be inlined
//! per-call lives in one state-struct-plus-builder type instead.

/// How a [`RequestAdapter`](super::request::RequestAdapter) derives the
/// externally-visible scheme, host, and script root used for URL building.
#[derive(Debug, Clone)]
pub struct FederationConfig {
    /// Default scheme used when a request's `Decode` step cannot infer one
    /// (always known for a real transport; exists for test harnesses that
    /// construct a [`Scope`](crate::http_abstraction::Scope) directly).
    pub default_scheme: String,
    /// Fallback host used when neither the `Host` header nor the bound
    /// server address is present.
    pub default_host: Option<String>,
    /// The script root (mount prefix) this server is served under, e.g.
    /// `/fedi` when mounted under a larger application. Empty by default.
    pub script_root: String,
}

impl Default for FederationConfig {
    fn default() -> Self {
        FederationConfig { default_scheme: "https".to_string(), default_host: None, script_root: String::new() }
    }
}

impl FederationConfig {
    pub fn builder() -> FederationConfigBuilder {
        FederationConfigBuilder::default()
    }
}

/// Builder for [`FederationConfig`].
#[derive(Debug, Clone, Default)]
pub struct FederationConfigBuilder {
    inner: FederationConfig,
}

impl FederationConfigBuilder {
    pub fn default_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.inner.default_scheme = scheme.into();
        self
    }

    pub fn default_host(mut self, host: impl Into<String>) -> Self {
        self.inner.default_host = Some(host.into());
        self
    }

    pub fn script_root(mut self, root: impl Into<String>) -> Self {
        self.inner.script_root = root.into();
        self
    }

    pub fn build(self) -> FederationConfig {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_https_with_no_script_root() {
        let cfg = FederationConfig::default();
        assert_eq!(cfg.default_scheme, "https");
        assert_eq!(cfg.script_root, "");
        assert!(cfg.default_host.is_none());
    }

    #[test]
    fn builder_overrides_defaults() {
        let cfg = FederationConfig::builder().default_scheme("http").script_root("/fedi").build();
        assert_eq!(cfg.default_scheme, "http");
        assert_eq!(cfg.script_root, "/fedi");
    }
}

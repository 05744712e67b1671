//! Asynchronous AppSec client.
//!
//! [`AppsecClient`] is a thin handle over the shared session; the operations
//! themselves live in the per-resource modules of this crate.

use crate::Result;
use appsec_core::config::ClientConfig;
use appsec_core::session::{Session, SessionBuilder};
use url::Url;

const USER_AGENT: &str = concat!("appsec-client/", env!("CARGO_PKG_VERSION"));

/// Builder for [`AppsecClient`].
#[derive(Debug, Clone)]
pub struct AppsecClientBuilder {
    inner: SessionBuilder,
}

impl AppsecClientBuilder {
    /// Create a builder for the specified base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let inner = SessionBuilder::new(base_url).with_user_agent(USER_AGENT);
        Self { inner }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    /// Configure a bearer token applied to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, password);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AppsecClient> {
        let session = self.inner.build()?;
        Ok(AppsecClient { session })
    }
}

/// Asynchronous client for the Application Security API.
///
/// Cloning is cheap; clones share the underlying connection pool. Calls are
/// independent and stateless, so concurrent use needs no coordination.
#[derive(Debug, Clone)]
pub struct AppsecClient {
    pub(crate) session: Session,
}

impl AppsecClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        AppsecClientBuilder::new(base_url).build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.session.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appsec_core::Error;

    #[test]
    fn client_from_base_url() {
        let client = AppsecClient::new("https://akaa-host.luna.akamaiapis.net").unwrap();
        assert_eq!(client.base_url().host_str(), Some("akaa-host.luna.akamaiapis.net"));
    }

    #[test]
    fn builder_rejects_invalid_base_url() {
        let err = AppsecClientBuilder::new("::not-a-url::").build().unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn builder_accepts_credentials() {
        AppsecClientBuilder::new("https://akaa-host.luna.akamaiapis.net")
            .with_token("token")
            .build()
            .unwrap();

        AppsecClientBuilder::new("https://akaa-host.luna.akamaiapis.net")
            .with_basic_auth("user", "pass")
            .build()
            .unwrap();
    }
}

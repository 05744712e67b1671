//! Shared session and generic request executor.
//!
//! Every resource operation funnels through [`Session::execute`]: build the
//! URL, apply credentials and standard headers, send the request, check the
//! status code against the endpoint's accept list, and either deserialize
//! the typed response or translate the body into an [`ApiError`].

use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Credentials applied to every outgoing request.
///
/// EdgeGrid request signing is handled by an external transport layer; the
/// session itself supports plain bearer tokens and HTTP basic auth.
#[derive(Debug, Clone)]
enum Credentials {
    Bearer(SecretString),
    Basic {
        username: String,
        password: SecretString,
    },
}

/// Builder for [`Session`].
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    base_url: String,
    config: ClientConfig,
    user_agent: String,
    credentials: Option<Credentials>,
}

impl SessionBuilder {
    /// Create a builder for the specified base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            config: ClientConfig::default(),
            user_agent: concat!("appsec-core/", env!("CARGO_PKG_VERSION")).to_string(),
            credentials: None,
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Configure a bearer token applied to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(SecretString::from(token.into())));
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        });
        self
    }

    /// Build the session.
    pub fn build(self) -> Result<Session> {
        let mut base_url = Url::parse(&self.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .pool_idle_timeout(self.config.pool_idle_timeout)
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .gzip(self.config.enable_compression)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|err| Error::Config(err.to_string()))?;

        Ok(Session {
            http,
            base_url,
            credentials: self.credentials,
        })
    }
}

/// Shared HTTP session.
///
/// Cheap to clone; carries no mutable state, so concurrent calls need no
/// coordination.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl Session {
    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute a request and deserialize the typed response.
    ///
    /// A status outside `accepted` is translated into [`Error::Api`] with
    /// the problem-detail body; network failures are wrapped and returned
    /// without retry. An empty success body (204 deletes) deserializes as an
    /// empty object.
    pub async fn execute<B, R>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
        accepted: &[StatusCode],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        debug!(method = %method, path, "executing request");

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        request = match &self.credentials {
            Some(Credentials::Bearer(token)) => request.bearer_auth(token.expose_secret()),
            Some(Credentials::Basic { username, password }) => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
            None => request,
        };

        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(Error::from)?;
        let status = response.status();

        if !accepted.contains(&status) {
            let error = match response.text().await {
                Ok(text) => ApiError::from_response(status, &text),
                Err(err) => ApiError::from_unreadable_body(status, &err.to_string()),
            };
            debug!(status = status.as_u16(), "request rejected");
            return Err(Error::Api(error));
        }

        let bytes = response.bytes().await.map_err(Error::from)?;
        if bytes.is_empty() {
            return serde_json::from_slice(b"{}").map_err(Error::from);
        }
        serde_json::from_slice(&bytes).map_err(Error::from)
    }
}

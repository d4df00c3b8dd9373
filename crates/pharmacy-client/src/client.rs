//! HTTP plumbing shared by every endpoint module.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the storefront REST backend.
///
/// Cheap to clone: the underlying connection pool is shared. The bearer
/// token is per clone, see [`ApiClient::with_token`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

/// `{ "message": "..." }` replies (delete, cancel, password flows).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

impl ApiClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client fails
    /// to build.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pharmacy-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Returns a clone that sends `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(SecretString::from(token.into())),
        }
    }

    /// Returns a clone without a token.
    #[must_use]
    pub fn anonymous(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Request without credentials.
    pub(crate) fn public(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Request that requires a signed-in user.
    pub(crate) fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.token.as_ref().ok_or(ClientError::MissingToken)?;
        Ok(self
            .http
            .request(method, self.url(path)?)
            .bearer_auth(token.expose_secret()))
    }

    /// Sends and decodes a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = Self::check(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Unexpected response body");
            ClientError::Decode(e.to_string())
        })
    }

    /// Sends and returns the raw body bytes.
    pub(crate) async fn send_bytes(&self, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Turns a non-success status into a [`ClientError`].
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &body);
        error!(status = status.as_u16(), error = %err, "Backend request failed");
        Err(err)
    }
}

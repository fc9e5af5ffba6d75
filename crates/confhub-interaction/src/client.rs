//! HTTP client for the configuration backend.
//!
//! Every request goes through [`ApiClient::send`], which attaches the bearer
//! credential when one is installed and hands every failure to the installed
//! [`ResponseInterceptor`] before returning it to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use confhub_core::{ConfhubError, Result};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

/// Process-wide default authorization credential.
///
/// Clones share the same slot, so installing a token through one handle
/// affects every client built from it.
#[derive(Clone, Default)]
pub struct CredentialSlot {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn install(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Removes the credential; returns whether one was installed.
    pub async fn clear(&self) -> bool {
        self.token.write().await.take().is_some()
    }

    pub async fn is_installed(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn header_value(&self) -> Option<HeaderValue> {
        let token = self.token.read().await;
        let token = token.as_deref()?;
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(_) => {
                tracing::warn!("installed token is not a valid header value; sending without it");
                None
            }
        }
    }
}

/// Hook run on every failed call, before the error reaches the caller.
///
/// Implementations must not issue requests through the client that invoked
/// them.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn on_error(&self, error: &ConfhubError);
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the configuration backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    credential: CredentialSlot,
    interceptor: Option<Arc<dyn ResponseInterceptor>>,
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ConfhubError::config(format!("invalid API URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfhubError::config(format!(
                "API URL '{base_url}' cannot be used as a base"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfhubError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            credential: CredentialSlot::new(),
            interceptor: None,
        })
    }

    /// Installs the hook run on every failed call.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    /// A handle sharing this client's connection pool and credential slot,
    /// with no interceptor installed. Failures are only returned to the caller.
    pub fn without_interceptor(&self) -> Self {
        Self {
            interceptor: None,
            ..self.clone()
        }
    }

    /// Shared credential slot used by this client.
    pub fn credential(&self) -> &CredentialSlot {
        &self.credential
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an endpoint URL from path segments; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.endpoint(segments))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.send(self.request(Method::GET, segments)).await?;
        decode_json(response).await
    }

    pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(Method::POST, segments).json(body))
            .await?;
        decode_json(response).await
    }

    /// POSTs a JSON body and ignores whatever the server sends back.
    pub async fn post_json_discard<B>(&self, segments: &[&str], body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, segments).json(body))
            .await
            .map(|_| ())
    }

    pub async fn put_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.send(self.request(Method::PUT, segments)).await?;
        decode_json(response).await
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<()> {
        self.send(self.request(Method::DELETE, segments))
            .await
            .map(|_| ())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::POST, segments).multipart(form))
            .await?;
        decode_json(response).await
    }

    /// Sends a request, classifying and intercepting failures.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match self.credential.header_value().await {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };

        let error = match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(
                    url = %response.url(),
                    status = response.status().as_u16(),
                    "request succeeded"
                );
                return Ok(response);
            }
            Ok(response) => error_from_response(response).await,
            Err(err) if err.is_builder() => {
                ConfhubError::internal(format!("failed to build request: {err}"))
            }
            Err(err) => ConfhubError::network(err.to_string()),
        };

        tracing::warn!(status = ?error.status(), error = %error, "request failed");
        if let Some(interceptor) = &self.interceptor {
            interceptor.on_error(&error).await;
        }
        Err(error)
    }
}

async fn error_from_response(response: Response) -> ConfhubError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty());
    ConfhubError::from_status(status, message)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ConfhubError::network(format!("failed to read response body: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let api = client("http://localhost:8080/api");
        assert_eq!(
            api.endpoint(&["configs", "auth service", "dev", "history"]).as_str(),
            "http://localhost:8080/api/configs/auth%20service/dev/history"
        );

        let trailing = client("http://localhost:8080/api/");
        assert_eq!(
            trailing.endpoint(&["auth", "login"]).as_str(),
            "http://localhost:8080/api/auth/login"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new("mailto:ops@example.com", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_credential_slot_shared_between_clones() {
        let api = client("http://localhost:8080/api");
        let clone = api.clone();

        api.credential().install("tok").await;
        assert!(clone.credential().is_installed().await);

        assert!(clone.credential().clear().await);
        assert!(!api.credential().clear().await);
    }
}

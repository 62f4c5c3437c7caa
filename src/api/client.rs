use crate::types::{ClientError, ErrorBody, Result};
use parking_lot::RwLock;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client bound to one backend base address.
///
/// Cloning is cheap; clones share the connection pool and the auth header
/// slot, so setting or clearing the token affects every holder.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: Arc<RwLock<Option<HeaderValue>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.has_auth_header())
            .finish()
    }
}

impl ApiClient {
    /// Create a client with a default transport.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("study-assistant/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http_client(http, base_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            auth_header: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach `Authorization: Bearer <token>` to all subsequent calls.
    pub fn set_bearer_token(&self, token: &str) -> Result<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            ClientError::InvalidInput("access token contains invalid header characters".to_string())
        })?;
        value.set_sensitive(true);
        *self.auth_header.write() = Some(value);
        Ok(())
    }

    /// Remove the auth header from all subsequent calls.
    pub fn clear_auth_header(&self) {
        *self.auth_header.write() = None;
    }

    pub fn has_auth_header(&self) -> bool {
        self.auth_header.read().is_some()
    }

    /// Current header value, e.g. `Bearer abc`.
    pub fn auth_header(&self) -> Option<String> {
        self.auth_header
            .read()
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.auth_header.read().clone() {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .execute(Method::GET, path, self.request(Method::GET, path))
            .await?;
        decode(response, path).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body);
        let response = self.execute(Method::POST, path, req).await?;
        decode(response, path).await
    }

    /// POST a JSON body and ignore whatever the server answers on success.
    pub(crate) async fn post_json_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let req = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, req).await?;
        Ok(())
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .execute(Method::POST, path, self.request(Method::POST, path))
            .await?;
        decode(response, path).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T> {
        let req = self.request(Method::POST, path).multipart(form);
        let response = self.execute(Method::POST, path, req).await?;
        decode(response, path).await
    }

    async fn execute(&self, method: Method, path: &str, req: RequestBuilder) -> Result<Response> {
        debug!(%method, path, "Sending request");

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message())
            .unwrap_or_else(|| text.trim().to_string());

        warn!(%method, path, %status, "Request failed: {}", message);
        Err(ClientError::Http { status, message })
    }
}

async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::MalformedResponse(format!("{}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/api/sessions"),
            "http://localhost:8000/api/sessions"
        );
    }

    #[test]
    fn test_auth_header_is_shared_between_clones() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        let clone = client.clone();

        client.set_bearer_token("T").unwrap();
        assert_eq!(clone.auth_header().as_deref(), Some("Bearer T"));

        clone.clear_auth_header();
        assert!(!client.has_auth_header());
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert!(client.set_bearer_token("bad\ntoken").is_err());
        assert!(!client.has_auth_header());
    }

    #[tokio::test]
    async fn test_ids_are_encoded_as_one_path_segment() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sessions/..%2Fadmin/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/homework/a%20b"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                serde_json::json!({"detail": "Homework not found"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let messages = client.chat().list_messages("../admin").await.unwrap();
        assert!(messages.is_empty());

        let err = client.homework().get("a b").await.unwrap_err();
        assert_eq!(err.detail(), Some("Homework not found"));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        client.set_bearer_token("secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("authenticated: true"));
    }
}

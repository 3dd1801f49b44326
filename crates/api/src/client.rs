//! Typed HTTP client for the Voluum REST API.
//!
//! One logical request/response cycle with uniform error handling and
//! bounded retry. The client is constructed once per CLI invocation and
//! holds no mutable state; the auth token is read through the injected
//! [`TokenProvider`] on every attempt, so externally refreshed
//! credentials are picked up without reconstructing the client.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::{Value, json};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::endpoints::AUTH_HEADER_NAME;
use crate::error::ApiError;

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_INITIAL_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Ordered query mapping. `Null` entries are dropped at serialization
/// time; array values repeat the key once per non-null element.
pub type QueryParams = IndexMap<String, Value>;

/// Capability yielding the current auth token, consulted per request.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Error raised while assembling a [`VoluumClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Base URL is required.")]
    EmptyBaseUrl,
    #[error("invalid auth header name: {0}")]
    InvalidAuthHeaderName(String),
    #[error("failed to construct HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Per-request options for [`VoluumClient::request`].
///
/// Caller-supplied headers are merged case-insensitively; the client
/// only overrides `accept` and the auth header, and fills in
/// `content-type` when a body is present and none was given.
#[derive(Debug, Default)]
pub struct RequestOptions<'a> {
    pub query: Option<&'a QueryParams>,
    pub body: Option<&'a Value>,
    pub headers: Option<HeaderMap>,
}

#[derive(Clone)]
pub struct VoluumClient {
    http: Client,
    base_url: String,
    auth_header_name: HeaderName,
    max_retries: u32,
    initial_retry_delay: Duration,
    token_provider: Arc<dyn TokenProvider>,
}

impl VoluumClient {
    /// Start building a client for `base_url` with the given token
    /// capability.
    pub fn builder<P>(base_url: impl Into<String>, token_provider: P) -> VoluumClientBuilder
    where
        P: TokenProvider + 'static,
    {
        VoluumClientBuilder {
            base_url: base_url.into(),
            token_provider: Arc::new(token_provider),
            auth_header_name: AUTH_HEADER_NAME.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_retry_delay: DEFAULT_INITIAL_RETRY_DELAY,
        }
    }

    pub async fn get(&self, path: &str, query: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.request(Method::GET, path, RequestOptions { query, ..Default::default() }).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        query: Option<&QueryParams>,
    ) -> Result<Value, ApiError> {
        self.request(Method::POST, path, RequestOptions { query, body, headers: None }).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        query: Option<&QueryParams>,
    ) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, RequestOptions { query, body, headers: None }).await
    }

    pub async fn delete(&self, path: &str, query: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, RequestOptions { query, ..Default::default() }).await
    }

    /// Run the full request/classify/retry cycle for one logical call.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions<'_>,
    ) -> Result<Value, ApiError> {
        let url = self.build_url(path, options.query)?;
        let mut attempt: u32 = 0;

        loop {
            match self.execute_once(&method, &url, &options).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if !self.should_retry(&error, attempt) {
                        return Err(error);
                    }

                    let wait = self
                        .initial_retry_delay
                        .saturating_mul(2u32.saturating_pow(attempt));
                    warn!(
                        %method,
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = wait.as_millis() as u64,
                        error = %error,
                        "retrying Voluum API request"
                    );
                    sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One network attempt: build headers, send, parse, classify.
    async fn execute_once(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions<'_>,
    ) -> Result<Value, ApiError> {
        let headers = self.build_headers(options.headers.as_ref(), options.body.is_some())?;

        let mut builder = self.http.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = options.body {
            let encoded = serde_json::to_vec(body).map_err(ApiError::network)?;
            builder = builder.body(encoded);
        }

        debug!(%method, url = %url, "sending Voluum API request");
        let response = builder.send().await.map_err(ApiError::network)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::network)?;
        debug!(%method, url = %url, %status, body_len = text.len(), "received Voluum API response");

        let payload = parse_payload(status, &text);
        if status.is_success() {
            Ok(payload)
        } else {
            Err(ApiError::http(status.as_u16(), payload))
        }
    }

    /// Absolute `http(s)://` paths pass through untouched; everything
    /// else is joined onto the base URL with exactly one leading slash.
    fn build_url(&self, path: &str, query: Option<&QueryParams>) -> Result<Url, ApiError> {
        let target = if is_absolute_url(path) {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        let mut url = Url::parse(&target).map_err(ApiError::network)?;
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                match value {
                    Value::Null => {}
                    Value::Array(items) => {
                        for item in items {
                            if !item.is_null() {
                                pairs.append_pair(key, &query_value_string(item));
                            }
                        }
                    }
                    other => {
                        pairs.append_pair(key, &query_value_string(other));
                    }
                }
            }
        }

        Ok(url)
    }

    fn build_headers(
        &self,
        extra: Option<&HeaderMap>,
        has_body: bool,
    ) -> Result<HeaderMap, ApiError> {
        let mut headers = extra.cloned().unwrap_or_default();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if has_body && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = self.token_provider.token()
            && !token.is_empty()
        {
            let value = HeaderValue::from_str(&token).map_err(ApiError::network)?;
            headers.insert(self.auth_header_name.clone(), value);
        }

        Ok(headers)
    }

    /// Transient failures only: transport errors, 429, and 5xx, while
    /// retry budget remains. Other classified errors surface at once.
    fn should_retry(&self, error: &ApiError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        if error.is_network() {
            return true;
        }

        matches!(error.status, Some(status) if status == 429 || status >= 500)
    }
}

/// Builder for [`VoluumClient`].
pub struct VoluumClientBuilder {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    auth_header_name: String,
    max_retries: u32,
    initial_retry_delay: Duration,
}

impl VoluumClientBuilder {
    pub fn auth_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_header_name = name.into();
        self
    }

    /// Number of retries after the initial attempt (default 2).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn initial_retry_delay(mut self, delay: Duration) -> Self {
        self.initial_retry_delay = delay;
        self
    }

    pub fn build(self) -> Result<VoluumClient, ClientBuildError> {
        let base_url = self.base_url.trim().to_string();
        if base_url.is_empty() {
            return Err(ClientBuildError::EmptyBaseUrl);
        }

        let auth_header_name = HeaderName::from_bytes(self.auth_header_name.as_bytes())
            .map_err(|_| ClientBuildError::InvalidAuthHeaderName(self.auth_header_name.clone()))?;

        Ok(VoluumClient {
            http: Client::builder().build()?,
            base_url,
            auth_header_name,
            max_retries: self.max_retries,
            initial_retry_delay: self.initial_retry_delay,
            token_provider: self.token_provider,
        })
    }
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Parse a response body. `204`, empty, and whitespace-only bodies map
/// to `null`; anything else is parsed as JSON regardless of declared
/// content-type, falling back to `{"raw": <text>}` so a non-JSON
/// upstream body never crashes the client.
fn parse_payload(status: StatusCode, text: &str) -> Value {
    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        return Value::Null;
    }

    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

fn query_value_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

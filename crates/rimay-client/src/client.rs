use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use rimay_core::errors::ApiError;
use rimay_core::lang::Direction;
use rimay_core::source::{RemoteTranslation, RemoteTranslator};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ApiClient`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Overall deadline per request. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
        }
    }
}

/// HTTP client for the translation backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    connect_timeout: Duration,
    request_timeout: Option<Duration>,
}

#[derive(Serialize)]
struct TranslateBody<'a> {
    text: &'a str,
    src: &'a str,
    dest: &'a str,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base = config.base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(&format!("{base}/"))
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL {base:?}: {e}")))?;

        let mut builder = Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a backend path (leading slash optional) or an
    /// already-absolute URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidRequest(format!("invalid path {path:?}: {e}")))
    }

    pub(crate) fn get(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.get(self.endpoint(path)?))
    }

    pub(crate) fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.post(self.endpoint(path)?))
    }

    pub(crate) fn delete(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.delete_url(self.endpoint(path)?))
    }

    pub(crate) fn delete_url(&self, url: Url) -> RequestBuilder {
        self.client.delete(url)
    }

    /// Send a request and return the successful response.
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            debug!(status, "backend returned error status");
            return Err(ApiError::from_status(status, body));
        }
        Ok(resp)
    }

    /// Send a request and decode a JSON response body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request and return the raw body text.
    pub(crate) async fn send_text(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let resp = self.send(req).await?;
        resp.text().await.map_err(|e| self.transport_error(e))
    }

    /// Deadline reported when a request times out: the overall request
    /// timeout if set, otherwise the connect timeout.
    pub(crate) fn timeout_budget(&self) -> Duration {
        self.request_timeout.unwrap_or(self.connect_timeout)
    }

    pub(crate) fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_budget())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }

    /// `POST /translate`.
    #[instrument(skip(self, text), fields(direction = %direction))]
    pub async fn translate(
        &self,
        text: &str,
        direction: Direction,
    ) -> Result<RemoteTranslation, ApiError> {
        let body = TranslateBody {
            text,
            src: direction.source().code(),
            dest: direction.target().code(),
        };
        let req = self.post("/translate")?.json(&body);
        self.send_json(req).await
    }
}

#[async_trait]
impl RemoteTranslator for ApiClient {
    async fn translate_remote(
        &self,
        text: &str,
        direction: Direction,
    ) -> Result<RemoteTranslation, ApiError> {
        self.translate(text, direction).await
    }
}

//! The HTTP seam: one request out, one status and body back.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::Client;

use super::request::RequestDescriptor;
use crate::config::ClientConfig;
use crate::error::{BoxError, Error, Result};

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Response with the given status code and body text.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a single request without any retry.
///
/// `Err` means no HTTP response was obtained (connect failure, timeout, reset
/// while reading the body). Error statuses are returned as `Ok`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, BoxError>;
}

/// reqwest-backed transport holding the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Builds the reqwest client with auth headers and the configured timeouts.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| Error::Config("API key contains invalid header characters".into()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeouts = config.timeouts();
        let client = Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .timeout(timeouts.total)
            .connect_timeout(timeouts.effective_connect())
            .read_timeout(timeouts.sock_read)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, BoxError> {
        let url = self.config.url_for(&request.path);
        debug!("{} {}...", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("{} {} -> {}", request.method, url, status);
        Ok(RawResponse { status, body })
    }
}

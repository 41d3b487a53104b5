//! Client entry point: configuration resolution and transport lifecycle.

use std::time::Duration;

use log::debug;

use crate::config::{
    API_KEY_ENV, ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, RetryPolicy, Timeouts,
    mask_key,
};
use crate::env::{EnvSource, ProcessEnv, resolve_api_key};
use crate::error::{Error, Result};
use crate::http::{Executor, ReqwestTransport, Transport};
use crate::links::Links;

/// Async client for the go2.gg API.
///
/// The client owns its connection pool. Dropping it, or calling [`close`],
/// releases every connection; since drop also runs on early returns, panics
/// and cancelled futures, a client held in a local binding cannot leak
/// connections.
///
/// Calls may run concurrently from several tasks sharing one client.
///
/// [`close`]: Go2Client::close
#[derive(Debug)]
pub struct Go2Client<T = ReqwestTransport> {
    config: ClientConfig,
    executor: Executor<T>,
}

impl Go2Client {
    /// Starts a [`ClientBuilder`] with every setting at its default.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Client with an explicit API key and every other setting at its default.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Client authenticated from `GO2GG_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }
}

impl<T: Transport> Go2Client<T> {
    /// The resolved configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Links operations sharing this client's transport and retry policy.
    pub fn links(&self) -> Links<'_, T> {
        Links::new(&self.executor)
    }

    /// Releases the transport. Equivalent to dropping the client.
    pub fn close(self) {
        debug!("Closing client for {}", self.config.base_url());
    }
}

/// Builder for [`Go2Client`]. Every setting left unset takes its documented
/// default; setting one timeout never touches the other three.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_total: Option<Duration>,
    timeout_connect: Option<Duration>,
    timeout_sock_read: Option<Duration>,
    timeout_sock_connect: Option<Duration>,
    user_agent: Option<String>,
    retry_count: Option<u32>,
    retry_delay: Option<Duration>,
    retry_backoff: Option<bool>,
}

impl ClientBuilder {
    /// API key; falls back to `GO2GG_API_KEY` when not set.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// API root, e.g. `http://localhost:8080/api/v1`. A trailing `/` is
    /// dropped. Default [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Whole-request budget, per attempt. Default 30s.
    pub fn timeout_total(mut self, timeout: Duration) -> Self {
        self.timeout_total = Some(timeout);
        self
    }

    /// Connection establishment budget. Default 10s.
    pub fn timeout_connect(mut self, timeout: Duration) -> Self {
        self.timeout_connect = Some(timeout);
        self
    }

    /// Maximum gap between socket reads. Default 30s.
    pub fn timeout_sock_read(mut self, timeout: Duration) -> Self {
        self.timeout_sock_read = Some(timeout);
        self
    }

    /// Socket connect budget. Default 10s.
    pub fn timeout_sock_connect(mut self, timeout: Duration) -> Self {
        self.timeout_sock_connect = Some(timeout);
        self
    }

    /// Sets all four timeouts at once.
    pub fn timeouts(self, timeouts: Timeouts) -> Self {
        self.timeout_total(timeouts.total)
            .timeout_connect(timeouts.connect)
            .timeout_sock_read(timeouts.sock_read)
            .timeout_sock_connect(timeouts.sock_connect)
    }

    /// `User-Agent` header value. Default [`DEFAULT_USER_AGENT`].
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Retries after the first attempt. Default 0, i.e. no retries.
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Base wait between attempts. Default 500ms.
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }

    /// Double the wait after every attempt. Default off.
    pub fn retry_backoff(mut self, retry_backoff: bool) -> Self {
        self.retry_backoff = Some(retry_backoff);
        self
    }

    /// Resolves the configuration and opens the HTTP transport.
    pub fn build(self) -> Result<Go2Client> {
        let config = self.resolve(&ProcessEnv)?;
        let transport = ReqwestTransport::new(config.clone())?;
        Ok(Go2Client {
            executor: Executor::new(transport, config.retry),
            config,
        })
    }

    /// Like [`build`](Self::build) but sends through a caller-supplied
    /// transport. The configured timeouts are the transport's responsibility.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Go2Client<T>> {
        let config = self.resolve(&ProcessEnv)?;
        Ok(Go2Client {
            executor: Executor::new(transport, config.retry),
            config,
        })
    }

    pub(crate) fn resolve(self, env: &dyn EnvSource) -> Result<ClientConfig> {
        let api_key = resolve_api_key(self.api_key, env, API_KEY_ENV).ok_or_else(|| {
            Error::Config(format!(
                "API key is required. Provide api_key or set {} in the environment.",
                API_KEY_ENV
            ))
        })?;
        debug!("Using API key {}", mask_key(&api_key));

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(Error::Config("base_url is required".into()));
        }

        let defaults = Timeouts::default();
        let timeouts = Timeouts {
            total: self.timeout_total.unwrap_or(defaults.total),
            connect: self.timeout_connect.unwrap_or(defaults.connect),
            sock_read: self.timeout_sock_read.unwrap_or(defaults.sock_read),
            sock_connect: self.timeout_sock_connect.unwrap_or(defaults.sock_connect),
        };
        timeouts.validate().map_err(Error::Config)?;

        let default_retry = RetryPolicy::default();
        let retry = RetryPolicy {
            retry_count: self.retry_count.unwrap_or(default_retry.retry_count),
            retry_delay: self.retry_delay.unwrap_or(default_retry.retry_delay),
            retry_backoff: self.retry_backoff.unwrap_or(default_retry.retry_backoff),
        };

        Ok(ClientConfig {
            api_key,
            base_url,
            timeouts,
            retry,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}

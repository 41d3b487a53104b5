//! Retry/backoff loop around a [`Transport`].

use log::{debug, warn};
use serde_json::Value;

use super::request::RequestDescriptor;
use super::retry::{Attempt, classify};
use super::transport::Transport;
use crate::config::RetryPolicy;
use crate::error::Result;

/// Executes requests with the client's retry policy.
///
/// Retry state lives on the stack of each `execute` call, so one executor can
/// serve any number of concurrent calls. Dropping the returned future cancels
/// the call at once, whether it is waiting on the network or sleeping between
/// attempts; no further attempt is made.
#[derive(Debug)]
pub struct Executor<T> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> Executor<T> {
    /// Wraps `transport`; every call made through it follows `retry`.
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Sends `request`, retrying transient failures, and returns the decoded
    /// success payload.
    ///
    /// At most `retry_count + 1` attempts are made. Client errors are never
    /// retried.
    #[tracing::instrument(skip(self, request), fields(request = %request))]
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Value> {
        let max_attempts = self.retry.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            debug!("{}: attempt {}/{}", request, attempt + 1, max_attempts);

            let error = match classify(self.transport.send(request).await) {
                Attempt::Succeeded(payload) => return Ok(payload),
                Attempt::Failed(e) => {
                    debug!("{}: non-retryable error: {}", request, e);
                    return Err(e);
                }
                Attempt::Retryable(e) => e,
            };

            if attempt >= self.retry.retry_count {
                if self.retry.retry_count > 0 {
                    warn!("{}: giving up after {} attempts: {}", request, attempt + 1, error);
                }
                return Err(error);
            }

            let delay = self.retry.delay_for(attempt);
            warn!(
                "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                request,
                attempt + 1,
                max_attempts,
                error,
                delay.as_millis()
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}

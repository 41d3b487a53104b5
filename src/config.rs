//! Resolved client configuration: credentials, endpoint, timeouts and retry policy.

use std::fmt;
use std::time::Duration;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.go2.gg/api/v1";

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "GO2GG_API_KEY";

pub const DEFAULT_TIMEOUT_TOTAL: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT_CONNECT: Duration = Duration::from_secs(10);
pub const DEFAULT_TIMEOUT_SOCK_READ: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT_SOCK_CONNECT: Duration = Duration::from_secs(10);

/// Base wait between retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

pub const DEFAULT_USER_AGENT: &str = concat!("go2gg-rust/", env!("CARGO_PKG_VERSION"));

/// Per-attempt timeout budgets.
///
/// Every HTTP attempt, including each retry, starts with the full budget; there
/// is no deadline shared across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole request, from connect to the last byte of the body.
    pub total: Duration,
    /// Establishing a connection.
    pub connect: Duration,
    /// Gap between two reads on the socket.
    pub sock_read: Duration,
    /// Socket-level connect.
    pub sock_connect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            total: DEFAULT_TIMEOUT_TOTAL,
            connect: DEFAULT_TIMEOUT_CONNECT,
            sock_read: DEFAULT_TIMEOUT_SOCK_READ,
            sock_connect: DEFAULT_TIMEOUT_SOCK_CONNECT,
        }
    }
}

impl Timeouts {
    /// The transport has a single connect timer, so the tighter of the two
    /// connect budgets wins.
    pub fn effective_connect(&self) -> Duration {
        self.connect.min(self.sock_connect)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("total", self.total),
            ("connect", self.connect),
            ("sock_read", self.sock_read),
            ("sock_connect", self.sock_connect),
        ] {
            if value.is_zero() {
                return Err(format!("timeout_{} must be greater than zero", name));
            }
        }
        Ok(())
    }
}

/// How transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retries.
    pub retry_count: u32,
    pub retry_delay: Duration,
    /// Double the delay after every attempt instead of keeping it flat.
    pub retry_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            retry_backoff: false,
        }
    }
}

impl RetryPolicy {
    /// Upper bound on HTTP attempts for one call.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }

    /// Wait before the retry that follows zero-based `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if !self.retry_backoff {
            return self.retry_delay;
        }
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.retry_delay.saturating_mul(factor)
    }
}

/// Immutable configuration of a [`crate::Go2Client`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeouts: Timeouts,
    pub(crate) retry: RetryPolicy,
    pub(crate) user_agent: String,
}

impl ClientConfig {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &mask_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Keeps only the last four characters of a credential.
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("*********{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let t = Timeouts::default();
        assert_eq!(t.total, Duration::from_secs(30));
        assert_eq!(t.connect, Duration::from_secs(10));
        assert_eq!(t.sock_read, Duration::from_secs(30));
        assert_eq!(t.sock_connect, Duration::from_secs(10));
    }

    #[test]
    fn test_effective_connect_takes_smaller() {
        let t = Timeouts {
            connect: Duration::from_secs(1),
            sock_connect: Duration::from_secs(3),
            ..Timeouts::default()
        };
        assert_eq!(t.effective_connect(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let t = Timeouts {
            sock_read: Duration::ZERO,
            ..Timeouts::default()
        };
        let err = t.validate().unwrap_err();
        assert!(err.contains("timeout_sock_read"));
        assert!(Timeouts::default().validate().is_ok());
    }

    #[test]
    fn test_retry_policy_defaults() {
        let p = RetryPolicy::default();
        assert_eq!(p.retry_count, 0);
        assert_eq!(p.retry_delay, Duration::from_millis(500));
        assert!(!p.retry_backoff);
        assert_eq!(p.max_attempts(), 1);
    }

    #[test]
    fn test_linear_delay_is_flat() {
        let p = RetryPolicy {
            retry_count: 3,
            ..RetryPolicy::default()
        };
        assert_eq!(p.delay_for(0), Duration::from_millis(500));
        assert_eq!(p.delay_for(2), Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let p = RetryPolicy {
            retry_count: 2,
            retry_delay: Duration::from_millis(500),
            retry_backoff: true,
        };
        assert_eq!(p.delay_for(0), Duration::from_millis(500));
        assert_eq!(p.delay_for(1), Duration::from_secs(1));
        assert_eq!(p.delay_for(2), Duration::from_secs(2));
        assert!(p.delay_for(0) < p.delay_for(1));
    }

    #[test]
    fn test_backoff_delay_saturates() {
        let p = RetryPolicy {
            retry_count: u32::MAX,
            retry_delay: Duration::from_secs(1),
            retry_backoff: true,
        };
        assert_eq!(p.max_attempts(), u32::MAX);
        // No overflow panic on absurd attempt numbers.
        let _ = p.delay_for(200);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk_live_abcdef1234"), "*********1234");
        assert_eq!(mask_key("abc"), "***");
    }

    #[test]
    fn test_url_for_joins_single_slash() {
        let config = ClientConfig {
            api_key: "k".into(),
            base_url: "https://api.go2.gg/api/v1".into(),
            timeouts: Timeouts::default(),
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.into(),
        };
        assert_eq!(config.url_for("/links"), "https://api.go2.gg/api/v1/links");
        assert_eq!(config.url_for("links/1"), "https://api.go2.gg/api/v1/links/1");
        assert!(!format!("{:?}", config).contains("api_key: \"k\""));
    }
}

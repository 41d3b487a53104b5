//! Environment lookups used when resolving credentials.

use std::env;

#[cfg_attr(test, mockall::automock)]
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Result<String, env::VarError>;
}

/// Reads from the process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    #[tracing::instrument(skip(self))]
    fn var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

/// Picks the explicit key when it is non-empty, else the named environment variable.
pub(crate) fn resolve_api_key(
    explicit: Option<String>,
    env: &dyn EnvSource,
    var_name: &str,
) -> Option<String> {
    explicit
        .filter(|key| !key.is_empty())
        .or_else(|| env.var(var_name).ok().filter(|key| !key.is_empty()))
}

use std::env::VarError;

use crate::runtime::Runtime;

/// What a caller hands to the toolkit on each invocation.
#[cfg_attr(test, mockall::automock)]
pub trait ToolContext: Send + Sync {
    /// Delegated OAuth access token; empty when the user has not authorized.
    fn oauth_token(&self) -> String;

    /// Looks up a process environment variable.
    fn env_var(&self, key: &str) -> Result<String, VarError>;
}

/// Context backed by a [`Runtime`] for environment access and an optional
/// OAuth token supplied by the caller.
pub struct RuntimeContext<R: Runtime> {
    runtime: R,
    oauth_token: Option<String>,
}

impl<R: Runtime> RuntimeContext<R> {
    pub fn new(runtime: R, oauth_token: Option<String>) -> Self {
        Self {
            runtime,
            oauth_token,
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

impl<R: Runtime> ToolContext for RuntimeContext<R> {
    fn oauth_token(&self) -> String {
        self.oauth_token.clone().unwrap_or_default()
    }

    fn env_var(&self, key: &str) -> Result<String, VarError> {
        self.runtime.env_var(key)
    }
}

//! Credential resolution.
//!
//! A [`CredentialResolver`] walks an ordered chain of [`CredentialSource`]s and
//! returns the first non-empty credential. The default chain puts the delegated
//! OAuth token ahead of the static `TODOIST_API_TOKEN` secret:
//!
//! - `credential` - the opaque token type and the missing-credential error
//! - `context` - the caller-supplied [`ToolContext`]
//! - `source` - the OAuth and environment sources

mod context;
mod credential;
mod source;

use log::debug;

pub use context::{RuntimeContext, ToolContext};
pub use credential::{Credential, CredentialMissing};
pub use source::{CredentialSource, OAuthSource, StaticEnvSource};

#[cfg(test)]
pub use context::MockToolContext;

/// Environment variable holding the static fallback credential.
pub const STATIC_TOKEN_VAR: &str = "TODOIST_API_TOKEN";

/// Ordered fallback over credential sources.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    /// Builds a resolver that tries `sources` in order.
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Names of the configured sources, in precedence order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the first credential any source provides.
    ///
    /// A present OAuth token is never second-guessed: if it is rejected by the
    /// server, the failure surfaces as an HTTP error rather than a silent retry
    /// with the static secret.
    #[tracing::instrument(skip(self, ctx))]
    pub fn resolve(&self, ctx: &dyn ToolContext) -> Result<Credential, CredentialMissing> {
        for source in &self.sources {
            if let Some(credential) = source.lookup(ctx) {
                debug!("Using {} credential {:?}", source.name(), credential);
                return Ok(credential);
            }
            debug!("No credential from {} source", source.name());
        }
        Err(CredentialMissing::new())
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(vec![
            Box::new(OAuthSource),
            Box::new(StaticEnvSource::new(STATIC_TOKEN_VAR)),
        ])
    }
}

/// Resolves a credential with the default OAuth-then-static precedence.
pub fn resolve(ctx: &dyn ToolContext) -> Result<Credential, CredentialMissing> {
    CredentialResolver::default().resolve(ctx)
}

use super::{Credential, ToolContext};

/// One place a credential may come from.
pub trait CredentialSource: Send + Sync {
    /// Label used in diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the credential if this source has a non-empty one.
    fn lookup(&self, ctx: &dyn ToolContext) -> Option<Credential>;
}

/// Delegated OAuth token carried by the context.
#[derive(Debug, Default, Clone, Copy)]
pub struct OAuthSource;

impl CredentialSource for OAuthSource {
    fn name(&self) -> &'static str {
        "oauth"
    }

    fn lookup(&self, ctx: &dyn ToolContext) -> Option<Credential> {
        Credential::new(ctx.oauth_token())
    }
}

/// Static secret read from a named environment variable.
#[derive(Debug, Clone)]
pub struct StaticEnvSource {
    var: String,
}

impl StaticEnvSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialSource for StaticEnvSource {
    fn name(&self) -> &'static str {
        "static-env"
    }

    fn lookup(&self, ctx: &dyn ToolContext) -> Option<Credential> {
        ctx.env_var(&self.var).ok().and_then(Credential::new)
    }
}

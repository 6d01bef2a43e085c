//! The Todoist tools exposed to an agent.
//!
//! Each operation resolves a credential from the [`ToolContext`], builds a
//! fresh [`TodoistClient`], performs one request and shapes the result for the
//! caller. Errors keep their [`ApiError`](crate::http::ApiError) or
//! [`CredentialMissing`](crate::auth::CredentialMissing) cause so callers can
//! downcast them.

mod format;
mod projects;
mod tasks;

use anyhow::{Context, Result};

use crate::auth::{CredentialResolver, ToolContext};
use crate::http::{ClientConfig, TodoistClient};

pub use format::{format_projects, format_tasks};
pub use tasks::{NewTask, TaskFilter};

/// Tool set bound to a caller context and an API endpoint.
pub struct Toolkit<C: ToolContext> {
    ctx: C,
    config: ClientConfig,
    resolver: CredentialResolver,
}

impl<C: ToolContext> Toolkit<C> {
    pub fn new(ctx: C, config: ClientConfig) -> Self {
        Self::with_resolver(ctx, config, CredentialResolver::default())
    }

    pub fn with_resolver(ctx: C, config: ClientConfig, resolver: CredentialResolver) -> Self {
        Self {
            ctx,
            config,
            resolver,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolves the credential for this call and binds a new client to it.
    fn client(&self) -> Result<TodoistClient> {
        let credential = self.resolver.resolve(&self.ctx)?;
        let client = TodoistClient::new(&self.config, &credential)
            .context("Failed to build Todoist client")?;
        Ok(client)
    }
}

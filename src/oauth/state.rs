use log::debug;
use std::path::{Path, PathBuf};

use super::OAuthError;
use crate::runtime::Runtime;

/// Default location of the persisted state, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = ".todoist_oauth_state";

pub const STATE_PATH_VAR: &str = "TODOIST_OAUTH_STATE_PATH";

/// File-backed store for the pending OAuth `state` value.
pub struct StateStore<R: Runtime> {
    runtime: R,
    path: PathBuf,
}

impl<R: Runtime> StateStore<R> {
    pub fn new(runtime: R, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            path: path.into(),
        }
    }

    /// Uses `TODOIST_OAUTH_STATE_PATH`, falling back to [`DEFAULT_STATE_PATH`].
    pub fn from_env(runtime: R) -> Self {
        let path = runtime
            .env_var(STATE_PATH_VAR)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_STATE_PATH.to_string());
        Self::new(runtime, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persist(&self, state: &str) -> Result<(), OAuthError> {
        debug!("Persisting OAuth state to {:?}", self.path);
        self.runtime
            .write(&self.path, state.as_bytes())
            .map_err(OAuthError::State)
    }

    /// Returns the stored state, or `None` if nothing has been persisted.
    pub fn read(&self) -> Result<Option<String>, OAuthError> {
        let contents = self
            .runtime
            .read_to_string(&self.path)
            .map_err(OAuthError::State)?;
        Ok(contents.map(|s| s.trim().to_string()))
    }

    /// Checks a state value returned by the redirect against the stored one.
    pub fn verify(&self, state: &str) -> Result<bool, OAuthError> {
        Ok(self.read()?.is_some_and(|stored| stored == state.trim()))
    }

    pub fn clear(&self) -> Result<(), OAuthError> {
        self.runtime
            .remove_file(&self.path)
            .map_err(OAuthError::State)
    }
}

use std::fmt;
use thiserror::Error;

use super::STATIC_TOKEN_VAR;

/// Opaque bearer token presented on every request.
///
/// The value is immutable once resolved. `Debug` masks it so it can be logged
/// safely; [`Credential::expose`] is the only way to read it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a token, returning `None` for an empty string.
    ///
    /// Only emptiness counts as absence. An invalid token is still a credential
    /// and fails later with an HTTP 401.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short masked form such as `abcd****wxyz` for diagnostics.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

/// Neither an OAuth token nor the static secret was available.
#[derive(Debug, Clone, Error)]
#[error("{remediation}")]
pub struct CredentialMissing {
    /// Machine-readable reason, stable for programmatic handling.
    pub code: &'static str,
    /// Operator-facing instructions.
    pub remediation: String,
}

impl CredentialMissing {
    pub const CODE: &'static str = "missing_credentials";

    pub fn new() -> Self {
        Self {
            code: Self::CODE,
            remediation: format!(
                "No Todoist credentials found. Set {} for local use, \
                 or complete OAuth authorization when running remotely.",
                STATIC_TOKEN_VAR
            ),
        }
    }
}

impl Default for CredentialMissing {
    fn default() -> Self {
        Self::new()
    }
}

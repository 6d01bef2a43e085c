//! Todoist OAuth authorization helpers.
//!
//! Builds the URL a user visits to grant access and manages the CSRF `state`
//! value that must round-trip through the redirect. Token exchange and refresh
//! belong to the external OAuth provider.

mod state;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use log::debug;
use rand::RngCore;
use thiserror::Error;
use url::Url;

use crate::runtime::Runtime;

pub use state::{DEFAULT_STATE_PATH, StateStore};

pub const AUTHORIZE_URL: &str = "https://todoist.com/oauth/authorize";

pub const DEFAULT_SCOPES: &[&str] = &["data:read_write"];

pub const CLIENT_ID_VAR: &str = "TODOIST_CLIENT_ID";
pub const REDIRECT_URI_VAR: &str = "TODOIST_REDIRECT_URI";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("TODOIST_CLIENT_ID is not set; register an app in the Todoist App Console first")]
    MissingClientId,

    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("OAuth state storage failed: {0:#}")]
    State(anyhow::Error),
}

/// Random URL-safe value for the `state` parameter (32 bytes of entropy).
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Builds the authorization URL. `redirect_uri` is omitted when `None`, in
/// which case Todoist uses the redirect configured for the app.
pub fn build_authorize_url(
    client_id: &str,
    redirect_uri: Option<&str>,
    scopes: &[&str],
    state: &str,
) -> Result<String, OAuthError> {
    let scope = scopes.join(" ");
    let mut params = vec![
        ("client_id", client_id),
        ("scope", scope.as_str()),
        ("state", state),
    ];
    if let Some(redirect_uri) = redirect_uri {
        params.push(("redirect_uri", redirect_uri));
    }

    let url = Url::parse_with_params(AUTHORIZE_URL, &params)?;
    Ok(url.into())
}

/// Builds an authorization URL from `TODOIST_CLIENT_ID` and the optional
/// `TODOIST_REDIRECT_URI`, returning it with the freshly generated state.
#[tracing::instrument(skip(runtime))]
pub fn authorize_url_from_env<R: Runtime>(
    runtime: &R,
    scopes: Option<&[&str]>,
) -> Result<(String, String), OAuthError> {
    let client_id = runtime
        .env_var(CLIENT_ID_VAR)
        .ok()
        .filter(|id| !id.is_empty())
        .ok_or(OAuthError::MissingClientId)?;
    let redirect_uri = runtime
        .env_var(REDIRECT_URI_VAR)
        .ok()
        .filter(|uri| !uri.is_empty());

    let scopes = scopes.unwrap_or(DEFAULT_SCOPES);
    let state = generate_state();
    let url = build_authorize_url(&client_id, redirect_uri.as_deref(), scopes, &state)?;

    debug!("Built authorization URL for scopes {:?}", scopes);
    Ok((url, state))
}

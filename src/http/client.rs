//! Bearer-authenticated client for the Todoist REST API.

use log::{debug, trace};
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;
use std::time::Duration;

use super::{ApiError, Outcome, Params};
use crate::auth::Credential;

/// Todoist REST v2 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/rest/v2";

/// Timeout applied to connecting and to each whole request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = concat!("todoist-tools/", env!("TODOIST_TOOLS_VERSION"));

/// Where to send requests and how long to wait for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// HTTP client bound to one base URL and one credential.
///
/// Holds no state between calls beyond those two; the connection pool lives
/// and dies with the instance.
#[derive(Clone)]
pub struct TodoistClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl TodoistClient {
    pub fn new(config: &ClientConfig, credential: &Credential) -> Result<Self, ApiError> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| ApiError::InvalidCredential)?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Transport)?;

        debug!(
            "Created client for {} with credential {:?}",
            config.base_url, credential
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document. Absent parameters are never sent.
    #[tracing::instrument(skip(self, params))]
    pub async fn get(&self, path: &str, params: Option<&Params>) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("GET {} with query {:?}", url, params);

        let mut request = self.client.get(&url);
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            request = request.query(&params.to_query());
        }

        let (status, body) = self.execute(request).await?;
        if !status.is_success() {
            return Err(ApiError::Http { status, body });
        }
        decode(path, &body)
    }

    /// POST an optional JSON body.
    ///
    /// A 204 is [`Outcome::Empty`] whatever the body says; any other 2xx must
    /// carry JSON.
    #[tracing::instrument(skip(self, body))]
    pub async fn post(&self, path: &str, body: Option<&Params>) -> Result<Outcome, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let (status, text) = self.execute(request).await?;
        if status == StatusCode::NO_CONTENT {
            return Ok(Outcome::Empty);
        }
        if !status.is_success() {
            return Err(ApiError::Http { status, body: text });
        }
        decode(path, &text).map(Outcome::Json)
    }

    /// POST to an endpoint that must answer with a JSON document.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json(&self, path: &str, body: Option<&Params>) -> Result<Value, ApiError> {
        match self.post(path, body).await? {
            Outcome::Json(value) => Ok(value),
            Outcome::Empty => Err(ApiError::MalformedResponse(format!(
                "POST {} succeeded but returned no content",
                path
            ))),
        }
    }

    /// DELETE a resource. Success usually comes back as [`Outcome::Empty`].
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Outcome, ApiError> {
        let url = self.url(path);
        debug!("DELETE {}", url);

        let (status, text) = self.execute(self.client.delete(&url)).await?;
        if !status.is_success() {
            return Err(ApiError::Http { status, body: text });
        }
        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Outcome::Empty);
        }
        decode(path, &text).map(Outcome::Json)
    }

    /// Sends the request and reads the full body, mapping timeouts apart from
    /// other transport failures.
    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response: Response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        debug!("Response status {}", status);
        trace!("Response body: {}", body);

        Ok((status, body))
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(error)
        }
    }
}

fn decode(path: &str, body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("{} returned invalid JSON: {}", path, e)))
}

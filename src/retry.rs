//! Caller-level retry for transient failures.
//!
//! The transport never retries on its own. Callers that want resilience wrap an
//! operation in [`with_retry`]; only timeouts, connection failures and gateway
//! or availability errors (502, 503, 504) are retried.

use anyhow::Result;
use log::{debug, warn};
use reqwest::StatusCode;
use std::time::Duration;

use crate::http::ApiError;
use crate::runtime::Runtime;

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: usize = 3;

/// Default delay before the first retry in milliseconds.
pub const RETRY_DELAY_MS: u64 = 1000;

/// Default multiplier applied to the delay after each retry.
pub const RETRY_BACKOFF: f64 = 2.0;

/// Upper bound for a single backoff delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

pub const MAX_ATTEMPTS_VAR: &str = "TODOIST_RETRY_MAX_ATTEMPTS";
pub const DELAY_MS_VAR: &str = "TODOIST_RETRY_DELAY_MS";
pub const BACKOFF_VAR: &str = "TODOIST_RETRY_BACKOFF";

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub delay: Duration,
    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            delay: Duration::from_millis(RETRY_DELAY_MS),
            backoff: RETRY_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy that runs the operation exactly once.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Reads `TODOIST_RETRY_MAX_ATTEMPTS`, `TODOIST_RETRY_DELAY_MS` and
    /// `TODOIST_RETRY_BACKOFF`, keeping defaults for unset or unparsable values.
    pub fn from_runtime<R: Runtime>(runtime: &R) -> Self {
        let mut policy = Self::default();
        if let Some(n) = parse_env::<usize, R>(runtime, MAX_ATTEMPTS_VAR) {
            policy.max_retries = n;
        }
        if let Some(ms) = parse_env::<u64, R>(runtime, DELAY_MS_VAR) {
            policy.delay = Duration::from_millis(ms);
        }
        if let Some(backoff) = parse_env::<f64, R>(runtime, BACKOFF_VAR) {
            if backoff.is_finite() && backoff >= 1.0 {
                policy.backoff = backoff;
            } else {
                warn!("Ignoring {}={}; expected a finite number >= 1", BACKOFF_VAR, backoff);
            }
        }
        policy
    }

    /// Policy for a command line run. An explicit retry count wins over
    /// `TODOIST_RETRY_MAX_ATTEMPTS`; with neither set nothing is retried.
    pub fn for_command<R: Runtime>(runtime: &R, retries: Option<usize>) -> Self {
        match retries {
            Some(n) => Self {
                max_retries: n,
                ..Self::from_runtime(runtime)
            },
            None if runtime.env_var(MAX_ATTEMPTS_VAR).is_ok() => Self::from_runtime(runtime),
            None => Self::none(),
        }
    }

    /// Delay before retry number `attempt` (0-based), capped at
    /// [`MAX_RETRY_DELAY`].
    pub fn delay_for(&self, attempt: usize) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.delay.as_secs_f64() * self.backoff.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
    }
}

fn parse_env<T: std::str::FromStr, R: Runtime>(runtime: &R, key: &str) -> Option<T> {
    let value = runtime.env_var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, value);
            None
        }
    }
}

/// Returns true if the error chain holds a transient transport failure.
pub fn is_retryable(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<ApiError>())
        .any(|api_error| match api_error {
            ApiError::Timeout(_) | ApiError::Transport(_) => true,
            ApiError::Http { status, .. } => matches!(
                *status,
                StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
            ApiError::MalformedResponse(_) | ApiError::InvalidCredential => false,
        })
}

/// Runs `operation`, retrying transient failures according to `policy`.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable(&e) {
                    debug!("{}: non-retryable error: {}", operation_name, e);
                    return Err(e);
                }
                if attempt >= policy.max_retries {
                    debug!("{}: giving up after {} retries", operation_name, attempt);
                    return Err(e);
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "{}: attempt {}/{} failed ({}), retrying in {:?}...",
                    operation_name,
                    attempt + 1,
                    policy.max_retries + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

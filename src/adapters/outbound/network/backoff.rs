use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::shared::Result;

/// Bounded exponential backoff for the service clients.
///
/// Scanning-service calls get throttled under load, so transient
/// transport failures and throttling statuses are retried with an
/// exponentially growing delay. Everything else fails immediately and
/// surfaces as a fatal error for the invocation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    const BASE_DELAY_MS: u64 = 100;
    const MAX_DELAY: Duration = Duration::from_secs(5);

    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(Self::BASE_DELAY_MS),
        }
    }

    /// Delay before the attempt following `attempt` (1-based), capped so a
    /// deep retry budget does not stretch a single invocation into minutes.
    fn delay_for(&self, attempt: u32) -> Duration {
        let shift = (attempt - 1).min(16);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(Self::MAX_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// One failed service call, classified for the retry decision.
#[derive(Debug)]
pub(crate) enum CallError {
    Transport(reqwest::Error),
    Status { status: StatusCode, body: String },
}

impl CallError {
    fn is_transient(&self) -> bool {
        match self {
            CallError::Transport(e) => e.is_timeout() || e.is_connect(),
            CallError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Transport(e) => write!(f, "transport error: {}", e),
            CallError::Status { status, body } => {
                let shown: String = body.chars().take(200).collect();
                write!(f, "status {}: {}", status, shown)
            }
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CallError::Transport(e) => Some(e),
            CallError::Status { .. } => None,
        }
    }
}

/// Sends a request until it succeeds, the failure is non-transient, or
/// the retry budget is exhausted. `build_request` is invoked once per
/// attempt because a `RequestBuilder` is consumed by sending.
pub(crate) async fn execute_with_backoff<T: DeserializeOwned>(
    policy: &RetryPolicy,
    service: &'static str,
    build_request: impl Fn() -> reqwest::RequestBuilder,
) -> Result<T> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match send_once::<T>(build_request()).await {
            Ok(parsed) => return Ok(parsed),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    service,
                    attempt,
                    error = %err,
                    "transient service failure, backing off"
                );
                tokio::time::sleep(policy.delay_for(attempt)).await;
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("{} request failed after {} attempt(s)", service, attempt)));
            }
        }
    }
}

async fn send_once<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> std::result::Result<T, CallError> {
    let response = request.send().await.map_err(CallError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CallError::Status { status, body });
    }

    response.json::<T>().await.map_err(CallError::Transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_exponentially() {
        let policy = RetryPolicy::new(10);
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::new(10);
        assert_eq!(policy.delay_for(9), Duration::from_secs(5));
        assert_eq!(policy.delay_for(32), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_attempts_clamps_to_one() {
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
    }

    #[test]
    fn test_throttling_status_is_transient() {
        let err = CallError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_server_error_is_transient() {
        let err = CallError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_client_error_is_not_transient() {
        let err = CallError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "invalid filter".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn test_status_display_truncates_body() {
        let err = CallError::Status {
            status: StatusCode::BAD_REQUEST,
            body: "x".repeat(1000),
        };
        assert!(err.to_string().len() < 300);
    }
}

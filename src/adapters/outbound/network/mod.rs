use std::time::Duration;

use anyhow::Context;
use reqwest::header;

use crate::shared::Result;

pub mod aggregator_client;
mod backoff;
pub mod scanner_client;

pub use aggregator_client::AggregatorHttpClient;
pub use backoff::RetryPolicy;
pub use scanner_client::ScannerHttpClient;

/// Builds a reqwest client with the settings both service clients share:
/// request timeout, versioned User-Agent, and an optional bearer token
/// attached as a default header.
pub(crate) fn build_service_client(
    auth_token: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client> {
    let user_agent = format!("findings-reconciler/{}", env!("CARGO_PKG_VERSION"));

    let mut headers = header::HeaderMap::new();
    if let Some(token) = auth_token {
        let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .context("Auth token contains characters not valid in an HTTP header")?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .default_headers(headers)
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_service_client_without_token() {
        assert!(build_service_client(None, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_build_service_client_with_token() {
        assert!(build_service_client(Some("abc123"), Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_build_service_client_rejects_invalid_token() {
        assert!(build_service_client(Some("bad\ntoken"), Duration::from_secs(5)).is_err());
    }
}

//! Shared HTTP request plumbing for provider implementations.
//!
//! Providers keep full control over auth and request construction and hand a
//! prepared `RequestBuilder` here for the common part: sending, timeout
//! classification, transient-error detection, logging, and body reading.
//!
//! Retry support is opt-in per call site. Lifecycle writes (number purchase
//! and release) must go through [`HttpUtils::execute_request`] directly —
//! they are never safe to replay.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Ceiling applied to exponential backoff between retries.
const MAX_BACKOFF: Duration = Duration::from_secs(10);
/// Ceiling applied to a vendor-supplied `Retry-After` hint.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// HTTP helper function set.
pub struct HttpUtils;

impl HttpUtils {
    /// Execute an HTTP request and return `(status_code, body_text)`.
    ///
    /// Transport failures are classified into [`ProviderError::Timeout`] or
    /// [`ProviderError::NetworkError`]. HTTP 429 becomes
    /// [`ProviderError::RateLimited`] (with the `Retry-After` hint when the
    /// vendor sends one) and 502-504 become retryable `NetworkError`s.
    /// Everything else, including vendor error payloads on 4xx, is returned
    /// to the caller for provider-specific mapping.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] {method_name} {url_or_action}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        // Read Retry-After before the body consumes the response.
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Upstream error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {body}"),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Execute an HTTP request with automatic retries for transient errors.
    ///
    /// Only errors for which [`ProviderError::is_retryable`] holds are
    /// retried; vendor business errors surface immediately. Backoff doubles
    /// from 100 ms per attempt (capped at 10 s); a `Retry-After` hint from a
    /// rate limit wins over backoff, capped at 30 s. If the request body
    /// cannot be cloned the call degrades to a single attempt.
    ///
    /// Only for idempotent reads. Purchase/release must not come through
    /// here.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        if max_retries == 0 {
            return Self::execute_request(
                request_builder,
                provider_name,
                method_name,
                url_or_action,
            )
            .await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use; clone for each attempt.
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                return Self::execute_request(
                    request_builder,
                    provider_name,
                    method_name,
                    url_or_action,
                )
                .await;
            };

            match Self::execute_request(req, provider_name, method_name, url_or_action).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Delay before the next retry attempt.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs(*secs).min(MAX_RETRY_AFTER)
    } else {
        backoff_delay(attempt)
    }
}

/// Exponential backoff: 100 ms, 200 ms, 400 ms, ... capped at [`MAX_BACKOFF`].
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20); // keep 1 << attempt in range
    let delay = Duration::from_millis(100_u64.saturating_mul(1_u64 << capped_attempt));
    delay.min(MAX_BACKOFF)
}

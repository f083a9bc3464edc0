//! HTTP retry helpers for transient errors.
//!
//! Every request the scraper makes goes through [`send_text`] or
//! [`send_bytes`] rather than `reqwest::RequestBuilder::send()` directly,
//! so that timeouts, connection resets, HTTP 429, and server errors are
//! retried with exponential backoff.
//!
//! ```ignore
//! let html = retry::send_text(|| client.get(&url)).await?;
//! let image = retry::send_bytes(|| client.get(&image_url)).await?;
//! ```

use std::time::Duration;

use crate::ScrapeError;

/// Maximum number of retry attempts for transient failures.
///
/// Backoff is 2s, 4s, 8s, so a request gives up after 14 seconds of
/// waiting plus the per-attempt timeouts.
const MAX_RETRIES: u32 = 3;

/// Maximum number of full re-fetches when the body cannot be read after a
/// successful status line (connection dropped mid-body).
const MAX_BODY_RETRIES: u32 = 2;

/// Sends an HTTP request and returns the response body as a `String`.
///
/// The `build_request` closure is called on each attempt because
/// [`reqwest::RequestBuilder`] is consumed by `.send()`.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the request fails after all retries, the
/// server returns a non-retryable status, or the body cannot be read.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(build_request: F) -> Result<String, ScrapeError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for body_attempt in 0..=MAX_BODY_RETRIES {
        let response = send_inner(&build_request, MAX_RETRIES).await?;
        let url = response.url().to_string();

        match response.text().await {
            Ok(text) => return Ok(text),
            Err(e) if body_attempt < MAX_BODY_RETRIES => {
                let delay = Duration::from_secs(1u64 << (body_attempt + 1));
                log::warn!(
                    "Text body read failed (body retry {}/{MAX_BODY_RETRIES}), \
                     re-fetching in {delay:?}...\n  url: {url}\n  error: {e}",
                    body_attempt + 1,
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                log::error!(
                    "Text body read failed after {MAX_BODY_RETRIES} retries, giving up.\n  \
                     url: {url}\n  error: {e}"
                );
                return Err(ScrapeError::Http(e));
            }
        }
    }

    unreachable!("send_text body-decode retry loop exited without returning")
}

/// Sends an HTTP request and returns the raw response body.
///
/// Behaves like [`send_text`] but for binary payloads such as images.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the request fails after all retries, the
/// server returns a non-retryable status, or the body cannot be read.
#[allow(clippy::future_not_send)]
pub async fn send_bytes<F>(build_request: F) -> Result<Vec<u8>, ScrapeError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for body_attempt in 0..=MAX_BODY_RETRIES {
        let response = send_inner(&build_request, MAX_RETRIES).await?;
        let url = response.url().to_string();

        match response.bytes().await {
            Ok(bytes) => return Ok(bytes.to_vec()),
            Err(e) if body_attempt < MAX_BODY_RETRIES => {
                let delay = Duration::from_secs(1u64 << (body_attempt + 1));
                log::warn!(
                    "Body read failed (body retry {}/{MAX_BODY_RETRIES}), \
                     re-fetching in {delay:?}...\n  url: {url}\n  error: {e}",
                    body_attempt + 1,
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                log::error!(
                    "Body read failed after {MAX_BODY_RETRIES} retries, giving up.\n  \
                     url: {url}\n  error: {e}"
                );
                return Err(ScrapeError::Http(e));
            }
        }
    }

    unreachable!("send_bytes body-decode retry loop exited without returning")
}

/// Core retry loop shared by [`send_text`] and [`send_bytes`].
///
/// Returns the successful [`reqwest::Response`] (status 2xx or 3xx).
#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, ScrapeError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<ScrapeError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) => {
                if is_transient(&e) && attempt < max_retries {
                    log::warn!("  transient error: {e}");
                    last_error = Some(ScrapeError::Http(e));
                    continue;
                }
                return Err(ScrapeError::Http(e));
            }
            Ok(response) => {
                let status = response.status();
                match status_verdict(status, attempt, max_retries) {
                    Verdict::Accept => return Ok(response),
                    Verdict::Retry => {
                        let url = response.url().to_string();
                        log::warn!("  HTTP {status} from {url}");
                        last_error = Some(ScrapeError::Status { status, url });
                    }
                    Verdict::Fail => {
                        let url = response.url().to_string();
                        return Err(ScrapeError::Status { status, url });
                    }
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| ScrapeError::Parse("request failed after all retries".to_string())))
}

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Accept,
    Retry,
    Fail,
}

/// Decides what to do with a response status on the given attempt.
///
/// 4xx other than 429 is permanent; 429 and 5xx are retried until the
/// attempts run out.
fn status_verdict(status: reqwest::StatusCode, attempt: u32, max_retries: u32) -> Verdict {
    if is_retryable_status(status) {
        if attempt < max_retries {
            Verdict::Retry
        } else {
            Verdict::Fail
        }
    } else if status.is_client_error() {
        Verdict::Fail
    } else {
        Verdict::Accept
    }
}

/// Returns `true` for statuses worth retrying: 429 and any 5xx.
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode() || e.is_request()
}

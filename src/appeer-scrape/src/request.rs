//! HTTP fetch with bounded retries and status-code-aware backoff.
//!
//! Three knobs govern every request: `max_tries`, `retry_sleep_time` (for a
//! network exception or a 5xx response), and `retry_429_sleep_time` (for an
//! HTTP 429). Any other non-2xx response fails immediately — there is no
//! budget left to spend retrying a 404. The tries counter is per
//! request and is not persisted; a process restart gets a fresh budget.

use reqwest::{header, Client, Response};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "appeer/0.1 (+https://github.com/blendle/appeer)";

/// Retry/backoff parameters for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_tries: u32,
    pub retry_sleep_time: Duration,
    pub retry_429_sleep_time: Duration,
}

impl From<appeer_core::config::ScrapeDefaults> for RetryPolicy {
    fn from(defaults: appeer_core::config::ScrapeDefaults) -> Self {
        Self {
            max_tries: defaults.max_tries,
            retry_sleep_time: Duration::from_secs_f64(defaults.retry_sleep_time),
            retry_429_sleep_time: Duration::from_secs_f64(defaults.retry_429_sleep_time),
        }
    }
}

/// Why a fetch ultimately failed, after exhausting its retry budget (or
/// hitting a non-retryable status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// A network-level failure (connection reset, timeout, DNS) on every
    /// attempt, or `max_tries` was `0`.
    Network(String),
    /// A non-2xx, non-retryable (or retry-exhausted) HTTP status.
    Status(u16),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Status(code) => write!(f, "HTTP {code}"),
        }
    }
}

fn with_retries<F>(policy: &RetryPolicy, mut attempt: F) -> Result<Response, FetchError>
where
    F: FnMut() -> Result<Response, reqwest::Error>,
{
    let mut tries_left = policy.max_tries;

    loop {
        if tries_left == 0 {
            return Err(FetchError::Network(
                "max_tries exhausted before any request could be sent".to_string(),
            ));
        }
        tries_left -= 1;

        match attempt() {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return Ok(resp);
                }
                if status.as_u16() == 429 {
                    if tries_left == 0 {
                        return Err(FetchError::Status(429));
                    }
                    std::thread::sleep(policy.retry_429_sleep_time);
                    continue;
                }
                if status.is_server_error() {
                    if tries_left == 0 {
                        return Err(FetchError::Status(status.as_u16()));
                    }
                    std::thread::sleep(policy.retry_sleep_time);
                    continue;
                }
                return Err(FetchError::Status(status.as_u16()));
            }
            Err(err) => {
                if tries_left == 0 {
                    return Err(FetchError::Network(err.to_string()));
                }
                std::thread::sleep(policy.retry_sleep_time);
                continue;
            }
        }
    }
}

/// GET `url`, returning the response body verbatim.
///
/// # Errors
///
/// Returns [`FetchError`] once the retry budget is exhausted, or
/// immediately on a non-retryable status.
pub fn get_body(client: &Client, url: &str, policy: &RetryPolicy) -> Result<String, FetchError> {
    let mut resp = with_retries(policy, || {
        client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
    })?;
    resp.text().map_err(|err| FetchError::Network(err.to_string()))
}

/// HEAD `url`, following redirects, returning the final resolved URL.
///
/// # Errors
///
/// Returns [`FetchError`] once the retry budget is exhausted, or
/// immediately on a non-retryable status.
pub fn resolve_head(client: &Client, url: &str, policy: &RetryPolicy) -> Result<String, FetchError> {
    let resp = with_retries(policy, || {
        client
            .head(url)
            .timeout(REQUEST_TIMEOUT)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
    })?;
    Ok(resp.url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_tries: u32) -> RetryPolicy {
        RetryPolicy {
            max_tries,
            retry_sleep_time: Duration::from_millis(1),
            retry_429_sleep_time: Duration::from_millis(1),
        }
    }

    #[test]
    fn max_tries_zero_sends_no_request() {
        let client = Client::new();
        let err = get_body(&client, "https://127.0.0.1:9/unreachable", &policy(0)).unwrap_err();
        assert_eq!(err, FetchError::Network("max_tries exhausted before any request could be sent".to_string()));
    }

    #[test]
    fn exhausts_retries_on_repeated_500() {
        let _m = mockito::mock("GET", "/always-500").with_status(500).expect(2).create();
        let client = Client::new();
        let url = format!("{}/always-500", mockito::server_url());
        let err = get_body(&client, &url, &policy(2)).unwrap_err();
        assert_eq!(err, FetchError::Status(500));
    }

    #[test]
    fn honors_429_then_succeeds() {
        let _m1 = mockito::mock("GET", "/flaky").with_status(429).create();
        let _m2 = mockito::mock("GET", "/flaky").with_status(200).with_body("ok").create();
        let client = Client::new();
        let url = format!("{}/flaky", mockito::server_url());
        let body = get_body(&client, &url, &policy(3)).unwrap();
        assert_eq!(body, "ok");
    }

    #[test]
    fn non_retryable_status_fails_immediately() {
        let _m = mockito::mock("GET", "/missing").with_status(404).expect(1).create();
        let client = Client::new();
        let url = format!("{}/missing", mockito::server_url());
        let err = get_body(&client, &url, &policy(5)).unwrap_err();
        assert_eq!(err, FetchError::Status(404));
    }

    #[test]
    fn retry_policy_from_scrape_defaults_converts_seconds_to_duration() {
        let defaults = appeer_core::config::ScrapeDefaults::default();
        let policy = RetryPolicy::from(defaults);
        assert_eq!(policy.max_tries, 3);
        assert_eq!(policy.retry_sleep_time, Duration::from_secs_f64(10.0));
        assert_eq!(policy.retry_429_sleep_time, Duration::from_secs_f64(300.0));
    }
}

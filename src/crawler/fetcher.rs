//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the shared, connection-pooling HTTP client
//! - Timeout retries with linear backoff
//! - Redirect limit enforcement
//! - Error classification into `FetchError`

use crate::config::FetchPolicy;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// Response body decoded as text
    pub body: String,
}

/// Why a fetch produced no page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Every attempt timed out
    #[error("GET {url} timed out after {attempts} attempt(s)")]
    TimedOut { url: String, attempts: u32 },

    /// The redirect chain was longer than the configured limit
    #[error("GET {url} resulted in more than {max} redirects")]
    TooManyRedirects { url: String, max: usize },

    /// The server answered with a non-success status
    #[error("GET {url} returned HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// Connection, TLS, DNS or decoding failure
    #[error("GET {url} failed: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// Returns true if another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Performs GET requests under one run's `FetchPolicy`
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted and
/// its connection pool is shared by every clone, so one fetcher serves every
/// worker task.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: FetchPolicy,
}

impl Fetcher {
    /// Builds the HTTP client for a policy
    ///
    /// # Arguments
    ///
    /// * `policy` - Timeouts, redirect cap and retry settings
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - Successfully built client
    /// * `Err(reqwest::Error)` - Failed to build client
    pub fn new(policy: &FetchPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("title-grabber/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(policy.connect_timeout)
            .read_timeout(policy.read_timeout)
            .redirect(Policy::limited(policy.max_redirects))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            policy: policy.clone(),
        })
    }

    /// Fetches a URL, retrying only on timeouts
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return final URL and body |
    /// | Other status | Immediate → BadStatus |
    /// | Too many redirects | Immediate → TooManyRedirects |
    /// | Timeout | Sleep `n * retry_backoff`, retry; TimedOut after `max_retries` attempts |
    /// | Anything else | Immediate → Request |
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.get_once(url, attempt).await {
                Ok(page) => return Ok(page),
                Err(e) => e,
            };

            match self.backoff_after(attempt).filter(|_| error.is_retryable()) {
                Some(delay) => {
                    tracing::warn!(
                        "GET {} timed out [retry #{}]. Going to sleep for {:?}",
                        url,
                        attempt,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    match &error {
                        FetchError::TimedOut { .. } => {
                            tracing::warn!("GET {} timed out [retry #{}]. Giving up", url, attempt)
                        }
                        FetchError::TooManyRedirects { .. } => tracing::error!("{}", error),
                        _ => tracing::debug!("{}", error),
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Sleep before the attempt following the `attempt`-th timeout
    ///
    /// Grows linearly with the attempt number. None once the attempt budget is
    /// spent.
    fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt < self.policy.max_retries.max(1) {
            Some(self.policy.retry_backoff * attempt)
        } else {
            None
        }
    }

    /// One GET attempt, classifying every failure
    async fn get_once(&self, url: &str, attempt: u32) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, attempt, e))?;

        let status = response.status();
        tracing::debug!("GET {} [{}]", url, status.as_u16());

        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify(url, attempt, e))?;

        Ok(FetchedPage { final_url, body })
    }

    fn classify(&self, url: &str, attempt: u32, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::TimedOut {
                url: url.to_string(),
                attempts: attempt,
            }
        } else if error.is_redirect() {
            FetchError::TooManyRedirects {
                url: url.to_string(),
                max: self.policy.max_redirects,
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

//! HTTP fetching with bounded, linearly backed-off retries.
//!
//! Every outbound request of both pipelines goes through [`Fetcher`]. Failures
//! are classified by [`FetchError`]:
//!
//! - timeouts, connection problems and 5xx responses are retried up to
//!   `max_attempts` times, waiting `base_delay * attempt` (+ up to 250ms of
//!   jitter) between attempts
//! - 401/403/429 responses are reported as [`FetchError::Quota`] and returned
//!   immediately
//! - other 4xx responses are returned immediately
//!
//! Callers decide how to degrade; in practice they log and treat the fetch as
//! having produced no data.

use crate::config::FetchConfig;
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http client setup failed: {0}")]
    Client(String),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("http error {status}")]
    Http { status: StatusCode, retriable: bool },

    #[error("quota or authorization failure ({status}): {detail}")]
    Quota { status: StatusCode, detail: String },

    #[error("response could not be decoded: {0}")]
    Decode(String),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl FetchError {
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) => true,
            Self::Http { retriable, .. } => *retriable,
            Self::Client(_) | Self::Quota { .. } | Self::Decode(_) | Self::Exhausted { .. } => {
                false
            }
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, Self::Quota { .. })
    }

    fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                Self::Quota {
                    status,
                    detail: truncate_for_log(body.trim(), 200),
                }
            }
            _ => Self::Http {
                status,
                retriable: status.is_server_error(),
            },
        }
    }
}

/// Shared HTTP client plus the retry policy.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
        })
    }

    /// GET `url` with `query` and return the body as text.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the resource.
    /// * `query` - Query parameters, encoded by the request builder.
    ///
    /// # Returns
    ///
    /// The response body, or the error of the last attempt. Retryable
    /// failures that persist through every attempt come back as
    /// [`FetchError::Exhausted`].
    #[instrument(level = "debug", skip(self, query))]
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, FetchError> {
        self.execute(url, || self.client.get(url).query(query))
            .await
    }

    /// GET `url` with `query` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let body = self.get_text(url, query).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// POST a JSON body with bearer authentication and decode the JSON reply.
    #[instrument(level = "debug", skip(self, bearer, body))]
    pub async fn post_json<B, T>(&self, url: &str, bearer: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let text = self
            .execute(url, || self.client.post(url).bearer_auth(bearer).json(body))
            .await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn execute<F>(&self, url: &str, build: F) -> Result<String, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match Self::send_once(build()).await {
                Ok(body) => {
                    debug!(attempt, bytes = body.len(), "Fetched");
                    return Ok(body);
                }
                Err(e) if !e.should_retry() => {
                    warn!(%url, attempt, error = %e, "Request failed; not retrying");
                    return Err(e);
                }
                Err(e) => {
                    if attempt >= self.max_attempts {
                        error!(
                            %url,
                            attempt,
                            elapsed_ms_total = total_t0.elapsed().as_millis(),
                            error = %e,
                            "Request exhausted retries"
                        );
                        return Err(FetchError::Exhausted {
                            attempts: attempt,
                            last: e.to_string(),
                        });
                    }

                    let delay = self.delay_for(attempt);
                    warn!(%url, attempt, max = self.max_attempts, ?delay, error = %e, "Request failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }

    async fn send_once(request: RequestBuilder) -> Result<String, FetchError> {
        let response = request.send().await.map_err(FetchError::from_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status, &body));
        }
        // A body cut short is a dropped connection, not bad content.
        response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        })
    }

    /// Linear backoff: the n-th retry waits `base_delay * n` plus jitter.
    fn delay_for(&self, attempt: u32) -> Duration {
        let jitter_ms: u64 = rng().random_range(0..=250);
        self.base_delay.saturating_mul(attempt) + Duration::from_millis(jitter_ms)
    }
}

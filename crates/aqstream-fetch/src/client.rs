//! HTTP client for the measurements endpoint.

use aqstream_types::AqError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::url::{ENDPOINT, MAX_PAGE_SIZE, measurement_query};
use crate::{Page, PageSource, parse_page};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Measurements endpoint URL.
    pub endpoint: String,
    /// Records requested per page. Clamped to [`MAX_PAGE_SIZE`].
    pub page_size: u32,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Maximum retry attempts after the first request.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// HTTP status codes treated as transient and retried.
    pub retry_statuses: Vec<u16>,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: ENDPOINT.to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            max_retries: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            retry_statuses: vec![500, 502, 503, 504],
            user_agent: format!("aqstream/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Returns the effective page size, between 1 and [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Errors that can occur while fetching a page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network or server failure that survived every retry, or a
    /// non-retryable HTTP status.
    #[error("Transient fetch error on page {page}: {reason}")]
    Transient {
        /// 1-based page number.
        page: u32,
        /// What went wrong.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed response on page {page}: {reason}")]
    Malformed {
        /// 1-based page number.
        page: u32,
        /// What was wrong with the body.
        reason: String,
    },
}

impl FetchError {
    /// Returns the page the error occurred on.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Transient { page, .. } | Self::Malformed { page, .. } => *page,
        }
    }
}

impl From<FetchError> for AqError {
    fn from(error: FetchError) -> Self {
        Self::Fetch(error.to_string())
    }
}

/// HTTP client with connection pooling, timeouts and retry logic.
///
/// One client is built per run and shared by reference; it holds the
/// connection pool for its whole lifetime.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    config: ClientConfig,
}

impl FetchClient {
    /// Creates a new fetch client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches one page of measurements for `date`.
    ///
    /// Statuses listed in [`ClientConfig::retry_statuses`], connection
    /// failures and timeouts are retried with exponential backoff. The
    /// backoff sleeps in line, so the caller does not proceed while a retry
    /// is pending.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transient`] once retries are exhausted or the
    /// server answers with a non-retryable status, and
    /// [`FetchError::Malformed`] if the body cannot be decoded.
    pub async fn fetch(&self, date: NaiveDate, page: u32) -> Result<Page, FetchError> {
        let query = measurement_query(date, page, self.config.page_size());
        let mut attempts = 0;

        loop {
            match self
                .client
                .get(&self.config.endpoint)
                .query(&query)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();

                    if self.config.retry_statuses.contains(&status.as_u16()) {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.calculate_backoff_delay(attempts);
                            log::warn!(
                                "{date} page {page}: HTTP {status}, retry {attempts}/{} in {delay:?}",
                                self.config.max_retries
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::Transient {
                            page,
                            reason: format!("HTTP {status} after {attempts} retries"),
                        });
                    }

                    if !status.is_success() {
                        return Err(FetchError::Transient {
                            page,
                            reason: format!("HTTP {status}"),
                        });
                    }

                    let body = response.bytes().await.map_err(|e| FetchError::Transient {
                        page,
                        reason: format!("failed to read body: {e}"),
                    })?;
                    return parse_page(page, &body);
                }
                Err(e) if Self::is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    log::warn!(
                        "{date} page {page}: {e}, retry {attempts}/{} in {delay:?}",
                        self.config.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(FetchError::Transient {
                        page,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Calculates the backoff delay for a 1-based retry attempt.
    ///
    /// `base_delay * 2^(attempt - 1)`, capped at the max delay, with a
    /// deterministic ±25% jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(16));
        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            offset as i64 - jitter_range as i64
        } else {
            0
        };

        Duration::from_millis((capped_delay as i64 + jitter).max(1) as u64)
    }

    /// Determines if a transport error is retryable.
    fn is_retryable_error(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect() || error.is_request()
    }
}

#[async_trait]
impl PageSource for FetchClient {
    fn page_size(&self) -> u32 {
        self.config.page_size()
    }

    async fn fetch_page(&self, date: NaiveDate, page: u32) -> Result<Page, FetchError> {
        self.fetch(date, page).await
    }
}

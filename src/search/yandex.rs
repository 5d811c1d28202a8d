//! Yandex Maps organization search client.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::{PageRequest, PageResponse, SearchBackend};
use crate::config::{ApiKey, FetchSettings};
use crate::error::ConfigError;

pub const YANDEX_SEARCH_API_URL: &str = "https://search-maps.yandex.ru/v1/";

const USER_AGENT: &str = "school-collector/0.1 (+https://example.local)";

/// Statuses retried at the transport level.
const RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Longest single backoff pause.
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Authenticated search client with transport-level retries.
pub struct YandexClient {
    client: Client,
    endpoint: Url,
    api_key: ApiKey,
    max_retries: u32,
    backoff_factor: Duration,
}

impl YandexClient {
    pub fn new(api_key: ApiKey, settings: &FetchSettings) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidSetting(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: parse_endpoint(YANDEX_SEARCH_API_URL)?,
            api_key,
            max_retries: settings.max_retries,
            backoff_factor: settings.backoff_factor,
        })
    }

    /// Point the client at another endpoint (a mock server, a proxy).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ConfigError> {
        self.endpoint = parse_endpoint(endpoint)?;
        Ok(self)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_factor.saturating_mul(factor).min(BACKOFF_MAX)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidSetting(format!("invalid endpoint '{endpoint}': {e}")))
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

impl SearchBackend for YandexClient {
    async fn get_page(&self, request: &PageRequest<'_>) -> Result<PageResponse, reqwest::Error> {
        let mut params = request.query_params();
        params.push(("apikey", self.api_key.expose().to_string()));

        let mut attempt = 0;
        loop {
            let result = self
                .client
                .get(self.endpoint.clone())
                .query(&params)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if RETRY_STATUSES.contains(&status) && attempt < self.max_retries {
                        attempt += 1;
                        let pause = self.backoff(attempt);
                        debug!(
                            "Status {} for tile {} (skip {}), retry {}/{} in {:?}",
                            status, request.tile.index, request.skip, attempt, self.max_retries, pause
                        );
                        tokio::time::sleep(pause).await;
                        continue;
                    }

                    let body = response.text().await?;
                    return Ok(PageResponse { status, body });
                }
                Err(e) if is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    let pause = self.backoff(attempt);
                    warn!(
                        "Request for tile {} (skip {}) failed, retry {}/{} in {:?}: {}",
                        request.tile.index,
                        request.skip,
                        attempt,
                        self.max_retries,
                        pause,
                        e.without_url()
                    );
                    tokio::time::sleep(pause).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

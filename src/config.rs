//! Run configuration with the collector's default limits.
//!
//! Everything a run needs, credentials included, is carried in
//! [`CollectorConfig`] and handed to the pipeline explicitly.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Default search text ("school").
pub const DEFAULT_QUERY: &str = "школа";
pub const DEFAULT_LANG: &str = "ru_RU";
pub const DEFAULT_REGION: &str = "KG";
pub const DEFAULT_TILES_PER_AXIS: usize = 8;

/// API key for the search backend. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self(key))
    }

    /// Resolve from an optional CLI/env value.
    pub fn from_option(key: Option<String>) -> Result<Self, ConfigError> {
        key.map_or(Err(ConfigError::MissingApiKey), Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Largest `results` value the search API accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Pagination, timeout and throttling limits for the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Results requested per page (backend max is 50)
    pub page_size: u32,
    pub max_pages: u32,
    pub request_timeout: Duration,
    /// Pause after each full page before requesting the next
    pub page_delay: Duration,
    /// Pause before the single retry of a rate-limited (429) page
    pub rate_limit_cooldown: Duration,
    /// Pause after each tile
    pub tile_delay: Duration,
    /// Transport-level retries on 429/5xx and connection errors
    pub max_retries: u32,
    /// Base of the exponential transport backoff
    pub backoff_factor: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_pages: 20,
            request_timeout: Duration::from_secs(30),
            page_delay: Duration::from_millis(250),
            rate_limit_cooldown: Duration::from_millis(1500),
            tile_delay: Duration::from_millis(100),
            max_retries: 5,
            backoff_factor: Duration::from_millis(500),
        }
    }
}

impl FetchSettings {
    /// Settings with every delay set to zero.
    pub fn without_delays(self) -> Self {
        Self {
            page_delay: Duration::ZERO,
            rate_limit_cooldown: Duration::ZERO,
            tile_delay: Duration::ZERO,
            backoff_factor: Duration::ZERO,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidSetting(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidSetting(
                "max_pages must be greater than 0".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidSetting(
                "request_timeout must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Everything one collection run needs.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub region: String,
    pub tiles_per_axis: usize,
    pub query: String,
    pub lang: String,
    /// Apply the school classifier
    pub strict: bool,
    pub fetch: FetchSettings,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            tiles_per_axis: DEFAULT_TILES_PER_AXIS,
            query: DEFAULT_QUERY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            strict: true,
            fetch: FetchSettings::default(),
        }
    }
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiles_per_axis == 0 {
            return Err(ConfigError::InvalidTileCount(self.tiles_per_axis));
        }
        self.fetch.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_backend_limits() {
        let settings = FetchSettings::default();
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.max_pages, 20);
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.page_delay, Duration::from_millis(250));
        assert_eq!(settings.rate_limit_cooldown, Duration::from_millis(1500));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_page_size_rejected() {
        let settings = FetchSettings {
            page_size: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn oversized_page_size_rejected() {
        let settings = FetchSettings {
            page_size: MAX_PAGE_SIZE + 1,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and 50"));

        let settings = FetchSettings {
            page_size: u32::MAX,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_max_pages_rejected() {
        let settings = FetchSettings {
            max_pages: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_tiles_rejected() {
        let config = CollectorConfig {
            tiles_per_axis: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTileCount(0))
        ));
    }

    #[test]
    fn without_delays_keeps_limits() {
        let settings = FetchSettings::default().without_delays();
        assert_eq!(settings.page_size, 50);
        assert!(settings.page_delay.is_zero());
        assert!(settings.rate_limit_cooldown.is_zero());
    }

    #[test]
    fn api_key_is_redacted_and_required() {
        let key = ApiKey::new(" secret ").unwrap();
        assert_eq!(key.expose(), "secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");

        assert!(matches!(ApiKey::new("  "), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            ApiKey::from_option(None),
            Err(ConfigError::MissingApiKey)
        ));
    }
}

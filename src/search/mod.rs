//! Maps search backend: the page request contract, the HTTP client and the
//! per-tile paginated fetcher.

mod fetcher;
mod yandex;

use std::future::Future;

pub use fetcher::fetch_tile;
pub use yandex::{YandexClient, YANDEX_SEARCH_API_URL};

use crate::models::Tile;

/// One page request against the organization search.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub tile: &'a Tile,
    pub text: &'a str,
    pub lang: &'a str,
    /// Page size (`results`)
    pub results: u32,
    /// Offset (`skip`)
    pub skip: u32,
}

impl PageRequest<'_> {
    /// Query parameters in wire order, excluding the API key.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.to_string()),
            ("type", "biz".to_string()),
            ("bbox", self.tile.bbox.to_query_param()),
            ("lang", self.lang.to_string()),
            ("results", self.results.to_string()),
            ("skip", self.skip.to_string()),
        ]
    }
}

/// Status and body of a completed HTTP exchange.
///
/// Non-2xx responses are returned here rather than as errors so the fetcher
/// can apply its own rate-limit rule.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can answer page requests.
///
/// Used by a single caller at a time; implementations need not be `Sync`.
pub trait SearchBackend {
    /// Perform one GET for `request`.
    ///
    /// # Errors
    ///
    /// Returns the transport error when no HTTP response could be obtained
    /// (timeout, connection failure) after the client's own retries.
    fn get_page(
        &self,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = Result<PageResponse, reqwest::Error>>;
}

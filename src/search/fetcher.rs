//! Paginated fetch of every result page for one tile.

use serde_json::Value;
use tracing::{debug, warn};

use super::{PageRequest, PageResponse, SearchBackend};
use crate::config::FetchSettings;
use crate::error::FetchError;
use crate::models::{RawResult, Tile};

const TOO_MANY_REQUESTS: u16 = 429;

/// Fetch all pages for `tile`, following `skip` offsets.
///
/// Stops at the first empty page or the first page shorter than
/// `page_size`. A short page is taken to be the last one, which can
/// under-fetch if the backend ever shorts a middle page.
pub async fn fetch_tile<B: SearchBackend>(
    backend: &B,
    tile: &Tile,
    query: &str,
    lang: &str,
    settings: &FetchSettings,
) -> Result<Vec<RawResult>, FetchError> {
    let mut all_features = Vec::new();

    for page in 0..settings.max_pages {
        let request = PageRequest {
            tile,
            text: query,
            lang,
            results: settings.page_size,
            skip: page.saturating_mul(settings.page_size),
        };

        let mut response = send(backend, &request, page).await?;
        if response.status == TOO_MANY_REQUESTS {
            warn!(
                "Rate limited on tile {} page {}, retrying in {:?}",
                tile.index, page, settings.rate_limit_cooldown
            );
            tokio::time::sleep(settings.rate_limit_cooldown).await;
            response = send(backend, &request, page).await?;
        }

        if !response.is_success() {
            return Err(FetchError::Status {
                tile: tile.index,
                page,
                status: response.status,
            });
        }

        let features = parse_features(&response.body).map_err(|source| FetchError::Decode {
            tile: tile.index,
            page,
            source,
        })?;

        let count = features.len();
        debug!("Tile {} page {}: {} results", tile.index, page, count);
        if count == 0 {
            break;
        }
        all_features.extend(features);

        if count < settings.page_size as usize {
            break;
        }
        if page + 1 < settings.max_pages {
            tokio::time::sleep(settings.page_delay).await;
        }
    }

    Ok(all_features)
}

async fn send<B: SearchBackend>(
    backend: &B,
    request: &PageRequest<'_>,
    page: u32,
) -> Result<PageResponse, FetchError> {
    backend
        .get_page(request)
        .await
        .map_err(|source| FetchError::Transport {
            tile: request.tile.index,
            page,
            // the request URL carries the API key
            source: source.without_url(),
        })
}

/// Extract the `features` array; a body without one is an empty page.
fn parse_features(body: &str) -> Result<Vec<RawResult>, serde_json::Error> {
    let mut data: Value = serde_json::from_str(body)?;
    Ok(match data.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => features,
        _ => Vec::new(),
    })
}

//! Collection pipeline: tiles → fetch → normalize → classify → dedupe.
//!
//! Tiles are processed one at a time. A tile whose fetch fails is logged and
//! skipped; only configuration errors abort a run.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::classify::{SchoolClassifier, Verdict};
use crate::config::CollectorConfig;
use crate::dedupe::dedupe;
use crate::error::{ConfigError, FetchError};
use crate::models::{BoundingBox, NormalizedRecord};
use crate::normalize::normalize;
use crate::regions::region_bbox;
use crate::search::{fetch_tile, SearchBackend};
use crate::tiler::generate_tiles;

/// Outcome of one tile, reported to the progress callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSummary {
    pub index: usize,
    pub total: usize,
    /// Raw results fetched
    pub fetched: usize,
    /// Records that passed the classifier
    pub kept: usize,
    pub failed: bool,
}

/// A tile that was skipped.
#[derive(Debug)]
pub struct TileFailure {
    pub tile: usize,
    pub error: FetchError,
}

/// Result of a run: surviving records plus counters.
#[derive(Debug)]
pub struct CollectionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tiles_total: usize,
    pub failed_tiles: Vec<TileFailure>,
    /// Raw results returned by the backend
    pub fetched: usize,
    /// Records dropped by the classifier
    pub rejected: usize,
    pub duplicates_removed: usize,
    /// Deduplicated records in first-seen order
    pub records: Vec<NormalizedRecord>,
}

impl CollectionReport {
    pub fn retained(&self) -> usize {
        self.records.len()
    }
}

/// Collect schools for the region named in `config`.
///
/// # Errors
///
/// Returns [`ConfigError`] for an unknown region or invalid settings,
/// before any request is made.
pub async fn run_collection<B, F>(
    config: &CollectorConfig,
    backend: &B,
    classifier: &SchoolClassifier,
    on_tile: F,
) -> Result<CollectionReport, ConfigError>
where
    B: SearchBackend,
    F: FnMut(&TileSummary),
{
    let bbox = region_bbox(&config.region)?;
    collect_in_bbox(&bbox, config, backend, classifier, on_tile).await
}

/// Collect schools inside an explicit bounding box.
pub async fn collect_in_bbox<B, F>(
    bbox: &BoundingBox,
    config: &CollectorConfig,
    backend: &B,
    classifier: &SchoolClassifier,
    mut on_tile: F,
) -> Result<CollectionReport, ConfigError>
where
    B: SearchBackend,
    F: FnMut(&TileSummary),
{
    config.validate()?;
    let tiles = generate_tiles(bbox, config.tiles_per_axis)?;
    let total = tiles.len();
    let started_at = Utc::now();

    info!(
        "Collecting '{}' ({}) over {} tiles of {:.4} sq deg, strict={}",
        config.query,
        config.lang,
        total,
        bbox.area() / total as f64,
        config.strict
    );

    let mut accumulated: Vec<NormalizedRecord> = Vec::new();
    let mut failed_tiles = Vec::new();
    let mut fetched = 0;
    let mut rejected = 0;

    for tile in &tiles {
        let features =
            match fetch_tile(backend, tile, &config.query, &config.lang, &config.fetch).await {
                Ok(features) => features,
                Err(e) => {
                    warn!("Tile {}/{} failed: {}", tile.index + 1, total, e);
                    on_tile(&TileSummary {
                        index: tile.index,
                        total,
                        fetched: 0,
                        kept: 0,
                        failed: true,
                    });
                    failed_tiles.push(TileFailure {
                        tile: tile.index,
                        error: e,
                    });
                    continue;
                }
            };

        let tile_fetched = features.len();
        fetched += tile_fetched;

        let mut kept = 0;
        for record in features.into_iter().map(normalize) {
            if config.strict {
                if let Verdict::Reject(reason) = classifier.classify(&record) {
                    debug!(
                        "Rejected {:?}: {}",
                        record.name.as_deref().unwrap_or("<unnamed>"),
                        reason
                    );
                    rejected += 1;
                    continue;
                }
            }
            kept += 1;
            accumulated.push(record);
        }

        debug!(
            "Tile {}/{}: {} fetched, {} kept",
            tile.index + 1,
            total,
            tile_fetched,
            kept
        );
        on_tile(&TileSummary {
            index: tile.index,
            total,
            fetched: tile_fetched,
            kept,
            failed: false,
        });

        tokio::time::sleep(config.fetch.tile_delay).await;
    }

    let before = accumulated.len();
    let records = dedupe(accumulated);
    let duplicates_removed = before - records.len();

    info!(
        "Fetched {} results, rejected {}, removed {} duplicates, kept {} ({} of {} tiles failed)",
        fetched,
        rejected,
        duplicates_removed,
        records.len(),
        failed_tiles.len(),
        total
    );

    Ok(CollectionReport {
        started_at,
        finished_at: Utc::now(),
        tiles_total: total,
        failed_tiles,
        fetched,
        rejected,
        duplicates_removed,
        records,
    })
}

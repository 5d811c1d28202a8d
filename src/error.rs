//! Error types for the collector.
//!
//! Configuration problems abort a run before any network I/O. Fetch problems
//! are scoped to a single tile and never abort the run on their own.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration errors, raised before any tile is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported country code '{code}'. Supported: {supported}")]
    UnsupportedRegion { code: String, supported: String },

    #[error("tiles per axis must be at least 1 (got {0})")]
    InvalidTileCount(usize),

    #[error(
        "invalid bounding box ({min_lon}, {min_lat}, {max_lon}, {max_lat}): min must be below max on both axes"
    )]
    InvalidBoundingBox {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("missing API key: pass --api-key or set YANDEX_MAPS_API_KEY")]
    MissingApiKey,

    #[error("failed to read rules file {path}: {source}")]
    RulesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file {path}: {source}")]
    RulesParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A failure fetching one page of one tile.
///
/// Tile indices are 0-based positions in the query plan.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("tile {tile} page {page}: HTTP status {status}")]
    Status { tile: usize, page: u32, status: u16 },

    #[error("tile {tile} page {page}: request failed: {source}")]
    Transport {
        tile: usize,
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("tile {tile} page {page}: malformed response body: {source}")]
    Decode {
        tile: usize,
        page: u32,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Index of the tile the failure belongs to.
    pub fn tile(&self) -> usize {
        match self {
            FetchError::Status { tile, .. }
            | FetchError::Transport { tile, .. }
            | FetchError::Decode { tile, .. } => *tile,
        }
    }

    /// Page index the failure occurred on.
    pub fn page(&self) -> u32 {
        match self {
            FetchError::Status { page, .. }
            | FetchError::Transport { page, .. }
            | FetchError::Decode { page, .. } => *page,
        }
    }
}

/// Errors writing the export files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

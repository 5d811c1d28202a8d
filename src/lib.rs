//! School collector - gathers general-education schools from the Yandex Maps
//! organization search.
//!
//! A region is split into tiles, each tile is paged through the search API,
//! results are normalized, filtered by a school heuristic and deduplicated.
//! The `collect` binary wraps this pipeline with CLI, prompts and export.

pub mod classify;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod regions;
pub mod search;
pub mod tiler;

pub use classify::{ClassifierRules, SchoolClassifier};
pub use config::{ApiKey, CollectorConfig, FetchSettings};
pub use error::{ConfigError, ExportError, FetchError};
pub use models::{BoundingBox, NormalizedRecord, Tile};
pub use pipeline::{collect_in_bbox, run_collection, CollectionReport, TileSummary};
pub use search::{SearchBackend, YandexClient};

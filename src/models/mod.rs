//! Core data models for the collector.

pub mod bbox;
pub mod record;

pub use bbox::{BoundingBox, Tile};
pub use record::{ExportRecord, GeoPoint, NormalizedRecord, RawResult, EXPORT_COLUMNS};

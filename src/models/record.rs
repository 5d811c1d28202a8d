//! Normalized school records and their export projection.

use serde::Serialize;

/// A feature exactly as returned by the search backend.
pub type RawResult = serde_json::Value;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Canonical record every backend result is converted into.
///
/// Coordinates are held as a single optional point, so latitude and
/// longitude are always present or absent together.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Backend-assigned organization id
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    /// Phone numbers joined with ", "
    pub phones: Option<String>,
    /// Category display names in backend order
    pub categories_list: Vec<String>,
    /// `categories_list` joined with ", "
    pub categories: Option<String>,
    pub hours_text: Option<String>,
    pub site_url: Option<String>,
    /// Original backend feature, kept for debugging
    pub raw: RawResult,
}

impl NormalizedRecord {
    pub fn lat(&self) -> Option<f64> {
        self.location.map(|p| p.lat)
    }

    pub fn lon(&self) -> Option<f64> {
        self.location.map(|p| p.lon)
    }

    /// Project onto the exported column set.
    pub fn to_export(&self) -> ExportRecord<'_> {
        ExportRecord {
            id: self.id.as_deref(),
            name: self.name.as_deref(),
            address: self.address.as_deref(),
            lat: self.lat(),
            lon: self.lon(),
            phones: self.phones.as_deref(),
            categories: self.categories.as_deref(),
            hours_text: self.hours_text.as_deref(),
            site_url: self.site_url.as_deref(),
        }
    }
}

/// Row written to the CSV and JSON exports. Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord<'a> {
    pub id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub address: Option<&'a str>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub phones: Option<&'a str>,
    pub categories: Option<&'a str>,
    pub hours_text: Option<&'a str>,
    pub site_url: Option<&'a str>,
}

/// Column names of the export, in order.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "address",
    "lat",
    "lon",
    "phones",
    "categories",
    "hours_text",
    "site_url",
];

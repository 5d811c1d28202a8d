//! Preset search regions.
//!
//! Each region is a country-sized bounding box selected by a short code.

use crate::error::ConfigError;
use crate::models::BoundingBox;

/// A predefined search area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub code: &'static str,
    /// Human-readable name for menus
    pub label: &'static str,
    /// (min_lon, min_lat, max_lon, max_lat)
    bounds: (f64, f64, f64, f64),
}

impl Region {
    pub fn bbox(&self) -> Result<BoundingBox, ConfigError> {
        let (min_lon, min_lat, max_lon, max_lat) = self.bounds;
        BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
    }
}

/// Supported regions, sorted by code.
pub const REGIONS: &[Region] = &[
    Region {
        code: "AM",
        label: "Армения",
        bounds: (43.4, 38.8, 46.7, 41.3),
    },
    Region {
        code: "AZ",
        label: "Азербайджан",
        bounds: (44.8, 38.4, 51.9, 41.9),
    },
    Region {
        code: "BY",
        label: "Беларусь",
        bounds: (23.1, 51.2, 32.8, 56.2),
    },
    Region {
        code: "GE",
        label: "Грузия",
        bounds: (39.9, 41.0, 46.8, 43.7),
    },
    Region {
        code: "KG",
        label: "Кыргызстан",
        bounds: (69.2, 39.2, 80.35, 43.35),
    },
    Region {
        code: "KZ",
        label: "Казахстан",
        bounds: (46.5, 40.56, 87.3, 55.6),
    },
    // Crosses the antimeridian; max_lon past 180 is a simplification.
    Region {
        code: "RU",
        label: "Россия",
        bounds: (19.6, 41.2, 190.0, 82.2),
    },
    Region {
        code: "TJ",
        label: "Таджикистан",
        bounds: (67.3, 36.6, 75.2, 41.1),
    },
    Region {
        code: "TM",
        label: "Туркменистан",
        bounds: (52.4, 35.1, 66.7, 42.8),
    },
    Region {
        code: "UA",
        label: "Украина",
        bounds: (22.1, 44.0, 40.3, 52.5),
    },
    Region {
        code: "UZ",
        label: "Узбекистан",
        bounds: (55.9, 37.2, 73.4, 46.8),
    },
];

/// Look up a region by code, ignoring case.
pub fn find_region(code: &str) -> Result<&'static Region, ConfigError> {
    let wanted = code.trim().to_uppercase();
    REGIONS
        .iter()
        .find(|r| r.code == wanted)
        .ok_or_else(|| ConfigError::UnsupportedRegion {
            code: code.to_string(),
            supported: supported_codes(),
        })
}

/// Resolve a region code straight to its bounding box.
pub fn region_bbox(code: &str) -> Result<BoundingBox, ConfigError> {
    find_region(code)?.bbox()
}

/// Comma-separated list of supported codes.
pub fn supported_codes() -> String {
    REGIONS
        .iter()
        .map(|r| r.code)
        .collect::<Vec<_>>()
        .join(", ")
}

//! Bounding boxes and the tiles derived from them.

use geo::{coord, Area, Rect};

use crate::error::ConfigError;

/// Axis-aligned box in degrees.
///
/// Always satisfies `min < max` on both axes; construct through [`BoundingBox::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, ConfigError> {
        let finite = [min_lon, min_lat, max_lon, max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite || min_lon >= max_lon || min_lat >= max_lat {
            return Err(ConfigError::InvalidBoundingBox {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            });
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// Planar area in square degrees.
    pub fn area(&self) -> f64 {
        self.to_rect().unsigned_area()
    }

    /// Encode as the search API's `bbox` parameter: `"lon1,lat1~lon2,lat2"`.
    ///
    /// Uses the shortest round-trip float form (`69.2`, `1.0`).
    pub fn to_query_param(&self) -> String {
        format!(
            "{:?},{:?}~{:?},{:?}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// One cell of the query plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// 0-based position in row-major order
    pub index: usize,
    pub bbox: BoundingBox,
}

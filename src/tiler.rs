//! Splits a search area into a grid of tiles.
//!
//! The search backend caps the number of results per query, so a large
//! region is queried as an N×N grid of smaller boxes.

use tracing::debug;

use crate::error::ConfigError;
use crate::models::{BoundingBox, Tile};

/// Divide `bbox` into `tiles_per_axis`² equal tiles.
///
/// Tiles are emitted row-major: south to north by latitude band, west to
/// east within a band. The last band on each axis is pinned to the parent's
/// max edge so the grid covers the box exactly.
pub fn generate_tiles(bbox: &BoundingBox, tiles_per_axis: usize) -> Result<Vec<Tile>, ConfigError> {
    if tiles_per_axis == 0 {
        return Err(ConfigError::InvalidTileCount(tiles_per_axis));
    }

    let n = tiles_per_axis;
    let lon_step = bbox.width() / n as f64;
    let lat_step = bbox.height() / n as f64;

    let lon_edge = |j: usize| {
        if j == n {
            bbox.max_lon()
        } else {
            bbox.min_lon() + j as f64 * lon_step
        }
    };
    let lat_edge = |i: usize| {
        if i == n {
            bbox.max_lat()
        } else {
            bbox.min_lat() + i as f64 * lat_step
        }
    };

    let mut tiles = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let tile_box = BoundingBox::new(lon_edge(j), lat_edge(i), lon_edge(j + 1), lat_edge(i + 1))?;
            tiles.push(Tile {
                index: tiles.len(),
                bbox: tile_box,
            });
        }
    }

    debug!(
        "Generated {} tiles of {:.4}° x {:.4}°",
        tiles.len(),
        lon_step,
        lat_step
    );

    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box(size: f64) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, size, size).unwrap()
    }

    #[test]
    fn test_zero_tiles_rejected() {
        let err = generate_tiles(&unit_box(1.0), 0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTileCount(0)));
    }

    #[test]
    fn test_single_tile_is_parent() {
        let bbox = BoundingBox::new(69.2, 39.2, 80.35, 43.35).unwrap();
        let tiles = generate_tiles(&bbox, 1).unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].bbox, bbox);
        assert_eq!(tiles[0].index, 0);
    }

    #[test]
    fn test_two_by_two_row_major() {
        let tiles = generate_tiles(&unit_box(2.0), 2).unwrap();
        let boxes: Vec<_> = tiles
            .iter()
            .map(|t| {
                (
                    t.bbox.min_lon(),
                    t.bbox.min_lat(),
                    t.bbox.max_lon(),
                    t.bbox.max_lat(),
                )
            })
            .collect();
        assert_eq!(
            boxes,
            vec![
                (0.0, 0.0, 1.0, 1.0),
                (1.0, 0.0, 2.0, 1.0),
                (0.0, 1.0, 1.0, 2.0),
                (1.0, 1.0, 2.0, 2.0),
            ]
        );
        let indices: Vec<_> = tiles.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_tiles_partition_parent() {
        let parent = BoundingBox::new(46.5, 40.56, 87.3, 55.6).unwrap();
        for n in [1, 3, 7, 12] {
            let tiles = generate_tiles(&parent, n).unwrap();
            assert_eq!(tiles.len(), n * n);

            let total: f64 = tiles.iter().map(|t| t.bbox.area()).sum();
            assert!((total - parent.area()).abs() < 1e-9 * parent.area());

            // Neighbours share edges exactly: no gaps, no overlaps.
            for i in 0..n {
                for j in 0..n {
                    let t = &tiles[i * n + j].bbox;
                    if j + 1 < n {
                        assert_eq!(t.max_lon(), tiles[i * n + j + 1].bbox.min_lon());
                    } else {
                        assert_eq!(t.max_lon(), parent.max_lon());
                    }
                    if i + 1 < n {
                        assert_eq!(t.max_lat(), tiles[(i + 1) * n + j].bbox.min_lat());
                    } else {
                        assert_eq!(t.max_lat(), parent.max_lat());
                    }
                    if j == 0 {
                        assert_eq!(t.min_lon(), parent.min_lon());
                    }
                    if i == 0 {
                        assert_eq!(t.min_lat(), parent.min_lat());
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic_order() {
        let parent = unit_box(5.0);
        assert_eq!(
            generate_tiles(&parent, 4).unwrap(),
            generate_tiles(&parent, 4).unwrap()
        );
    }
}

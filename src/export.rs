//! Heightmap export.

use image::{GrayImage, Luma};

use crate::terrain::TerrainGrid;

/// Grayscale image of the grid heights, one pixel per vertex.
///
/// Heights are normalized to the grid's own range; a flat grid is mid-gray.
pub fn heightmap_image(grid: &TerrainGrid) -> GrayImage {
    let heights: Vec<f32> = grid.heights().collect();
    let (lo, hi) = heights
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        });
    let span = hi - lo;
    let columns = grid.columns();

    GrayImage::from_fn(columns as u32, grid.rows() as u32, |x, y| {
        let h = heights[y as usize * columns + x as usize];
        let level = if span > f32::EPSILON {
            (h - lo) / span
        } else {
            0.5
        };
        Luma([(level * 255.0).round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TerrainParams;

    fn params() -> TerrainParams {
        TerrainParams {
            segments_x: 8,
            segments_z: 4,
            ..TerrainParams::default()
        }
    }

    #[test]
    fn test_image_dimensions() {
        let grid = TerrainGrid::new(&params());
        let image = heightmap_image(&grid);
        assert_eq!(image.dimensions(), (9, 5));
    }

    #[test]
    fn test_flat_grid_is_mid_gray() {
        let grid = TerrainGrid::new(&params());
        let image = heightmap_image(&grid);
        assert!(image.pixels().all(|p| p.0[0] == 128));
    }

    #[test]
    fn test_slope_spans_full_range() {
        let mut grid = TerrainGrid::new(&params());
        grid.set_heights(|x, _| x);
        let image = heightmap_image(&grid);
        assert_eq!(image.get_pixel(0, 0).0[0], 0);
        assert_eq!(image.get_pixel(8, 0).0[0], 255);
        assert_eq!(image.get_pixel(8, 4).0[0], 255);
    }
}

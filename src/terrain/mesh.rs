//! Terrain grid mesh with fixed planar layout and mutable heights.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::params::TerrainParams;

/// Vertex data for terrain mesh (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Fixed-resolution terrain grid.
///
/// Planar (x, z) coordinates are set at construction and never change; only
/// heights and normals are rewritten, always together.
pub struct TerrainGrid {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    columns: usize,
    rows: usize,
}

impl TerrainGrid {
    /// Create a flat grid centered on the origin in the XZ plane
    pub fn new(params: &TerrainParams) -> Self {
        let (segments_x, segments_z) = (params.segments_x, params.segments_z);
        let spacing_x = params.width_m / segments_x as f32;
        let spacing_z = params.depth_m / segments_z as f32;
        let half_width = params.width_m / 2.0;
        let half_depth = params.depth_m / 2.0;

        let mut vertices = Vec::with_capacity(params.vertex_count());
        let mut indices = Vec::with_capacity(segments_x * segments_z * 6);

        // Generate flat XZ plane grid
        for z in 0..=segments_z {
            for x in 0..=segments_x {
                let x_pos = x as f32 * spacing_x - half_width;
                let z_pos = z as f32 * spacing_z - half_depth;

                vertices.push(Vertex {
                    position: [x_pos, 0.0, z_pos],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / segments_x as f32, z as f32 / segments_z as f32],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding, facing +Y)
        let columns = segments_x + 1;
        for z in 0..segments_z {
            for x in 0..segments_x {
                let top_left = (z * columns + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * columns + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            columns,
            rows: segments_z + 1,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices per row (along X)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Vertex rows (along Z)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Current local heights in row-major order
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.vertices.iter().map(|v| v.position[1])
    }

    /// Rewrite every height from `height_fn(x, z)` and recompute normals
    pub fn set_heights(&mut self, mut height_fn: impl FnMut(f32, f32) -> f32) {
        for vertex in &mut self.vertices {
            vertex.position[1] = height_fn(vertex.position[0], vertex.position[2]);
        }
        self.recompute_normals();
    }

    /// Area-weighted smooth normals from the current heights
    fn recompute_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = [0.0; 3];
        }

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];

            let v0 = Vec3::from_array(self.vertices[i0].position);
            let v1 = Vec3::from_array(self.vertices[i1].position);
            let v2 = Vec3::from_array(self.vertices[i2].position);

            // Unnormalized cross product weights by triangle area
            let face_normal = (v1 - v0).cross(v2 - v0);

            for i in [i0, i1, i2] {
                let accumulated = Vec3::from_array(self.vertices[i].normal) + face_normal;
                self.vertices[i].normal = accumulated.to_array();
            }
        }

        for vertex in &mut self.vertices {
            vertex.normal = Vec3::from_array(vertex.normal)
                .try_normalize()
                .unwrap_or(Vec3::Y)
                .to_array();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TerrainParams {
        TerrainParams {
            segments_x: 8,
            segments_z: 4,
            width_m: 80.0,
            depth_m: 40.0,
            ..TerrainParams::default()
        }
    }

    #[test]
    fn test_terrain_grid_creation() {
        let params = small_params();
        let grid = TerrainGrid::new(&params);

        // Check vertex count: (segments_x + 1) * (segments_z + 1)
        assert_eq!(grid.vertices().len(), 9 * 5);
        assert_eq!(grid.columns(), 9);
        assert_eq!(grid.rows(), 5);

        // Check triangle count: segments^2 * 2 triangles * 3 indices
        assert_eq!(grid.indices().len(), 8 * 4 * 6);

        let first = grid.vertices()[0].position;
        let last = grid.vertices()[grid.vertices().len() - 1].position;
        assert_eq!(first, [-40.0, 0.0, -20.0]);
        assert_eq!(last, [40.0, 0.0, 20.0]);
    }

    #[test]
    fn test_flat_normals_point_up() {
        let mut grid = TerrainGrid::new(&small_params());
        grid.set_heights(|_, _| 3.0);
        for vertex in grid.vertices() {
            let n = Vec3::from_array(vertex.normal);
            assert!(n.abs_diff_eq(Vec3::Y, 1e-6), "normal {:?}", n);
        }
    }

    #[test]
    fn test_slope_tilts_normals() {
        let mut grid = TerrainGrid::new(&small_params());
        // Rises along +X, so normals lean toward -X
        grid.set_heights(|x, _| x);
        for vertex in grid.vertices() {
            let n = Vec3::from_array(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.x < 0.0 && n.y > 0.0);
            assert!((n.x + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_set_heights_keeps_planar_coordinates() {
        let mut grid = TerrainGrid::new(&small_params());
        let before: Vec<[f32; 2]> = grid
            .vertices()
            .iter()
            .map(|v| [v.position[0], v.position[2]])
            .collect();

        grid.set_heights(|x, z| (x * 0.1).sin() * z);

        let after: Vec<[f32; 2]> = grid
            .vertices()
            .iter()
            .map(|v| [v.position[0], v.position[2]])
            .collect();
        assert_eq!(before, after);
    }
}

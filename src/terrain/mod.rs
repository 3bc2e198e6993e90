//! Procedural terrain with optional audio-reactive deformation.

mod mesh;
mod system;

// Re-export public types
pub use mesh::{TerrainGrid, Vertex};
pub use system::TerrainDriver;

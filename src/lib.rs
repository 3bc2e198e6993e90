//! Bubblefield library - procedural terrain, floating bubbles and swaying
//! foliage, with optional audio-reactive deformation

pub mod audio;
pub mod bubbles;
pub mod error;
pub mod export;
pub mod foliage;
pub mod frame;
pub mod noise;
pub mod params;
pub mod scene;
pub mod terrain;

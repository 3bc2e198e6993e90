//! Parameter definitions with physical units and documented semantics.
//!
//! All tuning constants are extracted here with:
//! - Physical units (meters, seconds, radians, etc.)
//! - Documented ranges and meanings
//! - Construction-time validation

mod audio;
mod bubbles;
mod foliage;
mod scene;
mod terrain;

// Re-export all types
pub use audio::{AnalyserConfig, BandLayout};
pub use bubbles::{BubbleParams, SpawnVolume, TintRange};
pub use foliage::FoliageParams;
pub use scene::{ClockConfig, SceneConfig, ScenePreset, TimeBase};
pub use terrain::{Band, GainTable, NoiseParams, OctaveGain, TerrainParams, MAX_OCTAVES};

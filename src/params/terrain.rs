//! Terrain heightfield parameters and audio-reactive octave gains.

use crate::error::{require_positive, ConfigError};

/// Upper limit on octave count; beyond this the finest octaves are sub-pixel noise
pub const MAX_OCTAVES: usize = 16;

/// Fractal noise law shared by terrain build, reactive updates and foliage placement
#[derive(Debug, Clone)]
pub struct NoiseParams {
    /// Number of accumulated octaves (0 = flat ground)
    pub octaves: usize,

    /// Amplitude of the coarsest octave (meters)
    pub base_amplitude_m: f32,

    /// Spatial frequency of the coarsest octave (cycles per meter)
    pub base_frequency: f32,

    /// Amplitude decay per octave (dimensionless, 0 < p <= 1)
    pub persistence: f32,

    /// Frequency growth per octave (dimensionless, >= 1)
    pub lacunarity: f32,

    /// Perlin noise seed
    pub seed: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            base_amplitude_m: 18.0,
            base_frequency: 0.005, // ~200m wavelength rolling hills
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 42,
        }
    }
}

impl NoiseParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves > MAX_OCTAVES {
            return Err(ConfigError::TooLarge {
                name: "octaves",
                value: self.octaves,
                max: MAX_OCTAVES,
            });
        }
        require_positive("base_amplitude_m", self.base_amplitude_m)?;
        require_positive("base_frequency", self.base_frequency)?;
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "persistence",
                value: self.persistence,
                expected: "(0, 1]",
            });
        }
        if !(self.lacunarity >= 1.0 && self.lacunarity.is_finite()) {
            return Err(ConfigError::OutOfRange {
                name: "lacunarity",
                value: self.lacunarity,
                expected: "[1, inf)",
            });
        }
        Ok(())
    }
}

/// Terrain grid geometry
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Grid segments along X (vertices = segments + 1)
    pub segments_x: usize,

    /// Grid segments along Z (vertices = segments + 1)
    pub segments_z: usize,

    /// Total extent along X (meters)
    pub width_m: f32,

    /// Total extent along Z (meters)
    pub depth_m: f32,

    /// World-space elevation of the grid's zero height (meters)
    pub elevation_m: f32,

    pub noise: NoiseParams,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            segments_x: 128,
            segments_z: 128,
            width_m: 400.0,
            depth_m: 400.0,
            elevation_m: -15.0, // Sits below the bubble volume
            noise: NoiseParams::default(),
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments_x == 0 {
            return Err(ConfigError::ZeroCount { name: "segments_x" });
        }
        if self.segments_z == 0 {
            return Err(ConfigError::ZeroCount { name: "segments_z" });
        }
        require_positive("width_m", self.width_m)?;
        require_positive("depth_m", self.depth_m)?;
        if !self.elevation_m.is_finite() {
            return Err(ConfigError::NotFinite {
                name: "elevation_m",
                value: self.elevation_m,
            });
        }
        self.noise.validate()
    }

    /// Vertex count: (segments_x + 1) * (segments_z + 1)
    pub fn vertex_count(&self) -> usize {
        (self.segments_x + 1) * (self.segments_z + 1)
    }
}

/// Frequency band driving one octave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Bass,
    Mid,
    High,
}

/// Audio multiplier for one octave: `floor + energy(band) * weight * intensity`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctaveGain {
    pub band: Band,

    /// Multiplier with silent input
    pub floor: f32,

    /// Gain per unit band energy
    pub weight: f32,
}

/// Per-octave gain table, coarse octaves first.
///
/// Octaves past the end of the table reuse the last entry, so the finest
/// detail always follows the highest band.
#[derive(Debug, Clone)]
pub struct GainTable {
    pub octaves: Vec<OctaveGain>,
}

impl Default for GainTable {
    fn default() -> Self {
        Self {
            octaves: vec![
                // Bass drives large-scale undulation
                OctaveGain {
                    band: Band::Bass,
                    floor: 0.8,
                    weight: 1.5,
                },
                OctaveGain {
                    band: Band::Mid,
                    floor: 1.0,
                    weight: 1.0,
                },
                OctaveGain {
                    band: Band::Mid,
                    floor: 1.0,
                    weight: 0.8,
                },
                // High drives small-scale erratic detail
                OctaveGain {
                    band: Band::High,
                    floor: 1.0,
                    weight: 2.0,
                },
            ],
        }
    }
}

impl GainTable {
    /// Table where audio has no effect (all floors 1, all weights 0)
    pub fn unity() -> Self {
        let mut table = Self::default();
        for gain in &mut table.octaves {
            gain.floor = 1.0;
            gain.weight = 0.0;
        }
        table
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves.is_empty() {
            return Err(ConfigError::ZeroCount {
                name: "gain table octaves",
            });
        }
        for gain in &self.octaves {
            if !gain.floor.is_finite() || gain.floor < 0.0 {
                return Err(ConfigError::OutOfRange {
                    name: "octave gain floor",
                    value: gain.floor,
                    expected: "[0, inf)",
                });
            }
            if !gain.weight.is_finite() {
                return Err(ConfigError::NotFinite {
                    name: "octave gain weight",
                    value: gain.weight,
                });
            }
        }
        Ok(())
    }
}

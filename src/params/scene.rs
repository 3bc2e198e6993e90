//! Scene presets and frame clock configuration.

use super::{BubbleParams, FoliageParams, GainTable, TerrainParams, TintRange};
use crate::error::{require_positive, ConfigError};

/// How animation time advances each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeBase {
    /// Fixed increment per frame, independent of wall time
    FixedStep(f32),

    /// Accumulate the clamped measured delta
    Elapsed,
}

/// Frame clock configuration
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// Upper bound on a single frame delta (seconds)
    pub max_delta_s: f32,

    pub time_base: TimeBase,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_delta_s: 0.05,
            time_base: TimeBase::FixedStep(0.01),
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("max_delta_s", self.max_delta_s)?;
        if let TimeBase::FixedStep(step) = self.time_base {
            require_positive("time step", step)?;
        }
        Ok(())
    }
}

/// Composable scene configuration
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub terrain: TerrainParams,
    pub gains: GainTable,
    pub bubbles: BubbleParams,

    /// Foliage field, if this scene has one
    pub foliage: Option<FoliageParams>,

    /// Re-deform the terrain from live audio every frame
    pub audio_reactive: bool,

    pub clock: ClockConfig,

    /// Seed for all per-entity randomness
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        ScenePreset::Meadow.config()
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.gains.validate()?;
        self.bubbles.validate()?;
        if let Some(foliage) = &self.foliage {
            foliage.validate()?;
        }
        self.clock.validate()
    }
}

/// Named scene variants. They differ only in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    /// Static terrain and bubbles
    Bubbles,

    /// Static terrain, bubbles and a swaying grass field
    Meadow,

    /// Audio-reactive terrain with warm bubbles
    Pulse,
}

impl ScenePreset {
    pub fn config(self) -> SceneConfig {
        let mut config = SceneConfig {
            terrain: TerrainParams::default(),
            gains: GainTable::default(),
            bubbles: BubbleParams::default(),
            foliage: None,
            audio_reactive: false,
            clock: ClockConfig::default(),
            seed: 7,
        };

        match self {
            ScenePreset::Bubbles => {}
            ScenePreset::Meadow => {
                config.foliage = Some(FoliageParams::default());
            }
            ScenePreset::Pulse => {
                config.audio_reactive = true;
                config.bubbles.tint = TintRange::ember();
                config.clock.time_base = TimeBase::Elapsed;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for preset in [ScenePreset::Bubbles, ScenePreset::Meadow, ScenePreset::Pulse] {
            assert!(preset.config().validate().is_ok(), "{:?}", preset);
        }
    }

    #[test]
    fn test_only_pulse_is_reactive() {
        assert!(!ScenePreset::Bubbles.config().audio_reactive);
        assert!(!ScenePreset::Meadow.config().audio_reactive);
        assert!(ScenePreset::Pulse.config().audio_reactive);
        assert!(ScenePreset::Meadow.config().foliage.is_some());
    }

    #[test]
    fn test_clock_validation() {
        let mut clock = ClockConfig::default();
        clock.time_base = TimeBase::FixedStep(0.0);
        assert!(clock.validate().is_err());
    }
}

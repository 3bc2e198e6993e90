//! Frame clock and per-frame control state.

use std::time::Instant;

use crate::error::ConfigError;
use crate::params::{ClockConfig, TimeBase};

/// Timing for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Frames advanced so far, starting at 1
    pub frame: u64,
    /// Animation time
    pub time: f32,
    /// Clamped frame delta (seconds)
    pub delta: f32,
}

/// Produces monotonically increasing animation time with clamped deltas
pub struct FrameClock {
    config: ClockConfig,
    time: f32,
    frame: u64,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(config: ClockConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            time: 0.0,
            frame: 0,
            last: None,
        })
    }

    /// Advance by a measured delta in seconds, clamped to `[0, max_delta_s]`
    pub fn advance(&mut self, measured_s: f32) -> Tick {
        let measured = if measured_s.is_finite() {
            measured_s.max(0.0)
        } else {
            0.0
        };
        let delta = measured.min(self.config.max_delta_s);

        self.time += match self.config.time_base {
            TimeBase::FixedStep(step) => step,
            TimeBase::Elapsed => delta,
        };
        self.frame += 1;

        Tick {
            frame: self.frame,
            time: self.time,
            delta,
        }
    }

    /// Advance by the wall time since the previous call
    pub fn advance_now(&mut self) -> Tick {
        let now = Instant::now();
        let measured = self
            .last
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        self.advance(measured)
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Live-tunable controls, owned by the caller and passed into each frame
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    audio_intensity: f32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            audio_intensity: 1.0,
        }
    }
}

impl ControlState {
    /// Uniform multiplier on every octave's audio weight
    pub fn audio_intensity(&self) -> f32 {
        self.audio_intensity
    }

    pub fn set_audio_intensity(&mut self, value: f32) -> Result<(), ConfigError> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "audio_intensity",
                value,
                expected: "[0, inf)",
            });
        }
        self.audio_intensity = value;
        Ok(())
    }
}

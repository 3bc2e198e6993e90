//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use bubblefield::params::{SceneConfig, ScenePreset, TimeBase};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "bubblefield")]
#[command(about = "Headless driver for the bubblefield scene simulation", long_about = None)]
pub struct Args {
    /// Scene preset
    #[arg(long, value_enum, default_value_t = PresetArg::Meadow)]
    pub preset: PresetArg,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Override the preset's random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Capture the default microphone
    #[arg(long, conflicts_with = "wav")]
    pub mic: bool,

    /// Play a WAV file as the audio source
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Force audio-reactive terrain regardless of preset
    #[arg(long)]
    pub reactive: bool,

    /// Multiplier on every octave's audio weight
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    pub audio_intensity: f32,

    /// Fixed animation time step per frame (seconds).
    ///
    /// If omitted, the preset's time base is kept; --realtime switches it to
    /// measured time.
    #[arg(long, value_name = "SECONDS")]
    pub time_step: Option<f32>,

    /// Simulated frame delta (seconds); with --realtime, the pause between frames
    #[arg(long, value_name = "SECONDS", default_value_t = 0.016)]
    pub delta: f32,

    /// Pace frames against the wall clock
    #[arg(long)]
    pub realtime: bool,

    /// Write the final terrain heightmap as a grayscale PNG
    #[arg(long, value_name = "PATH")]
    pub heightmap: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetArg {
    Bubbles,
    Meadow,
    Pulse,
}

impl From<PresetArg> for ScenePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Bubbles => ScenePreset::Bubbles,
            PresetArg::Meadow => ScenePreset::Meadow,
            PresetArg::Pulse => ScenePreset::Pulse,
        }
    }
}

impl Args {
    /// Build the scene configuration from the preset plus overrides
    pub fn scene_config(&self) -> SceneConfig {
        let mut config = ScenePreset::from(self.preset).config();

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.reactive {
            config.audio_reactive = true;
        }
        if let Some(step) = self.time_step {
            config.clock.time_base = TimeBase::FixedStep(step);
        } else if self.realtime {
            config.clock.time_base = TimeBase::Elapsed;
        }

        config
    }

    /// Simulated frame delta, rejected unless finite and non-negative
    pub fn frame_delta(&self) -> Result<f32, String> {
        if self.delta.is_finite() && self.delta >= 0.0 {
            Ok(self.delta)
        } else {
            Err(format!("--delta must be finite and non-negative, got {}", self.delta))
        }
    }

    pub fn wants_audio(&self) -> bool {
        self.mic || self.wav.is_some()
    }
}

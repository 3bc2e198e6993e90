//! Bubblefield - headless scene driver
//!
//! Builds a scene from a preset, optionally listens to a microphone or WAV
//! file, runs a fixed number of frames and reports what happened.

mod cli;

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use bubblefield::audio::{MicrophoneCapture, WavFileSource};
use bubblefield::export::heightmap_image;
use bubblefield::frame::{ControlState, FrameClock};
use bubblefield::params::AnalyserConfig;
use bubblefield::scene::Scene;
use cli::Args;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.scene_config();
    let analyser = AnalyserConfig::default();

    let mut controls = ControlState::default();
    controls
        .set_audio_intensity(args.audio_intensity)
        .context("invalid --audio-intensity")?;

    let mut scene = Scene::new(&config, &analyser).context("failed to build scene")?;
    let mut clock = FrameClock::new(config.clock.clone()).context("invalid clock config")?;

    if args.wants_audio() && !scene.is_audio_reactive() {
        log::warn!("Audio source given but scene is static; pass --reactive to use it");
    }
    if args.mic {
        let capture = MicrophoneCapture::request(&analyser).context("failed to request capture")?;
        scene.attach_audio(Box::new(capture));
        log::info!("Microphone capture requested");
    } else if let Some(path) = &args.wav {
        let source = WavFileSource::open(path, &analyser)
            .with_context(|| format!("failed to open {}", path.display()))?;
        scene.attach_audio(Box::new(source));
        log::info!("Playing {}", path.display());
    }

    let delta = args.frame_delta().map_err(anyhow::Error::msg)?;
    let mut max_extent = 0.0f32;
    let mut peak_bass = 0.0f32;

    for _ in 0..args.frames {
        let tick = if args.realtime {
            thread::sleep(Duration::from_secs_f32(delta));
            clock.advance_now()
        } else {
            clock.advance(delta)
        };

        scene.update(&tick, &controls);

        max_extent = max_extent.max(scene.bubbles().extent());
        peak_bass = peak_bass.max(scene.bands().bass);

        if tick.frame % 100 == 0 {
            let bands = scene.bands();
            log::debug!(
                "frame {} t={:.2}s bands=({:.2}, {:.2}, {:.2})",
                tick.frame,
                tick.time,
                bands.bass,
                bands.mid,
                bands.high
            );
        }
    }

    let (lo, hi) = scene.terrain().height_range();
    log::info!(
        "Ran {} frames to t={:.2}s; terrain height {:.2}..{:.2} m; bubble extent {:.2} / {:.2} m; peak bass {:.2}",
        args.frames,
        clock.time(),
        lo,
        hi,
        max_extent,
        scene.bubbles().bounds(),
        peak_bass
    );
    if let Some(foliage) = scene.foliage() {
        log::info!("Foliage: {} instances posed", foliage.len());
    }

    if let Some(path) = &args.heightmap {
        heightmap_image(scene.terrain().grid())
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Heightmap written to {}", path.display());
    }

    scene.shutdown();
    Ok(())
}

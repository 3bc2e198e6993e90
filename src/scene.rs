//! Scene composition: one frame driver for every preset.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{BandEnergies, SpectrumExtractor, SpectrumSource};
use crate::bubbles::{BubbleInstance, BubbleSimulator};
use crate::error::ConfigError;
use crate::foliage::FoliageField;
use crate::frame::{ControlState, Tick};
use crate::params::{AnalyserConfig, SceneConfig};
use crate::terrain::TerrainDriver;

/// All simulation state for one scene, advanced once per frame
pub struct Scene {
    audio_reactive: bool,
    spectrum: SpectrumExtractor,
    terrain: TerrainDriver,
    bubbles: BubbleSimulator,
    foliage: Option<FoliageField>,
    bubble_instances: Vec<BubbleInstance>,
}

impl Scene {
    /// Build terrain, spawn bubbles and place foliage from `config`
    pub fn new(config: &SceneConfig, analyser: &AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        analyser.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);

        let terrain = TerrainDriver::build(&config.terrain, config.gains.clone())?;
        let bubbles = BubbleSimulator::spawn(&config.bubbles, &mut rng)?;
        let foliage = config
            .foliage
            .as_ref()
            .map(|params| {
                FoliageField::place(params, |x, z| terrain.ground_height(x, z), &mut rng)
            })
            .transpose()?;

        let mut bubble_instances = Vec::with_capacity(bubbles.len());
        bubbles.write_instances(&mut bubble_instances);

        log::info!(
            "Scene ready: {} bubbles, {} foliage instances, audio-reactive: {}",
            bubbles.len(),
            foliage.as_ref().map_or(0, |f| f.len()),
            config.audio_reactive
        );

        Ok(Self {
            audio_reactive: config.audio_reactive,
            spectrum: SpectrumExtractor::new(analyser),
            terrain,
            bubbles,
            foliage,
            bubble_instances,
        })
    }

    /// Attach an audio source; only read when the scene is audio-reactive
    pub fn attach_audio(&mut self, source: Box<dyn SpectrumSource>) {
        self.spectrum.attach(source);
    }

    /// Run one frame: spectrum, terrain, bubbles, foliage, in that order
    pub fn update(&mut self, tick: &Tick, controls: &ControlState) {
        if self.audio_reactive {
            let bands = self.spectrum.sample();
            self.terrain.update(&bands, controls.audio_intensity());
        }

        self.bubbles.update(tick.time);
        self.bubbles.write_instances(&mut self.bubble_instances);

        if let Some(foliage) = &mut self.foliage {
            foliage.update(tick.time);
        }
    }

    /// Release the audio source
    pub fn shutdown(&mut self) {
        self.spectrum.detach();
        log::debug!("Scene shut down");
    }

    pub fn is_audio_reactive(&self) -> bool {
        self.audio_reactive
    }

    pub fn bands(&self) -> BandEnergies {
        self.spectrum.bands()
    }

    pub fn spectrum(&self) -> &SpectrumExtractor {
        &self.spectrum
    }

    pub fn terrain(&self) -> &TerrainDriver {
        &self.terrain
    }

    pub fn bubbles(&self) -> &BubbleSimulator {
        &self.bubbles
    }

    pub fn bubble_instances(&self) -> &[BubbleInstance] {
        &self.bubble_instances
    }

    pub fn foliage(&self) -> Option<&FoliageField> {
        self.foliage.as_ref()
    }
}

//! Three-band energy extraction from a polled spectrum source.

use super::{BandEnergies, SourceStatus, SpectrumSource};
use crate::params::{AnalyserConfig, BandLayout};

/// Polls a capture source once per frame and keeps the latest band energies.
///
/// Without a ready source, sampling is a no-op and the previous energies
/// (initially zero) stay in place.
pub struct SpectrumExtractor {
    source: Option<Box<dyn SpectrumSource>>,
    magnitudes: Vec<f32>,
    layout: BandLayout,
    bass_split: f32,
    mid_split: f32,
    bands: BandEnergies,
    /// Reported failure of the attached source, warned about once
    failure: Option<String>,
}

impl SpectrumExtractor {
    pub fn new(config: &AnalyserConfig) -> Self {
        let bins = config.bin_count();
        Self {
            source: None,
            magnitudes: vec![0.0; bins],
            layout: BandLayout::new(bins, config.bass_split, config.mid_split),
            bass_split: config.bass_split,
            mid_split: config.mid_split,
            bands: BandEnergies::default(),
            failure: None,
        }
    }

    /// Attach a capture source, sizing the magnitude buffer to its bin count
    pub fn attach(&mut self, source: Box<dyn SpectrumSource>) {
        let bins = source.bin_count();
        self.magnitudes.clear();
        self.magnitudes.resize(bins, 0.0);
        self.layout = BandLayout::new(bins, self.bass_split, self.mid_split);
        self.failure = None;
        self.source = Some(source);
    }

    /// Drop the capture source, releasing its device
    pub fn detach(&mut self) {
        self.source = None;
    }

    pub fn is_ready(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|s| s.status() == SourceStatus::Ready)
    }

    pub fn layout(&self) -> &BandLayout {
        &self.layout
    }

    /// Failure reported by the attached source, if any
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Latest band energies
    pub fn bands(&self) -> BandEnergies {
        self.bands
    }

    /// Read the source and recompute band energies
    pub fn sample(&mut self) -> BandEnergies {
        let Some(source) = self.source.as_mut() else {
            return self.bands;
        };

        match source.status() {
            SourceStatus::Pending => {}
            SourceStatus::Failed => {
                if self.failure.is_none() {
                    let reason = source
                        .failure_reason()
                        .unwrap_or_else(|| "unknown error".to_string());
                    log::warn!(
                        "Audio source unavailable ({}), holding last band energies",
                        reason
                    );
                    self.failure = Some(reason);
                }
            }
            SourceStatus::Ready => {
                if source.read_magnitudes(&mut self.magnitudes) {
                    self.bands =
                        band_energies(&self.magnitudes, &self.layout, source.max_magnitude());
                }
            }
        }

        self.bands
    }
}

/// Mean magnitude of each band divided by `max_magnitude`, clamped to [0, 1]
pub fn band_energies(magnitudes: &[f32], layout: &BandLayout, max_magnitude: f32) -> BandEnergies {
    let band = |range: &std::ops::Range<usize>| -> f32 {
        let Some(slice) = magnitudes.get(range.clone()) else {
            return 0.0;
        };
        if slice.is_empty() || max_magnitude <= 0.0 {
            return 0.0;
        }
        let mean = slice.iter().sum::<f32>() / slice.len() as f32;
        (mean / max_magnitude).clamp(0.0, 1.0)
    };

    BandEnergies {
        bass: band(&layout.bass),
        mid: band(&layout.mid),
        high: band(&layout.high),
    }
}

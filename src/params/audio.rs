//! Audio analysis configuration.

use std::ops::Range;

use crate::error::ConfigError;

/// Spectrum analyser configuration with fractional band splits
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (must be power of 2; bins = fft_size / 2)
    pub fft_size: usize,

    /// Magnitude mapped to 0 (decibels)
    pub min_decibels: f32,

    /// Magnitude mapped to the byte maximum (decibels)
    pub max_decibels: f32,

    /// End of the bass band as a fraction of the bin count
    pub bass_split: f32,

    /// End of the mid band as a fraction of the bin count
    pub mid_split: f32,

    /// Reads per second assumed by file playback (sets the hop size)
    pub playback_rate_hz: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 256, // 128 bins
            min_decibels: -100.0,
            max_decibels: -30.0,
            bass_split: 0.15,
            mid_split: 0.5,
            playback_rate_hz: 60.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins produced per read
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(ConfigError::OutOfRange {
                name: "fft_size",
                value: self.fft_size as f32,
                expected: "powers of two >= 2",
            });
        }
        if !(self.min_decibels.is_finite()
            && self.max_decibels.is_finite()
            && self.min_decibels < self.max_decibels)
        {
            return Err(ConfigError::InvalidRange {
                name: "decibels",
                min: self.min_decibels,
                max: self.max_decibels,
            });
        }
        if !(self.bass_split > 0.0 && self.bass_split < self.mid_split && self.mid_split < 1.0) {
            return Err(ConfigError::InvalidRange {
                name: "band splits",
                min: self.bass_split,
                max: self.mid_split,
            });
        }
        if !(self.playback_rate_hz.is_finite() && self.playback_rate_hz > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "playback_rate_hz",
                value: self.playback_rate_hz,
            });
        }
        Ok(())
    }
}

/// Contiguous bin ranges for the three bands over `bins` frequency bins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandLayout {
    pub bass: Range<usize>,
    pub mid: Range<usize>,
    pub high: Range<usize>,
}

impl BandLayout {
    /// Split `[0, bins)` at `floor(bass_split * bins)` and `floor(mid_split * bins)`
    pub fn new(bins: usize, bass_split: f32, mid_split: f32) -> Self {
        let bass_end = ((bins as f32 * bass_split).floor() as usize).min(bins);
        let mid_end = ((bins as f32 * mid_split).floor() as usize).clamp(bass_end, bins);
        Self {
            bass: 0..bass_end,
            mid: bass_end..mid_end,
            high: mid_end..bins,
        }
    }
}

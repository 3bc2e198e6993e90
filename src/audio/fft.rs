//! Windowed FFT analyser producing byte-scale magnitudes.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::params::AnalyserConfig;

/// Largest magnitude produced by [`Analyser::analyse`]
pub const BYTE_MAX: f32 = 255.0;

/// Maps the trailing `fft_size` samples of a signal to `fft_size / 2` magnitudes.
///
/// Each bin is the decibel level of the normalized FFT magnitude, linearly
/// mapped so `min_decibels` is 0 and `max_decibels` is [`BYTE_MAX`].
pub struct Analyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    min_decibels: f32,
    max_decibels: f32,
}

impl Analyser {
    pub fn new(config: &AnalyserConfig) -> Self {
        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft,
            window: (0..size).map(|i| hann_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bin_count(&self) -> usize {
        self.window.len() / 2
    }

    /// Analyse `samples` (oldest first) into `out`.
    ///
    /// Only the newest `fft_size` samples are used; shorter input is
    /// zero-padded at the front. Writes `min(out.len(), bin_count)` bins.
    pub fn analyse(&mut self, samples: &[f32], out: &mut [f32]) {
        let size = self.fft_size();
        let recent = &samples[samples.len().saturating_sub(size)..];
        let pad = size - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let range = self.max_decibels - self.min_decibels;
        for (bin, value) in self.buffer.iter().zip(out.iter_mut()) {
            let magnitude = bin.norm() / size as f32;
            *value = if magnitude > 0.0 {
                let db = 20.0 * magnitude.log10();
                (BYTE_MAX * (db - self.min_decibels) / range).clamp(0.0, BYTE_MAX)
            } else {
                0.0
            };
        }
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quiet sine centered on a bin, so neighbouring bins stay below the byte ceiling
    fn tone(freq_bin: f32, size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| 0.001 * (2.0 * PI * freq_bin * i as f32 / size as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_silence_is_zero() {
        let config = AnalyserConfig::default();
        let mut analyser = Analyser::new(&config);
        let mut out = vec![1.0; analyser.bin_count()];
        analyser.analyse(&vec![0.0; config.fft_size], &mut out);
        assert!(out.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_tone_peaks_at_its_bin() {
        let config = AnalyserConfig::default();
        let mut analyser = Analyser::new(&config);
        let mut out = vec![0.0; analyser.bin_count()];
        analyser.analyse(&tone(40.0, config.fft_size), &mut out);

        let peak = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(40));
        assert!(out.iter().all(|&m| (0.0..=BYTE_MAX).contains(&m)));
    }

    #[test]
    fn test_short_input_is_padded() {
        let config = AnalyserConfig::default();
        let mut analyser = Analyser::new(&config);
        let mut out = vec![0.0; analyser.bin_count()];
        analyser.analyse(&[0.5; 10], &mut out);
        assert!(out.iter().all(|m| m.is_finite()));
    }
}

//! WAV file playback as a spectrum source for headless runs.

use std::path::Path;

use super::fft::{Analyser, BYTE_MAX};
use super::{SourceStatus, SpectrumSource};
use crate::error::CaptureError;
use crate::params::AnalyserConfig;

/// Loops a decoded WAV file, advancing one hop per read
pub struct WavFileSource {
    samples: Vec<f32>,
    cursor: usize,
    hop: usize,
    analyser: Analyser,
    window: Vec<f32>,
}

impl WavFileSource {
    /// Decode `path` to mono and prepare playback at `config.playback_rate_hz` reads per second
    pub fn open(path: impl AsRef<Path>, config: &AnalyserConfig) -> Result<Self, CaptureError> {
        let mut reader = hound::WavReader::open(path.as_ref())?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        log::info!(
            "Audio file: {} ({} samples @ {}Hz)",
            path.as_ref().display(),
            samples.len(),
            spec.sample_rate
        );

        Self::from_samples(samples, spec.sample_rate, config)
    }

    /// Build a source from mono samples already in memory
    pub fn from_samples(
        samples: Vec<f32>,
        sample_rate: u32,
        config: &AnalyserConfig,
    ) -> Result<Self, CaptureError> {
        if samples.is_empty() {
            return Err(CaptureError::EmptyFile);
        }
        let hop = ((sample_rate as f32 / config.playback_rate_hz).round() as usize).max(1);

        Ok(Self {
            samples,
            cursor: 0,
            hop,
            analyser: Analyser::new(config),
            window: Vec::with_capacity(config.fft_size),
        })
    }

    /// Playback position in samples
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl SpectrumSource for WavFileSource {
    fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    fn max_magnitude(&self) -> f32 {
        BYTE_MAX
    }

    fn status(&self) -> SourceStatus {
        SourceStatus::Ready
    }

    fn read_magnitudes(&mut self, out: &mut [f32]) -> bool {
        let len = self.samples.len();
        self.cursor = (self.cursor + self.hop) % len;

        // Window ending at the cursor, wrapping to the end of the file
        let size = self.analyser.fft_size().min(len);
        self.window.clear();
        let start = (self.cursor + len - size) % len;
        for i in 0..size {
            self.window.push(self.samples[(start + i) % len]);
        }

        self.analyser.analyse(&self.window, out);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{BandEnergies, SpectrumExtractor};
    use std::f32::consts::PI;

    #[test]
    fn test_empty_samples_rejected() {
        let result = WavFileSource::from_samples(Vec::new(), 44100, &AnalyserConfig::default());
        assert!(matches!(result, Err(CaptureError::EmptyFile)));
    }

    #[test]
    fn test_cursor_wraps() {
        let config = AnalyserConfig::default();
        let mut source = WavFileSource::from_samples(vec![0.1; 1000], 6000, &config).unwrap();
        let mut out = vec![0.0; source.bin_count()];
        for _ in 0..15 {
            assert!(source.read_magnitudes(&mut out));
        }
        // hop = 6000 / 60 = 100
        assert_eq!(source.position(), 500);
    }

    #[test]
    fn test_low_tone_lands_in_bass() {
        let config = AnalyserConfig::default();
        let sample_rate = 44100;
        // Bin 4 of a 256-point FFT
        let freq = 4.0 * sample_rate as f32 / config.fft_size as f32;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();

        let mut extractor = SpectrumExtractor::new(&config);
        extractor.attach(Box::new(
            WavFileSource::from_samples(samples, sample_rate as u32, &config).unwrap(),
        ));
        let bands = extractor.sample();
        assert_ne!(bands, BandEnergies::default());
        assert!(bands.bass > bands.high);
    }
}

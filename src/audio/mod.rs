//! Live audio capture and three-band spectrum extraction.
//!
//! Capture sources produce byte-scale frequency magnitudes; the extractor
//! reduces them to bass/mid/high energies in [0, 1] for the terrain driver.

mod capture;
mod fft;
mod file;
mod spectrum;

// Re-export public types
pub use capture::MicrophoneCapture;
pub use fft::{hann_window, Analyser, BYTE_MAX};
pub use file::WavFileSource;
pub use spectrum::{band_energies, SpectrumExtractor};

/// Audio frequency band energies, each normalized to [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandEnergies {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

/// Availability of a capture source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    /// Access requested but not yet granted
    Pending,
    Ready,
    /// Access denied or device failure; never retried
    Failed,
}

/// A pollable provider of frequency magnitudes, low bins first
pub trait SpectrumSource {
    /// Fixed number of bins written by each read
    fn bin_count(&self) -> usize;

    /// Largest magnitude a bin can hold
    fn max_magnitude(&self) -> f32;

    fn status(&self) -> SourceStatus;

    /// Description of the failure, when `status` is `Failed`
    fn failure_reason(&self) -> Option<String> {
        None
    }

    /// Fill `out` (length `bin_count`) with the latest magnitudes.
    ///
    /// Returns false without touching `out` when the source is not ready.
    fn read_magnitudes(&mut self, out: &mut [f32]) -> bool;
}

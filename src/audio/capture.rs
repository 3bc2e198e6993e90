//! Microphone capture on a background thread.
//!
//! Opening the input device may block on a permission prompt, so it happens
//! off the frame loop. The capture thread owns the stream for its whole life
//! and publishes readiness through an atomic status the frame loop polls.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::fft::{Analyser, BYTE_MAX};
use super::{SourceStatus, SpectrumSource};
use crate::error::{CaptureError, ConfigError};
use crate::params::AnalyserConfig;

const STATUS_PENDING: u8 = 0;
const STATUS_READY: u8 = 1;
const STATUS_FAILED: u8 = 2;

/// State shared between the frame loop, the capture thread and the device callback
struct Shared {
    status: AtomicU8,
    shutdown: AtomicBool,
    /// Mono samples, oldest first, trimmed to a few analysis windows
    samples: Mutex<Vec<f32>>,
    capacity: usize,
    /// Why the device could not be opened, once failed
    failure: Mutex<Option<String>>,
}

impl Shared {
    fn fail(&self, reason: String) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(reason);
        }
        self.status.store(STATUS_FAILED, Ordering::Release);
    }

    fn push_frames<T>(&self, data: &[T], channels: usize)
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let Ok(mut samples) = self.samples.lock() else {
            return;
        };
        for frame in data.chunks(channels.max(1)) {
            let sum: f32 = frame.iter().map(|&s| f32::from_sample(s)).sum();
            samples.push(sum / frame.len() as f32);
        }
        if samples.len() > self.capacity * 2 {
            let excess = samples.len() - self.capacity;
            samples.drain(0..excess);
        }
    }
}

/// Default input device feeding a spectrum analyser
pub struct MicrophoneCapture {
    shared: Arc<Shared>,
    thread: Option<thread::JoinHandle<()>>,
    analyser: Analyser,
    window: Vec<f32>,
}

impl MicrophoneCapture {
    /// Request access to the default input device.
    ///
    /// Returns immediately with a pending capture; the device is opened on a
    /// background thread. Failure is reported through [`SourceStatus::Failed`].
    pub fn request(config: &AnalyserConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shared = Arc::new(Shared {
            status: AtomicU8::new(STATUS_PENDING),
            shutdown: AtomicBool::new(false),
            samples: Mutex::new(Vec::with_capacity(config.fft_size * 2)),
            capacity: config.fft_size,
            failure: Mutex::new(None),
        });

        let thread_shared = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("audio-capture".into())
            .spawn(move || run_capture(thread_shared));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::debug!("Failed to spawn audio capture thread: {}", e);
                shared.fail(format!("failed to spawn capture thread: {}", e));
                None
            }
        };

        Ok(Self {
            shared,
            thread,
            analyser: Analyser::new(config),
            window: Vec::with_capacity(config.fft_size),
        })
    }
}

impl SpectrumSource for MicrophoneCapture {
    fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    fn max_magnitude(&self) -> f32 {
        BYTE_MAX
    }

    fn status(&self) -> SourceStatus {
        match self.shared.status.load(Ordering::Acquire) {
            STATUS_READY => SourceStatus::Ready,
            STATUS_FAILED => SourceStatus::Failed,
            _ => SourceStatus::Pending,
        }
    }

    fn failure_reason(&self) -> Option<String> {
        self.shared.failure.lock().ok().and_then(|f| f.clone())
    }

    fn read_magnitudes(&mut self, out: &mut [f32]) -> bool {
        if self.status() != SourceStatus::Ready {
            return false;
        }

        // Copy out under the lock, analyse after releasing it
        {
            let Ok(samples) = self.shared.samples.lock() else {
                return false;
            };
            let start = samples.len().saturating_sub(self.analyser.fft_size());
            self.window.clear();
            self.window.extend_from_slice(&samples[start..]);
        }

        self.analyser.analyse(&self.window, out);
        true
    }
}

impl Drop for MicrophoneCapture {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::warn!("Audio capture thread panicked");
            }
        }
    }
}

/// Capture thread body: open the stream, then hold it until shutdown
fn run_capture(shared: Arc<Shared>) {
    let stream = match open_input_stream(&shared) {
        Ok(stream) => stream,
        Err(e) => {
            log::debug!("Audio capture unavailable: {}", e);
            shared.fail(e.to_string());
            return;
        }
    };

    shared.status.store(STATUS_READY, Ordering::Release);

    while !shared.shutdown.load(Ordering::Acquire) {
        thread::park_timeout(Duration::from_millis(100));
    }

    drop(stream);
    log::debug!("Audio capture released");
}

fn open_input_stream(shared: &Arc<Shared>) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(CaptureError::NoInputDevice)?;

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::Config(e.to_string()))?;

    log::info!(
        "Audio input: {} @ {}Hz",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        supported.sample_rate().0
    );

    let config: cpal::StreamConfig = supported.config();
    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, shared),
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, shared),
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, shared),
        other => {
            return Err(CaptureError::Config(format!(
                "unsupported sample format {:?}",
                other
            )))
        }
    }?;

    stream
        .play()
        .map_err(|e| CaptureError::PlayStream(e.to_string()))?;

    Ok(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    shared: &Arc<Shared>,
) -> Result<cpal::Stream, CaptureError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels as usize;
    let shared = Arc::clone(shared);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| shared.push_frames(data, channels),
            |err| log::warn!("Audio input stream error: {}", err),
            None,
        )
        .map_err(|e| CaptureError::BuildStream(e.to_string()))
}

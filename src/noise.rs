//! Fractal noise heightfield shared by terrain, reactive updates and foliage.
//!
//! Each octave samples 2D Perlin noise at a growing frequency and shrinking
//! amplitude. The per-octave sample is confined to [-1, 1], so the sum of
//! octave amplitudes bounds the output magnitude.

use noise::{NoiseFn, Perlin};

use crate::error::ConfigError;
use crate::params::NoiseParams;

/// Immutable fractal noise sampler
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
    params: NoiseParams,
}

impl NoiseField {
    /// Create a sampler, rejecting parameters that could produce NaN or runaway growth
    pub fn new(params: NoiseParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            perlin: Perlin::new(params.seed),
            params,
        })
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Height at planar position (x, z) using unmodulated octave amplitudes
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.height_with_gains(x, z, &[])
    }

    /// Height with a per-octave amplitude multiplier.
    ///
    /// Octaves past the end of `gains` reuse its last entry. An empty slice
    /// leaves every octave unscaled.
    pub fn height_with_gains(&self, x: f32, z: f32, gains: &[f32]) -> f32 {
        let mut height = 0.0;
        let mut amplitude = self.params.base_amplitude_m;
        let mut frequency = self.params.base_frequency;

        for octave in 0..self.params.octaves {
            let gain = gains
                .get(octave)
                .or_else(|| gains.last())
                .copied()
                .unwrap_or(1.0);
            height += self.sample_octave(x * frequency, z * frequency) * amplitude * gain;
            amplitude *= self.params.persistence;
            frequency *= self.params.lacunarity;
        }

        height
    }

    /// Sum of octave amplitudes; no height exceeds this in magnitude
    pub fn amplitude_bound(&self) -> f32 {
        let mut bound = 0.0;
        let mut amplitude = self.params.base_amplitude_m;
        for _ in 0..self.params.octaves {
            bound += amplitude;
            amplitude *= self.params.persistence;
        }
        bound
    }

    fn sample_octave(&self, x: f32, z: f32) -> f32 {
        (self.perlin.get([x as f64, z as f64]) as f32).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> NoiseField {
        NoiseField::new(NoiseParams::default()).unwrap()
    }

    #[test]
    fn test_deterministic() {
        let a = field();
        let b = field();
        for &(x, z) in &[(0.0, 0.0), (13.7, -42.1), (199.9, 199.9), (-1e4, 3e3)] {
            assert_eq!(a.height_at(x, z), a.height_at(x, z));
            assert_eq!(a.height_at(x, z), b.height_at(x, z));
        }
    }

    #[test]
    fn test_height_bounded_by_octave_sum() {
        let noise = field();
        assert!((noise.amplitude_bound() - 33.75).abs() < 1e-4);

        let mut max_seen = 0.0f32;
        for i in -100..100 {
            for j in -100..100 {
                let h = noise.height_at(i as f32 * 3.7, j as f32 * 5.3);
                assert!(h.is_finite());
                assert!(h.abs() <= 33.75, "height {} out of bound", h);
                max_seen = max_seen.max(h.abs());
            }
        }
        // Terrain is not flat
        assert!(max_seen > 1.0);
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let mut params = NoiseParams::default();
        params.octaves = 0;
        let noise = NoiseField::new(params).unwrap();
        assert_eq!(noise.height_at(12.0, -7.5), 0.0);
        assert_eq!(noise.amplitude_bound(), 0.0);
    }

    #[test]
    fn test_unit_gains_match_plain_height() {
        let noise = field();
        for &(x, z) in &[(3.0, 4.0), (-120.5, 77.25)] {
            assert_eq!(
                noise.height_at(x, z),
                noise.height_with_gains(x, z, &[1.0, 1.0, 1.0, 1.0])
            );
        }
    }

    #[test]
    fn test_zero_gains_flatten() {
        let noise = field();
        assert_eq!(noise.height_with_gains(31.0, -17.0, &[0.0]), 0.0);
    }

    #[test]
    fn test_seed_changes_surface() {
        let mut params = NoiseParams::default();
        params.seed = 1;
        let other = NoiseField::new(params).unwrap();
        let base = field();
        let differs = (0..50).any(|i| {
            let x = i as f32 * 11.3;
            base.height_at(x, x * 0.5) != other.height_at(x, x * 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = NoiseParams::default();
        params.lacunarity = 0.0;
        assert!(NoiseField::new(params).is_err());
    }
}

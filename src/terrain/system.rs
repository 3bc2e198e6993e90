//! Terrain driver: static build and audio-reactive re-deformation.

use glam::{Mat4, Vec3};

use super::mesh::TerrainGrid;
use crate::audio::BandEnergies;
use crate::error::ConfigError;
use crate::noise::NoiseField;
use crate::params::{Band, GainTable, TerrainParams};

/// Owns the terrain grid and re-applies the noise law to it
pub struct TerrainDriver {
    grid: TerrainGrid,
    noise: NoiseField,
    gains: GainTable,
    elevation_m: f32,
    /// Per-octave amplitude multipliers from the last update
    octave_scales: Vec<f32>,
}

impl TerrainDriver {
    /// Build the grid and assign the unmodulated noise heights
    pub fn build(params: &TerrainParams, gains: GainTable) -> Result<Self, ConfigError> {
        params.validate()?;
        gains.validate()?;

        let noise = NoiseField::new(params.noise.clone())?;
        let mut grid = TerrainGrid::new(params);
        grid.set_heights(|x, z| noise.height_at(x, z));

        log::debug!(
            "Terrain built: {}x{} vertices, height bound {:.2}m",
            grid.columns(),
            grid.rows(),
            noise.amplitude_bound()
        );

        Ok(Self {
            grid,
            octave_scales: vec![1.0; params.noise.octaves],
            noise,
            gains,
            elevation_m: params.elevation_m,
        })
    }

    /// Re-deform every vertex with band-scaled octave amplitudes.
    ///
    /// Octave `o` uses gain table entry `o` (or the last entry):
    /// `floor + energy(band) * weight * audio_intensity`.
    pub fn update(&mut self, bands: &BandEnergies, audio_intensity: f32) {
        for (octave, scale) in self.octave_scales.iter_mut().enumerate() {
            let Some(gain) = self
                .gains
                .octaves
                .get(octave)
                .or_else(|| self.gains.octaves.last())
            else {
                continue;
            };
            let energy = match gain.band {
                Band::Bass => bands.bass,
                Band::Mid => bands.mid,
                Band::High => bands.high,
            };
            *scale = gain.floor + energy * gain.weight * audio_intensity;
        }

        let noise = &self.noise;
        let scales = &self.octave_scales;
        self.grid
            .set_heights(|x, z| noise.height_with_gains(x, z, scales));
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Multipliers applied by the last update (all 1.0 after build)
    pub fn octave_scales(&self) -> &[f32] {
        &self.octave_scales
    }

    /// World-space height of the unmodulated ground at (x, z)
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.elevation_m + self.noise.height_at(x, z)
    }

    /// Places the local grid at the configured elevation
    pub fn model_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.elevation_m, 0.0))
    }

    /// (min, max) local height over the grid
    pub fn height_range(&self) -> (f32, f32) {
        self.grid
            .heights()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
                (lo.min(h), hi.max(h))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TerrainParams {
        TerrainParams {
            segments_x: 32,
            segments_z: 32,
            ..TerrainParams::default()
        }
    }

    fn heights(driver: &TerrainDriver) -> Vec<f32> {
        driver.grid().heights().collect()
    }

    #[test]
    fn test_build_applies_noise() {
        let driver = TerrainDriver::build(&params(), GainTable::default()).unwrap();
        for vertex in driver.grid().vertices() {
            let [x, y, z] = vertex.position;
            assert_eq!(y, driver.noise().height_at(x, z));
        }
        let (lo, hi) = driver.height_range();
        assert!(hi > lo);
    }

    #[test]
    fn test_silent_unity_update_reproduces_build() {
        let mut driver = TerrainDriver::build(&params(), GainTable::unity()).unwrap();
        let built = heights(&driver);
        let normals: Vec<[f32; 3]> = driver.grid().vertices().iter().map(|v| v.normal).collect();

        driver.update(&BandEnergies::default(), 1.0);

        assert_eq!(heights(&driver), built);
        let updated: Vec<[f32; 3]> = driver.grid().vertices().iter().map(|v| v.normal).collect();
        assert_eq!(updated, normals);
    }

    #[test]
    fn test_silent_default_update_is_bounded() {
        let mut driver = TerrainDriver::build(&params(), GainTable::default()).unwrap();
        let bound = driver.noise().amplitude_bound();
        for _ in 0..10 {
            driver.update(&BandEnergies::default(), 1.0);
        }
        assert_eq!(driver.octave_scales()[0], 0.8);
        for h in heights(&driver) {
            assert!(h.is_finite() && h.abs() <= bound);
        }
        assert!(driver
            .grid()
            .vertices()
            .iter()
            .all(|v| v.normal.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_bass_scales_coarse_octave_only() {
        let mut driver = TerrainDriver::build(&params(), GainTable::default()).unwrap();
        driver.update(
            &BandEnergies {
                bass: 1.0,
                mid: 0.0,
                high: 0.0,
            },
            1.0,
        );
        assert_eq!(driver.octave_scales(), &[2.3, 1.0, 1.0, 1.0]);

        driver.update(
            &BandEnergies {
                bass: 0.0,
                mid: 0.0,
                high: 1.0,
            },
            0.5,
        );
        assert_eq!(driver.octave_scales(), &[0.8, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_intensity_zero_ignores_audio() {
        let mut driver = TerrainDriver::build(&params(), GainTable::default()).unwrap();
        let loud = BandEnergies {
            bass: 1.0,
            mid: 1.0,
            high: 1.0,
        };
        driver.update(&loud, 0.0);
        assert_eq!(driver.octave_scales(), &[0.8, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_update_recomputes_normals() {
        let mut driver = TerrainDriver::build(&params(), GainTable::default()).unwrap();
        let before: Vec<[f32; 3]> = driver.grid().vertices().iter().map(|v| v.normal).collect();
        driver.update(
            &BandEnergies {
                bass: 1.0,
                mid: 1.0,
                high: 1.0,
            },
            1.0,
        );
        let after: Vec<[f32; 3]> = driver.grid().vertices().iter().map(|v| v.normal).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_ground_height_includes_elevation() {
        let driver = TerrainDriver::build(&params(), GainTable::default()).unwrap();
        let (x, z) = (12.5, -40.0);
        assert_eq!(
            driver.ground_height(x, z),
            -15.0 + driver.noise().height_at(x, z)
        );
        let origin = driver.model_transform().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, -15.0, 0.0));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut bad = params();
        bad.segments_x = 0;
        assert!(TerrainDriver::build(&bad, GainTable::default()).is_err());
    }
}

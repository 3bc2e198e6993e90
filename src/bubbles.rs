//! Floating bubble population: drift, float oscillation and bounded wrap.
//!
//! Motion is per tick, not per second: each update applies one step of float,
//! drift and spin regardless of frame delta, so the animation speed follows
//! the frame clock's time base.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::error::ConfigError;
use crate::params::BubbleParams;

/// One bubble. Everything but position and rotation is fixed at spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    radius: f32,
    position: Vec3,
    velocity: Vec3,
    rotation_speed: Vec3,
    rotation: Vec3,
    float_offset: f32,
    float_speed: f32,
    float_amplitude: f32,
    tint: [u8; 3],
}

impl Bubble {
    fn random<R: Rng + ?Sized>(params: &BubbleParams, rng: &mut R) -> Self {
        let (spawn_min, spawn_max) = (params.spawn.min, params.spawn.max);
        let tint = params.tint;

        Self {
            radius: rng.gen_range(params.radius_range.0..=params.radius_range.1),
            position: Vec3::new(
                rng.gen_range(spawn_min[0]..=spawn_max[0]),
                rng.gen_range(spawn_min[1]..=spawn_max[1]),
                rng.gen_range(spawn_min[2]..=spawn_max[2]),
            ),
            velocity: Vec3::new(
                symmetric(rng, params.drift_speed),
                symmetric(rng, params.drift_speed),
                symmetric(rng, params.drift_speed),
            ),
            rotation_speed: Vec3::new(
                symmetric(rng, params.rotation_speed),
                symmetric(rng, params.rotation_speed),
                symmetric(rng, params.rotation_speed),
            ),
            rotation: Vec3::ZERO,
            float_offset: rng.gen_range(0.0..TAU),
            float_speed: rng.gen_range(params.float_speed_range.0..=params.float_speed_range.1),
            float_amplitude: rng
                .gen_range(params.float_amplitude_range.0..=params.float_amplitude_range.1),
            tint: [
                rng.gen_range(tint.red.0..=tint.red.1),
                rng.gen_range(tint.green.0..=tint.green.1),
                rng.gen_range(tint.blue.0..=tint.blue.1),
            ],
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Accumulated XYZ Euler rotation (radians, unbounded)
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn tint(&self) -> [u8; 3] {
        self.tint
    }

    /// Unit sphere scaled to radius, rotated, then translated
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.radius),
            Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            self.position,
        )
    }
}

/// Uniform sample in `[-width / 2, width / 2)`
fn symmetric<R: Rng + ?Sized>(rng: &mut R, width: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * width
}

/// Per-bubble instance record for the renderer
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BubbleInstance {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

/// Fixed-size bubble population
pub struct BubbleSimulator {
    bubbles: Vec<Bubble>,
    bounds: f32,
    reflect_factor: f32,
    float_x_scale: f32,
    float_y_scale: f32,
}

impl BubbleSimulator {
    /// Spawn `params.count` bubbles with independent random state
    pub fn spawn<R: Rng + ?Sized>(params: &BubbleParams, rng: &mut R) -> Result<Self, ConfigError> {
        params.validate()?;

        let bubbles = (0..params.count)
            .map(|_| Bubble::random(params, rng))
            .collect();

        Ok(Self {
            bubbles,
            bounds: params.bounds_m,
            reflect_factor: params.reflect_factor,
            float_x_scale: params.float_x_scale,
            float_y_scale: params.float_y_scale,
        })
    }

    /// Advance every bubble by one tick at animation time `time`
    pub fn update(&mut self, time: f32) {
        for bubble in &mut self.bubbles {
            let phase = time * bubble.float_speed + bubble.float_offset;
            bubble.position.y += phase.sin() * self.float_y_scale * bubble.float_amplitude;
            bubble.position.x += (time * bubble.float_speed * 0.7 + bubble.float_offset).cos()
                * self.float_x_scale
                * bubble.float_amplitude;

            bubble.position += bubble.velocity;
            bubble.rotation += bubble.rotation_speed;

            // Lossy reflect toward the origin, per axis
            for axis in 0..3 {
                if bubble.position[axis].abs() > self.bounds {
                    bubble.position[axis] *= self.reflect_factor;
                }
            }
        }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Read-only access by index, for hit-testing
    pub fn bubble(&self, index: usize) -> Option<&Bubble> {
        self.bubbles.get(index)
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn bounds(&self) -> f32 {
        self.bounds
    }

    /// Largest absolute coordinate over all bubbles
    pub fn extent(&self) -> f32 {
        self.bubbles
            .iter()
            .map(|b| b.position.abs().max_element())
            .fold(0.0, f32::max)
    }

    /// Overwrite `out` with one instance record per bubble
    pub fn write_instances(&self, out: &mut Vec<BubbleInstance>) {
        out.clear();
        out.extend(self.bubbles.iter().map(|bubble| {
            let [r, g, b] = bubble.tint;
            BubbleInstance {
                model: bubble.model_matrix().to_cols_array_2d(),
                tint: [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 0.5],
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn simulator(count: usize, seed: u64) -> BubbleSimulator {
        let params = BubbleParams {
            count,
            ..BubbleParams::default()
        };
        BubbleSimulator::spawn(&params, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn still_bubble(position: Vec3) -> Bubble {
        Bubble {
            radius: 1.0,
            position,
            velocity: Vec3::ZERO,
            rotation_speed: Vec3::ZERO,
            rotation: Vec3::ZERO,
            float_offset: 0.0,
            float_speed: 1.0,
            float_amplitude: 0.0,
            tint: [255, 255, 255],
        }
    }

    #[test]
    fn test_spawn_respects_ranges() {
        let params = BubbleParams::default();
        let sim = simulator(200, 1);
        assert_eq!(sim.len(), 200);

        for bubble in sim.bubbles() {
            assert!((0.5..=3.0).contains(&bubble.radius));
            for axis in 0..3 {
                assert!(bubble.position[axis] >= params.spawn.min[axis]);
                assert!(bubble.position[axis] <= params.spawn.max[axis]);
                assert!(bubble.velocity[axis].abs() <= 0.01);
                assert!(bubble.rotation_speed[axis].abs() <= 0.005);
            }
            assert!((0.0..TAU).contains(&bubble.float_offset));
            assert!((0.5..=1.0).contains(&bubble.float_speed));
            assert!((0.5..=1.5).contains(&bubble.float_amplitude));
            assert!(bubble.tint[0] >= 173 && bubble.tint[1] <= 215 && bubble.tint[2] >= 216);
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let a = simulator(25, 99);
        let b = simulator(25, 99);
        assert_eq!(a.bubbles(), b.bubbles());
    }

    #[test]
    fn test_out_of_bounds_reflects() {
        let mut sim = simulator(1, 3);
        sim.bubbles[0] = still_bubble(Vec3::new(45.0, 0.0, 0.0));
        sim.update(0.0);
        assert_eq!(sim.bubbles()[0].position(), Vec3::new(-36.0, 0.0, 0.0));
    }

    #[test]
    fn test_at_bounds_not_reflected() {
        let mut sim = simulator(1, 3);
        sim.bubbles[0] = still_bubble(Vec3::new(40.0, -40.0, 12.0));
        sim.update(0.0);
        assert_eq!(sim.bubbles()[0].position(), Vec3::new(40.0, -40.0, 12.0));
    }

    #[test]
    fn test_axes_reflect_independently() {
        let mut sim = simulator(1, 3);
        sim.bubbles[0] = still_bubble(Vec3::new(10.0, -50.0, 41.0));
        sim.update(0.0);
        let p = sim.bubbles()[0].position();
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 40.0);
        assert!((p.z + 32.8).abs() < 1e-4);
    }

    #[test]
    fn test_float_step_order() {
        let mut sim = simulator(1, 3);
        let mut bubble = still_bubble(Vec3::ZERO);
        bubble.float_amplitude = 1.0;
        bubble.velocity = Vec3::new(0.001, 0.002, 0.003);
        bubble.rotation_speed = Vec3::splat(0.01);
        sim.bubbles[0] = bubble;

        let time = 0.5;
        sim.update(time);

        let b = &sim.bubbles()[0];
        let expected_y = (time * 1.0f32).sin() * 0.01 + 0.002;
        let expected_x = (time * 0.7f32).cos() * 0.008 + 0.001;
        assert!((b.position.y - expected_y).abs() < 1e-6);
        assert!((b.position.x - expected_x).abs() < 1e-6);
        assert!((b.position.z - 0.003).abs() < 1e-6);
        assert_eq!(b.rotation, Vec3::splat(0.01));
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut sim = simulator(5, 8);
        for _ in 0..100 {
            sim.update(0.0);
        }
        for bubble in sim.bubbles() {
            let expected = bubble.rotation_speed * 100.0;
            assert!(bubble.rotation.abs_diff_eq(expected, 1e-4));
        }
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let params = BubbleParams {
            bounds_m: 0.0,
            ..BubbleParams::default()
        };
        assert!(BubbleSimulator::spawn(&params, &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_write_instances() {
        let sim = simulator(25, 4);
        let mut instances = vec![BubbleInstance::zeroed(); 3];
        sim.write_instances(&mut instances);
        assert_eq!(instances.len(), 25);

        let model = Mat4::from_cols_array_2d(&instances[0].model);
        let origin = model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(sim.bubbles()[0].position(), 1e-5));
        assert_eq!(instances[0].tint[3], 0.5);
    }
}

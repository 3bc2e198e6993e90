//! Instanced foliage: ground-anchored blades with phase-shifted sway.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

use crate::error::ConfigError;
use crate::params::FoliageParams;

/// Placement of one blade. Never mutated after placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoliageInstance {
    pub index: usize,
    pub ground_x: f32,
    pub ground_z: f32,
    /// World-space ground height cached at placement
    pub base_height: f32,
    pub rotation_y: f32,
    pub scale: f32,
    pub phase: f32,
    pub sway_speed: f32,
}

impl FoliageInstance {
    /// X-axis tilt at animation time `time`
    pub fn sway_angle(&self, time: f32, amplitude: f32) -> f32 {
        (time * self.sway_speed + self.phase).sin() * amplitude
    }

    /// Pose at `time`, derived only from the fixed placement fields
    pub fn pose(&self, time: f32, amplitude: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(
                EulerRot::XYZ,
                self.sway_angle(time, amplitude),
                self.rotation_y,
                0.0,
            ),
            Vec3::new(self.ground_x, self.base_height, self.ground_z),
        )
    }
}

/// Per-instance model matrix for the renderer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

/// Foliage field with a preallocated transform buffer
pub struct FoliageField {
    instances: Vec<FoliageInstance>,
    transforms: Vec<InstanceTransform>,
    sway_amplitude: f32,
}

impl FoliageField {
    /// Scatter `params.count` blades, caching `ground_height(x, z)` for each
    pub fn place<R, F>(
        params: &FoliageParams,
        ground_height: F,
        rng: &mut R,
    ) -> Result<Self, ConfigError>
    where
        R: Rng + ?Sized,
        F: Fn(f32, f32) -> f32,
    {
        params.validate()?;

        let instances: Vec<FoliageInstance> = (0..params.count)
            .map(|index| {
                let ground_x = rng.gen_range(params.area_x.0..=params.area_x.1);
                let ground_z = rng.gen_range(params.area_z.0..=params.area_z.1);
                FoliageInstance {
                    index,
                    ground_x,
                    ground_z,
                    base_height: ground_height(ground_x, ground_z),
                    rotation_y: rng.gen_range(0.0..TAU),
                    scale: rng.gen_range(params.scale_range.0..=params.scale_range.1),
                    phase: rng.gen_range(0.0..TAU),
                    sway_speed: rng
                        .gen_range(params.sway_speed_range.0..=params.sway_speed_range.1),
                }
            })
            .collect();

        let mut field = Self {
            transforms: vec![InstanceTransform::zeroed(); instances.len()],
            instances,
            sway_amplitude: params.sway_amplitude,
        };
        field.update(0.0);

        log::debug!("Foliage placed: {} instances", field.len());
        Ok(field)
    }

    /// Re-pose every blade for animation time `time`, in place
    pub fn update(&mut self, time: f32) {
        let amplitude = self.sway_amplitude;
        for (instance, transform) in self.instances.iter().zip(self.transforms.iter_mut()) {
            transform.model = instance.pose(time, amplitude).to_cols_array_2d();
        }
    }

    pub fn instances(&self) -> &[FoliageInstance] {
        &self.instances
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn sway_amplitude(&self) -> f32 {
        self.sway_amplitude
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

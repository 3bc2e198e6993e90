//! Instanced foliage placement and sway parameters.

use crate::error::{require_positive, require_range, ConfigError};

/// Foliage field parameters
#[derive(Debug, Clone)]
pub struct FoliageParams {
    /// Number of blades (one instance each)
    pub count: usize,

    /// Placement area along X (meters, min..max)
    pub area_x: (f32, f32),

    /// Placement area along Z (meters, min..max)
    pub area_z: (f32, f32),

    /// Uniform scale range per blade
    pub scale_range: (f32, f32),

    /// Sway speed range (radians per time unit)
    pub sway_speed_range: (f32, f32),

    /// Peak X-axis tilt (radians)
    pub sway_amplitude: f32,
}

impl Default for FoliageParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            area_x: (-200.0, 200.0),
            area_z: (-200.0, 0.0), // Only the half of the terrain in front of the camera
            scale_range: (1.6, 2.4),
            sway_speed_range: (0.5, 1.0),
            sway_amplitude: 0.15,
        }
    }
}

impl FoliageParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount {
                name: "foliage count",
            });
        }
        require_range("area_x", self.area_x.0, self.area_x.1)?;
        require_range("area_z", self.area_z.0, self.area_z.1)?;
        require_positive("area width", self.area_x.1 - self.area_x.0)?;
        require_positive("area depth", self.area_z.1 - self.area_z.0)?;
        require_range("scale_range", self.scale_range.0, self.scale_range.1)?;
        require_positive("scale_range min", self.scale_range.0)?;
        require_range(
            "sway_speed_range",
            self.sway_speed_range.0,
            self.sway_speed_range.1,
        )?;
        if !(self.sway_amplitude.is_finite() && self.sway_amplitude >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "sway_amplitude",
                value: self.sway_amplitude,
                expected: "[0, inf)",
            });
        }
        Ok(())
    }
}

//! Bubble population and float-motion parameters.

use crate::error::{require_positive, require_range, ConfigError};

/// Per-channel tint ranges (inclusive byte bounds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintRange {
    pub red: (u8, u8),
    pub green: (u8, u8),
    pub blue: (u8, u8),
}

impl Default for TintRange {
    /// Light blue to purple
    fn default() -> Self {
        Self {
            red: (173, 255),
            green: (144, 215),
            blue: (216, 255),
        }
    }
}

impl TintRange {
    /// Warm amber to rose, used by the reactive preset
    pub fn ember() -> Self {
        Self {
            red: (230, 255),
            green: (110, 190),
            blue: (90, 170),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, (lo, hi)) in [
            ("tint red", self.red),
            ("tint green", self.green),
            ("tint blue", self.blue),
        ] {
            if lo > hi {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: lo as f32,
                    max: hi as f32,
                });
            }
        }
        Ok(())
    }
}

/// Axis-aligned spawn volume (meters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnVolume {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Default for SpawnVolume {
    fn default() -> Self {
        Self {
            min: [-30.0, -20.0, -30.0],
            max: [30.0, 20.0, 10.0], // Shifted back 10m behind the origin
        }
    }
}

/// Bubble simulation parameters
#[derive(Debug, Clone)]
pub struct BubbleParams {
    /// Number of bubbles (fixed for the lifetime of the simulation)
    pub count: usize,

    /// Bubble radius range (meters)
    pub radius_range: (f32, f32),

    /// Where bubbles are spawned
    pub spawn: SpawnVolume,

    /// Half-extent of the cube bubbles are kept in (meters, per axis)
    pub bounds_m: f32,

    /// Factor applied to a coordinate that leaves the bounds (|f| < 1)
    pub reflect_factor: f32,

    /// Full width of the symmetric drift velocity range (meters per tick)
    pub drift_speed: f32,

    /// Full width of the symmetric rotation speed range (radians per tick)
    pub rotation_speed: f32,

    /// Float oscillation speed range (radians per time unit)
    pub float_speed_range: (f32, f32),

    /// Float oscillation amplitude range (dimensionless)
    pub float_amplitude_range: (f32, f32),

    /// Vertical float step per unit amplitude (meters per tick)
    pub float_y_scale: f32,

    /// Horizontal float step per unit amplitude (meters per tick)
    pub float_x_scale: f32,

    pub tint: TintRange,
}

impl Default for BubbleParams {
    fn default() -> Self {
        Self {
            count: 25,
            radius_range: (0.5, 3.0),
            spawn: SpawnVolume::default(),
            bounds_m: 40.0,
            reflect_factor: -0.8,
            drift_speed: 0.02,
            rotation_speed: 0.01,
            float_speed_range: (0.5, 1.0),
            float_amplitude_range: (0.5, 1.5),
            float_y_scale: 0.01,
            float_x_scale: 0.008,
            tint: TintRange::default(),
        }
    }
}

impl BubbleParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount {
                name: "bubble count",
            });
        }
        require_positive("bounds_m", self.bounds_m)?;
        require_range("radius_range", self.radius_range.0, self.radius_range.1)?;
        require_positive("radius_range min", self.radius_range.0)?;
        if !(self.reflect_factor.is_finite() && self.reflect_factor.abs() < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "reflect_factor",
                value: self.reflect_factor,
                expected: "(-1, 1)",
            });
        }
        for (name, value) in [
            ("drift_speed", self.drift_speed),
            ("rotation_speed", self.rotation_speed),
            ("float_y_scale", self.float_y_scale),
            ("float_x_scale", self.float_x_scale),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    expected: "[0, inf)",
                });
            }
        }
        require_range(
            "float_speed_range",
            self.float_speed_range.0,
            self.float_speed_range.1,
        )?;
        require_range(
            "float_amplitude_range",
            self.float_amplitude_range.0,
            self.float_amplitude_range.1,
        )?;

        for (axis, (lo, hi)) in ["x", "y", "z"]
            .into_iter()
            .zip(self.spawn.min.into_iter().zip(self.spawn.max))
        {
            require_range("spawn volume", lo, hi)?;
            let extent = lo.abs().max(hi.abs());
            if extent > self.bounds_m {
                return Err(ConfigError::SpawnOutsideBounds {
                    axis,
                    extent,
                    bounds: self.bounds_m,
                });
            }
        }
        self.tint.validate()
    }
}

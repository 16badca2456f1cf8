use crate::paint::Color;

/// World node size in world units.
pub const BS: f32 = 10.0;

/// Fog end distance used instead of disabling fog.
pub const FOG_RANGE_ALL: f32 = 100_000.0 * BS;

/// Fog falloff curve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FogType {
    #[default]
    Linear,
    Exp,
    Exp2,
}

/// Fog state held by the video driver and read back by shader uniform setters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FogParams {
    pub color: Color,
    pub fog_type: FogType,
    pub start: f32,
    pub end: f32,
    pub density: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            color: Color::TRANSPARENT,
            fog_type: FogType::Linear,
            start: 0.0,
            end: FOG_RANGE_ALL,
            density: 0.0,
        }
    }
}

impl FogParams {
    /// Linear fog between `start` and `end`.
    pub fn linear(color: Color, start: f32, end: f32) -> Self {
        Self {
            color,
            start,
            end,
            ..Self::default()
        }
    }

    /// Shader parameter mapping view distance into the fog ramp.
    ///
    /// `1 / (1 - start / end)` for a positive `end`, otherwise 0.
    pub fn shading_parameter(&self) -> f32 {
        if self.end > 0.0 {
            1.0 / (1.0 - self.start / self.end)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fog_is_pushed_out_of_range() {
        assert_eq!(FogParams::default().end, 1_000_000.0);
    }

    #[test]
    fn shading_parameter_for_linear_ramp() {
        let fog = FogParams::linear(Color::WHITE, 50.0, 100.0);
        assert!((fog.shading_parameter() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn shading_parameter_is_zero_without_end() {
        let fog = FogParams::linear(Color::WHITE, 10.0, 0.0);
        assert_eq!(fog.shading_parameter(), 0.0);
    }
}

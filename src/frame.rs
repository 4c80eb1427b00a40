//! Per-frame transforms handed to the render sink.
//!
//! The cached field never moves on the CPU. Each frame the renderer gets a
//! rotation, a floating offset, the scale and a displayed color that eases
//! toward the state's target color.
//!
//! - rotation: `y += speed * dt * 0.5`, `x += speed * dt * 0.1`
//! - float: `offset_y = sin(elapsed * 0.5) * 0.5`
//! - color: `color = lerp(color, target, min(dt * rate, 1))`

use crate::color::Rgb;
use crate::state::RenderState;
use crate::time::Time;
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

const SPIN_Y: f32 = 0.5;
const SPIN_X: f32 = 0.1;
const FLOAT_FREQUENCY: f32 = 0.5;
const FLOAT_AMPLITUDE: f32 = 0.5;

/// Default color easing rate, in "fraction of the remaining gap" per second.
pub const DEFAULT_COLOR_LERP_RATE: f32 = 2.0;

/// What the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Rotation added this frame, in radians (x, y).
    pub rotation_delta_applied: Vec2,
    /// Accumulated rotation, in radians (x, y).
    pub rotation: Vec2,
    /// Vertical floating offset.
    pub offset_y: f32,
    pub current_scale: f32,
    /// Displayed color, on its way to the state's color.
    pub current_color: Rgb,
}

impl FrameUpdate {
    /// Model matrix: scale, then rotate (XYZ order), then float.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.current_scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0),
            Vec3::new(0.0, self.offset_y, 0.0),
        )
    }

    /// GPU-ready uniform block for this frame.
    pub fn uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            model: self.model_matrix().to_cols_array_2d(),
            color: self.current_color.to_array(),
            scale: self.current_scale,
        }
    }
}

/// Uniform block layout for the point renderer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub scale: f32,
}

/// Accumulates rotation and color easing across frames.
#[derive(Debug)]
pub struct FrameDriver {
    time: Time,
    rotation: Vec2,
    color: Rgb,
    color_lerp_rate: f32,
}

impl FrameDriver {
    /// Start with the displayed color already at `initial_color`.
    pub fn new(initial_color: Rgb, color_lerp_rate: f32) -> Self {
        Self {
            time: Time::new(),
            rotation: Vec2::ZERO,
            color: initial_color,
            color_lerp_rate,
        }
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Advance one frame of `delta_seconds` against the given snapshot.
    pub fn on_frame(&mut self, delta_seconds: f32, state: &RenderState) -> FrameUpdate {
        let dt = self.time.advance(delta_seconds);

        let applied = Vec2::new(
            state.rotation_speed * dt * SPIN_X,
            state.rotation_speed * dt * SPIN_Y,
        );
        self.rotation += applied;

        let t = (dt * self.color_lerp_rate).min(1.0);
        self.color = self.color.lerp(&state.color, t);

        FrameUpdate {
            rotation_delta_applied: applied,
            rotation: self.rotation,
            offset_y: (self.time.elapsed() * FLOAT_FREQUENCY).sin() * FLOAT_AMPLITUDE,
            current_scale: state.scale,
            current_color: self.color,
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(RenderState::default().color, DEFAULT_COLOR_LERP_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ParticleShape;

    #[test]
    fn test_rotation_increments() {
        let mut driver = FrameDriver::default();
        let state = RenderState {
            rotation_speed: 1.0,
            ..Default::default()
        };
        let update = driver.on_frame(0.5, &state);
        assert!((update.rotation_delta_applied.y - 0.25).abs() < 1e-6);
        assert!((update.rotation_delta_applied.x - 0.05).abs() < 1e-6);

        let update = driver.on_frame(0.5, &state);
        assert!((update.rotation.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_scale_passes_through() {
        let mut driver = FrameDriver::default();
        let state = RenderState {
            scale: 2.5,
            ..Default::default()
        };
        assert_eq!(driver.on_frame(0.016, &state).current_scale, 2.5);
    }

    #[test]
    fn test_color_eases_toward_target() {
        let mut driver = FrameDriver::new(Rgb::BLACK, DEFAULT_COLOR_LERP_RATE);
        let state = RenderState::default().with_color(Rgb::WHITE);

        let first = driver.on_frame(0.1, &state).current_color;
        assert!((first.r - 0.2).abs() < 1e-5);

        let second = driver.on_frame(0.1, &state).current_color;
        assert!(second.r > first.r && second.r < 1.0);
    }

    #[test]
    fn test_color_lerp_never_overshoots() {
        let mut driver = FrameDriver::new(Rgb::BLACK, DEFAULT_COLOR_LERP_RATE);
        let state = RenderState::default().with_color(Rgb::WHITE);
        // A long frame stall would give t = 4 without the clamp
        let color = driver.on_frame(2.0, &state).current_color;
        assert_eq!(color, Rgb::WHITE);
    }

    #[test]
    fn test_float_offset_follows_elapsed() {
        let mut driver = FrameDriver::default();
        let state = RenderState::default();
        let update = driver.on_frame(std::f32::consts::PI, &state);
        assert!((update.offset_y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_delta_is_still() {
        let mut driver = FrameDriver::default();
        let state = RenderState::default().with_shape(ParticleShape::Heart);
        let update = driver.on_frame(0.0, &state);
        assert_eq!(update.rotation, Vec2::ZERO);
        assert_eq!(update.current_color, RenderState::default().color);
        assert_eq!(update.offset_y, 0.0);
    }

    #[test]
    fn test_uniforms_layout() {
        let mut driver = FrameDriver::default();
        let state = RenderState {
            scale: 2.0,
            ..Default::default()
        };
        let uniforms = driver.on_frame(0.0, &state).uniforms();
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 80);
        assert_eq!(uniforms.model[0][0], 2.0);
        assert_eq!(uniforms.scale, 2.0);
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), 80);
    }
}

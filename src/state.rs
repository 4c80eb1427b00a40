//! Render state and the control reducer.
//!
//! [`RenderState`] is the full set of parameters the renderer reads each
//! frame. [`ControlDelta`] is one noisy, possibly partial adjustment coming
//! from the vision service. [`RenderState::apply`] folds a delta into a state
//! without side effects, so any sequence of deltas can be replayed in tests.
//!
//! # Update rule
//!
//! 1. `scale_delta` present: `scale = clamp(scale + delta, 0.1, 3.0)`.
//! 2. `rotation_delta` present: `rotation = clamp(rotation + delta, 0.1, 2.0)`,
//!    otherwise `rotation = max(0.1, rotation * 0.95)`.
//! 3. `detected_shape` naming a known shape (any case): switch shape and
//!    reset the color to the shape's default. Other strings are ignored.

use crate::color::Rgb;
use crate::generator::DEFAULT_PARTICLE_COUNT;
use crate::shape::ParticleShape;
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;
pub const MIN_ROTATION_SPEED: f32 = 0.1;
pub const MAX_ROTATION_SPEED: f32 = 2.0;
/// Per-delta multiplier applied to rotation speed when no rotation signal arrives.
pub const ROTATION_DECAY: f32 = 0.95;

pub const DEFAULT_SCALE: f32 = 1.0;
pub const DEFAULT_ROTATION_SPEED: f32 = 0.2;

/// Parameters driving the current frame.
///
/// Invariants after any sequence of [`RenderState::apply`] calls:
/// `scale ∈ [0.1, 3.0]`, `rotation_speed ∈ [0.1, 2.0]`. UI selections set
/// shape and color only, so they cannot break either bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub active_shape: ParticleShape,
    pub color: Rgb,
    pub scale: f32,
    pub rotation_speed: f32,
    pub particle_count: usize,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            active_shape: ParticleShape::Galaxy,
            color: ParticleShape::Galaxy.default_color(),
            scale: DEFAULT_SCALE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            particle_count: DEFAULT_PARTICLE_COUNT,
        }
    }
}

impl RenderState {
    /// Fold one control delta into this state.
    pub fn apply(mut self, delta: &ControlDelta) -> Self {
        if let Some(d) = delta.scale_delta.filter(|d| d.is_finite()) {
            self.scale = clamp_scale(self.scale + d);
        }

        match delta.rotation_delta.filter(|d| d.is_finite()) {
            Some(d) => self.rotation_speed = clamp_rotation(self.rotation_speed + d),
            None => {
                self.rotation_speed = (self.rotation_speed * ROTATION_DECAY).max(MIN_ROTATION_SPEED)
            }
        }

        if let Some(name) = delta.detected_shape.as_deref() {
            match ParticleShape::from_name(name) {
                Some(shape) => self = self.with_shape(shape),
                None => log::debug!("ignoring unmapped detected shape {:?}", name),
            }
        }

        self
    }

    /// Switch to `shape` and its default color.
    pub fn with_shape(mut self, shape: ParticleShape) -> Self {
        self.active_shape = shape;
        self.color = shape.default_color();
        self
    }

    /// Replace the color, keeping the shape.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

#[inline]
fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

#[inline]
fn clamp_rotation(speed: f32) -> f32 {
    speed.clamp(MIN_ROTATION_SPEED, MAX_ROTATION_SPEED)
}

/// One adjustment event from the vision service.
///
/// Every field is optional. Presence, not value, is what matters for
/// rotation: `rotation_delta: Some(0.0)` holds the speed steady while `None`
/// lets it decay. Non-finite numbers count as absent.
///
/// Decodes from the tool-call argument object:
///
/// ```ignore
/// let delta: ControlDelta = serde_json::from_str(r#"{"scaleDelta": 0.2}"#)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_delta: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_delta: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_shape: Option<String>,
}

impl ControlDelta {
    /// Delta carrying nothing; applying it only decays rotation.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn scale(delta: f32) -> Self {
        Self {
            scale_delta: Some(delta),
            ..Default::default()
        }
    }

    pub fn rotation(delta: f32) -> Self {
        Self {
            rotation_delta: Some(delta),
            ..Default::default()
        }
    }

    pub fn shape(name: impl Into<String>) -> Self {
        Self {
            detected_shape: Some(name.into()),
            ..Default::default()
        }
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.scale_delta.is_none() && self.rotation_delta.is_none() && self.detected_shape.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_default_state() {
        let state = RenderState::default();
        assert_eq!(state.active_shape, ParticleShape::Galaxy);
        assert_eq!(state.color.to_string(), "#00ffff");
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.rotation_speed, 0.2);
        assert_eq!(state.particle_count, 8000);
    }

    #[test]
    fn test_scale_clamps() {
        let state = RenderState::default();
        assert_eq!(state.apply(&ControlDelta::scale(10.0)).scale, MAX_SCALE);
        assert_eq!(state.apply(&ControlDelta::scale(-10.0)).scale, MIN_SCALE);
        assert!(approx(state.apply(&ControlDelta::scale(0.5)).scale, 1.5));
    }

    #[test]
    fn test_rotation_clamps() {
        let state = RenderState::default();
        assert_eq!(state.apply(&ControlDelta::rotation(50.0)).rotation_speed, MAX_ROTATION_SPEED);
        assert_eq!(state.apply(&ControlDelta::rotation(-50.0)).rotation_speed, MIN_ROTATION_SPEED);
        assert!(approx(state.apply(&ControlDelta::rotation(0.5)).rotation_speed, 0.7));
    }

    #[test]
    fn test_rotation_decays_when_absent() {
        let state = RenderState {
            rotation_speed: 1.0,
            ..Default::default()
        };
        let next = state.apply(&ControlDelta::scale(0.1));
        assert!(approx(next.rotation_speed, 0.95));
    }

    #[test]
    fn test_explicit_zero_rotation_holds_speed() {
        let state = RenderState {
            rotation_speed: 1.0,
            ..Default::default()
        };
        assert_eq!(state.apply(&ControlDelta::rotation(0.0)).rotation_speed, 1.0);
    }

    #[test]
    fn test_decay_floor() {
        let mut state = RenderState::default();
        for _ in 0..200 {
            state = state.apply(&ControlDelta::idle());
        }
        assert_eq!(state.rotation_speed, MIN_ROTATION_SPEED);
    }

    #[test]
    fn test_detected_shape_overrides_color() {
        let state = RenderState::default().with_color(Rgb::from_hex(0x123456));
        let next = state.apply(&ControlDelta::shape("heart"));
        assert_eq!(next.active_shape, ParticleShape::Heart);
        assert_eq!(next.color, ParticleShape::Heart.default_color());
    }

    #[test]
    fn test_unmapped_shape_ignored() {
        let state = RenderState::default().with_color(Rgb::from_hex(0x123456));
        let next = state.apply(&ControlDelta::shape("BANANA"));
        assert_eq!(next.active_shape, state.active_shape);
        assert_eq!(next.color, state.color);
    }

    #[test]
    fn test_padded_shape_name_ignored() {
        let state = RenderState::default();
        let next = state.apply(&ControlDelta::shape("  heart \n"));
        assert_eq!(next.active_shape, ParticleShape::Galaxy);
        assert_eq!(next.color, state.color);
    }

    #[test]
    fn test_non_finite_deltas_are_absent() {
        let state = RenderState::default();
        let next = state.apply(&ControlDelta {
            scale_delta: Some(f32::NAN),
            rotation_delta: Some(f32::INFINITY),
            detected_shape: None,
        });
        assert_eq!(next.scale, state.scale);
        assert!(approx(next.rotation_speed, 0.19));
    }

    #[test]
    fn test_delta_decodes_from_camel_case() {
        let delta: ControlDelta =
            serde_json::from_str(r#"{"scaleDelta": 0.2, "detectedShape": "HEART"}"#).unwrap();
        assert_eq!(delta.scale_delta, Some(0.2));
        assert_eq!(delta.rotation_delta, None);
        assert_eq!(delta.detected_shape.as_deref(), Some("HEART"));

        let empty: ControlDelta = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_value(RenderState::default()).unwrap();
        assert_eq!(json["activeShape"], "GALAXY");
        assert_eq!(json["color"], "#00ffff");
        assert_eq!(json["particleCount"], 8000);
    }
}

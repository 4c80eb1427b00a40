//! Session configuration.
//!
//! Serialized to JSON so a host can ship a config file next to the binary.
//! Every field has a default, so partial files load:
//!
//! ```json
//! { "particle_count": 12000, "initial_shape": "SATURN" }
//! ```

use crate::cache::Regeneration;
use crate::color::Rgb;
use crate::error::ConfigError;
use crate::frame::DEFAULT_COLOR_LERP_RATE;
use crate::generator::DEFAULT_PARTICLE_COUNT;
use crate::shape::ParticleShape;
use crate::state::{
    RenderState, DEFAULT_ROTATION_SPEED, DEFAULT_SCALE, MAX_ROTATION_SPEED, MAX_SCALE,
    MIN_ROTATION_SPEED, MIN_SCALE,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for the exchange with the gesture-recognition service.
///
/// The session reads `frames_per_second` and `status_hold_secs`. Frame size
/// and JPEG quality are validated here but consumed by the host, which owns
/// webcam capture and encoding.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisionConfig {
    /// Webcam frames sent per second.
    pub frames_per_second: f32,
    /// Width the host downscales webcam frames to before encoding.
    pub frame_width: u32,
    /// Height the host downscales webcam frames to before encoding.
    pub frame_height: u32,
    /// JPEG quality (0.0-1.0) the host encodes frames with.
    pub jpeg_quality: f32,
    /// Seconds an action summary stays in the status line.
    pub status_hold_secs: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 2.0,
            frame_width: 640,
            frame_height: 480,
            jpeg_quality: 0.6,
            status_hold_secs: 1.0,
        }
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Particles per field. Fixed for the session.
    pub particle_count: usize,
    pub initial_shape: ParticleShape,
    /// Starting color; the shape's default color when absent.
    pub initial_color: Option<Rgb>,
    pub initial_scale: f32,
    pub initial_rotation_speed: f32,
    /// How fast the displayed color eases toward the target, per second.
    pub color_lerp_rate: f32,
    pub regeneration: Regeneration,
    pub vision: VisionConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            initial_shape: ParticleShape::Galaxy,
            initial_color: None,
            initial_scale: DEFAULT_SCALE,
            initial_rotation_speed: DEFAULT_ROTATION_SPEED,
            color_lerp_rate: DEFAULT_COLOR_LERP_RATE,
            regeneration: Regeneration::Inline,
            vision: VisionConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the session can start with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::Invalid("particle_count must be at least 1".into()));
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.initial_scale) {
            return Err(ConfigError::Invalid(format!(
                "initial_scale {} outside [{}, {}]",
                self.initial_scale, MIN_SCALE, MAX_SCALE
            )));
        }
        if !(MIN_ROTATION_SPEED..=MAX_ROTATION_SPEED).contains(&self.initial_rotation_speed) {
            return Err(ConfigError::Invalid(format!(
                "initial_rotation_speed {} outside [{}, {}]",
                self.initial_rotation_speed, MIN_ROTATION_SPEED, MAX_ROTATION_SPEED
            )));
        }
        if !(self.color_lerp_rate.is_finite() && self.color_lerp_rate > 0.0) {
            return Err(ConfigError::Invalid("color_lerp_rate must be positive".into()));
        }

        let vision = &self.vision;
        if !(vision.frames_per_second.is_finite() && vision.frames_per_second > 0.0) {
            return Err(ConfigError::Invalid("vision.frames_per_second must be positive".into()));
        }
        if vision.frame_width == 0 || vision.frame_height == 0 {
            return Err(ConfigError::Invalid("vision frame size must be non-zero".into()));
        }
        if !(0.0..=1.0).contains(&vision.jpeg_quality) {
            return Err(ConfigError::Invalid("vision.jpeg_quality must be within [0, 1]".into()));
        }
        if !(vision.status_hold_secs.is_finite() && vision.status_hold_secs >= 0.0) {
            return Err(ConfigError::Invalid("vision.status_hold_secs must not be negative".into()));
        }
        Ok(())
    }

    /// Render state the session starts from.
    pub fn initial_state(&self) -> RenderState {
        RenderState {
            active_shape: self.initial_shape,
            color: self
                .initial_color
                .unwrap_or_else(|| self.initial_shape.default_color()),
            scale: self.initial_scale,
            rotation_speed: self.initial_rotation_speed,
            particle_count: self.particle_count,
        }
    }
}

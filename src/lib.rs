//! # Gesture Particles
//!
//! Gesture-driven 3D particle visualization core.
//!
//! A session keeps a fixed-size cloud of points arranged as one of a few
//! parametric shapes. Hand gestures, recognized by an external vision
//! service, arrive as small control deltas that grow or shrink the cloud,
//! spin it faster, or switch its shape. A UI may also pick the shape and
//! color directly. Rendering is left to the host: each frame it gets a flat
//! `f32` position buffer and a uniform block.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gesture_particles::prelude::*;
//!
//! let mut session = Session::new(SessionConfig::default())?;
//!
//! // From the vision client
//! session.apply_delta(&ControlDelta::scale(0.2));
//! session.apply_delta(&ControlDelta::shape("HEART"));
//!
//! // Every frame
//! let frame = session.on_frame(1.0 / 60.0)?;
//! upload(frame.field.as_flat());
//! draw(bytemuck::bytes_of(&frame.update.uniforms()));
//! ```
//!
//! ## Core Concepts
//!
//! ### Shapes
//!
//! [`ParticleShape`] names the five fields. Each has a point generator in
//! [`generator`], picked from a lookup table by the shape:
//!
//! | Shape | Layout |
//! |-------|--------|
//! | [`ParticleShape::Galaxy`] | three spiral arms in a disc |
//! | [`ParticleShape::Heart`] | heart curve with depth |
//! | [`ParticleShape::Flower`] | rose curve with noise |
//! | [`ParticleShape::Saturn`] | sphere plus a flat ring |
//! | [`ParticleShape::Fireworks`] | uniform ball |
//!
//! ### State
//!
//! [`RenderState`] is the single snapshot the renderer reads. It changes
//! only through [`RenderState::apply`] (deltas, clamped and decayed) or UI
//! selections, both routed through [`ControlStateIntegrator`].
//!
//! ### Frames
//!
//! Fields are regenerated only when the shape changes. Scale, rotation
//! and color are applied per frame by [`FrameDriver`] as a transform.

pub mod cache;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod generator;
pub mod integrator;
pub mod session;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod time;
pub mod vision;

pub use bytemuck;
pub use cache::{FieldCache, Regeneration};
pub use color::Rgb;
pub use config::{SessionConfig, VisionConfig};
pub use error::{ColorError, ConfigError, PayloadError, ShapeError};
pub use frame::{FrameDriver, FrameUniforms, FrameUpdate};
pub use generator::{generate, generate_named, generate_with, ParticleField};
pub use glam::{Vec2, Vec3};
pub use integrator::{ControlQueue, ControlSender, ControlStateIntegrator, Selection};
pub use session::{Frame, Session};
pub use shape::ParticleShape;
pub use spawn::Sampler;
pub use state::{ControlDelta, RenderState};
pub use time::Time;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use gesture_particles::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgb;
    pub use crate::config::SessionConfig;
    pub use crate::generator::{generate, ParticleField};
    pub use crate::session::{Frame, Session};
    pub use crate::shape::ParticleShape;
    pub use crate::state::{ControlDelta, RenderState};
    pub use crate::vision::{ToolCall, ToolResponse};
    pub use crate::{Vec2, Vec3};
}

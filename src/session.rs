//! A running visualization session.
//!
//! [`Session`] owns the integrator, the field cache and the frame driver,
//! and is what a host embeds:
//!
//! ```ignore
//! let mut session = Session::new(SessionConfig::default())?;
//!
//! // UI callbacks
//! session.select_shape(ParticleShape::Heart);
//!
//! // vision client (any thread)
//! let sender = session.control_sender();
//! sender.send(ControlDelta::scale(0.2));
//!
//! // render loop
//! let frame = session.on_frame(dt)?;
//! renderer.draw(frame.field.as_flat(), frame.update.uniforms());
//! ```

use crate::cache::{FieldCache, Regeneration};
use crate::color::Rgb;
use crate::config::SessionConfig;
use crate::error::{ConfigError, PayloadError, ShapeError};
use crate::frame::{FrameDriver, FrameUpdate};
use crate::generator::ParticleField;
use crate::integrator::{ControlQueue, ControlSender, ControlStateIntegrator, Selection};
use crate::shape::ParticleShape;
use crate::state::{ControlDelta, RenderState};
use crate::vision::{self, FrameThrottle, StatusLine, ToolCall, ToolResponse};

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct Frame<'a> {
    /// State snapshot after this frame's deltas.
    pub state: RenderState,
    /// Field to draw. During a background regeneration this is still the
    /// previous shape's field.
    pub field: &'a ParticleField,
    pub update: FrameUpdate,
    /// Whether `field` differs from the one drawn last frame.
    pub field_changed: bool,
}

pub struct Session {
    config: SessionConfig,
    integrator: ControlStateIntegrator,
    cache: FieldCache,
    driver: FrameDriver,
    queue: ControlQueue,
    status: StatusLine,
    throttle: FrameThrottle,
}

impl Session {
    /// Validate `config` and generate the initial field.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial = config.initial_state();
        let cache = FieldCache::new(initial.active_shape, config.particle_count)?;

        log::info!(
            "session started: {} particles, shape {}, {:?} regeneration",
            config.particle_count,
            initial.active_shape,
            config.regeneration
        );

        Ok(Self {
            integrator: ControlStateIntegrator::new(initial),
            cache,
            driver: FrameDriver::new(initial.color, config.color_lerp_rate),
            queue: ControlQueue::new(),
            status: StatusLine::new(config.vision.status_hold_secs),
            throttle: FrameThrottle::new(config.vision.frames_per_second),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current state snapshot.
    #[inline]
    pub fn state(&self) -> RenderState {
        self.integrator.state()
    }

    /// Most recently cached field.
    #[inline]
    pub fn field(&self) -> &ParticleField {
        self.cache.field()
    }

    /// Seconds of frame time since the session started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.driver.time().elapsed()
    }

    /// Frames run since the session started.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.driver.time().frame()
    }

    /// Control deltas folded into the state so far, from any source.
    #[inline]
    pub fn deltas_applied(&self) -> u64 {
        self.integrator.deltas_applied()
    }

    /// Status line text at the current frame time.
    pub fn status(&self) -> &str {
        self.status.text(self.elapsed())
    }

    /// Handle for delivering deltas from another thread.
    ///
    /// Queued deltas are applied at the start of the next frame, in the
    /// order they were sent.
    pub fn control_sender(&self) -> ControlSender {
        self.queue.sender()
    }

    /// Apply a delta immediately.
    pub fn apply_delta(&mut self, delta: &ControlDelta) -> RenderState {
        self.status.record(delta, self.elapsed());
        self.integrator.apply_delta(delta)
    }

    pub fn select_shape(&mut self, shape: ParticleShape) -> RenderState {
        self.integrator.apply_selection(Selection::Shape(shape))
    }

    pub fn select_color(&mut self, color: Rgb) -> RenderState {
        self.integrator.apply_selection(Selection::Color(color))
    }

    /// Apply a tool call from the vision service.
    ///
    /// Returns the acknowledgement to send back, or `None` for calls to
    /// unknown tools.
    pub fn handle_tool_call(&mut self, call: &ToolCall) -> Option<ToolResponse> {
        let (delta, response) = vision::handle_tool_call(call)?;
        self.apply_delta(&delta);
        Some(response)
    }

    /// Apply every tool call in a raw server message, in order.
    pub fn handle_server_message(&mut self, text: &str) -> Result<Vec<ToolResponse>, PayloadError> {
        let calls = vision::parse_server_message(text)?;
        Ok(calls
            .iter()
            .filter_map(|call| self.handle_tool_call(call))
            .collect())
    }

    /// Whether the host should send a webcam frame now.
    pub fn should_send_frame(&mut self) -> bool {
        let now = self.elapsed();
        self.throttle.should_send(now)
    }

    /// Advance one frame.
    ///
    /// Applies queued deltas, brings the field in line with the active
    /// shape, and computes this frame's transform.
    pub fn on_frame(&mut self, delta_seconds: f32) -> Result<Frame<'_>, ShapeError> {
        for delta in self.queue.drain() {
            self.apply_delta(&delta);
        }

        let state = self.integrator.state();
        let field_changed = match self.config.regeneration {
            Regeneration::Inline => {
                let before = self.cache.cached_shape();
                self.cache.get_or_generate(state.active_shape)?;
                before != state.active_shape
            }
            Regeneration::Background => {
                self.cache.request(state.active_shape);
                self.cache.poll(state.active_shape)
            }
        };

        let update = self.driver.on_frame(delta_seconds, &state);

        Ok(Frame {
            state,
            field: self.cache.field(),
            update,
            field_changed,
        })
    }
}

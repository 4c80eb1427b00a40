//! Control state integrator.
//!
//! Owns the single live [`RenderState`] and is its only writer. Two kinds of
//! input reach it:
//!
//! - **Deltas** from the vision service, folded in with clamping and decay
//!   via [`ControlStateIntegrator::apply_delta`].
//! - **Selections** from the UI, applied directly via
//!   [`ControlStateIntegrator::apply_selection`].
//!
//! Deltas produced on another thread go through a [`ControlQueue`]; the
//! render loop drains it before reading the snapshot, so a frame never sees
//! a half-applied delta.

use crate::color::Rgb;
use crate::shape::ParticleShape;
use crate::state::{ControlDelta, RenderState};
use std::sync::mpsc::{self, Receiver, Sender};

/// Direct UI selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Switch shape; the color resets to the shape's default.
    Shape(ParticleShape),
    /// Set the color, keeping the shape.
    Color(Rgb),
}

impl From<ParticleShape> for Selection {
    fn from(shape: ParticleShape) -> Self {
        Selection::Shape(shape)
    }
}

impl From<Rgb> for Selection {
    fn from(color: Rgb) -> Self {
        Selection::Color(color)
    }
}

/// Reducer owner for the session's render state.
#[derive(Debug, Clone)]
pub struct ControlStateIntegrator {
    state: RenderState,
    deltas_applied: u64,
}

impl ControlStateIntegrator {
    pub fn new(initial: RenderState) -> Self {
        Self {
            state: initial,
            deltas_applied: 0,
        }
    }

    /// Current snapshot.
    #[inline]
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Number of deltas folded in since creation.
    #[inline]
    pub fn deltas_applied(&self) -> u64 {
        self.deltas_applied
    }

    /// Fold a delta into the state and return the new snapshot.
    pub fn apply_delta(&mut self, delta: &ControlDelta) -> RenderState {
        let next = self.state.apply(delta);
        if next.active_shape != self.state.active_shape {
            log::debug!("shape detected: {} -> {}", self.state.active_shape, next.active_shape);
        }
        self.state = next;
        self.deltas_applied += 1;
        self.state
    }

    /// Apply a UI selection. Not clamped, does not decay rotation.
    pub fn apply_selection(&mut self, selection: impl Into<Selection>) -> RenderState {
        self.state = match selection.into() {
            Selection::Shape(shape) => self.state.with_shape(shape),
            Selection::Color(color) => self.state.with_color(color),
        };
        self.state
    }
}

impl Default for ControlStateIntegrator {
    fn default() -> Self {
        Self::new(RenderState::default())
    }
}

/// Single-writer queue for deltas arriving from other threads.
///
/// Deltas are applied in the order they were sent.
pub struct ControlQueue {
    tx: Sender<ControlDelta>,
    rx: Receiver<ControlDelta>,
}

impl ControlQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Handle for producers. Cheap to clone, can be moved to another thread.
    pub fn sender(&self) -> ControlSender {
        ControlSender { tx: self.tx.clone() }
    }

    /// Take every pending delta, oldest first.
    pub fn drain(&self) -> Vec<ControlDelta> {
        self.rx.try_iter().collect()
    }

    /// Apply every pending delta to `integrator`, oldest first.
    ///
    /// Returns how many deltas were applied.
    pub fn drain_into(&self, integrator: &mut ControlStateIntegrator) -> usize {
        let deltas = self.drain();
        for delta in &deltas {
            integrator.apply_delta(delta);
        }
        deltas.len()
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of a [`ControlQueue`].
#[derive(Clone)]
pub struct ControlSender {
    tx: Sender<ControlDelta>,
}

impl ControlSender {
    /// Queue a delta. Returns `false` once the queue has been dropped.
    pub fn send(&self, delta: ControlDelta) -> bool {
        self.tx.send(delta).is_ok()
    }
}

//! Frame timing.
//!
//! The host renderer owns the clock and hands a delta to every frame; `Time`
//! only accumulates it.
//!
//! # Example
//!
//! ```ignore
//! use gesture_particles::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In the render loop:
//! time.advance(1.0 / 60.0);
//!
//! println!("Elapsed: {:.2}s", time.elapsed());
//! println!("Frame: {}", time.frame());
//! ```

/// Elapsed time and frame count for the render loop.
#[derive(Debug, Clone, Default)]
pub struct Time {
    elapsed_secs: f32,
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a host-supplied delta. Call once per frame.
    ///
    /// Negative and non-finite deltas count as zero. Returns the delta used.
    pub fn advance(&mut self, delta: f32) -> f32 {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.frame_count += 1;
        self.elapsed_secs += delta;
        delta
    }

    /// Total elapsed time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

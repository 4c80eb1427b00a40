//! Single-entry memoization of the active particle field.
//!
//! Only one shape is ever on screen, so the cache holds exactly one
//! [`ParticleField`] and replaces it when the active shape changes. Color,
//! scale and rotation changes never touch it, and the particle count is
//! fixed for the cache's lifetime.
//!
//! Regeneration can run inline ([`FieldCache::get_or_generate`]) or on a
//! worker thread ([`FieldCache::request`] + [`FieldCache::poll`]). Every
//! background request carries a ticket. Only the result of the latest
//! request is installed, and only if its shape is still the active one;
//! results of superseded requests are dropped, even for the same shape.

use crate::error::ShapeError;
use crate::generator::{generate, ParticleField};
use crate::shape::ParticleShape;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

/// Where field regeneration runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regeneration {
    /// Generate on the calling thread, during the frame that changes shape.
    #[default]
    Inline,
    /// Generate on a worker thread; keep showing the previous field meanwhile.
    Background,
}

/// Cache holding the field for one shape at a fixed particle count.
pub struct FieldCache {
    count: usize,
    field: ParticleField,
    /// Shape and ticket of the latest background request still in flight.
    pending: Option<(ParticleShape, u64)>,
    next_ticket: u64,
    tx: Sender<(u64, ParticleField)>,
    rx: Receiver<(u64, ParticleField)>,
    discarded: u64,
}

impl FieldCache {
    /// Create the cache, generating the field for `shape` immediately.
    pub fn new(shape: ParticleShape, count: usize) -> Result<Self, ShapeError> {
        let field = generate(shape, count)?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            count,
            field,
            pending: None,
            next_ticket: 0,
            tx,
            rx,
            discarded: 0,
        })
    }

    /// Particle count of every field this cache produces.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The cached field. May belong to a previous shape while a background
    /// regeneration is in flight.
    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn cached_shape(&self) -> ParticleShape {
        self.field.shape()
    }

    /// Shape of the background regeneration in flight, if any.
    #[inline]
    pub fn pending(&self) -> Option<ParticleShape> {
        self.pending.map(|(shape, _)| shape)
    }

    /// Number of background results dropped because their shape was no
    /// longer active or a newer request replaced them.
    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Return the field for `shape`, regenerating inline on a key change.
    pub fn get_or_generate(&mut self, shape: ParticleShape) -> Result<&ParticleField, ShapeError> {
        if self.field.shape() != shape {
            self.field = generate(shape, self.count)?;
            self.pending = None;
        }
        Ok(&self.field)
    }

    /// Make sure a field for `shape` is cached or being generated.
    ///
    /// Does nothing if `shape` is already cached or is the latest request in
    /// flight. Any earlier request in flight is superseded.
    pub fn request(&mut self, shape: ParticleShape) {
        if self.field.shape() == shape {
            self.pending = None;
            return;
        }
        if self.pending() == Some(shape) {
            return;
        }

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let tx = self.tx.clone();
        let count = self.count;
        thread::spawn(move || match generate(shape, count) {
            // Receiver gone means the cache was dropped; nothing to deliver to
            Ok(field) => {
                let _ = tx.send((ticket, field));
            }
            Err(e) => log::error!("background generation of {} failed: {}", shape, e),
        });
        self.pending = Some((shape, ticket));
        log::debug!("requested background {} field", shape);
    }

    /// Install finished background results for `active`, dropping stale ones.
    ///
    /// Returns `true` if the cached field changed.
    pub fn poll(&mut self, active: ParticleShape) -> bool {
        let mut changed = false;
        while let Ok((ticket, field)) = self.rx.try_recv() {
            if self.pending.map(|(_, latest)| latest) != Some(ticket) {
                log::debug!("discarding superseded {} field", field.shape());
                self.discarded += 1;
                continue;
            }
            self.pending = None;
            changed |= self.install(field, active);
        }
        changed
    }

    /// Install `field` if it belongs to the active shape.
    ///
    /// A field for any other shape is discarded and `false` is returned.
    pub fn install(&mut self, field: ParticleField, active: ParticleShape) -> bool {
        if field.shape() != active || field.len() != self.count {
            log::debug!("discarding stale {} field (active: {})", field.shape(), active);
            self.discarded += 1;
            return false;
        }
        self.field = field;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(cache: &mut FieldCache, active: ParticleShape) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if cache.poll(active) {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_new_generates_initial_field() {
        let cache = FieldCache::new(ParticleShape::Heart, 100).unwrap();
        assert_eq!(cache.cached_shape(), ParticleShape::Heart);
        assert_eq!(cache.field().len(), 100);
        assert!(FieldCache::new(ParticleShape::Heart, 0).is_err());
    }

    #[test]
    fn test_same_shape_is_memoized() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 200).unwrap();
        let first = cache.field().clone();
        let again = cache.get_or_generate(ParticleShape::Galaxy).unwrap();
        assert_eq!(*again, first);
    }

    #[test]
    fn test_shape_change_regenerates() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 200).unwrap();
        let field = cache.get_or_generate(ParticleShape::Saturn).unwrap();
        assert_eq!(field.shape(), ParticleShape::Saturn);
        assert_eq!(field.len(), 200);
    }

    #[test]
    fn test_install_discards_stale_field() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 50).unwrap();
        let heart = generate(ParticleShape::Heart, 50).unwrap();
        assert!(!cache.install(heart, ParticleShape::Flower));
        assert_eq!(cache.cached_shape(), ParticleShape::Galaxy);
        assert_eq!(cache.discarded(), 1);

        let flower = generate(ParticleShape::Flower, 50).unwrap();
        assert!(cache.install(flower, ParticleShape::Flower));
        assert_eq!(cache.cached_shape(), ParticleShape::Flower);
    }

    #[test]
    fn test_install_rejects_wrong_count() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 50).unwrap();
        let heart = generate(ParticleShape::Heart, 51).unwrap();
        assert!(!cache.install(heart, ParticleShape::Heart));
    }

    #[test]
    fn test_background_request_installs() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 500).unwrap();
        cache.request(ParticleShape::Fireworks);
        assert_eq!(cache.pending(), Some(ParticleShape::Fireworks));
        // Repeated requests for the same shape do not spawn again
        cache.request(ParticleShape::Fireworks);

        assert!(wait_for(&mut cache, ParticleShape::Fireworks));
        assert_eq!(cache.cached_shape(), ParticleShape::Fireworks);
        assert_eq!(cache.pending(), None);
    }

    #[test]
    fn test_returning_to_shape_installs_only_latest_request() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 500).unwrap();
        cache.request(ParticleShape::Heart);
        cache.request(ParticleShape::Saturn);
        cache.request(ParticleShape::Heart);
        assert_eq!(cache.pending(), Some(ParticleShape::Heart));

        let mut installs = 0;
        let deadline = Instant::now() + Duration::from_secs(10);
        while (cache.discarded() < 2 || cache.pending().is_some()) && Instant::now() < deadline {
            if cache.poll(ParticleShape::Heart) {
                installs += 1;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(installs, 1);
        assert_eq!(cache.discarded(), 2);
        assert_eq!(cache.cached_shape(), ParticleShape::Heart);
    }

    #[test]
    fn test_result_dropped_after_switching_back_to_cached_shape() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 500).unwrap();
        cache.request(ParticleShape::Heart);
        cache.request(ParticleShape::Galaxy);
        assert_eq!(cache.pending(), None);

        let deadline = Instant::now() + Duration::from_secs(10);
        while cache.discarded() == 0 && Instant::now() < deadline {
            assert!(!cache.poll(ParticleShape::Heart));
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(cache.discarded(), 1);
        assert_eq!(cache.cached_shape(), ParticleShape::Galaxy);
    }

    #[test]
    fn test_background_result_for_abandoned_shape_is_dropped() {
        let mut cache = FieldCache::new(ParticleShape::Galaxy, 500).unwrap();
        cache.request(ParticleShape::Heart);
        // Shape switched back before the worker finished
        let deadline = Instant::now() + Duration::from_secs(10);
        while cache.discarded() == 0 && Instant::now() < deadline {
            cache.poll(ParticleShape::Galaxy);
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(cache.discarded(), 1);
        assert_eq!(cache.cached_shape(), ParticleShape::Galaxy);
    }
}

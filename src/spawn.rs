//! Sampling primitives shared by the shape generators.
//!
//! Every shape draws its points from the same handful of distributions;
//! [`Sampler`] wraps the RNG and exposes them by name.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Random source handed to the per-shape point functions.
///
/// ```ignore
/// let mut sampler = Sampler::new();
/// let p = sampler.random_in_sphere(4.0);
/// ```
pub struct Sampler {
    rng: SmallRng,
}

impl Sampler {
    /// Sampler seeded from OS entropy. Fields differ on every run.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Sampler with a fixed seed, for reproducible benchmarks and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random() * (max - min)
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    /// `1.0` or `-1.0` with equal probability.
    #[inline]
    pub fn random_sign(&mut self) -> f32 {
        if self.random() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }

    /// Signed jitter `±U³ * amplitude`, concentrated near zero.
    #[inline]
    pub fn cubed_jitter(&mut self, amplitude: f32) -> f32 {
        self.random().powi(3) * self.random_sign() * amplitude
    }

    // ========== Position helpers ==========

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Distribution is uniform throughout the volume: the polar angle comes
    /// from `acos(2v - 1)` and the radius from the cube root of a uniform draw.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.random_angle();
        let phi = (2.0 * self.random() - 1.0).acos();
        let r = self.random().cbrt() * radius;
        let sin_phi = phi.sin();

        Vec3::new(
            r * sin_phi * theta.cos(),
            r * sin_phi * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Random point on a flat annulus in the XZ plane.
    ///
    /// The radius is uniform in `[inner, outer)`, and `y` is uniform in
    /// `[-half_thickness, half_thickness)`.
    pub fn random_in_annulus(&mut self, inner: f32, outer: f32, half_thickness: f32) -> Vec3 {
        let r = self.random_range(inner, outer);
        let theta = self.random_angle();

        Vec3::new(
            r * theta.cos(),
            self.random_range(-half_thickness, half_thickness),
            r * theta.sin(),
        )
    }

    /// Random offset with each axis uniform in `[-half, half)`.
    pub fn random_in_cube(&mut self, half: f32) -> Vec3 {
        Vec3::new(
            self.random_range(-half, half),
            self.random_range(-half, half),
            self.random_range(-half, half),
        )
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

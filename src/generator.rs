//! Particle field generation for the named shapes.
//!
//! Each [`ParticleShape`] maps to a pure point function in a lookup table.
//! A point function receives the particle index and a [`Sampler`] and
//! returns one position; [`generate`] calls it once per particle.
//!
//! | Shape | Distribution |
//! |-------|--------------|
//! | [`ParticleShape::Galaxy`] | 3 spiral arms, radius `U(0,10)`, cubed jitter |
//! | [`ParticleShape::Heart`] | parametric heart curve, depth `U(-2,2)` |
//! | [`ParticleShape::Flower`] | rose curve `8cos(4θ)sinφ` on a sphere |
//! | [`ParticleShape::Saturn`] | 70% planet (r ≤ 4), 30% ring (6 ≤ r ≤ 12) |
//! | [`ParticleShape::Fireworks`] | uniform sphere, radius 10 |
//!
//! Generation is random on every call. Two fields for the same shape share
//! their statistical envelope but not their points.

use crate::error::ShapeError;
use crate::shape::ParticleShape;
use crate::spawn::Sampler;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Particle count used when the session config does not set one.
pub const DEFAULT_PARTICLE_COUNT: usize = 8000;

/// Number of spiral arms in the galaxy.
pub const GALAXY_BRANCHES: usize = 3;
/// Outer radius of the galaxy disk.
pub const GALAXY_RADIUS: f32 = 10.0;
/// Extra arm rotation per unit of radius.
pub const GALAXY_SPIN: f32 = 0.8;
const GALAXY_JITTER: f32 = 0.5;

const HEART_SCALE: f32 = 0.5;
const HEART_FUZZ: f32 = 0.25;
const HEART_DEPTH: f32 = 2.0;

const FLOWER_RADIUS: f32 = 8.0;
const FLOWER_PETALS: f32 = 4.0;
const FLOWER_NOISE: f32 = 0.5;

/// Radius of Saturn's planet body.
pub const SATURN_PLANET_RADIUS: f32 = 4.0;
/// Share of Saturn's particles that form the planet body.
pub const SATURN_PLANET_FRACTION: f32 = 0.7;
/// Inner radius of Saturn's ring.
pub const SATURN_RING_INNER: f32 = 6.0;
/// Outer radius of Saturn's ring.
pub const SATURN_RING_OUTER: f32 = 12.0;
/// Half thickness of Saturn's ring along Y.
pub const SATURN_RING_HALF_THICKNESS: f32 = 0.1;

/// Radius of the fireworks sphere.
pub const FIREWORKS_RADIUS: f32 = 10.0;

/// Computes the position of particle `index`.
pub type PointFn = fn(index: usize, sampler: &mut Sampler) -> Vec3;

/// Generator table, indexed by `ParticleShape as usize`.
const GENERATORS: [(ParticleShape, PointFn); 5] = [
    (ParticleShape::Galaxy, galaxy_point),
    (ParticleShape::Heart, heart_point),
    (ParticleShape::Flower, flower_point),
    (ParticleShape::Saturn, saturn_point),
    (ParticleShape::Fireworks, fireworks_point),
];

/// Point function for a shape.
pub fn point_fn(shape: ParticleShape) -> PointFn {
    GENERATORS[shape as usize].1
}

/// An ordered set of particle positions for one shape.
///
/// The positions are exposed both as `Vec3`s and as the flat `3 * count`
/// float buffer a vertex buffer expects.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    shape: ParticleShape,
    positions: Vec<Vec3>,
}

impl ParticleField {
    /// Shape this field was generated for.
    #[inline]
    pub fn shape(&self) -> ParticleShape {
        self.shape
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` buffer of length `3 * len()`.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the flat buffer, ready for a GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Distance from the origin to the farthest particle.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }
}

/// Generate `count` particles for `shape` using a fresh entropy-seeded sampler.
///
/// Returns [`ShapeError::InvalidCount`] when `count` is zero. No partial field
/// is ever returned.
pub fn generate(shape: ParticleShape, count: usize) -> Result<ParticleField, ShapeError> {
    generate_with(shape, count, &mut Sampler::new())
}

/// Generate a field drawing from the given sampler.
pub fn generate_with(
    shape: ParticleShape,
    count: usize,
    sampler: &mut Sampler,
) -> Result<ParticleField, ShapeError> {
    if count == 0 {
        return Err(ShapeError::InvalidCount(count));
    }

    let point = point_fn(shape);
    let positions: Vec<Vec3> = (0..count).map(|i| point(i, sampler)).collect();

    log::debug!("generated {} field with {} particles", shape, count);
    Ok(ParticleField { shape, positions })
}

/// Generate a field for a shape given by name (case-insensitive).
///
/// Unknown names are rejected with [`ShapeError::InvalidShape`]; they are
/// never replaced with a fallback shape.
pub fn generate_named(name: &str, count: usize) -> Result<ParticleField, ShapeError> {
    let shape: ParticleShape = name.parse()?;
    generate(shape, count)
}

// ========== Galaxy ==========

/// Arm angle for particle `index`: one of `0`, `2π/3`, `4π/3`.
#[inline]
pub fn galaxy_branch_angle(index: usize) -> f32 {
    (index % GALAXY_BRANCHES) as f32 / GALAXY_BRANCHES as f32 * TAU
}

/// Galaxy position for a given radius and jitter.
///
/// The Y jitter is doubled before use, the disk is otherwise flat.
pub fn galaxy_arm_point(index: usize, radius: f32, jitter: Vec3) -> Vec3 {
    let angle = galaxy_branch_angle(index) + radius * GALAXY_SPIN;
    Vec3::new(
        angle.cos() * radius + jitter.x,
        jitter.y * 2.0,
        angle.sin() * radius + jitter.z,
    )
}

fn galaxy_point(index: usize, sampler: &mut Sampler) -> Vec3 {
    let radius = sampler.random() * GALAXY_RADIUS;
    let jitter = Vec3::new(
        sampler.cubed_jitter(GALAXY_JITTER),
        sampler.cubed_jitter(GALAXY_JITTER),
        sampler.cubed_jitter(GALAXY_JITTER),
    );
    galaxy_arm_point(index, radius, jitter)
}

// ========== Heart ==========

/// Point on the heart curve at parameter `t`, before fuzz and depth.
pub fn heart_curve(t: f32) -> (f32, f32) {
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    (x * HEART_SCALE, y * HEART_SCALE)
}

fn heart_point(_index: usize, sampler: &mut Sampler) -> Vec3 {
    let t = sampler.random_angle();
    let (x, y) = heart_curve(t);
    Vec3::new(
        x + sampler.random_range(-HEART_FUZZ, HEART_FUZZ),
        y + sampler.random_range(-HEART_FUZZ, HEART_FUZZ),
        sampler.random_range(-HEART_DEPTH, HEART_DEPTH),
    )
}

// ========== Flower ==========

fn flower_point(_index: usize, sampler: &mut Sampler) -> Vec3 {
    let theta = sampler.random_angle();
    let phi = sampler.random() * PI;
    // Rose curve radius, negative lobes fold through the origin
    let r = FLOWER_RADIUS * (FLOWER_PETALS * theta).cos() * phi.sin();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    ) + sampler.random_in_cube(FLOWER_NOISE)
}

// ========== Saturn ==========

fn saturn_point(_index: usize, sampler: &mut Sampler) -> Vec3 {
    if sampler.random() < SATURN_PLANET_FRACTION {
        sampler.random_in_sphere(SATURN_PLANET_RADIUS)
    } else {
        sampler.random_in_annulus(SATURN_RING_INNER, SATURN_RING_OUTER, SATURN_RING_HALF_THICKNESS)
    }
}

// ========== Fireworks ==========

fn fireworks_point(_index: usize, sampler: &mut Sampler) -> Vec3 {
    sampler.random_in_sphere(FIREWORKS_RADIUS)
}

//! Geometry helpers shared by the turtle and the OBJ importer.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Axis-aligned bounds grown one point at a time.
///
/// Starts empty; [`BoundingBox::is_empty`] stays `true` until the first
/// [`include`](BoundingBox::include).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for p in points {
            bounds.include(*p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows the box component-wise to contain `p`.
    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn include_all(&mut self, points: &[Vec3]) {
        for &p in points {
            self.include(p);
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Translation that moves the center of the box onto the origin.
    pub fn centering_translation(&self) -> Vec3 {
        -self.center()
    }
}

/// Two mutually perpendicular vectors spanning the plane orthogonal to `axis`.
///
/// The first vector is built from a fixed-axis heuristic that switches form
/// when `axis` lies close to the XY plane, so it never collapses to zero for a
/// non-zero axis. Neither vector is normalized.
pub fn perpendicular_basis(axis: Vec3) -> (Vec3, Vec3) {
    let v1 = if axis.z.abs() > 0.01 {
        Vec3::new(axis.z, axis.z, -axis.x - axis.y)
    } else {
        Vec3::new(-axis.y - axis.z, axis.x, axis.x)
    };
    let v2 = v1.cross(axis);
    (v1, v2)
}

/// Samples `sides` points evenly on the circle of `radius` around `center`,
/// in the plane orthogonal to `axis`. Point `i` sits at angle `i * TAU / sides`.
pub fn ring_points(center: Vec3, axis: Vec3, radius: f32, sides: u32) -> Vec<Vec3> {
    let (v1, v2) = perpendicular_basis(axis);
    let u = v1.normalize_or_zero() * radius;
    let w = v2.normalize_or_zero() * radius;
    let step = TAU / sides as f32;

    (0..sides)
        .map(|i| {
            let (sin, cos) = (i as f32 * step).sin_cos();
            center + u * cos + w * sin
        })
        .collect()
}

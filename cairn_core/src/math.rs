// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal 3-D vector and column-major 4×4 transform.
//!
//! These types cover the subset of 3-D math that debug geometry assembly
//! actually needs (vertex arithmetic, cross products, point transforms and
//! the `(x, z)` projection used by 2-D maps) without pulling in a full
//! linear-algebra crate. 2-D geometry uses [`kurbo`] directly.

use core::ops::{Add, Mul, Neg, Sub};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point};

/// A 3-D vector or point with `f32` components.
///
/// `#[repr(C)]` and [`bytemuck::Pod`] so vertex buffers can be handed to a
/// GPU backend as raw bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// The default navigation up vector `(0, 1, 0)`.
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    /// Creates a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Cross product `self × rhs`.
    #[inline]
    #[must_use]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        let len = f64::from(self.dot(self)).sqrt();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length of an f32 vector fits in f32"
        )]
        let len = len as f32;
        len
    }

    /// Returns the unit vector in the same direction, or zero for a zero
    /// vector.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Self::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Unit direction from `self` towards `to`.
    #[inline]
    #[must_use]
    pub fn direction_to(self, to: Self) -> Self {
        (to - self).normalized()
    }

    /// Index of the component with the largest value (0 = x, 1 = y, 2 = z).
    ///
    /// Ties resolve towards the later axis.
    #[must_use]
    pub fn max_axis_index(self) -> usize {
        if self.x < self.y {
            if self.y < self.z { 2 } else { 1 }
        } else if self.x < self.z {
            2
        } else {
            0
        }
    }

    /// Projects onto the navigation ground plane, keeping `(x, z)`.
    #[inline]
    #[must_use]
    pub fn xz(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.z))
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f64; 4], col1: [f64; 4], col2: [f64; 4], col3: [f64; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a pure translation to `position`.
    #[inline]
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::from_translation(
            f64::from(position.x),
            f64::from(position.y),
            f64::from(position.z),
        )
    }

    /// Creates a rotation around the Y (navigation up) axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_y(radians: f64) -> Self {
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Returns the translation component.
    #[inline]
    #[must_use]
    pub const fn translation(self) -> [f64; 3] {
        [self.cols[3][0], self.cols[3][1], self.cols[3][2]]
    }

    /// Transforms a point (applies rotation, scale and translation).
    #[must_use]
    pub fn transform_point(self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        let (x, y, z) = (f64::from(p.x), f64::from(p.y), f64::from(p.z));
        let out = [
            c[0][0] * x + c[1][0] * y + c[2][0] * z + c[3][0],
            c[0][1] * x + c[1][1] * y + c[2][1] * z + c[3][1],
            c[0][2] * x + c[1][2] * y + c[2][2] * z + c[3][2],
        ];
        #[expect(
            clippy::cast_possible_truncation,
            reason = "vertex data is stored in f32"
        )]
        let out = Vec3::new(out[0] as f32, out[1] as f32, out[2] as f32);
        out
    }

    /// Projects this transform onto the `(x, z)` ground plane used by 2-D
    /// navigation maps.
    #[must_use]
    pub fn to_affine_xz(self) -> Affine {
        let c = &self.cols;
        Affine::new([c[0][0], c[0][2], c[2][0], c[2][2], c[3][0], c[3][2]])
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_x_and_up_points_down_z() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(x.cross(Vec3::UP), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn direction_to_is_unit_length() {
        let d = Vec3::new(1.0, 2.0, 3.0).direction_to(Vec3::new(4.0, 6.0, 3.0));
        assert!((d.length() - 1.0).abs() < 1e-6, "direction should be normalized");
        assert!((d.x - 0.6).abs() < 1e-6, "x component");
        assert!((d.y - 0.8).abs() < 1e-6, "y component");
    }

    #[test]
    fn direction_to_self_is_zero() {
        let p = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(p.direction_to(p), Vec3::ZERO);
    }

    #[test]
    fn max_axis_index_picks_dominant_component() {
        assert_eq!(Vec3::UP.max_axis_index(), 1);
        assert_eq!(Vec3::new(1.0, 0.0, 0.0).max_axis_index(), 0);
        assert_eq!(Vec3::new(0.0, 0.0, 1.0).max_axis_index(), 2);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn translation_composition() {
        let a = Transform3d::from_translation(1.0, 0.0, 0.0);
        let b = Transform3d::from_translation(0.0, 2.0, 0.0);
        assert_eq!((a * b).translation(), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn transform_point_applies_translation() {
        let t = Transform3d::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn xz_projection_of_translation() {
        let t = Transform3d::from_translation(5.0, 9.0, 7.0);
        let p = t.to_affine_xz() * Point::new(1.0, 1.0);
        assert_eq!(p, Point::new(6.0, 8.0));
    }

    #[test]
    fn xz_projection_of_rotation_matches_transform_point() {
        let t = Transform3d::from_rotation_y(0.5) * Transform3d::from_translation(2.0, 0.0, 1.0);
        let v = Vec3::new(3.0, 0.0, -2.0);
        let expected = t.transform_point(v).xz();
        let actual = t.to_affine_xz() * v.xz();
        assert!((expected - actual).hypot() < 1e-5, "projection must commute");
    }
}

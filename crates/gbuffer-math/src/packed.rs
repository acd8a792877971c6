//! Packed 4-lane algebra.
//!
//! One register holds one logical vector (x, y, z, w). This is per-vector
//! instruction-level parallelism: a single packed op replaces three or four scalar
//! ones, results match the scalar path up to rounding.
//!
//! `wide` lowers to SSE on x86, NEON on aarch64 and simd128 on wasm32 when the
//! target feature is enabled, with a scalar fallback everywhere else.

use core::ops::{Add, Div, Mul, Sub};

use wide::f32x4;

use crate::mat::ColMat4;
use crate::vec::{Vec3, Vec4};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(transparent)]
pub struct PackedVec4(pub f32x4);

impl PackedVec4 {
    pub const ZERO: Self = Self(f32x4::ZERO);

    #[inline(always)]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self(f32x4::new([x, y, z, w]))
    }

    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        Self(f32x4::splat(v))
    }

    /// Direction vector with lane 3 cleared.
    #[inline(always)]
    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    #[inline(always)]
    pub fn from_vec4(v: Vec4) -> Self {
        Self(f32x4::new(v.to_array()))
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        self.0.to_array()
    }

    #[inline(always)]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::from_array(self.to_array())
    }

    #[inline(always)]
    pub fn to_vec3(self) -> Vec3 {
        let [x, y, z, _] = self.to_array();
        Vec3::new(x, y, z)
    }

    #[inline(always)]
    pub fn lane(self, i: usize) -> f32 {
        self.to_array()[i]
    }

    #[inline(always)]
    pub fn scale(self, s: f32) -> Self {
        Self(self.0 * f32x4::splat(s))
    }

    /// Dot product over lanes 0..3; lane 3 is ignored.
    #[inline(always)]
    pub fn dot3(self, rhs: Self) -> f32 {
        let [x, y, z, _] = (self.0 * rhs.0).to_array();
        x + y + z
    }

    /// Right-handed cross product of lanes 0..3. Lane 3 of the result is zero.
    #[inline(always)]
    pub fn cross3(self, rhs: Self) -> Self {
        let a_yzx = self.yzx();
        let b_yzx = rhs.yzx();
        // (a * b.yzx - a.yzx * b).yzx
        Self(self.0 * b_yzx.0 - a_yzx.0 * rhs.0).yzx()
    }

    #[inline(always)]
    pub fn length3(self) -> f32 {
        self.dot3(self).sqrt()
    }

    /// Divides lanes 0..3 by their length and clears lane 3.
    ///
    /// Lane 3 never contributes to the length. No zero guard, NaN propagates.
    #[inline(always)]
    pub fn normalize3(self) -> Self {
        let len = f32x4::splat(self.length3());
        Self((self.0 / len) * f32x4::new([1.0, 1.0, 1.0, 0.0]))
    }

    /// Lane permutation (y, z, x, 0).
    #[inline(always)]
    fn yzx(self) -> Self {
        let [x, y, z, _] = self.to_array();
        Self::new(y, z, x, 0.0)
    }
}

impl Add for PackedVec4 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for PackedVec4 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul for PackedVec4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl Div for PackedVec4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(self.0 / rhs.0)
    }
}

impl Mul<f32> for PackedVec4 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Div<f32> for PackedVec4 {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: f32) -> Self {
        Self(self.0 / f32x4::splat(rhs))
    }
}

/// Column-major matrix held as four column registers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedMat4 {
    pub cols: [f32x4; 4],
}

impl PackedMat4 {
    #[inline]
    pub fn from_col_mat4(m: &ColMat4) -> Self {
        Self {
            cols: [
                f32x4::new(m.cols[0]),
                f32x4::new(m.cols[1]),
                f32x4::new(m.cols[2]),
                f32x4::new(m.cols[3]),
            ],
        }
    }

    /// Weighted sum of the columns, each scaled by the broadcast vector lane.
    #[inline(always)]
    pub fn mul_vec4(&self, v: PackedVec4) -> PackedVec4 {
        let [x, y, z, w] = v.to_array();
        let c = &self.cols;
        let r = c[0] * f32x4::splat(x)
            + c[1] * f32x4::splat(y)
            + c[2] * f32x4::splat(z)
            + c[3] * f32x4::splat(w);
        PackedVec4(r)
    }
}

impl From<&ColMat4> for PackedMat4 {
    fn from(m: &ColMat4) -> Self {
        Self::from_col_mat4(m)
    }
}

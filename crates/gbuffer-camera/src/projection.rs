#![forbid(unsafe_op_in_unsafe_fn)]

use glam::Mat4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host-side camera projection, right-handed with WebGPU depth (0..1) and no
/// Y flip.
///
/// The aspect ratio is not stored; it comes from the attachment size each time
/// a matrix is built.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Projection {
    Perspective(Perspective),
    Orthographic(Orthographic),
}

impl Default for Projection {
    fn default() -> Self {
        Self::Perspective(Perspective::default())
    }
}

/// Width over height; a zero axis counts as one pixel.
#[inline]
pub fn viewport_aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

impl Projection {
    /// Projection matrix for a `width` x `height` attachment.
    #[inline]
    pub fn matrix_for(&self, width: u32, height: u32) -> Mat4 {
        let aspect = viewport_aspect(width, height);
        match self {
            Self::Perspective(p) => p.matrix(aspect),
            Self::Orthographic(o) => o.matrix(aspect),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Perspective {
    /// Vertical field of view, radians.
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fovy: 60f32.to_radians(),
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Perspective {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy, aspect, self.near, self.far)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Orthographic {
    /// Half of the visible height, world units.
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Orthographic {
    fn default() -> Self {
        Self {
            half_height: 5.0,
            near: 0.1,
            far: 1_000.0,
        }
    }
}

impl Orthographic {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        let h = self.half_height;
        let w = h * aspect;
        Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
    }
}

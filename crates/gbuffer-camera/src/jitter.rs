#![forbid(unsafe_op_in_unsafe_fn)]

use glam::{Mat4, Vec2, Vec3};

/// Frames in one jitter cycle.
pub const JITTER_CYCLE: u32 = 8;

/// Radical inverse of `index` in `base`, in `[0, 1)`.
pub fn halton(mut index: u32, base: u32) -> f32 {
    debug_assert!(base >= 2);
    let mut f = 1.0f32;
    let mut r = 0.0f32;
    while index > 0 {
        f /= base as f32;
        r += f * (index % base) as f32;
        index /= base;
    }
    r
}

/// Sub-pixel offset for `frame` in clip units.
///
/// Cycles through Halton(2,3) points 1..=8, each remapped to `[-1, 1)` and divided
/// by the resolution.
pub fn halton_jitter(frame: u32, width: u32, height: u32) -> Vec2 {
    let i = frame % JITTER_CYCLE + 1;
    Vec2::new(
        (2.0 * halton(i, 2) - 1.0) / width.max(1) as f32,
        (2.0 * halton(i, 3) - 1.0) / height.max(1) as f32,
    )
}

/// Shifts a projection by a clip-space offset.
#[inline]
pub fn jitter_projection(projection: Mat4, offset: Vec2) -> Mat4 {
    Mat4::from_translation(Vec3::new(offset.x, offset.y, 0.0)) * projection
}

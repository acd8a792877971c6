#![forbid(unsafe_op_in_unsafe_fn)]

use gbuffer_math::{ColMat4, PackedMat4, PackedVec4, Vec2, Vec3, Vec4};

/// Maps UV in `[0,1]²` to clip space in `[-1,1]²`.
///
/// Both axes are mirrored before scaling: UV (0,0) lands on clip (1,1) and
/// UV (1,1) on clip (-1,-1). Output produced by the GPU passes depends on this.
#[inline]
pub fn uv_to_clip(uv: Vec2) -> Vec2 {
    (Vec2::new(1.0 - uv.x, 1.0 - uv.y) * 2.0) - Vec2::ONE
}

/// Unit ray direction through `uv`.
///
/// The homogeneous point `(clip.x, clip.y, 1, 1)` is pushed through `inverse`, w is
/// dropped without a perspective divide, and the rest is normalized. A singular
/// inverse or a zero-length result propagates NaN/Inf.
#[inline]
pub fn ray_direction(uv: Vec2, inverse: &ColMat4) -> Vec3 {
    let clip = uv_to_clip(uv);
    inverse
        .mul_vec4(Vec4::new(clip.x, clip.y, 1.0, 1.0))
        .xyz()
        .normalize()
}

/// Packed twin of [`ray_direction`]. Lane 3 of the result is zero.
#[inline]
pub fn ray_direction_packed(uv: Vec2, inverse: &PackedMat4) -> PackedVec4 {
    let clip = uv_to_clip(uv);
    inverse
        .mul_vec4(PackedVec4::new(clip.x, clip.y, 1.0, 1.0))
        .normalize3()
}

/// Corner rays in UV order (0,0), (1,0), (0,1), (1,1).
pub fn frustum_corner_directions(inverse: &ColMat4) -> [Vec3; 4] {
    [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    ]
    .map(|uv| ray_direction(uv, inverse))
}

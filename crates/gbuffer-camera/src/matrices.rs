#![forbid(unsafe_op_in_unsafe_fn)]

use bytemuck::{Pod, Zeroable};
use gbuffer_math::ColMat4;

use crate::error::{CameraError, CameraResult};

/// Per-frame camera matrices as the host uploads them.
///
/// Six column-major matrices in upload order, 96 floats, no padding. The layout is
/// identical to the uniform block the GPU passes read, so the same float array
/// serves both.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CameraMatrices {
    pub view_projection: ColMat4,
    pub previous_view_projection: ColMat4,
    pub inverse_view_projection: ColMat4,
    pub previous_inverse_view_projection: ColMat4,
    pub projection: ColMat4,
    pub inverse_projection: ColMat4,
}

impl CameraMatrices {
    /// Number of `f32` values in one bundle.
    pub const FLOATS: usize = 6 * 16;

    /// All six matrices set to identity.
    pub const IDENTITY: Self = Self {
        view_projection: ColMat4::IDENTITY,
        previous_view_projection: ColMat4::IDENTITY,
        inverse_view_projection: ColMat4::IDENTITY,
        previous_inverse_view_projection: ColMat4::IDENTITY,
        projection: ColMat4::IDENTITY,
        inverse_projection: ColMat4::IDENTITY,
    };

    /// Reinterprets a host float array without copying.
    pub fn from_f32_slice(floats: &[f32]) -> CameraResult<&Self> {
        if floats.len() != Self::FLOATS {
            return Err(CameraError::BundleLength {
                expected: Self::FLOATS,
                got: floats.len(),
            });
        }
        bytemuck::try_from_bytes(bytemuck::cast_slice(floats))
            .map_err(|e| CameraError::Cast(e.to_string()))
    }

    #[inline]
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(bytemuck::bytes_of(self))
    }

    /// Matrix that takes clip space back to the requested space.
    #[inline]
    pub fn inverse_for(&self, space: RaySpace) -> &ColMat4 {
        match space {
            RaySpace::World => &self.inverse_view_projection,
            RaySpace::View => &self.inverse_projection,
        }
    }
}

/// Space the reconstructed ray directions are expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RaySpace {
    /// Uses the inverse view-projection.
    #[default]
    World,
    /// Uses the inverse projection.
    View,
}

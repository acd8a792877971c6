//! Vector and matrix algebra for the CPU G-buffer kernel.
//!
//! Scalar types live in [`vec`] and [`mat`], their packed 4-lane mirrors in
//! [`packed`]. Matrices are column-major ([`ColMat4`]); row-major input has its own
//! type ([`RowMat4`]) and is converted at the boundary.

#![forbid(unsafe_code)]

pub mod backend;
pub mod mat;
pub mod packed;
pub mod vec;

pub use crate::backend::AlgebraBackend;
pub use crate::mat::{ColMat4, RowMat4};
pub use crate::packed::{PackedMat4, PackedVec4};
pub use crate::vec::{UVec2, Vec2, Vec3, Vec4};

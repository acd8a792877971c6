//! Camera side of the G-buffer kernel.
//!
//! [`CameraMatrices`] is the per-frame bundle the kernel reads and [`ray`] turns a
//! UV coordinate into a view or world direction. Everything else here
//! ([`Projection`], [`CameraRig`], [`CameraTracker`], jitter) runs on the host to
//! produce that bundle; the kernel never builds or inverts matrices itself.

#![forbid(unsafe_code)]

pub mod error;
pub mod jitter;
pub mod matrices;
pub mod projection;
pub mod ray;
pub mod rig;
pub mod tracker;

pub use crate::error::{CameraError, CameraResult};
pub use crate::matrices::{CameraMatrices, RaySpace};
pub use crate::projection::{viewport_aspect, Orthographic, Perspective, Projection};
pub use crate::ray::{frustum_corner_directions, ray_direction, ray_direction_packed, uv_to_clip};
pub use crate::rig::CameraRig;
pub use crate::tracker::CameraTracker;

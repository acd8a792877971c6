//! CPU population of one G-buffer attachment.
//!
//! Once per frame the host calls [`Kernel::populate`] (or the checked
//! [`Kernel::try_populate`]) with a tightly packed RGBA8 buffer. Each pixel is
//! mapped from its linear index to a coordinate and UV, coloured by the configured
//! [`Mode`], narrowed to bytes by [`Quantize`] and stored 4 bytes at a time
//! (scalar backend) or 16 bytes at a time (packed backend).

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pixel;
pub mod populate;
pub mod quantize;
pub mod shade;

pub use gbuffer_camera::{CameraMatrices, RaySpace};
pub use gbuffer_math::AlgebraBackend;

pub use crate::config::{KernelConfig, Mode, SolidFill};
pub use crate::error::{KernelError, KernelResult};
pub use crate::pixel::{to_coordinate, to_uv, Channel, Resolution, Rgba8, BYTES_PER_PIXEL};
pub use crate::populate::{FrameInputs, Kernel, PopulateReport};
pub use crate::quantize::Quantize;

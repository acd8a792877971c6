use gbuffer_camera::CameraMatrices;
use gbuffer_math::AlgebraBackend;
use rayon::prelude::*;

use crate::config::{KernelConfig, Mode};
use crate::error::{KernelError, KernelResult};
use crate::pixel::{Resolution, BYTES_PER_PIXEL};
use crate::shade::{
    GradientShader, PackedRayShader, RayShader, Shader, SolidShader, UvShader,
};

/// Bytes covered by one packed store.
const QUAD_BYTES: usize = 4 * BYTES_PER_PIXEL;

/// Everything the host hands over for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Host-incremented frame counter.
    pub frame_index: u32,
    pub resolution: Resolution,
    /// Required by [`Mode::RayDirection`].
    pub camera: Option<&'a CameraMatrices>,
}

impl<'a> FrameInputs<'a> {
    pub fn new(frame_index: u32, resolution: Resolution) -> Self {
        Self {
            frame_index,
            resolution,
            camera: None,
        }
    }

    pub fn with_camera(mut self, camera: &'a CameraMatrices) -> Self {
        self.camera = Some(camera);
        self
    }
}

/// What a populate call actually wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub pixels_written: usize,
    /// Trailing bytes that did not fill a whole iteration stride.
    pub bytes_untouched: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stride {
    Pixel,
    Quad { finish_tail: bool },
}

/// Fills an RGBA8 attachment, one call per frame.
///
/// The kernel holds only its configuration. Buffer, resolution and matrices are
/// borrowed for the duration of a call and never retained.
#[derive(Clone, Debug, Default)]
pub struct Kernel {
    config: KernelConfig,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Unchecked entry point.
    ///
    /// The caller guarantees `buf.len() <= width * height * 4` (normally equal), a
    /// non-zero resolution for position-dependent modes, and camera matrices for
    /// [`Mode::RayDirection`]. Debug builds assert these. Release builds write
    /// nothing when the resolution is zero or the camera is missing, and otherwise
    /// trust the caller.
    ///
    /// Modes B and D store one pixel per iteration. Modes A and C on the packed
    /// backend store four; unless [`KernelConfig::finish_tail`] is set, the last
    /// `len % 16` bytes are then left as they were.
    pub fn populate(&self, buf: &mut [u8], frame: &FrameInputs<'_>) -> PopulateReport {
        self.populate_with(buf, frame, self.config.finish_tail)
    }

    /// Checked entry point: validates every precondition of [`Kernel::populate`]
    /// and refuses to touch the buffer when one fails. An accepted buffer is
    /// written completely, whatever the stride.
    pub fn try_populate(
        &self,
        buf: &mut [u8],
        frame: &FrameInputs<'_>,
    ) -> KernelResult<PopulateReport> {
        let res = frame.resolution;
        if res.is_empty() {
            return Err(KernelError::ZeroResolution {
                width: res.width,
                height: res.height,
            });
        }
        if buf.len() != res.byte_len() {
            return Err(KernelError::LengthMismatch {
                expected: res.byte_len(),
                got: buf.len(),
            });
        }
        if self.config.mode.needs_camera() && frame.camera.is_none() {
            return Err(KernelError::MissingCamera(self.config.mode.name()));
        }
        Ok(self.populate_with(buf, frame, true))
    }

    /// Packed 16-byte stores are used only where four pixels are batched.
    fn stride(&self, finish_tail: bool) -> Stride {
        match (self.config.backend, self.config.mode) {
            (AlgebraBackend::Packed, Mode::Gradient | Mode::RayDirection) => {
                Stride::Quad { finish_tail }
            }
            _ => Stride::Pixel,
        }
    }

    fn populate_with(
        &self,
        buf: &mut [u8],
        frame: &FrameInputs<'_>,
        finish_tail: bool,
    ) -> PopulateReport {
        let mode = self.config.mode;

        if mode.needs_resolution() {
            debug_assert!(
                !frame.resolution.is_empty(),
                "populate: zero resolution {:?}",
                frame.resolution
            );
            debug_assert!(
                buf.len() <= frame.resolution.byte_len(),
                "populate: {} bytes exceed {:?}",
                buf.len(),
                frame.resolution
            );
            if frame.resolution.is_empty() {
                return untouched(buf.len());
            }
        }
        debug_assert!(
            !mode.needs_camera() || frame.camera.is_some(),
            "populate: mode {} without camera matrices",
            mode.name()
        );

        let stride = self.stride(finish_tail);
        let quantize = self.config.quantize;

        log::debug!(
            "populate frame={} mode={} backend={:?} bytes={} parallel={}",
            frame.frame_index,
            mode.name(),
            self.config.backend,
            buf.len(),
            self.config.parallel
        );

        let report = match mode {
            Mode::Gradient => {
                let shader = GradientShader::new(frame.frame_index, quantize);
                self.run(buf, &shader, stride)
            }
            Mode::Uv => {
                let shader = UvShader {
                    resolution: frame.resolution,
                    quantize,
                };
                self.run(buf, &shader, stride)
            }
            Mode::RayDirection => {
                let Some(camera) = frame.camera else {
                    log::warn!("populate: ray_direction without camera matrices, skipped");
                    return untouched(buf.len());
                };
                let inverse = camera.inverse_for(self.config.ray_space);
                match self.config.backend {
                    AlgebraBackend::Scalar => {
                        let shader = RayShader {
                            resolution: frame.resolution,
                            inverse: *inverse,
                            quantize,
                        };
                        self.run(buf, &shader, stride)
                    }
                    AlgebraBackend::Packed => {
                        let shader = PackedRayShader::new(frame.resolution, inverse, quantize);
                        self.run(buf, &shader, stride)
                    }
                }
            }
            Mode::Solid => {
                let shader = SolidShader {
                    fill: self.config.solid,
                    resolution: frame.resolution,
                    quantize,
                };
                self.run(buf, &shader, stride)
            }
        };

        if report.bytes_untouched != 0 {
            log::warn!(
                "populate: {} trailing bytes of {} left unwritten (stride {:?})",
                report.bytes_untouched,
                buf.len(),
                stride
            );
        }
        report
    }

    fn run<S: Shader>(&self, buf: &mut [u8], shader: &S, stride: Stride) -> PopulateReport {
        let written = if self.config.parallel {
            fill_parallel(buf, shader, stride)
        } else {
            fill(buf, 0, shader, stride)
        };
        PopulateReport {
            pixels_written: written,
            bytes_untouched: buf.len() - written * BYTES_PER_PIXEL,
        }
    }
}

#[inline]
fn untouched(len: usize) -> PopulateReport {
    PopulateReport {
        pixels_written: 0,
        bytes_untouched: len,
    }
}

/// Fills `bytes`, whose first byte is the red channel of pixel `first_pixel`.
/// Returns the number of pixels written.
fn fill<S: Shader>(bytes: &mut [u8], first_pixel: u32, shader: &S, stride: Stride) -> usize {
    match stride {
        Stride::Pixel => fill_pixels(bytes, first_pixel, shader),
        Stride::Quad { finish_tail } => {
            let mut quads = bytes.chunks_exact_mut(QUAD_BYTES);
            let mut pixel = first_pixel;
            for quad in quads.by_ref() {
                quad.copy_from_slice(&shader.shade_quad(pixel));
                pixel += 4;
            }
            let mut written = (pixel - first_pixel) as usize;
            if finish_tail {
                written += fill_pixels(quads.into_remainder(), pixel, shader);
            }
            written
        }
    }
}

fn fill_pixels<S: Shader>(bytes: &mut [u8], first_pixel: u32, shader: &S) -> usize {
    let mut count = 0;
    for (i, px) in bytes.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        px.copy_from_slice(&shader.shade(first_pixel + i as u32).to_array());
        count += 1;
    }
    count
}

/// Bands are whole 16-byte groups, so only the last band can carry a tail and
/// the result is identical to the serial fill.
fn fill_parallel<S: Shader>(buf: &mut [u8], shader: &S, stride: Stride) -> usize {
    let band = band_bytes(buf.len(), rayon::current_num_threads());
    log::trace!("populate: {} bytes in bands of {}", buf.len(), band);

    buf.par_chunks_mut(band)
        .enumerate()
        .map(|(i, chunk)| {
            let first_pixel = (i * band / BYTES_PER_PIXEL) as u32;
            fill(chunk, first_pixel, shader, stride)
        })
        .sum()
}

/// Roughly four bands per worker, rounded up to a whole packed group.
fn band_bytes(len: usize, threads: usize) -> usize {
    let bands = threads.max(1) * 4;
    len.div_ceil(bands).next_multiple_of(QUAD_BYTES).max(QUAD_BYTES)
}

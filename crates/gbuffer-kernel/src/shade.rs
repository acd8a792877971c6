//! Per-pixel colour functions, one per [`Mode`](crate::Mode).
//!
//! Every shader is a pure function of the linear pixel index plus whatever it
//! captured at construction (frame index, resolution, matrices). No pixel reads
//! another pixel, which is what lets the populate loop split the buffer freely.

use gbuffer_camera::{ray_direction, ray_direction_packed};
use gbuffer_math::{ColMat4, PackedMat4, Vec3};

use crate::config::SolidFill;
use crate::pixel::{to_coordinate, to_uv, Resolution, Rgba8};
use crate::quantize::Quantize;

pub trait Shader: Sync {
    /// Colour of pixel `index`.
    fn shade(&self, index: u32) -> Rgba8;

    /// Colours of pixels `first..first + 4`, in buffer order, for a single 16-byte
    /// store.
    #[inline]
    fn shade_quad(&self, first: u32) -> [u8; 16] {
        let quad = [
            self.shade(first),
            self.shade(first + 1),
            self.shade(first + 2),
            self.shade(first + 3),
        ];
        bytemuck::cast(quad)
    }
}

/// Mode A colour for `frame_index`.
///
/// Evaluated in double precision; truncating the f32 result would shift some bytes.
pub fn gradient_color(frame_index: u32, quantize: Quantize) -> Rgba8 {
    let t = frame_index as f64;
    let wave = |v: f64| quantize.byte_f64(255.0 * (v * 0.5 + 0.5));
    Rgba8::opaque(
        wave((t / 50.0).sin()),
        wave((t / 100.0).sin()),
        wave((t / 50.0).cos()),
    )
}

/// Mode A: same colour everywhere.
#[derive(Clone, Copy, Debug)]
pub struct GradientShader {
    color: Rgba8,
    quad: [u8; 16],
}

impl GradientShader {
    pub fn new(frame_index: u32, quantize: Quantize) -> Self {
        let color = gradient_color(frame_index, quantize);
        Self {
            color,
            quad: color.splat_quad(),
        }
    }
}

impl Shader for GradientShader {
    #[inline]
    fn shade(&self, _index: u32) -> Rgba8 {
        self.color
    }

    #[inline]
    fn shade_quad(&self, _first: u32) -> [u8; 16] {
        self.quad
    }
}

/// Mode B: `(255u, 255v, 0, 255)`.
#[derive(Clone, Copy, Debug)]
pub struct UvShader {
    pub resolution: Resolution,
    pub quantize: Quantize,
}

impl Shader for UvShader {
    #[inline]
    fn shade(&self, index: u32) -> Rgba8 {
        let uv = to_uv(to_coordinate(self.resolution, index), self.resolution);
        Rgba8::opaque(self.quantize.unit(uv.x), self.quantize.unit(uv.y), 0)
    }
}

#[inline(always)]
fn direction_color(dir: Vec3, quantize: Quantize) -> Rgba8 {
    Rgba8::opaque(
        quantize.unit(dir.x),
        quantize.unit(dir.y),
        quantize.unit(dir.z),
    )
}

/// Mode C on the scalar algebra.
///
/// Signed components are not remapped: negative ones wrap under [`Quantize`].
#[derive(Clone, Copy, Debug)]
pub struct RayShader {
    pub resolution: Resolution,
    pub inverse: ColMat4,
    pub quantize: Quantize,
}

impl Shader for RayShader {
    #[inline]
    fn shade(&self, index: u32) -> Rgba8 {
        let uv = to_uv(to_coordinate(self.resolution, index), self.resolution);
        direction_color(ray_direction(uv, &self.inverse), self.quantize)
    }
}

/// Mode C on the packed algebra. Assembles four pixels per call into one
/// 16-byte group.
#[derive(Clone, Copy, Debug)]
pub struct PackedRayShader {
    resolution: Resolution,
    inverse: PackedMat4,
    quantize: Quantize,
}

impl PackedRayShader {
    pub fn new(resolution: Resolution, inverse: &ColMat4, quantize: Quantize) -> Self {
        Self {
            resolution,
            inverse: PackedMat4::from_col_mat4(inverse),
            quantize,
        }
    }
}

impl Shader for PackedRayShader {
    #[inline]
    fn shade(&self, index: u32) -> Rgba8 {
        let uv = to_uv(to_coordinate(self.resolution, index), self.resolution);
        direction_color(ray_direction_packed(uv, &self.inverse).to_vec3(), self.quantize)
    }

    #[inline]
    fn shade_quad(&self, first: u32) -> [u8; 16] {
        let q = self.quantize;
        let mut out = [0u8; 16];
        for (lane, px) in out.chunks_exact_mut(4).enumerate() {
            let coord = to_coordinate(self.resolution, first + lane as u32);
            let [x, y, z, _] =
                ray_direction_packed(to_uv(coord, self.resolution), &self.inverse).to_array();
            px.copy_from_slice(&[q.unit(x), q.unit(y), q.unit(z), 0xFF]);
        }
        out
    }
}

/// Mode D.
#[derive(Clone, Copy, Debug)]
pub struct SolidShader {
    pub fill: SolidFill,
    pub resolution: Resolution,
    pub quantize: Quantize,
}

impl Shader for SolidShader {
    #[inline]
    fn shade(&self, index: u32) -> Rgba8 {
        let mut color = self.fill.color();
        if let Some(channel) = self.fill.x_gradient {
            let x = index % self.resolution.width;
            let ramp = 255.0 * x as f32 / self.resolution.width as f32;
            color.set_channel(channel, self.quantize.byte(ramp));
        }
        color
    }
}

use bytemuck::{Pod, Zeroable};
use gbuffer_math::{UVec2, Vec2};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Output size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A single row of `pixels` pixels. Used when only a byte length is known.
    #[inline]
    pub const fn row(pixels: u32) -> Self {
        Self::new(pixels, 1)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Tight RGBA8 buffer length, no row padding.
    #[inline]
    pub const fn byte_len(self) -> usize {
        self.pixel_count() * BYTES_PER_PIXEL
    }

    /// Each axis divided by `factor`, rounding up.
    #[inline]
    pub fn downscaled(self, factor: u32) -> Self {
        let f = factor.max(1);
        Self::new(self.width.div_ceil(f), self.height.div_ceil(f))
    }
}

impl From<UVec2> for Resolution {
    fn from(v: UVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Linear pixel index to `(x, y)`.
///
/// `index` is not range-checked against the height; callers bound it by the buffer.
#[inline]
pub fn to_coordinate(resolution: Resolution, index: u32) -> UVec2 {
    debug_assert!(resolution.width > 0, "to_coordinate: zero width");
    UVec2::new(index % resolution.width, index / resolution.width)
}

/// Pixel coordinate to UV in `[0, 1)`.
#[inline]
pub fn to_uv(coordinate: UVec2, resolution: Resolution) -> Vec2 {
    Vec2::new(
        coordinate.x as f32 / resolution.width as f32,
        coordinate.y as f32 / resolution.height as f32,
    )
}

/// One RGBA8 pixel as stored in the buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        bytemuck::cast(self)
    }

    /// Four copies, the 16-byte group one packed store writes.
    #[inline]
    pub fn splat_quad(self) -> [u8; 16] {
        bytemuck::cast([self; 4])
    }

    #[inline]
    pub fn set_channel(&mut self, channel: Channel, value: u8) {
        match channel {
            Channel::R => self.r = value,
            Channel::G => self.g = value,
            Channel::B => self.b = value,
            Channel::A => self.a = value,
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(a: [u8; 4]) -> Self {
        bytemuck::cast(a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    R,
    G,
    B,
    A,
}

use serde::{Deserialize, Serialize};

/// Float to byte narrowing policy.
///
/// `Truncate` is the default: the scaled value goes to `i32` toward zero
/// (NaN becomes 0), then keeps its low 8 bits. Nothing is clamped, so an input
/// of `-0.5` lands on byte 129 and `1.5` on byte 126. This is C's
/// `(uint8_t)` narrowing on wasm32, not Rust's saturating `f32 as u8`.
///
/// `Round` rounds half away from zero first, then narrows the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantize {
    #[default]
    Truncate,
    Round,
}

impl Quantize {
    /// Narrows a value already scaled to `0..=255`.
    #[inline(always)]
    pub fn byte(self, scaled: f32) -> u8 {
        match self {
            Self::Truncate => scaled as i32 as u8,
            Self::Round => scaled.round() as i32 as u8,
        }
    }

    #[inline(always)]
    pub fn byte_f64(self, scaled: f64) -> u8 {
        match self {
            Self::Truncate => scaled as i32 as u8,
            Self::Round => scaled.round() as i32 as u8,
        }
    }

    /// Maps a unit value to a byte: `byte(v * 255)`.
    #[inline(always)]
    pub fn unit(self, v: f32) -> u8 {
        self.byte(v * 255.0)
    }
}

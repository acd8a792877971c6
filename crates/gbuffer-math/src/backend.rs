#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which algebra implementation a caller runs on.
///
/// Both honor the same numerical contract; `Packed` trades scalar lanes for one
/// 4-wide register per vector and, in the kernel modes that batch pixels, a
/// 16-byte store stride.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlgebraBackend {
    Scalar,
    #[default]
    Packed,
}

use std::fs;
use std::io;
use std::path::Path;

use gbuffer_camera::RaySpace;
use gbuffer_math::AlgebraBackend;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};
use crate::pixel::{Channel, Rgba8};
use crate::quantize::Quantize;

/// What the kernel writes into the attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Time-varying colour driven by the frame index only.
    Gradient,
    /// `(u, v, 0)`.
    Uv,
    /// Reconstructed camera ray, one component per channel.
    #[default]
    RayDirection,
    /// Constant colour, optionally ramped along x in one channel.
    Solid,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::Uv => "uv",
            Self::RayDirection => "ray_direction",
            Self::Solid => "solid",
        }
    }

    #[inline]
    pub fn needs_camera(self) -> bool {
        matches!(self, Self::RayDirection)
    }

    /// Whether pixels depend on their position (and therefore on the resolution).
    #[inline]
    pub fn needs_resolution(self) -> bool {
        !matches!(self, Self::Gradient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidFill {
    #[serde(default = "default_solid_rgba")]
    pub rgba: [u8; 4],

    /// Channel replaced by `255 * x / width`.
    #[serde(default)]
    pub x_gradient: Option<Channel>,
}

impl SolidFill {
    #[inline]
    pub fn color(&self) -> Rgba8 {
        Rgba8::from(self.rgba)
    }
}

impl Default for SolidFill {
    fn default() -> Self {
        Self {
            rgba: default_solid_rgba(),
            x_gradient: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub backend: AlgebraBackend,

    #[serde(default)]
    pub quantize: Quantize,

    #[serde(default)]
    pub ray_space: RaySpace,

    /// Split the buffer into bands and fill them on the rayon pool.
    #[serde(default)]
    pub parallel: bool,

    /// Finish whole pixels left over after the last 16-byte group.
    #[serde(default)]
    pub finish_tail: bool,

    #[serde(default)]
    pub solid: SolidFill,
}

fn default_solid_rgba() -> [u8; 4] {
    [255, 0, 255, 255]
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            backend: AlgebraBackend::default(),
            quantize: Quantize::default(),
            ray_space: RaySpace::default(),
            parallel: false,
            finish_tail: false,
            solid: SolidFill::default(),
        }
    }
}

impl KernelConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_backend(mut self, backend: AlgebraBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn from_toml_str(s: &str) -> KernelResult<Self> {
        toml::from_str(s).map_err(|e| KernelError::Config(e.to_string()))
    }

    /// Reads `path`; a missing file yields the defaults. A malformed or unreadable
    /// one is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> KernelResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_toml_str(&s)
                .map_err(|e| KernelError::Config(format!("parse {}: {}", path.display(), e))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no kernel config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(KernelError::Config(format!("read {}: {}", path.display(), e))),
        }
    }
}

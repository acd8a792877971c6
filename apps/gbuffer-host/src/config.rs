use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gbuffer_camera::Projection;
use gbuffer_kernel::KernelConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Swapchain size; the kernel runs at `width / downscale`.
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_downscale")]
    pub downscale: u32,

    #[serde(default = "default_frames")]
    pub frames: u32,

    /// PNG of the last frame. Nothing is written when absent.
    #[serde(default = "default_output")]
    pub output: Option<PathBuf>,

    /// Overrides `RUST_LOG`.
    #[serde(default)]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub kernel: KernelConfig,

    /// Standalone kernel TOML, relative to this file. Replaces `[kernel]` when set.
    #[serde(default)]
    pub kernel_file: Option<PathBuf>,

    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_eye")]
    pub eye: [f32; 3],

    #[serde(default)]
    pub target: [f32; 3],

    /// Radians per frame around `target`. Zero keeps the camera still.
    #[serde(default)]
    pub orbit_speed: f32,

    #[serde(default)]
    pub jitter: bool,

    #[serde(default)]
    pub projection: Projection,
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_downscale() -> u32 {
    3
}
fn default_frames() -> u32 {
    60
}
fn default_output() -> Option<PathBuf> {
    Some(PathBuf::from("gbuffer.png"))
}
fn default_eye() -> [f32; 3] {
    [0.0, 0.0, 5.0]
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: default_eye(),
            target: [0.0; 3],
            orbit_speed: 0.0,
            jitter: false,
            projection: Projection::default(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            downscale: default_downscale(),
            frames: default_frames(),
            output: default_output(),
            log_filter: None,
            kernel: KernelConfig::default(),
            kernel_file: None,
            camera: CameraConfig::default(),
        }
    }
}

impl HostConfig {
    /// Reads `path` and resolves `kernel_file` against its directory. Only a
    /// missing file falls back to the defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut cfg: Self = match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no host config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };
        if let Some(file) = &cfg.kernel_file {
            let file = path.parent().unwrap_or(Path::new("")).join(file);
            cfg.kernel = KernelConfig::load_or_default(&file)
                .with_context(|| format!("kernel config {}", file.display()))?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let cfg: HostConfig = toml::from_str(include_str!("../gbuffer.toml")).unwrap();
        assert_eq!((cfg.width, cfg.height, cfg.downscale), (1920, 1080, 3));
        assert!(cfg.kernel.parallel);
        assert!(matches!(cfg.camera.projection, Projection::Perspective(_)));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: HostConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.output, Some(PathBuf::from("gbuffer.png")));
        assert_eq!(cfg.camera.eye, [0.0, 0.0, 5.0]);
    }

    #[test]
    fn orthographic_projection_from_toml() {
        let cfg: HostConfig = toml::from_str(
            r#"
            [camera.projection]
            kind = "orthographic"
            half_height = 2.0
            "#,
        )
        .unwrap();
        match cfg.camera.projection {
            Projection::Orthographic(o) => assert_eq!(o.half_height, 2.0),
            p => panic!("unexpected {p:?}"),
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gbuffer-host-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn kernel_file_replaces_inline_section() {
        let dir = scratch_dir("kernel-file");
        fs::write(dir.join("kernel.toml"), "mode = \"uv\"\nbackend = \"scalar\"\n").unwrap();
        fs::write(
            dir.join("host.toml"),
            "kernel_file = \"kernel.toml\"\n[kernel]\nmode = \"solid\"\n",
        )
        .unwrap();

        let cfg = HostConfig::load_or_default(&dir.join("host.toml")).unwrap();
        assert_eq!(cfg.kernel.mode, gbuffer_kernel::Mode::Uv);
        assert_eq!(cfg.kernel.backend, gbuffer_kernel::AlgebraBackend::Scalar);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_kernel_file_means_default_kernel() {
        let dir = scratch_dir("missing-kernel");
        fs::write(dir.join("host.toml"), "kernel_file = \"absent.toml\"\n").unwrap();
        let cfg = HostConfig::load_or_default(&dir.join("host.toml")).unwrap();
        assert_eq!(cfg.kernel, KernelConfig::default());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_host_file_is_default_but_unreadable_is_an_error() {
        let cfg = HostConfig::load_or_default(Path::new("/nonexistent/gbuffer.toml")).unwrap();
        assert_eq!(cfg.width, 1280);

        let err = HostConfig::load_or_default(Path::new(env!("CARGO_MANIFEST_DIR"))).unwrap_err();
        assert!(format!("{err:#}").starts_with("read "), "{err:#}");
    }
}

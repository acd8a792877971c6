mod config;
mod output;
mod telemetry;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use gbuffer_camera::{CameraRig, CameraTracker};
use gbuffer_kernel::{FrameInputs, Kernel, Resolution};
use gbuffer_modules_logging::{init_logging, LoggingConfig};
use glam::Vec3;

use crate::config::HostConfig;
use crate::telemetry::Telemetry;

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gbuffer.toml"));
    let cfg = HostConfig::load_or_default(&path)?;

    init_logging(LoggingConfig {
        env_filter: cfg.log_filter.clone(),
        ..LoggingConfig::default()
    });
    log::info!("config {} (mode={})", path.display(), cfg.kernel.mode.name());

    let resolution = Resolution::new(cfg.width, cfg.height).downscaled(cfg.downscale);
    if resolution.is_empty() {
        bail!("empty attachment {}x{}", cfg.width, cfg.height);
    }
    log::info!(
        "attachment {}x{} (1/{} of {}x{}), {} bytes",
        resolution.width,
        resolution.height,
        cfg.downscale.max(1),
        cfg.width,
        cfg.height,
        resolution.byte_len()
    );

    let target = Vec3::from(cfg.camera.target);
    let rig = CameraRig::from_look_at(Vec3::from(cfg.camera.eye), target, Vec3::Y);
    let mut tracker = CameraTracker::new(rig, cfg.camera.projection).with_jitter(cfg.camera.jitter);

    let kernel = Kernel::new(cfg.kernel.clone());
    let mut attachment = vec![0u8; resolution.byte_len()];
    let mut telemetry = Telemetry::new();

    for frame_index in 0..cfg.frames {
        if cfg.camera.orbit_speed != 0.0 {
            tracker.rig.orbit(target, cfg.camera.orbit_speed);
        }
        let camera = tracker.advance(frame_index, resolution.width, resolution.height);
        let inputs = FrameInputs::new(frame_index, resolution).with_camera(&camera);

        let start = Instant::now();
        let report = kernel
            .try_populate(&mut attachment, &inputs)
            .with_context(|| format!("populate frame {frame_index}"))?;
        telemetry.frame_tick(start.elapsed());

        log::trace!("frame {frame_index}: {} pixels", report.pixels_written);
    }

    let staged = output::stage_rows(resolution, &attachment);
    log::info!(
        "staging {} bytes, row pitch {} ({} frames, avg {:.3} ms)",
        staged.len(),
        output::row_pitch(resolution.width),
        telemetry.frames,
        telemetry.average_ms()
    );

    if let Some(out) = &cfg.output {
        output::write_png(out, resolution, &attachment)?;
        log::info!("wrote {}", out.display());
    }

    Ok(())
}

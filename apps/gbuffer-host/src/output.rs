use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use gbuffer_kernel::{Resolution, BYTES_PER_PIXEL};

/// Row alignment required for buffer-to-texture copies.
pub const ROW_PITCH_ALIGN: usize = 256;

/// Padded bytes per row for a GPU upload of `width` RGBA8 pixels.
#[inline]
pub fn row_pitch(width: u32) -> usize {
    (width as usize * BYTES_PER_PIXEL).next_multiple_of(ROW_PITCH_ALIGN)
}

/// Copies a tight attachment into a pitched staging buffer.
pub fn stage_rows(resolution: Resolution, tight: &[u8]) -> Vec<u8> {
    let pitch = row_pitch(resolution.width);
    let row = resolution.width as usize * BYTES_PER_PIXEL;
    let mut staged = vec![0u8; pitch * resolution.height as usize];
    for (dst, src) in staged.chunks_exact_mut(pitch).zip(tight.chunks_exact(row)) {
        dst[..row].copy_from_slice(src);
    }
    staged
}

pub fn write_png(path: &Path, resolution: Resolution, rgba: &[u8]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), resolution.width, resolution.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("png header {}", path.display()))?;
    writer
        .write_image_data(rgba)
        .with_context(|| format!("png data {}", path.display()))?;
    Ok(())
}

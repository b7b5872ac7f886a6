use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::unpremultiply_px;
use crate::render::backend::FrameRGBA;
use anyhow::Context as _;
use std::path::Path;

/// Convert premultiplied RGBA8 back to straight alpha.
pub(crate) fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    premul
        .chunks_exact(4)
        .flat_map(|px| unpremultiply_px([px[0], px[1], px[2], px[3]]))
        .collect()
}

/// Write one frame as a straight-alpha PNG.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> ReelResult<()> {
    let img = image::RgbaImage::from_raw(
        frame.width,
        frame.height,
        unpremultiply_rgba8(&frame.data),
    )
    .ok_or_else(|| ReelError::validation("frame byte length does not match width*height*4"))?;
    ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;

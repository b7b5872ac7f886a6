use std::path::Path;

use crate::assets::store::resolve_asset_path;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Still image ready for painting: premultiplied RGBA8, rows packed top to bottom.
#[derive(Clone, Debug)]
pub(crate) struct PreparedImage {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Vec<u8>,
}

/// Read `src` below `assets_root` and decode it.
pub(crate) fn load_image(assets_root: &Path, src: &str) -> ReelResult<PreparedImage> {
    let path = resolve_asset_path(assets_root, src)?;
    let bytes = std::fs::read(&path)
        .map_err(|e| ReelError::asset(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes).map_err(|e| match e {
        ReelError::Asset(msg) => ReelError::asset(format!("{msg} ('{src}')")),
        other => other,
    })
}

/// Decode any format the `image` crate understands.
pub(crate) fn decode_image(bytes: &[u8]) -> ReelResult<PreparedImage> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| ReelError::asset(format!("decode image: {e}")))?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

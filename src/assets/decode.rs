use std::path::Path;

use anyhow::Context;
use image::{RgbImage, RgbaImage, imageops::FilterType};

use crate::foundation::error::{SynthError, SynthResult};

/// Decode a foreground cut-out. Sources without an alpha channel come back fully opaque.
pub fn decode_foreground(bytes: &[u8]) -> SynthResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SynthError::decode(format!("foreground: {e}")))?;
    Ok(dyn_img.to_rgba8())
}

/// Decode a background and stretch it to a `size`×`size` RGB canvas.
///
/// Alpha is dropped, not flattened. `size == 0` keeps the native resolution.
pub fn decode_background(bytes: &[u8], size: u32) -> SynthResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SynthError::decode(format!("background: {e}")))?;
    let rgb = dyn_img.to_rgb8();
    if size == 0 || (rgb.width() == size && rgb.height() == size) {
        return Ok(rgb);
    }
    Ok(image::imageops::resize(
        &rgb,
        size,
        size,
        FilterType::CatmullRom,
    ))
}

pub fn load_foreground(path: &Path) -> SynthResult<RgbaImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read foreground '{}'", path.display()))?;
    decode_foreground(&bytes)
}

pub fn load_background(path: &Path, size: u32) -> SynthResult<RgbImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read background '{}'", path.display()))?;
    decode_background(&bytes, size)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

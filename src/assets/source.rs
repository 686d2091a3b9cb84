use std::path::Path;

use image::{RgbImage, RgbaImage};

use crate::assets::decode::{load_background, load_foreground};
use crate::assets::pool::AssetPool;
use crate::foundation::error::{SynthError, SynthResult};

/// Where the generator gets its backgrounds and foregrounds from.
///
/// Loads hand back freshly decoded, owned images: callers hold at most one of each per
/// in-flight sample and nothing is cached between samples.
pub trait AssetSource: Sync {
    fn background_count(&self) -> usize;

    fn foreground_count(&self) -> usize;

    /// Background `index` as a `size`×`size` RGB canvas.
    fn load_background(&self, index: usize, size: u32) -> SynthResult<RgbImage>;

    /// Foreground `index` with an alpha channel.
    fn load_foreground(&self, index: usize) -> SynthResult<RgbaImage>;

    /// Human-readable name of a background, used in logs.
    fn background_name(&self, index: usize) -> String {
        format!("background#{index}")
    }

    /// Human-readable name of a foreground, used in logs.
    fn foreground_name(&self, index: usize) -> String {
        format!("foreground#{index}")
    }

    /// Fail fast when either pool is empty.
    fn ensure_non_empty(&self) -> SynthResult<()> {
        if self.background_count() == 0 {
            return Err(SynthError::validation("background pool is empty"));
        }
        if self.foreground_count() == 0 {
            return Err(SynthError::validation("foreground pool is empty"));
        }
        Ok(())
    }
}

/// Image files discovered on disk, decoded on every load.
#[derive(Clone, Debug)]
pub struct DirAssets {
    pub backgrounds: AssetPool,
    pub foregrounds: AssetPool,
}

impl DirAssets {
    pub fn discover(background_dir: &Path, foreground_dir: &Path) -> SynthResult<Self> {
        let backgrounds = AssetPool::discover(background_dir)?;
        let foregrounds = AssetPool::discover(foreground_dir)?;
        if backgrounds.is_empty() {
            return Err(SynthError::validation(format!(
                "no background images in '{}'",
                background_dir.display()
            )));
        }
        if foregrounds.is_empty() {
            return Err(SynthError::validation(format!(
                "no foreground images in '{}'",
                foreground_dir.display()
            )));
        }
        Ok(Self {
            backgrounds,
            foregrounds,
        })
    }
}

impl AssetSource for DirAssets {
    fn background_count(&self) -> usize {
        self.backgrounds.len()
    }

    fn foreground_count(&self) -> usize {
        self.foregrounds.len()
    }

    fn load_background(&self, index: usize, size: u32) -> SynthResult<RgbImage> {
        let path = self.backgrounds.paths().get(index).ok_or_else(|| {
            SynthError::validation(format!("background index {index} out of range"))
        })?;
        load_background(path, size)
    }

    fn load_foreground(&self, index: usize) -> SynthResult<RgbaImage> {
        let path = self.foregrounds.paths().get(index).ok_or_else(|| {
            SynthError::validation(format!("foreground index {index} out of range"))
        })?;
        load_foreground(path)
    }

    fn background_name(&self, index: usize) -> String {
        self.backgrounds
            .paths()
            .get(index)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    fn foreground_name(&self, index: usize) -> String {
        self.foregrounds
            .paths()
            .get(index)
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// Pre-decoded images held in memory; loads clone them.
#[derive(Clone, Debug, Default)]
pub struct InMemoryAssets {
    pub backgrounds: Vec<RgbImage>,
    pub foregrounds: Vec<RgbaImage>,
}

impl AssetSource for InMemoryAssets {
    fn background_count(&self) -> usize {
        self.backgrounds.len()
    }

    fn foreground_count(&self) -> usize {
        self.foregrounds.len()
    }

    fn load_background(&self, index: usize, size: u32) -> SynthResult<RgbImage> {
        let bg = self.backgrounds.get(index).ok_or_else(|| {
            SynthError::validation(format!("background index {index} out of range"))
        })?;
        if size == 0 || bg.dimensions() == (size, size) {
            return Ok(bg.clone());
        }
        Ok(image::imageops::resize(
            bg,
            size,
            size,
            image::imageops::FilterType::CatmullRom,
        ))
    }

    fn load_foreground(&self, index: usize) -> SynthResult<RgbaImage> {
        self.foregrounds.get(index).cloned().ok_or_else(|| {
            SynthError::validation(format!("foreground index {index} out of range"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

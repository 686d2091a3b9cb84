use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{SynthError, SynthResult};

/// Raster extensions picked up by discovery (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

/// Sorted list of image files found under a directory tree.
#[derive(Clone, Debug, Default)]
pub struct AssetPool {
    paths: Vec<PathBuf>,
}

impl AssetPool {
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        Self { paths }
    }

    /// Walk `root` recursively and collect every file with a known raster extension.
    ///
    /// Paths are sorted so that a seed selects the same files on every platform.
    pub fn discover(root: &Path) -> SynthResult<Self> {
        if !root.is_dir() {
            return Err(SynthError::validation(format!(
                "asset directory '{}' does not exist or is not a directory",
                root.display()
            )));
        }
        let mut paths = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            let entries = std::fs::read_dir(&dir)
                .with_context(|| format!("read asset dir '{}'", dir.display()))?;
            for entry in entries {
                let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .with_context(|| format!("stat '{}'", path.display()))?;
                if file_type.is_dir() {
                    stack.push(path);
                } else if is_image_path(&path) {
                    paths.push(path);
                }
            }
        }
        tracing::debug!(root = %root.display(), files = paths.len(), "discovered assets");
        Ok(Self::from_paths(paths))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;

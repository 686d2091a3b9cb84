use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{ImageEncoder, codecs::jpeg::JpegEncoder};

use crate::foundation::error::SynthResult;
use crate::pipeline::sample::Sample;
use crate::pipeline::sink::SampleSink;

/// JPEG quality used for every written image.
pub const JPEG_QUALITY: u8 = 92;

/// Writes `images/<id>.jpg` and `labels/<id>.txt` under an output root.
#[derive(Clone, Debug)]
pub struct DatasetWriter {
    root: PathBuf,
    images_dir: PathBuf,
    labels_dir: PathBuf,
}

impl DatasetWriter {
    /// Create the output tree (existing files with the same ids get overwritten).
    pub fn create(root: &Path) -> SynthResult<Self> {
        let images_dir = root.join("images");
        let labels_dir = root.join("labels");
        std::fs::create_dir_all(&images_dir)
            .with_context(|| format!("create output dir '{}'", images_dir.display()))?;
        std::fs::create_dir_all(&labels_dir)
            .with_context(|| format!("create output dir '{}'", labels_dir.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
            images_dir,
            labels_dir,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_path(&self, stem: &str) -> PathBuf {
        self.images_dir.join(format!("{stem}.jpg"))
    }

    pub fn label_path(&self, stem: &str) -> PathBuf {
        self.labels_dir.join(format!("{stem}.txt"))
    }

    /// Serialize `value` as pretty JSON to `<root>/<name>`.
    pub fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> SynthResult<()> {
        let path = self.root.join(name);
        let f = File::create(&path).with_context(|| format!("create '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), value)
            .with_context(|| format!("write '{}'", path.display()))?;
        Ok(())
    }
}

impl SampleSink for DatasetWriter {
    fn write_sample(&mut self, sample: &Sample) -> SynthResult<()> {
        let stem = sample.id.file_stem();

        let img_path = self.image_path(&stem);
        let f = File::create(&img_path)
            .with_context(|| format!("create image '{}'", img_path.display()))?;
        let (w, h) = sample.canvas.dimensions();
        JpegEncoder::new_with_quality(BufWriter::new(f), JPEG_QUALITY)
            .write_image(sample.canvas.as_raw(), w, h, image::ExtendedColorType::Rgb8)
            .with_context(|| format!("encode jpeg '{}'", img_path.display()))?;

        let label_path = self.label_path(&stem);
        std::fs::write(&label_path, sample.outcome.label_outcome().file_contents())
            .with_context(|| format!("write label '{}'", label_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/writer.rs"]
mod tests;

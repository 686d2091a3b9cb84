use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::Context;

use crate::foundation::error::{SynthError, SynthResult};

/// How random streams are laid out across a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngMode {
    /// One generator seeded once and consumed by every draw of every sample, in order.
    #[default]
    Shared,
    /// An independent generator per sample index, derived from the run seed. Output no
    /// longer depends on scheduling, which is what allows parallel generation.
    PerSample,
}

/// Everything a generation run needs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    pub background_dir: PathBuf,
    pub foreground_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Number of samples to emit.
    pub count: u64,
    /// Side of the square output canvas in pixels.
    pub image_size: u32,
    pub seed: u64,
    /// Foreground long side as a fraction of the canvas's shorter side.
    pub min_scale: f64,
    pub max_scale: f64,
    pub interference_prob: f64,
    pub glare_prob: f64,
    pub perspective_prob: f64,
    pub rng_mode: RngMode,
    /// Worker threads for [`RngMode::PerSample`] runs; `None` keeps generation sequential.
    pub threads: Option<usize>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            background_dir: PathBuf::new(),
            foreground_dir: PathBuf::new(),
            output_dir: PathBuf::from("out"),
            count: 1000,
            image_size: 320,
            seed: 42,
            min_scale: 0.08,
            max_scale: 0.2,
            interference_prob: 0.6,
            glare_prob: 0.6,
            perspective_prob: 0.5,
            rng_mode: RngMode::Shared,
            threads: None,
        }
    }
}

impl SynthConfig {
    /// Read a JSON config; omitted fields keep their defaults.
    pub fn from_path(path: &Path) -> SynthResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> SynthResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SynthError::validation(format!("serialize config: {e}")))
    }

    pub fn scale_range(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    pub fn validate(&self) -> SynthResult<()> {
        if self.count == 0 {
            return Err(SynthError::validation("count must be > 0"));
        }
        if self.image_size == 0 {
            return Err(SynthError::validation("image_size must be > 0"));
        }
        if !self.min_scale.is_finite() || !self.max_scale.is_finite() {
            return Err(SynthError::validation("scale bounds must be finite"));
        }
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(SynthError::validation(
                "scale range must satisfy 0 < min_scale <= max_scale",
            ));
        }
        for (name, p) in [
            ("interference_prob", self.interference_prob),
            ("glare_prob", self.glare_prob),
            ("perspective_prob", self.perspective_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SynthError::validation(format!(
                    "{name} must be within [0, 1]"
                )));
            }
        }
        if let Some(n) = self.threads {
            if n == 0 {
                return Err(SynthError::validation("threads must be >= 1 when set"));
            }
            if self.rng_mode == RngMode::Shared {
                return Err(SynthError::validation(
                    "parallel generation requires rng_mode = per_sample",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;

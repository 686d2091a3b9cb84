use rayon::prelude::*;

use crate::assets::source::{AssetSource, DirAssets};
use crate::foundation::core::SampleId;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::math::derive_sample_seed;
use crate::foundation::random::{SynthRng, seeded};
use crate::pipeline::config::{RngMode, SynthConfig};
use crate::pipeline::sample::{Sample, SampleOutcome, generate_sample};
use crate::pipeline::sink::SampleSink;
use crate::pipeline::writer::DatasetWriter;

/// Samples generated per parallel chunk before they are handed to the sink in order.
pub const PARALLEL_CHUNK_SIZE: u64 = 64;

/// File name of the run summary written next to `images/` and `labels/`.
pub const SUMMARY_FILE: &str = "summary.json";

/// Counters for a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunStats {
    /// Slots processed, written or failed.
    pub samples_total: u64,
    /// Samples written with a label line.
    pub labeled: u64,
    /// Samples that passed validation but were rejected by the encoder.
    pub accepted_without_label: u64,
    /// Samples kept after the retry budget ran out.
    pub exhausted_retries: u64,
    /// Exhausted samples whose box was rejected too, written without a label line.
    pub exhausted_unlabeled: u64,
    /// Slots that never produced a canvas and were skipped; they use up no identity.
    pub failed: u64,
    pub attempts_total: u64,
    pub decode_failures: u64,
}

impl RunStats {
    fn record(&mut self, sample: &Sample) {
        self.samples_total += 1;
        self.attempts_total += u64::from(sample.attempts);
        self.decode_failures += u64::from(sample.decode_failures);
        match sample.outcome {
            SampleOutcome::Accepted(_) => self.labeled += 1,
            SampleOutcome::AcceptedWithoutLabel => self.accepted_without_label += 1,
            SampleOutcome::ExhaustedRetries(o) => {
                self.exhausted_retries += 1;
                if o.label().is_some() {
                    self.labeled += 1;
                } else {
                    self.exhausted_unlabeled += 1;
                }
            }
        }
    }

    fn record_failure(&mut self, slot: u64, err: &SynthError) {
        tracing::warn!(slot, error = %err, "slot skipped, no attempt produced a canvas");
        self.samples_total += 1;
        self.failed += 1;
    }
}

/// Summary document persisted at the end of a run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RunSummary<'a> {
    pub config: &'a SynthConfig,
    pub backgrounds: usize,
    pub foregrounds: usize,
    pub stats: RunStats,
}

/// Generate `config.count` samples from `assets` into `sink`.
///
/// The run works through `count` slots. In [`RngMode::Shared`] one generator seeded with
/// `config.seed` feeds every draw in order; in [`RngMode::PerSample`] each slot gets its
/// own generator, and with `threads` set chunks of slots are produced on a rayon pool.
/// Slots that produce no sample are skipped, and written samples take consecutive
/// identities from 1 in slot order, so the output has no numbering gaps in any mode.
#[tracing::instrument(skip_all, fields(count = config.count, seed = config.seed))]
pub fn generate_batch(
    config: &SynthConfig,
    assets: &dyn AssetSource,
    sink: &mut dyn SampleSink,
) -> SynthResult<RunStats> {
    config.validate()?;
    assets.ensure_non_empty()?;

    let mut stats = RunStats::default();
    match (config.rng_mode, config.threads) {
        (RngMode::Shared, _) => {
            let mut rng = seeded(config.seed);
            for slot in 1..=config.count {
                let res = generate_sample(SampleId(slot), assets, config, &mut rng);
                absorb(&mut stats, sink, slot, res)?;
            }
        }
        (RngMode::PerSample, None) => {
            for slot in 1..=config.count {
                let mut rng = sample_rng(config.seed, slot);
                let res = generate_sample(SampleId(slot), assets, config, &mut rng);
                absorb(&mut stats, sink, slot, res)?;
            }
        }
        (RngMode::PerSample, Some(threads)) => {
            let pool = build_thread_pool(threads)?;
            let mut chunk_start = 1u64;
            while chunk_start <= config.count {
                let chunk_end = (chunk_start + PARALLEL_CHUNK_SIZE - 1).min(config.count);
                let produced: Vec<(u64, SynthResult<Sample>)> = pool.install(|| {
                    (chunk_start..=chunk_end)
                        .into_par_iter()
                        .map(|slot| {
                            let mut rng = sample_rng(config.seed, slot);
                            (slot, generate_sample(SampleId(slot), assets, config, &mut rng))
                        })
                        .collect()
                });
                for (slot, res) in produced {
                    absorb(&mut stats, sink, slot, res)?;
                }
                chunk_start = chunk_end + 1;
            }
        }
    }
    sink.finish()?;

    if stats.exhausted_retries > 0 || stats.failed > 0 {
        tracing::warn!(
            exhausted = stats.exhausted_retries,
            unlabeled = stats.exhausted_unlabeled + stats.accepted_without_label,
            failed = stats.failed,
            "some samples fell back past the retry budget"
        );
    }
    tracing::info!(
        samples = stats.samples_total,
        labeled = stats.labeled,
        attempts = stats.attempts_total,
        "generation finished"
    );
    Ok(stats)
}

/// Discover assets, generate into `config.output_dir`, and write the run summary.
pub fn run_dataset(config: &SynthConfig) -> SynthResult<RunStats> {
    config.validate()?;
    let assets = DirAssets::discover(&config.background_dir, &config.foreground_dir)?;
    tracing::info!(
        backgrounds = assets.backgrounds.len(),
        foregrounds = assets.foregrounds.len(),
        out = %config.output_dir.display(),
        "starting generation"
    );

    let mut writer = DatasetWriter::create(&config.output_dir)?;
    let stats = generate_batch(config, &assets, &mut writer)?;
    writer.write_json(
        SUMMARY_FILE,
        &RunSummary {
            config,
            backgrounds: assets.backgrounds.len(),
            foregrounds: assets.foregrounds.len(),
            stats,
        },
    )?;
    Ok(stats)
}

/// Independent generator for slot `index` of a run seeded with `seed`.
pub fn sample_rng(seed: u64, index: u64) -> SynthRng {
    seeded(derive_sample_seed(seed, index))
}

// Per-slot failures are counted and skipped; anything else aborts the run.
// Written samples are renumbered to the next free identity.
fn absorb(
    stats: &mut RunStats,
    sink: &mut dyn SampleSink,
    slot: u64,
    res: SynthResult<Sample>,
) -> SynthResult<()> {
    match res {
        Ok(mut sample) => {
            sample.id = SampleId(stats.samples_total - stats.failed + 1);
            stats.record(&sample);
            sink.write_sample(&sample)
        }
        Err(e @ (SynthError::Decode(_) | SynthError::Other(_))) => {
            stats.record_failure(slot, &e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn build_thread_pool(threads: usize) -> SynthResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SynthError::validation("threads must be >= 1 when set"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| SynthError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;

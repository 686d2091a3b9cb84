use std::sync::atomic::{AtomicUsize, Ordering};

use image::{RgbImage, RgbaImage};

use super::*;
use crate::assets::source::InMemoryAssets;
use crate::pipeline::sample::MAX_ATTEMPTS;
use crate::pipeline::sink::InMemorySampleSink;

fn assets() -> InMemoryAssets {
    InMemoryAssets {
        backgrounds: vec![
            RgbImage::from_pixel(48, 48, image::Rgb([20, 90, 40])),
            RgbImage::from_fn(48, 48, |x, y| image::Rgb([(x * 5) as u8, (y * 5) as u8, 90])),
        ],
        foregrounds: vec![
            RgbaImage::from_pixel(24, 12, image::Rgba([250, 10, 10, 255])),
            RgbaImage::from_pixel(10, 20, image::Rgba([10, 10, 250, 200])),
        ],
    }
}

fn config(count: u64) -> SynthConfig {
    SynthConfig {
        count,
        image_size: 48,
        min_scale: 0.3,
        max_scale: 0.6,
        ..SynthConfig::default()
    }
}

fn run(cfg: &SynthConfig, assets: &dyn AssetSource) -> (RunStats, InMemorySampleSink) {
    let mut sink = InMemorySampleSink::default();
    let stats = generate_batch(cfg, assets, &mut sink).unwrap();
    (stats, sink)
}

struct BrokenForegrounds(InMemoryAssets);

impl AssetSource for BrokenForegrounds {
    fn background_count(&self) -> usize {
        self.0.background_count()
    }

    fn foreground_count(&self) -> usize {
        self.0.foreground_count()
    }

    fn load_background(&self, index: usize, size: u32) -> SynthResult<RgbImage> {
        self.0.load_background(index, size)
    }

    fn load_foreground(&self, _index: usize) -> SynthResult<RgbaImage> {
        Err(SynthError::decode("truncated png"))
    }
}

/// Fails the first `fail_first` foreground loads, then behaves normally.
struct FlakyForegrounds {
    inner: InMemoryAssets,
    fail_first: usize,
    loads: AtomicUsize,
}

impl FlakyForegrounds {
    fn new(fail_first: usize) -> Self {
        Self {
            inner: assets(),
            fail_first,
            loads: AtomicUsize::new(0),
        }
    }
}

impl AssetSource for FlakyForegrounds {
    fn background_count(&self) -> usize {
        self.inner.background_count()
    }

    fn foreground_count(&self) -> usize {
        self.inner.foreground_count()
    }

    fn load_background(&self, index: usize, size: u32) -> SynthResult<RgbImage> {
        self.inner.load_background(index, size)
    }

    fn load_foreground(&self, index: usize) -> SynthResult<RgbaImage> {
        if self.loads.fetch_add(1, Ordering::SeqCst) < self.fail_first {
            return Err(SynthError::decode("truncated png"));
        }
        self.inner.load_foreground(index)
    }
}

#[test]
fn shared_mode_emits_ids_in_order_and_counts_everything() {
    let (stats, sink) = run(&config(12), &assets());
    assert!(sink.finished);
    let ids: Vec<u64> = sink.samples.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    assert_eq!(stats.samples_total, 12);
    assert_eq!(stats.failed, 0);
    assert_eq!(
        stats.labeled + stats.accepted_without_label + stats.exhausted_unlabeled,
        12
    );
    let attempts: u64 = sink.samples.iter().map(|s| u64::from(s.attempts)).sum();
    assert_eq!(stats.attempts_total, attempts);
    assert!(sink.samples.iter().all(|s| s.attempts <= MAX_ATTEMPTS));
}

#[test]
fn shared_mode_is_reproducible() {
    let cfg = config(6);
    let (a_stats, a) = run(&cfg, &assets());
    let (b_stats, b) = run(&cfg, &assets());
    assert_eq!(a_stats, b_stats);
    for (x, y) in a.samples.iter().zip(&b.samples) {
        assert_eq!(x.canvas, y.canvas);
        assert_eq!(x.outcome, y.outcome);
    }
}

#[test]
fn per_sample_mode_matches_across_thread_counts() {
    let sequential = SynthConfig {
        rng_mode: RngMode::PerSample,
        ..config(70)
    };
    let parallel = SynthConfig {
        threads: Some(3),
        ..sequential.clone()
    };
    let (seq_stats, seq) = run(&sequential, &assets());
    let (par_stats, par) = run(&parallel, &assets());
    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq.samples.len(), 70);
    for (x, y) in seq.samples.iter().zip(&par.samples) {
        assert_eq!(x.id, y.id);
        assert_eq!(x.canvas, y.canvas);
        assert_eq!(x.outcome, y.outcome);
    }
}

#[test]
fn per_sample_stream_does_not_depend_on_earlier_samples() {
    let cfg = SynthConfig {
        rng_mode: RngMode::PerSample,
        perspective_prob: 0.0,
        ..config(5)
    };
    let (_, full) = run(&cfg, &assets());
    let mut rng = sample_rng(cfg.seed, 4);
    let alone = generate_sample(SampleId(4), &assets(), &cfg, &mut rng).unwrap();
    assert_eq!(full.samples[3].canvas, alone.canvas);
    assert_eq!(full.samples[3].placement, alone.placement);
}

#[test]
fn empty_pool_fails_before_any_sample() {
    let empty = InMemoryAssets {
        backgrounds: Vec::new(),
        ..assets()
    };
    let mut sink = InMemorySampleSink::default();
    let err = generate_batch(&config(3), &empty, &mut sink).unwrap_err();
    assert!(matches!(err, SynthError::Validation(_)));
    assert!(sink.samples.is_empty());
    assert!(!sink.finished);
}

#[test]
fn undecodable_samples_are_counted_and_skipped() {
    let broken = BrokenForegrounds(assets());
    let (stats, sink) = run(&config(3), &broken);
    assert!(sink.samples.is_empty());
    assert_eq!(stats.samples_total, 3);
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.labeled, 0);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = SynthConfig {
        threads: Some(2),
        ..config(3)
    };
    let mut sink = InMemorySampleSink::default();
    assert!(generate_batch(&cfg, &assets(), &mut sink).is_err());
}

#[test]
fn stats_serialize_with_field_names() {
    let v = serde_json::to_value(RunStats {
        samples_total: 2,
        labeled: 2,
        ..RunStats::default()
    })
    .unwrap();
    assert_eq!(v["samples_total"], 2);
    assert_eq!(v["labeled"], 2);
    assert_eq!(v["failed"], 0);
}

#[test]
fn skipped_slot_leaves_no_gap_in_ids() {
    for mode in [RngMode::Shared, RngMode::PerSample] {
        let cfg = SynthConfig {
            rng_mode: mode,
            ..config(3)
        };
        let flaky = FlakyForegrounds::new(MAX_ATTEMPTS as usize);
        let (stats, sink) = run(&cfg, &flaky);
        let ids: Vec<u64> = sink.samples.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2], "{mode:?}");
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.samples_total, 3);
    }
}

#[test]
fn written_files_start_at_one_after_a_skipped_slot() {
    let tmp = std::env::temp_dir().join(format!(
        "detsynth_run_gapless_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let mut writer = DatasetWriter::create(&tmp).unwrap();
    let flaky = FlakyForegrounds::new(MAX_ATTEMPTS as usize);
    let stats = generate_batch(&config(3), &flaky, &mut writer).unwrap();
    assert_eq!(stats.failed, 1);
    assert!(tmp.join("images/000001.jpg").is_file());
    assert!(tmp.join("labels/000002.txt").is_file());
    assert!(!tmp.join("images/000003.jpg").exists());
    std::fs::remove_dir_all(&tmp).ok();
}

//! One sample: select, composite, augment, validate, then accept or retry.

use image::RgbImage;
use rand::Rng;

use crate::assets::source::AssetSource;
use crate::composite::placement::composite_one;
use crate::effects::chain::{AugmentToggles, augment};
use crate::foundation::core::{BoundingBox, Placement, SampleId};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random::{chance, index};
use crate::label::encode::{DEFAULT_CLASS_ID, Label, LabelOutcome, encode};
use crate::pipeline::config::SynthConfig;

/// Attempts per sample index before the last result is kept regardless.
pub const MAX_ATTEMPTS: u32 = 5;
/// An accepted box must be strictly wider and taller than this, in pixels, after clamping.
pub const MIN_BOX_SIDE_PX: f64 = 2.0;

/// How a sample's label came out.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SampleOutcome {
    /// Passed validation and encoded to a label.
    Accepted(Label),
    /// Passed validation but the encoder still rejected the box.
    AcceptedWithoutLabel,
    /// Every attempt failed validation; the last attempt is kept with whatever the
    /// encoder made of it.
    ExhaustedRetries(LabelOutcome),
}

impl SampleOutcome {
    pub fn label_outcome(&self) -> LabelOutcome {
        match self {
            Self::Accepted(l) => LabelOutcome::Label(*l),
            Self::AcceptedWithoutLabel => LabelOutcome::Rejected,
            Self::ExhaustedRetries(o) => *o,
        }
    }
}

/// What one attempt decided and produced.
#[derive(Clone, Debug)]
pub struct Attempt {
    pub background: usize,
    pub foreground: usize,
    pub toggles: AugmentToggles,
    pub placement: Placement,
    pub canvas: RgbImage,
    pub bbox: BoundingBox,
}

/// A finished sample ready to be persisted.
#[derive(Clone, Debug)]
pub struct Sample {
    pub id: SampleId,
    pub canvas: RgbImage,
    pub bbox: BoundingBox,
    pub placement: Placement,
    pub toggles: AugmentToggles,
    pub outcome: SampleOutcome,
    /// Attempts spent, including the accepted one and any that failed to decode.
    pub attempts: u32,
    pub decode_failures: u32,
}

/// Draw the asset pair and stage toggles for one attempt.
///
/// Order: background, foreground, interference, glare, perspective.
pub fn select<R: Rng + ?Sized>(
    assets: &dyn AssetSource,
    config: &SynthConfig,
    rng: &mut R,
) -> (usize, usize, AugmentToggles) {
    let bg = index(rng, assets.background_count());
    let fg = index(rng, assets.foreground_count());
    let interference = chance(rng, config.interference_prob);
    let glare = chance(rng, config.glare_prob);
    let perspective = chance(rng, config.perspective_prob);
    (
        bg,
        fg,
        AugmentToggles {
            perspective,
            interference,
            glare,
        },
    )
}

/// Run one attempt from selection through augmentation.
pub fn run_attempt<R: Rng + ?Sized>(
    assets: &dyn AssetSource,
    config: &SynthConfig,
    rng: &mut R,
) -> SynthResult<Attempt> {
    let (bg_idx, fg_idx, toggles) = select(assets, config, rng);

    let background = assets.load_background(bg_idx, config.image_size)?;
    let foreground = assets.load_foreground(fg_idx)?;

    let composited = composite_one(background, &foreground, config.scale_range(), rng);
    let mut canvas = composited.canvas;
    let bbox = augment(&mut canvas, composited.bbox, toggles, rng)?;

    Ok(Attempt {
        background: bg_idx,
        foreground: fg_idx,
        toggles,
        placement: composited.placement,
        canvas,
        bbox,
    })
}

/// Whether a box is big enough to keep without retrying.
pub fn passes_validation(bbox: BoundingBox, canvas_size: u32) -> bool {
    let b = bbox.clamped(f64::from(canvas_size));
    b.width() > MIN_BOX_SIDE_PX && b.height() > MIN_BOX_SIDE_PX
}

/// Generate sample `id`, retrying at most [`MAX_ATTEMPTS`] times.
///
/// Undecodable assets consume an attempt and trigger a fresh draw. If no attempt ever
/// produced a canvas the last decode error is returned.
#[tracing::instrument(skip_all, fields(id = %id))]
pub fn generate_sample<R: Rng + ?Sized>(
    id: SampleId,
    assets: &dyn AssetSource,
    config: &SynthConfig,
    rng: &mut R,
) -> SynthResult<Sample> {
    let mut last: Option<Attempt> = None;
    let mut last_err: Option<SynthError> = None;
    let mut decode_failures = 0u32;
    let mut attempts = 0u32;

    while attempts < MAX_ATTEMPTS {
        attempts += 1;
        let attempt = match run_attempt(assets, config, rng) {
            Ok(a) => a,
            Err(e @ (SynthError::Decode(_) | SynthError::Other(_))) => {
                decode_failures += 1;
                tracing::warn!(attempt = attempts, error = %e, "asset load failed, retrying");
                last_err = Some(e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let ok = passes_validation(attempt.bbox, config.image_size);
        tracing::debug!(
            attempt = attempts,
            background = %assets.background_name(attempt.background),
            foreground = %assets.foreground_name(attempt.foreground),
            perspective = attempt.toggles.perspective,
            interference = attempt.toggles.interference,
            glare = attempt.toggles.glare,
            accepted = ok,
            "attempt finished"
        );
        if ok {
            let outcome = match encode(attempt.bbox, config.image_size, DEFAULT_CLASS_ID) {
                LabelOutcome::Label(l) => SampleOutcome::Accepted(l),
                LabelOutcome::Rejected => SampleOutcome::AcceptedWithoutLabel,
            };
            return Ok(finish(id, attempt, outcome, attempts, decode_failures));
        }
        last = Some(attempt);
    }

    match last {
        Some(attempt) => {
            let encoded = encode(attempt.bbox, config.image_size, DEFAULT_CLASS_ID);
            tracing::warn!(
                rejected = encoded == LabelOutcome::Rejected,
                "retry budget exhausted, keeping last attempt"
            );
            let outcome = SampleOutcome::ExhaustedRetries(encoded);
            Ok(finish(id, attempt, outcome, attempts, decode_failures))
        }
        None => Err(last_err
            .unwrap_or_else(|| SynthError::decode("no attempt produced a canvas"))),
    }
}

fn finish(
    id: SampleId,
    attempt: Attempt,
    outcome: SampleOutcome,
    attempts: u32,
    decode_failures: u32,
) -> Sample {
    Sample {
        id,
        canvas: attempt.canvas,
        bbox: attempt.bbox,
        placement: attempt.placement,
        toggles: attempt.toggles,
        outcome,
        attempts,
        decode_failures,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/sample.rs"]
mod tests;

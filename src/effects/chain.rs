use image::RgbImage;
use rand::Rng;

use crate::effects::photometric::{
    add_glare, add_interference_pattern, adjust_brightness, adjust_contrast,
};
use crate::effects::warp::apply_perspective;
use crate::foundation::core::BoundingBox;
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random::{chance, uniform};

/// Draw band for the interference blend weight.
pub const INTERFERENCE_STRENGTH: (f64, f64) = (0.05, 0.12);
/// Draw band for the glare opacity.
pub const GLARE_STRENGTH: (f64, f64) = (0.2, 0.5);
/// Brightness jitter band.
pub const BRIGHTNESS_FACTOR: (f64, f64) = (0.85, 1.15);
/// Contrast jitter band.
pub const CONTRAST_FACTOR: (f64, f64) = (0.9, 1.2);
/// Probability that each tone jitter runs.
pub const TONE_JITTER_PROB: f64 = 0.5;

/// Which optional stages run for one attempt. Decided once, before any stage runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AugmentToggles {
    pub perspective: bool,
    pub interference: bool,
    pub glare: bool,
}

impl AugmentToggles {
    pub const NONE: Self = Self {
        perspective: false,
        interference: false,
        glare: false,
    };
}

/// Run the augmentation stages in their fixed order:
/// perspective, interference, glare, brightness, contrast.
///
/// Returns the bounding box after any geometric change. A singular warp (never seen
/// with the inward quads drawn here) skips the warp and keeps the box.
pub fn augment<R: Rng + ?Sized>(
    canvas: &mut RgbImage,
    bbox: BoundingBox,
    toggles: AugmentToggles,
    rng: &mut R,
) -> SynthResult<BoundingBox> {
    let mut bbox = bbox;

    if toggles.perspective {
        match apply_perspective(canvas, bbox, rng) {
            Ok(warp) => bbox = warp.bbox,
            Err(SynthError::SingularTransform) => {
                tracing::warn!("singular perspective transform, warp skipped");
            }
            Err(e) => return Err(e),
        }
    }

    if toggles.interference {
        let strength = uniform(rng, INTERFERENCE_STRENGTH.0, INTERFERENCE_STRENGTH.1);
        add_interference_pattern(canvas, strength, rng);
    }

    if toggles.glare {
        let strength = uniform(rng, GLARE_STRENGTH.0, GLARE_STRENGTH.1);
        add_glare(canvas, strength, rng)?;
    }

    if chance(rng, TONE_JITTER_PROB) {
        let f = uniform(rng, BRIGHTNESS_FACTOR.0, BRIGHTNESS_FACTOR.1);
        adjust_brightness(canvas, f);
    }
    if chance(rng, TONE_JITTER_PROB) {
        let f = uniform(rng, CONTRAST_FACTOR.0, CONTRAST_FACTOR.1);
        adjust_contrast(canvas, f);
    }

    Ok(bbox)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chain.rs"]
mod tests;

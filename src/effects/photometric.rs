//! Procedural screen-capture artifacts and tone jitter.
//!
//! None of these aim for realism; they are cheap stand-ins for moiré, glare and
//! exposure drift seen when a display is photographed.

use std::f64::consts::PI;

use image::RgbImage;
use rand::Rng;

use crate::composite::alpha::blend_over;
use crate::effects::blur::{blur_gray8, radius_for_sigma};
use crate::foundation::error::SynthResult;
use crate::foundation::math::{clamp_u8, lerp_u8};
use crate::foundation::random::{int_inclusive, uniform};

/// Cycles of the interference field across the canvas.
pub const INTERFERENCE_FREQ: (f64, f64) = (8.0, 16.0);
/// Upper bound of the interference blend weight.
pub const INTERFERENCE_MAX_WEIGHT: f64 = 0.3;
/// Glare radius as a fraction of the canvas's shorter side.
pub const GLARE_RADIUS: (f64, f64) = (0.15, 0.35);
/// Allowed glare opacity band.
pub const GLARE_OPACITY: (f64, f64) = (0.1, 0.6);
/// Blur spread of the glare disc relative to its radius.
pub const GLARE_BLUR_FRACTION: f64 = 0.35;

/// Blend a full-canvas sinusoidal grating into `canvas`.
///
/// Draws frequency then orientation. The field is `sin(x cos θ + y sin θ)` with `x` and
/// `y` spanning `[0, 2π·freq]` across the canvas, rescaled to gray levels and mixed in
/// with weight `strength` clamped to `[0, 0.3]`.
pub fn add_interference_pattern<R: Rng + ?Sized>(
    canvas: &mut RgbImage,
    strength: f64,
    rng: &mut R,
) {
    let (w, h) = canvas.dimensions();
    let freq = uniform(rng, INTERFERENCE_FREQ.0, INTERFERENCE_FREQ.1);
    let angle = uniform(rng, 0.0, PI);
    let weight = strength.clamp(0.0, INTERFERENCE_MAX_WEIGHT) as f32;
    let (cos_a, sin_a) = (angle.cos(), angle.sin());
    let span = 2.0 * PI * freq;

    let xs = linspace(span, w);
    let ys = linspace(span, h);
    for (x, y, px) in canvas.enumerate_pixels_mut() {
        let v = (xs[x as usize] * cos_a + ys[y as usize] * sin_a).sin();
        let gray = ((v * 0.5 + 0.5) * 255.0) as u8;
        for c in px.0.iter_mut() {
            *c = lerp_u8(*c, gray, weight);
        }
    }
}

/// Composite one soft white disc over `canvas`.
///
/// Draws centre x, centre y, then radius. Opacity is `strength` clamped to
/// `[0.1, 0.6]`; the disc is blurred with a sigma of 0.35 × radius before blending.
pub fn add_glare<R: Rng + ?Sized>(
    canvas: &mut RgbImage,
    strength: f64,
    rng: &mut R,
) -> SynthResult<()> {
    let (w, h) = canvas.dimensions();
    let (wf, hf) = (f64::from(w), f64::from(h));
    let short = f64::from(w.min(h));

    let cx = int_inclusive(rng, (wf * 0.1) as i64, (wf * 0.9) as i64);
    let cy = int_inclusive(rng, (hf * 0.1) as i64, (hf * 0.9) as i64);
    let radius = int_inclusive(
        rng,
        (short * GLARE_RADIUS.0) as i64,
        (short * GLARE_RADIUS.1) as i64,
    );
    let alpha = (255.0 * strength.clamp(GLARE_OPACITY.0, GLARE_OPACITY.1)) as u8;

    let mut mask = vec![0u8; (w as usize) * (h as usize)];
    let r2 = radius * radius;
    for y in 0..i64::from(h) {
        for x in 0..i64::from(w) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r2 {
                mask[(y as usize) * (w as usize) + x as usize] = alpha;
            }
        }
    }

    let sigma = (radius as f64 * GLARE_BLUR_FRACTION) as f32;
    let mask = blur_gray8(&mask, w, h, radius_for_sigma(sigma), sigma)?;

    for (px, &a) in canvas.pixels_mut().zip(&mask) {
        px.0 = blend_over(px.0, [255, 255, 255, a]);
    }
    Ok(())
}

/// Multiply every channel by `factor`.
pub fn adjust_brightness(canvas: &mut RgbImage, factor: f64) {
    let f = factor as f32;
    for px in canvas.pixels_mut() {
        for c in px.0.iter_mut() {
            *c = clamp_u8(f32::from(*c) * f);
        }
    }
}

/// Scale every channel's distance from the rounded mean luma by `factor`.
pub fn adjust_contrast(canvas: &mut RgbImage, factor: f64) {
    let mean = mean_luma(canvas);
    let f = factor as f32;
    for px in canvas.pixels_mut() {
        for c in px.0.iter_mut() {
            *c = clamp_u8(mean + (f32::from(*c) - mean) * f);
        }
    }
}

/// Rounded mean of ITU-R 601 luma over the canvas.
pub fn mean_luma(canvas: &RgbImage) -> f32 {
    let n = u64::from(canvas.width()) * u64::from(canvas.height());
    if n == 0 {
        return 0.0;
    }
    let sum: u64 = canvas
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (u64::from(r) * 19595 + u64::from(g) * 38470 + u64::from(b) * 7471 + 0x8000) >> 16
        })
        .sum();
    (sum as f64 / n as f64).round() as f32
}

fn linspace(end: f64, n: u32) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = end / f64::from(n - 1);
            (0..n).map(|i| f64::from(i) * step).collect()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/photometric.rs"]
mod tests;

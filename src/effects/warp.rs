//! Perspective warp of the canvas with a matching bounding-box remap.

use image::RgbImage;
use rand::Rng;

use crate::foundation::core::{BoundingBox, Point};
use crate::foundation::error::SynthResult;
use crate::transform::homography::{
    Homography, Quad, apply_homography, random_perspective_quad, solve_homography,
};

/// Largest inward corner shift, as a fraction of each canvas dimension.
pub const PERSPECTIVE_MAX_SHIFT: f64 = 0.08;

/// Result of one perspective warp.
#[derive(Clone, Copy, Debug)]
pub struct PerspectiveWarp {
    /// Enclosing box of the remapped input box.
    pub bbox: BoundingBox,
    pub src_quad: Quad,
    pub dst_quad: Quad,
}

/// Warp `canvas` towards a random inward-jittered quad and remap `bbox` with it.
///
/// Pixels are resampled with the homography solved `dst -> src` (output pixel to
/// input pixel), while the box corners go through a separately solved `src -> dst`
/// homography. The new box is the axis-aligned enclosure of the four mapped corners.
pub fn apply_perspective<R: Rng + ?Sized>(
    canvas: &mut RgbImage,
    bbox: BoundingBox,
    rng: &mut R,
) -> SynthResult<PerspectiveWarp> {
    let (w, h) = canvas.dimensions();
    let (src_quad, dst_quad) =
        random_perspective_quad(f64::from(w), f64::from(h), PERSPECTIVE_MAX_SHIFT, rng);

    let backward = solve_homography(&dst_quad, &src_quad)?;
    let forward = solve_homography(&src_quad, &dst_quad)?;

    *canvas = warp_perspective(canvas, &backward);

    Ok(PerspectiveWarp {
        bbox: remap_box(bbox, &forward),
        src_quad,
        dst_quad,
    })
}

/// Enclosing axis-aligned box of `bbox`'s corners mapped through `forward`.
pub fn remap_box(bbox: BoundingBox, forward: &Homography) -> BoundingBox {
    let mapped = apply_homography(&bbox.corners(), forward);
    BoundingBox::enclosing(&mapped).unwrap_or(bbox)
}

/// Resample `src` into a same-sized image; `backward` maps output to input coordinates.
///
/// Pixel centres are mapped, sampled bilinearly, and anything landing outside the
/// source is black.
pub fn warp_perspective(src: &RgbImage, backward: &Homography) -> RgbImage {
    let (w, h) = src.dimensions();
    let mut out = RgbImage::new(w, h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let p = backward.apply(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5));
        if let Some(rgb) = sample_bilinear(src, p.x - 0.5, p.y - 0.5) {
            px.0 = rgb;
        }
    }
    out
}

fn sample_bilinear(img: &RgbImage, fx: f64, fy: f64) -> Option<[u8; 3]> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || !fx.is_finite() || !fy.is_finite() {
        return None;
    }
    let max_x = f64::from(w) - 0.5;
    let max_y = f64::from(h) - 0.5;
    if fx < -0.5 || fy < -0.5 || fx >= max_x || fy >= max_y {
        return None;
    }
    let fx = fx.clamp(0.0, f64::from(w - 1));
    let fy = fy.clamp(0.0, f64::from(h - 1));
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let tx = fx - f64::from(x0);
    let ty = fy - f64::from(y0);

    let p00 = img.get_pixel(x0, y0).0;
    let p10 = img.get_pixel(x1, y0).0;
    let p01 = img.get_pixel(x0, y1).0;
    let p11 = img.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = f64::from(p00[c]) * (1.0 - tx) + f64::from(p10[c]) * tx;
        let bottom = f64::from(p01[c]) * (1.0 - tx) + f64::from(p11[c]) * tx;
        let v = top * (1.0 - ty) + bottom * ty;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/warp.rs"]
mod tests;

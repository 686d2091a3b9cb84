use image::{RgbImage, RgbaImage, imageops::FilterType};
use rand::Rng;

use crate::composite::alpha::alpha_composite;
use crate::foundation::core::{BoundingBox, Placement};
use crate::foundation::random::{int_inclusive, uniform};

/// Smallest long side a placed foreground is resized to.
pub const MIN_TARGET_LONG_SIDE: u32 = 8;

/// Canvas after compositing, with where the foreground ended up.
#[derive(Clone, Debug)]
pub struct Composited {
    pub canvas: RgbImage,
    pub bbox: BoundingBox,
    pub placement: Placement,
}

/// Resize so the longer side equals `target_long`, keeping the aspect ratio.
///
/// The shorter side is truncated and never drops below one pixel. Empty sources come
/// back untouched.
pub fn resize_keep_aspect(img: &RgbaImage, target_long: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let target_long = target_long.max(1);
    let (nw, nh) = if w >= h {
        let nh = (f64::from(h) * (f64::from(target_long) / f64::from(w))) as u32;
        (target_long, nh)
    } else {
        let nw = (f64::from(w) * (f64::from(target_long) / f64::from(h))) as u32;
        (nw, target_long)
    };
    let (nw, nh) = (nw.max(1), nh.max(1));
    if (nw, nh) == (w, h) {
        return img.clone();
    }
    image::imageops::resize(img, nw, nh, FilterType::CatmullRom)
}

/// Scale, place and blend one foreground onto `background`.
///
/// Draw order: scale, x offset, y offset. The scale is a fraction of the canvas's
/// shorter side; offsets are uniform over every position that keeps the foreground on
/// the canvas, collapsing to 0 along an axis the foreground fills.
pub fn composite_one<R: Rng + ?Sized>(
    mut background: RgbImage,
    foreground: &RgbaImage,
    scale_range: (f64, f64),
    rng: &mut R,
) -> Composited {
    let (bw, bh) = background.dimensions();
    let scale = uniform(rng, scale_range.0, scale_range.1);
    let target = (f64::from(bw.min(bh)) * scale) as u32;
    let fg = resize_keep_aspect(foreground, target.max(MIN_TARGET_LONG_SIDE));
    let (fw, fh) = fg.dimensions();

    let max_x = i64::from(bw.saturating_sub(fw));
    let max_y = i64::from(bh.saturating_sub(fh));
    let x = int_inclusive(rng, 0, max_x);
    let y = int_inclusive(rng, 0, max_y);

    alpha_composite(&mut background, &fg, (x, y));

    let placement = Placement {
        scale,
        x: x as u32,
        y: y as u32,
        width: fw,
        height: fh,
    };
    Composited {
        canvas: background,
        bbox: BoundingBox::from_placement(&placement),
        placement,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/placement.rs"]
mod tests;

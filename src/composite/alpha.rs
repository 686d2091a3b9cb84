use image::{RgbImage, RgbaImage};

use crate::foundation::math::mul_div255_u16;

/// Straight-alpha "over" of one RGBA pixel onto an opaque RGB pixel.
pub fn blend_over(dst: [u8; 3], src: [u8; 4]) -> [u8; 3] {
    let a = u16::from(src[3]);
    if a == 0 {
        return dst;
    }
    if a == 255 {
        return [src[0], src[1], src[2]];
    }
    let inv = 255 - a;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = mul_div255_u16(u16::from(src[i]), a) + mul_div255_u16(u16::from(dst[i]), inv);
        out[i] = v.min(255) as u8;
    }
    out
}

/// Blend `foreground` onto `background` in place, its top-left corner at `top_left`.
///
/// The foreground alpha is the per-pixel mix weight. Pixels that fall outside the
/// background are dropped, so partially off-canvas placements are fine.
pub fn alpha_composite(
    background: &mut RgbImage,
    foreground: &RgbaImage,
    top_left: (i64, i64),
) {
    let (bw, bh) = (i64::from(background.width()), i64::from(background.height()));
    let (ox, oy) = top_left;
    for (fx, fy, px) in foreground.enumerate_pixels() {
        let x = ox + i64::from(fx);
        let y = oy + i64::from(fy);
        if x < 0 || y < 0 || x >= bw || y >= bh {
            continue;
        }
        let dst = background.get_pixel_mut(x as u32, y as u32);
        dst.0 = blend_over(dst.0, px.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/alpha.rs"]
mod tests;

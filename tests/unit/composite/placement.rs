use super::*;
use crate::foundation::random::seeded;

fn solid_fg(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]))
}

#[test]
fn resize_long_side_is_exact() {
    for (w, h) in [(100u32, 50u32), (50, 100), (37, 37), (1, 90), (640, 3)] {
        for target in [1u32, 8, 33, 64, 200] {
            let out = resize_keep_aspect(&solid_fg(w, h), target);
            let (nw, nh) = out.dimensions();
            assert_eq!(nw.max(nh), target, "{w}x{h} -> {target}");
            let src_ratio = f64::from(w) / f64::from(h);
            if w >= h {
                let ideal = f64::from(target) / src_ratio;
                assert!((f64::from(nh) - ideal).abs() <= 1.0 || nh == 1);
            } else {
                let ideal = f64::from(target) * src_ratio;
                assert!((f64::from(nw) - ideal).abs() <= 1.0 || nw == 1);
            }
        }
    }
}

#[test]
fn resize_empty_source_is_noop() {
    let empty = RgbaImage::new(0, 5);
    assert_eq!(resize_keep_aspect(&empty, 20).dimensions(), (0, 5));
}

#[test]
fn resize_truncates_short_side() {
    let out = resize_keep_aspect(&solid_fg(30, 20), 10);
    assert_eq!(out.dimensions(), (10, 6));
}

#[test]
fn composite_box_matches_placement() {
    let bg = RgbImage::from_pixel(64, 64, image::Rgb([0, 0, 255]));
    let fg = solid_fg(20, 10);
    let mut rng = seeded(1);
    let out = composite_one(bg, &fg, (0.25, 0.25), &mut rng);

    assert_eq!(out.placement.width, 16);
    assert_eq!(out.placement.height, 8);
    assert_eq!(out.bbox, BoundingBox::from_placement(&out.placement));
    assert!(out.bbox.x2 <= 64.0 && out.bbox.y2 <= 64.0);

    let (x, y) = (out.placement.x, out.placement.y);
    assert_eq!(out.canvas.get_pixel(x, y).0, [255, 0, 0]);
    assert_eq!(out.canvas.get_pixel(x + 15, y + 7).0, [255, 0, 0]);
}

#[test]
fn tiny_scale_is_raised_to_min_target() {
    let bg = RgbImage::new(64, 64);
    let mut rng = seeded(2);
    let out = composite_one(bg, &solid_fg(40, 40), (0.01, 0.01), &mut rng);
    assert_eq!(out.placement.width, MIN_TARGET_LONG_SIDE);
}

#[test]
fn full_size_foreground_has_no_offset_variance() {
    let mut rng = seeded(3);
    for _ in 0..20 {
        let bg = RgbImage::new(32, 32);
        let out = composite_one(bg, &solid_fg(10, 10), (1.0, 1.0), &mut rng);
        assert_eq!((out.placement.x, out.placement.y), (0, 0));
        assert_eq!(out.bbox, BoundingBox::new(0.0, 0.0, 32.0, 32.0));
    }
}

#[test]
fn composite_is_deterministic_for_a_seed() {
    let fg = solid_fg(12, 30);
    let a = composite_one(RgbImage::new(80, 80), &fg, (0.1, 0.5), &mut seeded(9));
    let b = composite_one(RgbImage::new(80, 80), &fg, (0.1, 0.5), &mut seeded(9));
    assert_eq!(a.placement, b.placement);
    assert_eq!(a.canvas, b.canvas);
}

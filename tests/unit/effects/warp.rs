use super::*;
use crate::foundation::random::seeded;

fn gradient(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 90]))
}

#[test]
fn identity_warp_preserves_pixels() {
    let src = gradient(16, 12);
    let out = warp_perspective(&src, &Homography::identity());
    assert_eq!(out, src);
}

#[test]
fn full_canvas_box_encloses_dst_quad() {
    let mut rng = seeded(21);
    for _ in 0..10 {
        let mut canvas = gradient(64, 64);
        let full = BoundingBox::new(0.0, 0.0, 64.0, 64.0);
        let warp = apply_perspective(&mut canvas, full, &mut rng).unwrap();
        let want = BoundingBox::enclosing(&warp.dst_quad).unwrap();
        assert!((warp.bbox.x1 - want.x1).abs() < 1e-6);
        assert!((warp.bbox.y1 - want.y1).abs() < 1e-6);
        assert!((warp.bbox.x2 - want.x2).abs() < 1e-6);
        assert!((warp.bbox.y2 - want.y2).abs() < 1e-6);
    }
}

#[test]
fn warped_box_stays_near_the_input_box() {
    let mut rng = seeded(8);
    let mut canvas = gradient(100, 100);
    let b = BoundingBox::new(40.0, 40.0, 60.0, 60.0);
    let warp = apply_perspective(&mut canvas, b, &mut rng).unwrap();
    assert!(warp.bbox.is_valid());
    assert!((warp.bbox.x1 - b.x1).abs() < 10.0);
    assert!((warp.bbox.y2 - b.y2).abs() < 10.0);
}

#[test]
fn warp_shrinks_content_inward_leaving_black_corners() {
    let mut rng = seeded(13);
    let mut canvas = RgbImage::from_pixel(64, 64, image::Rgb([200, 200, 200]));
    let warp = apply_perspective(&mut canvas, BoundingBox::new(0.0, 0.0, 64.0, 64.0), &mut rng)
        .unwrap();
    assert_eq!(canvas.dimensions(), (64, 64));
    assert_eq!(canvas.get_pixel(32, 32).0, [200, 200, 200]);
    let tl = warp.dst_quad[0];
    if tl.x > 1.5 && tl.y > 1.5 {
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0]);
    }
}

#[test]
fn warp_consumes_eight_draws() {
    let mut a = seeded(4);
    let mut b = seeded(4);
    let mut canvas = gradient(8, 8);
    apply_perspective(&mut canvas, BoundingBox::new(1.0, 1.0, 4.0, 4.0), &mut a).unwrap();
    let _ = random_perspective_quad(8.0, 8.0, PERSPECTIVE_MAX_SHIFT, &mut b);
    assert_eq!(rand::Rng::random::<u64>(&mut a), rand::Rng::random::<u64>(&mut b));
}

use super::*;

#[test]
fn placement_box_covers_placed_rect() {
    let p = Placement {
        scale: 0.1,
        x: 5,
        y: 7,
        width: 20,
        height: 10,
    };
    let b = BoundingBox::from_placement(&p);
    assert_eq!(b, BoundingBox::new(5.0, 7.0, 25.0, 17.0));
    assert!(b.is_valid());
    assert_eq!(b.width(), 20.0);
    assert_eq!(b.height(), 10.0);
}

#[test]
fn enclosing_takes_min_max() {
    let pts = [
        Point::new(3.0, 9.0),
        Point::new(-1.0, 4.0),
        Point::new(7.5, 2.0),
        Point::new(0.0, 11.0),
    ];
    let b = BoundingBox::enclosing(&pts).unwrap();
    assert_eq!(b, BoundingBox::new(-1.0, 2.0, 7.5, 11.0));
    assert!(BoundingBox::enclosing(&[]).is_none());
}

#[test]
fn corners_are_clockwise_from_top_left() {
    let c = BoundingBox::new(1.0, 2.0, 3.0, 4.0).corners();
    assert_eq!(c[0], Point::new(1.0, 2.0));
    assert_eq!(c[1], Point::new(3.0, 2.0));
    assert_eq!(c[2], Point::new(3.0, 4.0));
    assert_eq!(c[3], Point::new(1.0, 4.0));
}

#[test]
fn clamping_can_collapse_a_box() {
    let b = BoundingBox::new(120.0, 10.0, 150.0, 20.0).clamped(100.0);
    assert_eq!(b.x1, 100.0);
    assert_eq!(b.x2, 100.0);
    assert!(!b.is_valid());
}

#[test]
fn sample_id_is_zero_padded() {
    assert_eq!(SampleId(1).file_stem(), "000001");
    assert_eq!(SampleId(123456).to_string(), "123456");
    assert_eq!(SampleId(1234567).file_stem(), "1234567");
}

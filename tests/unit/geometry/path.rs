use super::*;

#[test]
fn empty_path_has_no_bounds() {
    assert!(VectorPath::new().bounds().is_none());
    assert!(VectorPath::new().close().bounds().is_none());
}

#[test]
fn polyline_bounds() {
    let p = VectorPath::new()
        .move_to(Point::new(1.0, 1.0))
        .line_to(Point::new(4.0, -2.0))
        .line_to(Point::new(-1.0, 3.0))
        .close();
    assert_eq!(p.bounds().unwrap(), Rect::new(-1.0, -2.0, 4.0, 3.0));
    assert!(p.is_closed());
}

#[test]
fn curve_after_close_starts_at_contour_start() {
    let p = VectorPath::new()
        .move_to(Point::new(0.0, 0.0))
        .line_to(Point::new(10.0, 0.0))
        .close()
        .cubic_to(
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        );
    let b = p.bounds().unwrap();
    assert!((b.y1 - 7.5).abs() < 1e-9);
    assert_eq!(b.x0, 0.0);
}

#[test]
fn points_follow_instruction_order() {
    let p = VectorPath::new()
        .move_to(Point::new(1.0, 0.0))
        .rational_to(Point::new(2.0, 0.0), Point::new(3.0, 0.0), 0.5);
    let xs: Vec<f64> = p.points().map(|p| p.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
}

#[test]
fn expand_shapes_replaces_rects_and_ovals_only() {
    let mut p = VectorPath::new()
        .move_to(Point::ZERO)
        .line_to(Point::new(1.0, 1.0))
        .rect(Point::ZERO, Point::new(2.0, 2.0));
    p.expand_shapes();
    assert_eq!(p.instructions.len(), 2 + 5);
    assert!(
        !p.instructions
            .iter()
            .any(|i| matches!(i, Instruction::AddRect(_)))
    );
}

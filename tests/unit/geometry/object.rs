use super::*;
use crate::geometry::instruction::Instruction;

fn sample() -> VectorObject {
    VectorObject::new(vec![
        VectorPath::new()
            .move_to(Point::new(0.0, 0.0))
            .line_to(Point::new(4.0, 0.0))
            .cubic_to(
                Point::new(5.0, 1.0),
                Point::new(5.0, 3.0),
                Point::new(4.0, 4.0),
            )
            .close(),
        VectorPath::new().oval(Point::new(-1.0, -1.0), Point::new(1.0, 2.0)),
    ])
}

fn assert_points_close(a: &VectorObject, b: &VectorObject, tol: f64) {
    let pa: Vec<Point> = a.points().collect();
    let pb: Vec<Point> = b.points().collect();
    assert_eq!(pa.len(), pb.len());
    for (p, q) in pa.iter().zip(&pb) {
        assert!((p.x - q.x).abs() < tol && (p.y - q.y).abs() < tol, "{p:?} vs {q:?}");
    }
}

#[test]
fn empty_object_has_no_bounds() {
    let o = VectorObject::default();
    assert!(o.is_empty());
    assert!(o.bounds().is_none());
    assert!(o.center().is_none());
}

#[test]
fn bounds_union_paths() {
    let b = sample().bounds().unwrap();
    assert_eq!(b.x0, -1.0);
    assert_eq!(b.y0, -1.0);
    assert_eq!(b.y1, 4.0);
    // Cubic bulges to x = 4.75 between its controls.
    assert!((b.x1 - 4.75).abs() < 1e-9);
}

#[test]
fn translate_moves_every_point() {
    let mut o = sample();
    o.translate(2.0, -3.0);
    let moved: Vec<Point> = o.points().collect();
    let orig: Vec<Point> = sample().points().collect();
    for (m, p) in moved.iter().zip(&orig) {
        assert_eq!(*m, Point::new(p.x + 2.0, p.y - 3.0));
    }
}

#[test]
fn scale_about_base_point() {
    let mut o = VectorObject::from_path(VectorPath::new().move_to(Point::new(3.0, 5.0)));
    o.scale(Point::new(1.0, 1.0), 2.0, 3.0);
    assert_eq!(o.points().next().unwrap(), Point::new(5.0, 13.0));
    o.scale_uniform(Point::ZERO, 0.5);
    assert_eq!(o.points().next().unwrap(), Point::new(2.5, 6.5));
}

#[test]
fn rotation_by_full_turns_is_identity() {
    for deg in [0.0, 360.0, -360.0, 720.0, -720.0] {
        for base in [Point::ZERO, Point::new(13.5, -7.0), Point::new(-1e3, 2e2)] {
            let mut o = sample();
            o.rotate(base, deg);
            assert_points_close(&o, &sample(), 1e-5);
        }
    }
}

#[test]
fn rotation_by_quarter_turn_maps_axes() {
    let mut o = VectorObject::from_path(
        VectorPath::new()
            .move_to(Point::new(1.0, 0.0))
            .line_to(Point::new(0.0, 1.0)),
    );
    o.rotate(Point::ZERO, 90.0);
    let pts: Vec<Point> = o.points().collect();
    assert_eq!(pts, vec![Point::new(0.0, 1.0), Point::new(-1.0, 0.0)]);
}

#[test]
fn rotation_expands_ovals_and_keeps_extent() {
    let mut o = VectorObject::from_path(
        VectorPath::new().oval(Point::new(-2.0, -1.0), Point::new(2.0, 1.0)),
    );
    o.rotate(Point::ZERO, 30.0);
    assert!(
        o.paths[0]
            .instructions
            .iter()
            .all(|i| !matches!(i, Instruction::AddOval(_)))
    );
    let b = o.bounds().unwrap();
    // Half-width of an ellipse (a=2, b=1) rotated by 30 degrees.
    let (s, c) = 30f64.to_radians().sin_cos();
    let half_w = (4.0 * c * c + s * s).sqrt();
    assert!((b.x1 - half_w).abs() < 1e-9);
    assert!((b.x0 + half_w).abs() < 1e-9);
}

#[test]
fn clone_is_independent() {
    let source = sample();
    let mut copy = source.clone();
    copy.paths[0].instructions[0].points_mut()[0] = Point::new(99.0, 99.0);
    copy.translate(1.0, 1.0);
    assert_eq!(source.paths[0].instructions[0].points()[0], Point::new(0.0, 0.0));
    assert_eq!(source, sample());
}

use crate::foundation::core::{Point, Vec2};

pub(crate) fn translate(p: Point, delta: Vec2) -> Point {
    p + delta
}

/// `base + (p - base) * (sx, sy)`, componentwise.
pub(crate) fn scale(p: Point, base: Point, sx: f64, sy: f64) -> Point {
    Point::new(base.x + (p.x - base.x) * sx, base.y + (p.y - base.y) * sy)
}

/// Sine and cosine of an angle in degrees, exact on quarter turns.
pub(crate) fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let mut d = degrees % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    if d == 0.0 || d == 360.0 {
        (0.0, 1.0)
    } else if d == 90.0 {
        (1.0, 0.0)
    } else if d == 180.0 {
        (0.0, -1.0)
    } else if d == 270.0 {
        (-1.0, 0.0)
    } else {
        d.to_radians().sin_cos()
    }
}

/// True when rotating by `degrees` keeps axis-aligned boxes axis-aligned.
pub(crate) fn is_quarter_turn(degrees: f64) -> bool {
    (degrees % 90.0) == 0.0
}

pub(crate) fn rotate(p: Point, base: Point, degrees: f64) -> Point {
    let (sin, cos) = sin_cos_degrees(degrees);
    let v = p - base;
    Point::new(
        base.x + v.x * cos - v.y * sin,
        base.y + v.x * sin + v.y * cos,
    )
}

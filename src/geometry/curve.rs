//! Closed-form extrema of cubic Bezier and rational quadratic (conic) segments.

use crate::foundation::core::{Point, Rect};

const EPS: f64 = 1e-12;

/// Roots of `a*t^2 + b*t + c` strictly inside `(0, 1)`.
pub(crate) fn unit_quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let mut roots = Vec::with_capacity(2);
    if a.abs() < EPS {
        if b.abs() >= EPS {
            roots.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            // Numerically stable form: avoids cancellation between -b and sqrt(disc).
            let q = -0.5 * (b + b.signum() * disc.sqrt());
            roots.push(q / a);
            if q.abs() >= EPS {
                roots.push(c / q);
            }
        }
    }
    roots.retain(|t| t.is_finite() && *t > 0.0 && *t < 1.0);
    roots
}

pub(crate) fn cubic_eval(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

pub(crate) fn conic_eval(p0: Point, p1: Point, p2: Point, w: f64, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * w * t * mt;
    let c = t * t;
    let d = a + b + c;
    Point::new(
        (a * p0.x + b * p1.x + c * p2.x) / d,
        (a * p0.y + b * p1.y + c * p2.y) / d,
    )
}

/// Parameters in `(0, 1)` where the cubic's derivative vanishes on either axis.
pub(crate) fn cubic_extrema(p0: Point, p1: Point, p2: Point, p3: Point) -> Vec<f64> {
    let axis = |v0: f64, v1: f64, v2: f64, v3: f64| {
        // B'(t)/3 = a t^2 + b t + c
        let a = -v0 + 3.0 * v1 - 3.0 * v2 + v3;
        let b = 2.0 * (v0 - 2.0 * v1 + v2);
        let c = v1 - v0;
        unit_quadratic_roots(a, b, c)
    };
    let mut ts = axis(p0.x, p1.x, p2.x, p3.x);
    ts.extend(axis(p0.y, p1.y, p2.y, p3.y));
    ts
}

/// Parameters in `(0, 1)` where the conic's derivative vanishes on either axis.
pub(crate) fn conic_extrema(p0: Point, p1: Point, p2: Point, w: f64) -> Vec<f64> {
    let axis = |v0: f64, v1: f64, v2: f64| {
        // Numerator of C'(t) after clearing the denominator, relative to p0:
        // (w-1)(v2-v0) t^2 + ((v2-v0) - 2w(v1-v0)) t + w(v1-v0) = 0
        let p20 = v2 - v0;
        let wp10 = w * (v1 - v0);
        unit_quadratic_roots(w * p20 - p20, p20 - 2.0 * wp10, wp10)
    };
    let mut ts = axis(p0.x, p1.x, p2.x);
    ts.extend(axis(p0.y, p1.y, p2.y));
    ts
}

pub(crate) fn cubic_bounds(p0: Point, p1: Point, p2: Point, p3: Point) -> Rect {
    cubic_extrema(p0, p1, p2, p3)
        .into_iter()
        .map(|t| cubic_eval(p0, p1, p2, p3, t))
        .fold(Rect::from_points(p0, p3), |r, p| r.union_pt(p))
}

pub(crate) fn conic_bounds(p0: Point, p1: Point, p2: Point, w: f64) -> Rect {
    conic_extrema(p0, p1, p2, w)
        .into_iter()
        .map(|t| conic_eval(p0, p1, p2, w, t))
        .fold(Rect::from_points(p0, p2), |r, p| r.union_pt(p))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/curve.rs"]
mod tests;

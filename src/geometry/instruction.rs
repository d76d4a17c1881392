use crate::{
    foundation::core::{Point, Rect},
    geometry::curve,
};

/// Whether a point lies on the outline or only steers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointRole {
    Anchor,
    Control,
}

use PointRole::{Anchor, Control};

/// One path instruction with its defining points.
///
/// Point order per variant:
/// - `CubicTo`: first control, second control, end
/// - `RationalTo`: control, end (plus the segment weight)
/// - `AddRect` / `AddOval`: two opposite corners of the rectangle, or of the box
///   enclosing the ellipse
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    MoveTo([Point; 1]),
    LineTo([Point; 1]),
    CubicTo([Point; 3]),
    RationalTo { points: [Point; 2], weight: f64 },
    AddRect([Point; 2]),
    AddOval([Point; 2]),
    Close,
}

impl Instruction {
    pub fn move_to(p: Point) -> Self {
        Self::MoveTo([p])
    }

    pub fn line_to(p: Point) -> Self {
        Self::LineTo([p])
    }

    pub fn cubic_to(c1: Point, c2: Point, end: Point) -> Self {
        Self::CubicTo([c1, c2, end])
    }

    pub fn rational_to(ctrl: Point, end: Point, weight: f64) -> Self {
        Self::RationalTo {
            points: [ctrl, end],
            weight,
        }
    }

    pub fn rect(a: Point, b: Point) -> Self {
        Self::AddRect([a, b])
    }

    pub fn oval(a: Point, b: Point) -> Self {
        Self::AddOval([a, b])
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => p,
            Self::CubicTo(p) => p,
            Self::RationalTo { points, .. } => points,
            Self::AddRect(p) | Self::AddOval(p) => p,
            Self::Close => &[],
        }
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => p,
            Self::CubicTo(p) => p,
            Self::RationalTo { points, .. } => points,
            Self::AddRect(p) | Self::AddOval(p) => p,
            Self::Close => &mut [],
        }
    }

    /// Role of each entry of [`Instruction::points`], for diagnostics.
    pub fn roles(&self) -> &'static [PointRole] {
        match self {
            Self::MoveTo(_) | Self::LineTo(_) => &[Anchor],
            Self::CubicTo(_) => &[Control, Control, Anchor],
            Self::RationalTo { .. } => &[Control, Anchor],
            Self::AddRect(_) => &[Anchor, Anchor],
            Self::AddOval(_) => &[Control, Control],
            Self::Close => &[],
        }
    }

    /// Current point after this instruction, if it moves it.
    pub fn end_point(&self) -> Option<Point> {
        match self {
            Self::MoveTo([p]) | Self::LineTo([p]) => Some(*p),
            Self::CubicTo([_, _, end]) => Some(*end),
            Self::RationalTo { points: [_, end], .. } => Some(*end),
            Self::AddRect([a, _]) | Self::AddOval([a, _]) => Some(*a),
            Self::Close => None,
        }
    }

    /// Tight bounding box of the geometry this instruction contributes.
    ///
    /// `current` is the pen position before the instruction; segments drawn without
    /// one start at the origin.
    pub fn bounds(&self, current: Option<Point>) -> Option<Rect> {
        let start = current.unwrap_or(Point::ZERO);
        match self {
            Self::MoveTo([p]) => Some(Rect::from_points(*p, *p)),
            Self::LineTo([p]) => Some(Rect::from_points(start, *p)),
            Self::CubicTo([c1, c2, end]) => Some(curve::cubic_bounds(start, *c1, *c2, *end)),
            Self::RationalTo {
                points: [ctrl, end],
                weight,
            } => Some(curve::conic_bounds(start, *ctrl, *end, *weight)),
            Self::AddRect([a, b]) | Self::AddOval([a, b]) => Some(Rect::from_points(*a, *b)),
            Self::Close => None,
        }
    }

    /// Rewrites rectangles and ovals as explicit closed contours.
    ///
    /// Corner-defined shapes stay axis-aligned by construction, so anything that turns
    /// points by an arbitrary angle expands them first. Ovals become four exact
    /// quarter-ellipse rational segments.
    pub fn expand(&self) -> Vec<Instruction> {
        match self {
            Self::AddRect([a, b]) => vec![
                Self::move_to(*a),
                Self::line_to(Point::new(b.x, a.y)),
                Self::line_to(*b),
                Self::line_to(Point::new(a.x, b.y)),
                Self::Close,
            ],
            Self::AddOval([a, b]) => {
                let r = Rect::from_points(*a, *b);
                let c = r.center();
                let w = std::f64::consts::FRAC_1_SQRT_2;
                let (l, t, rr, bt) = (r.x0, r.y0, r.x1, r.y1);
                vec![
                    Self::move_to(Point::new(rr, c.y)),
                    Self::rational_to(Point::new(rr, bt), Point::new(c.x, bt), w),
                    Self::rational_to(Point::new(l, bt), Point::new(l, c.y), w),
                    Self::rational_to(Point::new(l, t), Point::new(c.x, t), w),
                    Self::rational_to(Point::new(rr, t), Point::new(rr, c.y), w),
                    Self::Close,
                ]
            }
            other => vec![other.clone()],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/instruction.rs"]
mod tests;

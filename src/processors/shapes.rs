//! Pure geometry producers for [`Create`](crate::processors::vector::Create).

use crate::{
    foundation::core::{Point, Rect, Size},
    foundation::error::CaptchaResult,
    geometry::{object::VectorObject, path::VectorPath},
    value::{provider::Value, random::RandomSource},
};

/// Values drawn for one created object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSample {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Segment count for shapes made of repeated arcs.
    pub detail: u32,
}

impl ShapeSample {
    pub fn far_corner(&self) -> Point {
        Point::new(self.origin.x + self.width, self.origin.y + self.height)
    }
}

/// Providers a creator pulls once per object, in field order.
#[derive(Clone, Debug)]
pub struct ShapeParams {
    pub x: Value<f64>,
    pub y: Value<f64>,
    pub width: Value<f64>,
    pub height: Value<f64>,
    pub detail: Value<u32>,
}

impl ShapeParams {
    /// Origins anywhere in `area`, extents up to its size.
    pub fn within(area: Rect, random: &RandomSource) -> CaptchaResult<Self> {
        Ok(Self {
            x: Value::random_range_with(random.clone(), area.x0, area.x1)?,
            y: Value::random_range_with(random.clone(), area.y0, area.y1)?,
            width: Value::random_range_with(random.clone(), 0.0, area.width())?,
            height: Value::random_range_with(random.clone(), 0.0, area.height())?,
            detail: Value::random_range_with(random.clone(), 2, 6)?,
        })
    }

    pub fn canvas(size: Size, random: &RandomSource) -> CaptchaResult<Self> {
        Self::within(
            Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height)),
            random,
        )
    }

    pub fn sample(&self) -> ShapeSample {
        let x = self.x.next();
        let y = self.y.next();
        ShapeSample {
            origin: Point::new(x, y),
            width: self.width.next(),
            height: self.height.next(),
            detail: self.detail.next().max(1),
        }
    }
}

pub type ShapeFn = fn(&ShapeSample) -> VectorObject;

/// Straight segment from the origin to the far corner.
pub fn line(s: &ShapeSample) -> VectorObject {
    VectorObject::from_path(VectorPath::new().move_to(s.origin).line_to(s.far_corner()))
}

pub fn rect(s: &ShapeSample) -> VectorObject {
    VectorObject::from_path(VectorPath::new().rect(s.origin, s.far_corner()))
}

pub fn oval(s: &ShapeSample) -> VectorObject {
    VectorObject::from_path(VectorPath::new().oval(s.origin, s.far_corner()))
}

/// S-shaped cubic across the width, bulging by the height on either side.
pub fn curve(s: &ShapeSample) -> VectorObject {
    let o = s.origin;
    let end = Point::new(o.x + s.width, o.y);
    VectorObject::from_path(VectorPath::new().move_to(o).cubic_to(
        Point::new(o.x + s.width / 3.0, o.y - s.height),
        Point::new(o.x + 2.0 * s.width / 3.0, o.y + s.height),
        end,
    ))
}

/// `detail` alternating half-waves across the width with amplitude `height`.
pub fn wave(s: &ShapeSample) -> VectorObject {
    let n = s.detail.max(1);
    let step = s.width / f64::from(n);
    let mut path = VectorPath::new().move_to(s.origin);
    for i in 0..n {
        let x0 = s.origin.x + step * f64::from(i);
        let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
        // A quadratic peaks halfway to its control point.
        path = path.rational_to(
            Point::new(x0 + step / 2.0, s.origin.y + sign * 2.0 * s.height),
            Point::new(x0 + step, s.origin.y),
            1.0,
        );
    }
    VectorObject::from_path(path)
}

use std::sync::Arc;

use crate::{
    foundation::core::Point,
    foundation::error::CaptchaResult,
    geometry::{glyph::GlyphSource, layer::VectorLayer},
    pipeline::{context::CaptchaContext, processor::VectorProcessor},
    processors::{
        Anchor,
        shapes::{ShapeFn, ShapeParams},
    },
    value::provider::Value,
};

/// Lays out the answer's characters as glyph outlines (or skeletons).
///
/// Per character, in order: spacing before it (not before the first), font size,
/// then skeleton quality when skeletons are enabled. The line is placed on the
/// anchor point using its advance width horizontally and its ink height vertically.
pub struct Text {
    glyphs: Arc<dyn GlyphSource>,
    font_size: Value<f64>,
    spacing: Value<f64>,
    quality: Option<Value<f64>>,
    horizontal: Anchor,
    vertical: Anchor,
    position: Option<Point>,
}

impl Text {
    pub fn new(glyphs: Arc<dyn GlyphSource>, font_size: impl Into<Value<f64>>) -> Self {
        Self {
            glyphs,
            font_size: font_size.into(),
            spacing: Value::constant(0.0),
            quality: None,
            horizontal: Anchor::Center,
            vertical: Anchor::Center,
            position: None,
        }
    }

    pub fn spacing(mut self, spacing: impl Into<Value<f64>>) -> Self {
        self.spacing = spacing.into();
        self
    }

    /// Emit centerline skeletons at the given quality instead of outlines.
    pub fn skeleton(mut self, quality: impl Into<Value<f64>>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn anchor(mut self, horizontal: Anchor, vertical: Anchor) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    /// Anchor point; defaults to the canvas center.
    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }
}

impl VectorProcessor for Text {
    fn name(&self) -> &'static str {
        "text"
    }

    fn process(&self, layer: &mut VectorLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        let source = self.glyphs.as_ref();
        let mut placed = Vec::new();
        let mut pen = 0.0;
        for (i, ch) in ctx.answer().chars().enumerate() {
            if i > 0 {
                pen += self.spacing.next();
            }
            let size = self.font_size.next();
            let mut glyph = match &self.quality {
                Some(q) => ctx.glyphs().skeleton(source, ch, q.next())?,
                None => ctx.glyphs().outline(source, ch)?,
            };
            glyph.scale_uniform(Point::ZERO, size);
            glyph.translate(pen, 0.0);
            pen += source.advance(ch)? * size;
            placed.push(glyph);
        }

        let Some(ink) = placed
            .iter()
            .filter_map(|g| g.bounds())
            .reduce(|a, b| a.union(b))
        else {
            return Ok(());
        };
        let at = self.position.unwrap_or_else(|| ctx.size().center());
        let dx = self.horizontal.place(at.x, pen);
        let dy = self.vertical.place(at.y, ink.height()) - ink.y0;
        for mut glyph in placed.into_iter().filter(|g| !g.is_empty()) {
            glyph.translate(dx, dy);
            layer.push(glyph);
        }
        Ok(())
    }
}

/// Generic creator: pulls a count, then samples parameters and runs a shape
/// function for each new object.
pub struct Create {
    count: Value<u32>,
    params: ShapeParams,
    shape: ShapeFn,
}

impl Create {
    pub fn new(count: impl Into<Value<u32>>, params: ShapeParams, shape: ShapeFn) -> Self {
        Self {
            count: count.into(),
            params,
            shape,
        }
    }
}

impl VectorProcessor for Create {
    fn name(&self) -> &'static str {
        "create"
    }

    fn process(&self, layer: &mut VectorLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        for _ in 0..self.count.next() {
            let sample = self.params.sample();
            layer.push((self.shape)(&sample));
        }
        Ok(())
    }
}

/// Translates each object by its own pulled offset.
pub struct MoveObjects {
    dx: Value<f64>,
    dy: Value<f64>,
}

impl MoveObjects {
    pub fn new(dx: impl Into<Value<f64>>, dy: impl Into<Value<f64>>) -> Self {
        Self {
            dx: dx.into(),
            dy: dy.into(),
        }
    }
}

impl VectorProcessor for MoveObjects {
    fn name(&self) -> &'static str {
        "move_objects"
    }

    fn process(&self, layer: &mut VectorLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        for object in &mut layer.objects {
            let (dx, dy) = (self.dx.next(), self.dy.next());
            object.translate(dx, dy);
        }
        Ok(())
    }
}

/// Scales each object about its bounds center.
pub struct ScaleObjects {
    sx: Value<f64>,
    sy: Option<Value<f64>>,
}

impl ScaleObjects {
    pub fn uniform(factor: impl Into<Value<f64>>) -> Self {
        Self {
            sx: factor.into(),
            sy: None,
        }
    }

    pub fn new(sx: impl Into<Value<f64>>, sy: impl Into<Value<f64>>) -> Self {
        Self {
            sx: sx.into(),
            sy: Some(sy.into()),
        }
    }
}

impl VectorProcessor for ScaleObjects {
    fn name(&self) -> &'static str {
        "scale_objects"
    }

    fn process(&self, layer: &mut VectorLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        for object in &mut layer.objects {
            let Some(center) = object.center() else {
                continue;
            };
            let sx = self.sx.next();
            let sy = self.sy.as_ref().map_or(sx, Value::next);
            object.scale(center, sx, sy);
        }
        Ok(())
    }
}

/// Rotates each object about its bounds center.
pub struct RotateObjects {
    degrees: Value<f64>,
}

impl RotateObjects {
    pub fn new(degrees: impl Into<Value<f64>>) -> Self {
        Self {
            degrees: degrees.into(),
        }
    }
}

impl VectorProcessor for RotateObjects {
    fn name(&self) -> &'static str {
        "rotate_objects"
    }

    fn process(&self, layer: &mut VectorLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        for object in &mut layer.objects {
            let Some(center) = object.center() else {
                continue;
            };
            object.rotate(center, self.degrees.next());
        }
        Ok(())
    }
}

/// Appends deep copies of another vector layer's objects.
pub struct CopyObjects {
    from: String,
}

impl CopyObjects {
    pub fn from_layer(name: impl Into<String>) -> Self {
        Self { from: name.into() }
    }
}

impl VectorProcessor for CopyObjects {
    fn name(&self) -> &'static str {
        "copy_objects"
    }

    fn process(&self, layer: &mut VectorLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        let source = ctx.vector(&self.from)?;
        layer.objects.extend(source.objects.iter().cloned());
        Ok(())
    }
}

pub struct ClearObjects;

impl VectorProcessor for ClearObjects {
    fn name(&self) -> &'static str {
        "clear_objects"
    }

    fn process(&self, layer: &mut VectorLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        layer.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/processors/vector.rs"]
mod tests;

use std::sync::Arc;

use crate::{
    foundation::error::{CaptchaError, CaptchaResult},
    pipeline::{
        context::CaptchaContext,
        processor::RasterProcessor,
        step::{RasterStep, run_raster_steps},
    },
    raster::{
        backend::{Brush, Paint, RasterBackend, StrokeStyle},
        blend::{self, MixMode},
        color::Rgba8,
        layer::RasterLayer,
    },
    value::{provider::Value, random::RandomSource},
};

/// Covers the layer with a backend-rendered brush (solid or gradient).
pub struct Fill {
    brush: Value<Brush>,
}

impl Fill {
    pub fn new(brush: impl Into<Value<Brush>>) -> Self {
        Self {
            brush: brush.into(),
        }
    }
}

impl RasterProcessor for Fill {
    fn name(&self) -> &'static str {
        "fill"
    }

    fn process(&self, layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        ctx.backend().fill(layer, &self.brush.next())
    }
}

/// Overwrites every pixel with one color, bypassing the backend.
pub struct SetPixels {
    color: Value<Rgba8>,
}

impl SetPixels {
    pub fn new(color: impl Into<Value<Rgba8>>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

impl RasterProcessor for SetPixels {
    fn name(&self) -> &'static str {
        "set_pixels"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        blend::set_pixels(layer.data_mut(), self.color.next());
        Ok(())
    }
}

/// Rasterizes a vector layer's objects through the backend.
///
/// Paint values are pulled per object: fill brush, then stroke brush and width.
pub struct DrawVector {
    from: String,
    fill: Option<Value<Brush>>,
    stroke: Option<(Value<Brush>, Value<f64>)>,
    style: StrokeStyle,
    anti_alias: bool,
}

impl DrawVector {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            fill: None,
            stroke: None,
            style: StrokeStyle::default(),
            anti_alias: true,
        }
    }

    pub fn fill(mut self, brush: impl Into<Value<Brush>>) -> Self {
        self.fill = Some(brush.into());
        self
    }

    pub fn stroke(mut self, brush: impl Into<Value<Brush>>, width: impl Into<Value<f64>>) -> Self {
        self.stroke = Some((brush.into(), width.into()));
        self
    }

    /// Cap, join and dash used for strokes; the width comes from [`DrawVector::stroke`].
    pub fn style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn anti_alias(mut self, on: bool) -> Self {
        self.anti_alias = on;
        self
    }
}

impl RasterProcessor for DrawVector {
    fn name(&self) -> &'static str {
        "draw_vector"
    }

    fn process(&self, layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        let source = ctx.vector(&self.from)?;
        for object in &source.objects {
            let fill = self.fill.as_ref().map(Value::next);
            let stroke = self.stroke.as_ref().map(|(brush, width)| {
                let brush = brush.next();
                let style = StrokeStyle {
                    width: width.next(),
                    ..self.style.clone()
                };
                (brush, style)
            });
            let paint = Paint {
                fill,
                stroke,
                anti_alias: self.anti_alias,
            };
            ctx.backend().draw_object(layer, object, &paint)?;
        }
        Ok(())
    }
}

/// Mixes another raster layer onto this one.
pub struct Composite {
    from: String,
    mode: MixMode,
}

impl Composite {
    pub fn new(from: impl Into<String>, mode: MixMode) -> Self {
        Self {
            from: from.into(),
            mode,
        }
    }

    pub fn draw(from: impl Into<String>) -> Self {
        Self::new(from, MixMode::Draw)
    }

    pub fn mask(from: impl Into<String>) -> Self {
        Self::new(from, MixMode::ApplyMask)
    }
}

impl RasterProcessor for Composite {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn process(&self, layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        let source = ctx.raster(&self.from)?;
        self.mode.apply(layer.data_mut(), source.data())
    }
}

/// Adds a shift to each of R, G, B, A; shifts are pulled once per run.
pub struct AddColors {
    shift: [Value<i32>; 4],
}

impl AddColors {
    pub fn new(
        r: impl Into<Value<i32>>,
        g: impl Into<Value<i32>>,
        b: impl Into<Value<i32>>,
        a: impl Into<Value<i32>>,
    ) -> Self {
        Self {
            shift: [r.into(), g.into(), b.into(), a.into()],
        }
    }
}

impl RasterProcessor for AddColors {
    fn name(&self) -> &'static str {
        "add_colors"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        let shift = [
            self.shift[0].next(),
            self.shift[1].next(),
            self.shift[2].next(),
            self.shift[3].next(),
        ];
        blend::add_colors(layer.data_mut(), shift);
        Ok(())
    }
}

/// Inverts the enabled channels; flags are pulled once per run.
pub struct InvertColors {
    channels: [Value<bool>; 4],
}

impl InvertColors {
    pub fn new(
        r: impl Into<Value<bool>>,
        g: impl Into<Value<bool>>,
        b: impl Into<Value<bool>>,
        a: impl Into<Value<bool>>,
    ) -> Self {
        Self {
            channels: [r.into(), g.into(), b.into(), a.into()],
        }
    }

    pub fn rgb() -> Self {
        Self::new(true, true, true, false)
    }
}

impl RasterProcessor for InvertColors {
    fn name(&self) -> &'static str {
        "invert_colors"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        let channels = [
            self.channels[0].next(),
            self.channels[1].next(),
            self.channels[2].next(),
            self.channels[3].next(),
        ];
        blend::invert(layer.data_mut(), channels);
        Ok(())
    }
}

pub struct HueShift {
    degrees: Value<f64>,
}

impl HueShift {
    pub fn new(degrees: impl Into<Value<f64>>) -> Self {
        Self {
            degrees: degrees.into(),
        }
    }
}

impl RasterProcessor for HueShift {
    fn name(&self) -> &'static str {
        "hue_shift"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        blend::hue_shift(layer.data_mut(), self.degrees.next());
        Ok(())
    }
}

pub struct Blur {
    sigma: Value<f64>,
}

impl Blur {
    pub fn new(sigma: impl Into<Value<f64>>) -> Self {
        Self {
            sigma: sigma.into(),
        }
    }
}

impl RasterProcessor for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn process(&self, layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        ctx.backend().blur(layer, self.sigma.next())
    }
}

/// Draws randomly placed single pixels.
///
/// `density` is the fraction of the layer's pixels touched per run (clamped to
/// `[0, 1]`); the color is pulled per pixel.
pub struct Noise {
    density: Value<f64>,
    color: Value<Rgba8>,
    random: RandomSource,
}

impl Noise {
    pub fn new(
        density: impl Into<Value<f64>>,
        color: impl Into<Value<Rgba8>>,
        random: RandomSource,
    ) -> Self {
        Self {
            density: density.into(),
            color: color.into(),
            random,
        }
    }
}

impl RasterProcessor for Noise {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        let pixels = layer.size().pixel_count();
        let density = self.density.next();
        let density = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let count = (density * pixels as f64).round() as usize;
        let data = layer.data_mut();
        for _ in 0..count {
            let i = self.random.index(pixels) * 4;
            let px = &mut data[i..i + 4];
            let out = blend::draw([px[0], px[1], px[2], px[3]], self.color.next().to_array());
            px.copy_from_slice(&out);
        }
        Ok(())
    }
}

/// Draws a fixed image at the layer origin, clipped to the layer.
pub struct Background {
    image: Arc<RasterLayer>,
}

impl Background {
    pub fn new(image: RasterLayer) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn decode(backend: &dyn RasterBackend, bytes: &[u8]) -> CaptchaResult<Self> {
        Ok(Self::new(backend.decode(bytes)?))
    }
}

impl RasterProcessor for Background {
    fn name(&self) -> &'static str {
        "background"
    }

    fn process(&self, layer: &mut RasterLayer, _ctx: &CaptchaContext) -> CaptchaResult<()> {
        let cols = layer.width().min(self.image.width());
        let rows = layer.height().min(self.image.height());
        let row_len = cols as usize * 4;
        for y in 0..rows {
            let src = self.image.offset(0, y);
            let dst = layer.offset(0, y);
            blend::draw_in_place(
                &mut layer.data_mut()[dst..dst + row_len],
                &self.image.data()[src..src + row_len],
            )?;
        }
        Ok(())
    }
}

/// Runs nested steps on a fresh transparent layer, then mixes the result in.
pub struct Isolated {
    steps: Vec<RasterStep>,
    mode: MixMode,
}

impl Isolated {
    pub fn new(steps: impl IntoIterator<Item = RasterStep>) -> CaptchaResult<Self> {
        let steps: Vec<RasterStep> = steps.into_iter().collect();
        if steps.iter().any(RasterStep::is_encode) {
            return Err(CaptchaError::config(
                "encode steps are not allowed in an isolated group",
            ));
        }
        Ok(Self {
            steps,
            mode: MixMode::Draw,
        })
    }

    pub fn mode(mut self, mode: MixMode) -> Self {
        self.mode = mode;
        self
    }
}

impl RasterProcessor for Isolated {
    fn name(&self) -> &'static str {
        "isolated"
    }

    fn process(&self, layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()> {
        let mut scratch = RasterLayer::new(layer.size());
        run_raster_steps(&self.steps, &mut scratch, ctx)?;
        self.mode.apply(layer.data_mut(), scratch.data())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/processors/raster.rs"]
mod tests;

use std::io::Cursor;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{Point, Size},
    foundation::error::{CaptchaError, CaptchaResult},
    geometry::{instruction::Instruction, object::VectorObject},
    raster::{blend, blur, color::Rgba8, layer::RasterLayer},
    value::provider::Value,
};

/// Encoded output format of the master layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Png,
    Jpeg { quality: u8 },
    Bmp,
}

impl ImageFormat {
    pub fn validate(&self) -> CaptchaResult<()> {
        if let Self::Jpeg { quality } = self
            && !(1..=100).contains(quality)
        {
            return Err(CaptchaError::config(format!(
                "jpeg quality must be in 1..=100, got {quality}"
            )));
        }
        Ok(())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
            Self::Bmp => "bmp",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Stroke geometry. Widths of 0 or less draw one-pixel lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    /// Alternating on/off lengths; ignored unless it has an even, non-zero count.
    pub dash: Vec<f64>,
    pub dash_offset: f64,
}

impl StrokeStyle {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brush {
    Solid(Rgba8),
    LinearGradient {
        start: Point,
        end: Point,
        /// `(offset in [0, 1], color)` pairs in ascending offset order.
        stops: Vec<(f64, Rgba8)>,
    },
}

impl From<Rgba8> for Brush {
    fn from(c: Rgba8) -> Self {
        Self::Solid(c)
    }
}

impl From<Brush> for Value<Brush> {
    fn from(brush: Brush) -> Self {
        Value::constant(brush)
    }
}

impl From<Rgba8> for Value<Brush> {
    fn from(c: Rgba8) -> Self {
        Value::constant(Brush::Solid(c))
    }
}

/// Resolved paint for one draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    pub fill: Option<Brush>,
    pub stroke: Option<(Brush, StrokeStyle)>,
    pub anti_alias: bool,
}

impl Paint {
    pub fn fill(brush: impl Into<Brush>) -> Self {
        Self {
            fill: Some(brush.into()),
            stroke: None,
            anti_alias: true,
        }
    }

    pub fn stroke(brush: impl Into<Brush>, style: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some((brush.into(), style)),
            anti_alias: true,
        }
    }

    pub fn anti_alias(mut self, on: bool) -> Self {
        self.anti_alias = on;
        self
    }
}

/// Rasterization, blur and codec services used by raster processors.
pub trait RasterBackend: Send + Sync {
    /// Draws `object` with `paint`, blending the result onto `layer`.
    fn draw_object(
        &self,
        layer: &mut RasterLayer,
        object: &VectorObject,
        paint: &Paint,
    ) -> CaptchaResult<()>;

    /// Covers the whole layer with `brush`, blending onto existing pixels.
    fn fill(&self, layer: &mut RasterLayer, brush: &Brush) -> CaptchaResult<()>;

    fn blur(&self, layer: &mut RasterLayer, sigma: f64) -> CaptchaResult<()>;

    fn encode(&self, layer: &RasterLayer, format: ImageFormat) -> CaptchaResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> CaptchaResult<RasterLayer>;
}

/// CPU backend built on `tiny-skia` and `image`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkiaBackend;

const CONIC_SPLITS: u32 = 3;
/// Stroke width used for non-positive widths.
const HAIRLINE_WIDTH: f32 = 1.0;

impl SkiaBackend {
    fn surface(size: Size) -> CaptchaResult<tiny_skia::Pixmap> {
        tiny_skia::Pixmap::new(size.width, size.height).ok_or_else(|| {
            CaptchaError::render(format!(
                "cannot allocate {}x{} surface",
                size.width, size.height
            ))
        })
    }

    /// Converts the premultiplied scratch surface to straight alpha and draws it
    /// onto the layer.
    fn mix_down(layer: &mut RasterLayer, pixmap: tiny_skia::Pixmap) -> CaptchaResult<()> {
        let mut straight = pixmap.take();
        blur::demultiply(&mut straight);
        blend::draw_in_place(layer.data_mut(), &straight)
    }

    fn shader(brush: &Brush) -> CaptchaResult<tiny_skia::Shader<'static>> {
        match brush {
            Brush::Solid(c) => Ok(tiny_skia::Shader::SolidColor(skia_color(*c))),
            Brush::LinearGradient { start, end, stops } => {
                let stops = stops
                    .iter()
                    .map(|&(pos, c)| tiny_skia::GradientStop::new(pos as f32, skia_color(c)))
                    .collect();
                tiny_skia::LinearGradient::new(
                    skia_point(*start),
                    skia_point(*end),
                    stops,
                    tiny_skia::SpreadMode::Pad,
                    tiny_skia::Transform::identity(),
                )
                .ok_or_else(|| CaptchaError::render("degenerate linear gradient"))
            }
        }
    }

    fn stroke(style: &StrokeStyle) -> tiny_skia::Stroke {
        let dash = if !style.dash.is_empty() && style.dash.len().is_multiple_of(2) {
            tiny_skia::StrokeDash::new(
                style.dash.iter().map(|&d| d as f32).collect(),
                style.dash_offset as f32,
            )
        } else {
            None
        };
        tiny_skia::Stroke {
            width: stroke_width(style.width),
            line_cap: match style.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash,
            ..tiny_skia::Stroke::default()
        }
    }
}

impl RasterBackend for SkiaBackend {
    fn draw_object(
        &self,
        layer: &mut RasterLayer,
        object: &VectorObject,
        paint: &Paint,
    ) -> CaptchaResult<()> {
        let Some(path) = skia_path(object) else {
            return Ok(());
        };
        let mut pixmap = Self::surface(layer.size())?;

        if let Some(brush) = &paint.fill {
            let skia_paint = tiny_skia::Paint {
                shader: Self::shader(brush)?,
                anti_alias: paint.anti_alias,
                ..tiny_skia::Paint::default()
            };
            pixmap.fill_path(
                &path,
                &skia_paint,
                tiny_skia::FillRule::Winding,
                tiny_skia::Transform::identity(),
                None,
            );
        }
        if let Some((brush, style)) = &paint.stroke {
            let skia_paint = tiny_skia::Paint {
                shader: Self::shader(brush)?,
                anti_alias: paint.anti_alias,
                ..tiny_skia::Paint::default()
            };
            pixmap.stroke_path(
                &path,
                &skia_paint,
                &Self::stroke(style),
                tiny_skia::Transform::identity(),
                None,
            );
        }
        Self::mix_down(layer, pixmap)
    }

    fn fill(&self, layer: &mut RasterLayer, brush: &Brush) -> CaptchaResult<()> {
        let mut pixmap = Self::surface(layer.size())?;
        let rect = tiny_skia::Rect::from_xywh(
            0.0,
            0.0,
            layer.width() as f32,
            layer.height() as f32,
        )
        .ok_or_else(|| CaptchaError::render("invalid fill rect"))?;
        let paint = tiny_skia::Paint {
            shader: Self::shader(brush)?,
            ..tiny_skia::Paint::default()
        };
        pixmap.fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
        Self::mix_down(layer, pixmap)
    }

    fn blur(&self, layer: &mut RasterLayer, sigma: f64) -> CaptchaResult<()> {
        blur::gaussian_blur(layer, sigma)
    }

    fn encode(&self, layer: &RasterLayer, format: ImageFormat) -> CaptchaResult<Vec<u8>> {
        format.validate()?;
        let rgba = image::RgbaImage::from_raw(layer.width(), layer.height(), layer.data().to_vec())
            .ok_or_else(|| CaptchaError::encode("pixel buffer does not match layer size"))?;
        let img = image::DynamicImage::ImageRgba8(rgba);

        let mut buf = Vec::new();
        let result = match format {
            ImageFormat::Png => img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png),
            ImageFormat::Bmp => img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Bmp),
            ImageFormat::Jpeg { quality } => {
                // JPEG has no alpha channel.
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
                image::DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
            }
        };
        result.map_err(|e| CaptchaError::encode(format!("{}: {e}", format.extension())))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> CaptchaResult<RasterLayer> {
        let img = image::load_from_memory(bytes)
            .context("decode image from memory")
            .map_err(|e| CaptchaError::encode(format!("{e:#}")))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        RasterLayer::from_rgba(Size::new(width, height)?, rgba.into_raw())
    }
}

fn stroke_width(width: f64) -> f32 {
    if width.is_finite() && width > 0.0 {
        width as f32
    } else {
        HAIRLINE_WIDTH
    }
}

fn skia_color(c: Rgba8) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

fn skia_path(object: &VectorObject) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for path in &object.paths {
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;
        for instruction in &path.instructions {
            for el in instruction.expand() {
                match el {
                    Instruction::MoveTo([p]) => {
                        pb.move_to(p.x as f32, p.y as f32);
                        start = p;
                        current = p;
                    }
                    Instruction::LineTo([p]) => {
                        pb.line_to(p.x as f32, p.y as f32);
                        current = p;
                    }
                    Instruction::CubicTo([c1, c2, p]) => {
                        pb.cubic_to(
                            c1.x as f32,
                            c1.y as f32,
                            c2.x as f32,
                            c2.y as f32,
                            p.x as f32,
                            p.y as f32,
                        );
                        current = p;
                    }
                    Instruction::RationalTo {
                        points: [ctrl, p],
                        weight,
                    } => {
                        conic_to_quads(&mut pb, current, ctrl, p, weight, CONIC_SPLITS);
                        current = p;
                    }
                    Instruction::Close => {
                        pb.close();
                        current = start;
                    }
                    Instruction::AddRect(_) | Instruction::AddOval(_) => {}
                }
            }
        }
    }
    pb.finish()
}

/// Approximates a conic by `2^depth` quadratics using midpoint subdivision.
fn conic_to_quads(
    pb: &mut tiny_skia::PathBuilder,
    p0: Point,
    p1: Point,
    p2: Point,
    w: f64,
    depth: u32,
) {
    if depth == 0 || (w - 1.0).abs() < 1e-9 {
        pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32);
        return;
    }
    let scale = 1.0 / (1.0 + w);
    let c0 = ((p0.to_vec2() + p1.to_vec2() * w) * scale).to_point();
    let c1 = ((p1.to_vec2() * w + p2.to_vec2()) * scale).to_point();
    let mid = ((p0.to_vec2() + p1.to_vec2() * (2.0 * w) + p2.to_vec2()) * (0.5 * scale)).to_point();
    let half_w = ((1.0 + w) / 2.0).sqrt();
    conic_to_quads(pb, p0, c0, mid, half_w, depth - 1);
    conic_to_quads(pb, mid, c1, p2, half_w, depth - 1);
}

#[cfg(test)]
#[path = "../../tests/unit/raster/backend.rs"]
mod tests;

use std::{fmt, path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::core::Point,
    foundation::error::{CaptchaError, CaptchaResult},
    foundation::math::Fnv1a64,
    geometry::{instruction::Instruction, object::VectorObject, path::VectorPath},
};

/// Supplier of character outlines.
///
/// Outlines are normalized to a 1.0 em box: x grows right, y grows down, and the
/// baseline sits at y = 0, so ascenders have negative y.
pub trait GlyphSource: Send + Sync {
    /// Stable identity, used in cache keys.
    fn id(&self) -> u64;

    fn outline(&self, ch: char) -> CaptchaResult<VectorObject>;

    /// Horizontal advance in em units.
    fn advance(&self, ch: char) -> CaptchaResult<f64>;
}

/// A TrueType/OpenType face held in memory.
#[derive(Clone)]
pub struct Font {
    name: String,
    id: u64,
    data: Arc<Vec<u8>>,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("id", &format_args!("{:#018x}", self.id))
            .field("bytes_len", &self.data.len())
            .finish()
    }
}

impl Font {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> CaptchaResult<Self> {
        let name = name.into();
        ttf_parser::Face::parse(&data, 0)
            .map_err(|e| CaptchaError::config(format!("font '{name}' is not parsable: {e}")))?;
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&data);
        Ok(Self {
            name,
            id: h.finish(),
            data: Arc::new(data),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> CaptchaResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("read font file {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(name, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn face(&self) -> CaptchaResult<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0)
            .map_err(|e| CaptchaError::render(format!("font '{}': {e}", self.name)))
    }

    fn glyph(&self, face: &ttf_parser::Face<'_>, ch: char) -> CaptchaResult<ttf_parser::GlyphId> {
        face.glyph_index(ch).ok_or_else(|| {
            CaptchaError::range(format!("font '{}' has no glyph for {ch:?}", self.name))
        })
    }
}

impl GlyphSource for Font {
    fn id(&self) -> u64 {
        self.id
    }

    fn outline(&self, ch: char) -> CaptchaResult<VectorObject> {
        let face = self.face()?;
        let glyph = self.glyph(&face, ch)?;
        let mut pen = OutlinePen::new(1.0 / f64::from(face.units_per_em()));
        // Glyphs without contours (spaces) are simply empty.
        face.outline_glyph(glyph, &mut pen);
        Ok(pen.finish())
    }

    fn advance(&self, ch: char) -> CaptchaResult<f64> {
        let face = self.face()?;
        let glyph = self.glyph(&face, ch)?;
        let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
        Ok(f64::from(advance) / f64::from(face.units_per_em()))
    }
}

/// Collects font outline callbacks into paths, flipping y.
struct OutlinePen {
    scale: f64,
    current: VectorPath,
    paths: Vec<VectorPath>,
}

impl OutlinePen {
    fn new(scale: f64) -> Self {
        Self {
            scale,
            current: VectorPath::new(),
            paths: Vec::new(),
        }
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(f64::from(x) * self.scale, -f64::from(y) * self.scale)
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.paths.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> VectorObject {
        self.flush();
        VectorObject::new(self.paths)
    }
}

impl ttf_parser::OutlineBuilder for OutlinePen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        let p = self.point(x, y);
        self.current = VectorPath::new().move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.current.push(Instruction::line_to(p));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        // A weight-1 rational segment is exactly the quadratic.
        let ctrl = self.point(x1, y1);
        let end = self.point(x, y);
        self.current.push(Instruction::rational_to(ctrl, end, 1.0));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.point(x1, y1);
        let c2 = self.point(x2, y2);
        let end = self.point(x, y);
        self.current.push(Instruction::cubic_to(c1, c2, end));
    }

    fn close(&mut self) {
        self.current.push(Instruction::Close);
        self.flush();
    }
}

use crate::{
    foundation::error::{CaptchaError, CaptchaResult},
    raster::backend::ImageFormat,
};

pub use kurbo::{Point, Rect, Vec2};

/// Pixel dimensions of a captcha and of every raster layer it owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> CaptchaResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::config(format!(
                "size must be positive, got {width}x{height}"
            )));
        }
        width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| CaptchaError::config("size overflows a pixel buffer"))?;
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of an RGBA8 buffer covering this size.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Immutable inputs of one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptchaParams {
    pub answer: String,
    pub size: Size,
}

impl CaptchaParams {
    pub fn new(answer: impl Into<String>, size: Size) -> Self {
        Self {
            answer: answer.into(),
            size,
        }
    }
}

/// Final output of a generation.
///
/// `data` is either a complete encoded file or raw straight-alpha RGBA8, row-major,
/// top-to-bottom, depending on whether an output format was configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptchaImage {
    pub data: Vec<u8>,
    pub size: Size,
    /// Encoding of `data`, or `None` for raw pixels.
    pub format: Option<ImageFormat>,
}

impl CaptchaImage {
    pub fn is_raw(&self) -> bool {
        self.format.is_none()
    }
}

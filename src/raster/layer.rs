use crate::{
    foundation::core::Size,
    foundation::error::{CaptchaError, CaptchaResult},
    raster::color::Rgba8,
};

/// Fixed-size RGBA8 pixel buffer, row-major, straight alpha.
///
/// The buffer length is always `width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterLayer {
    size: Size,
    data: Vec<u8>,
}

impl RasterLayer {
    /// Zero-filled (transparent black) layer.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            data: vec![0; size.byte_len()],
        }
    }

    pub fn from_rgba(size: Size, data: Vec<u8>) -> CaptchaResult<Self> {
        if data.len() != size.byte_len() {
            return Err(CaptchaError::render(format!(
                "rgba buffer of {} bytes does not match {}x{}",
                data.len(),
                size.width,
                size.height
            )));
        }
        Ok(Self { size, data })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgba8::from_slice(&self.data[i..i + 4]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) -> bool {
        if x >= self.size.width || y >= self.size.height {
            return false;
        }
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_array());
        true
    }

    /// Replaces the contents with `other`'s pixels, which must be the same size.
    pub fn copy_from(&mut self, other: &RasterLayer) -> CaptchaResult<()> {
        if other.size != self.size {
            return Err(CaptchaError::render("copy between layers of different size"));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

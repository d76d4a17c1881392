use crate::{
    foundation::error::CaptchaResult,
    geometry::layer::VectorLayer,
    pipeline::context::CaptchaContext,
    raster::layer::RasterLayer,
};

/// A step that mutates one vector layer, optionally reading other layers.
pub trait VectorProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, layer: &mut VectorLayer, ctx: &CaptchaContext) -> CaptchaResult<()>;
}

/// A step that mutates one raster layer, optionally reading other layers.
pub trait RasterProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, layer: &mut RasterLayer, ctx: &CaptchaContext) -> CaptchaResult<()>;
}

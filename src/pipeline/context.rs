use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::core::{CaptchaParams, Size},
    foundation::error::{CaptchaError, CaptchaResult},
    geometry::{cache::GlyphCache, layer::VectorLayer},
    raster::{backend::RasterBackend, layer::RasterLayer},
};

/// Per-generation registry of layers, addressable by name.
///
/// Vector and raster names live in separate namespaces. While a layer's own
/// processors run, that layer is checked out of the context, so a processor
/// cannot read the layer it is mutating by name.
pub struct CaptchaContext {
    params: CaptchaParams,
    vector: HashMap<String, VectorLayer>,
    raster: HashMap<String, RasterLayer>,
    backend: Arc<dyn RasterBackend>,
    glyphs: Arc<GlyphCache>,
}

impl std::fmt::Debug for CaptchaContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptchaContext")
            .field("params", &self.params)
            .field("vector", &self.vector.keys().collect::<Vec<_>>())
            .field("raster", &self.raster.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl CaptchaContext {
    pub fn new(
        params: CaptchaParams,
        backend: Arc<dyn RasterBackend>,
        glyphs: Arc<GlyphCache>,
    ) -> Self {
        Self {
            params,
            vector: HashMap::new(),
            raster: HashMap::new(),
            backend,
            glyphs,
        }
    }

    pub fn params(&self) -> &CaptchaParams {
        &self.params
    }

    pub fn answer(&self) -> &str {
        &self.params.answer
    }

    pub fn size(&self) -> Size {
        self.params.size
    }

    pub fn backend(&self) -> &dyn RasterBackend {
        self.backend.as_ref()
    }

    pub fn glyphs(&self) -> &GlyphCache {
        &self.glyphs
    }

    pub fn vector(&self, name: &str) -> CaptchaResult<&VectorLayer> {
        self.vector
            .get(name)
            .ok_or_else(|| CaptchaError::lookup(format!("unknown vector layer '{name}'")))
    }

    pub fn raster(&self, name: &str) -> CaptchaResult<&RasterLayer> {
        self.raster
            .get(name)
            .ok_or_else(|| CaptchaError::lookup(format!("unknown raster layer '{name}'")))
    }

    pub fn insert_vector(&mut self, name: impl Into<String>, layer: VectorLayer) {
        self.vector.insert(name.into(), layer);
    }

    pub fn insert_raster(&mut self, name: impl Into<String>, layer: RasterLayer) {
        self.raster.insert(name.into(), layer);
    }

    pub(crate) fn take_vector(&mut self, name: &str) -> CaptchaResult<VectorLayer> {
        self.vector
            .remove(name)
            .ok_or_else(|| CaptchaError::lookup(format!("unknown vector layer '{name}'")))
    }

    pub(crate) fn take_raster(&mut self, name: &str) -> CaptchaResult<RasterLayer> {
        self.raster
            .remove(name)
            .ok_or_else(|| CaptchaError::lookup(format!("unknown raster layer '{name}'")))
    }
}

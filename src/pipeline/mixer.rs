use std::sync::Arc;

use crate::{
    foundation::core::{CaptchaImage, CaptchaParams, Size},
    foundation::error::CaptchaResult,
    geometry::{cache::GlyphCache, layer::VectorLayer},
    pipeline::{
        MASTER_LAYER,
        context::CaptchaContext,
        step::{RasterStep, VectorStep, run_raster_steps, run_vector_steps},
    },
    raster::{
        backend::{ImageFormat, RasterBackend},
        layer::RasterLayer,
    },
};

/// Immutable compiled pipeline.
///
/// Safe to share across threads; whether concurrent generations are independent
/// depends on the providers configured into it.
#[derive(Clone)]
pub struct Mixer {
    size: Size,
    format: Option<ImageFormat>,
    vector: Arc<[(String, Vec<VectorStep>)]>,
    raster: Arc<[(String, Vec<RasterStep>)]>,
    backend: Arc<dyn RasterBackend>,
    glyphs: Arc<GlyphCache>,
}

impl std::fmt::Debug for Mixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mixer")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("vector", &self.vector)
            .field("raster", &self.raster)
            .finish_non_exhaustive()
    }
}

impl Mixer {
    pub(crate) fn new(
        size: Size,
        format: Option<ImageFormat>,
        vector: Vec<(String, Vec<VectorStep>)>,
        raster: Vec<(String, Vec<RasterStep>)>,
        backend: Arc<dyn RasterBackend>,
        glyphs: Arc<GlyphCache>,
    ) -> Self {
        Self {
            size,
            format,
            vector: vector.into(),
            raster: raster.into(),
            backend,
            glyphs,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn vector_layers(&self) -> impl Iterator<Item = &str> {
        self.vector.iter().map(|(name, _)| name.as_str())
    }

    pub fn raster_layers(&self) -> impl Iterator<Item = &str> {
        self.raster.iter().map(|(name, _)| name.as_str())
    }

    /// Runs every vector layer, then every raster layer, and returns the master
    /// layer's pixels (encoded when an output format is set).
    #[tracing::instrument(
        skip(self, answer),
        fields(answer_len = answer.chars().count(), width = self.size.width, height = self.size.height)
    )]
    pub fn generate(&self, answer: &str) -> CaptchaResult<CaptchaImage> {
        let mut ctx = CaptchaContext::new(
            CaptchaParams::new(answer, self.size),
            Arc::clone(&self.backend),
            Arc::clone(&self.glyphs),
        );
        for (name, _) in self.vector.iter() {
            ctx.insert_vector(name.as_str(), VectorLayer::new());
        }
        for (name, _) in self.raster.iter() {
            ctx.insert_raster(name.as_str(), RasterLayer::new(self.size));
        }

        for (name, steps) in self.vector.iter() {
            tracing::debug!(kind = "vector", layer = %name, steps = steps.len(), "run layer");
            let mut layer = ctx.take_vector(name)?;
            run_vector_steps(steps, &mut layer, &ctx)?;
            ctx.insert_vector(name.as_str(), layer);
        }

        let mut encoded = None;
        for (name, steps) in self.raster.iter() {
            tracing::debug!(kind = "raster", layer = %name, steps = steps.len(), "run layer");
            let mut layer = ctx.take_raster(name)?;
            if let Some(bytes) = run_raster_steps(steps, &mut layer, &ctx)? {
                encoded = Some(bytes);
            }
            ctx.insert_raster(name.as_str(), layer);
        }

        let master = ctx.take_raster(MASTER_LAYER)?;
        let image = match encoded {
            Some(data) => CaptchaImage {
                data,
                size: self.size,
                format: self.format,
            },
            None => CaptchaImage {
                data: master.into_data(),
                size: self.size,
                format: None,
            },
        };
        tracing::debug!(bytes = image.data.len(), "generated");
        Ok(image)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/mixer.rs"]
mod tests;

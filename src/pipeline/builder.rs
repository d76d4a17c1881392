use std::sync::Arc;

use crate::{
    foundation::config::MixerSettings,
    foundation::core::Size,
    foundation::error::{CaptchaError, CaptchaResult},
    geometry::cache::GlyphCache,
    pipeline::{
        MASTER_LAYER,
        mixer::Mixer,
        step::{RasterStep, VectorStep},
    },
    raster::backend::{ImageFormat, RasterBackend, SkiaBackend},
    value::random::RandomSource,
};

/// Accumulates per-layer step lists and compiles them into [`Mixer`]s.
///
/// Layer names are kept in first-configured order; adding steps to an existing
/// name appends to its list. `build` leaves the builder intact, so it can be
/// extended and built again.
pub struct MixerBuilder {
    size: Size,
    format: Option<ImageFormat>,
    random: RandomSource,
    backend: Arc<dyn RasterBackend>,
    glyphs: Arc<GlyphCache>,
    vector: Vec<(String, Vec<VectorStep>)>,
    raster: Vec<(String, Vec<RasterStep>)>,
}

impl std::fmt::Debug for MixerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixerBuilder")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("vector", &self.vector)
            .field("raster", &self.raster)
            .finish_non_exhaustive()
    }
}

impl MixerBuilder {
    pub fn new(width: u32, height: u32) -> CaptchaResult<Self> {
        Ok(Self {
            size: Size::new(width, height)?,
            format: None,
            random: RandomSource::thread(),
            backend: Arc::new(SkiaBackend),
            glyphs: Arc::new(GlyphCache::default()),
            vector: Vec::new(),
            raster: Vec::new(),
        })
    }

    pub fn from_settings(settings: &MixerSettings) -> CaptchaResult<Self> {
        settings.validate()?;
        let mut builder = Self::new(settings.width, settings.height)?;
        builder.format = settings.format;
        builder.random = RandomSource::from_seed(settings.seed);
        builder.glyphs = Arc::new(GlyphCache::new(settings.glyph_cache));
        Ok(builder)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Output encoding of the master layer; `None` returns raw RGBA.
    pub fn format(&mut self, format: Option<ImageFormat>) -> CaptchaResult<&mut Self> {
        if let Some(f) = &format {
            f.validate()?;
        }
        self.format = format;
        Ok(self)
    }

    /// Shared random source for providers feeding this mixer.
    pub fn random(&self) -> RandomSource {
        self.random.clone()
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.random = RandomSource::seeded(seed);
        self
    }

    pub fn with_backend(&mut self, backend: Arc<dyn RasterBackend>) -> &mut Self {
        self.backend = backend;
        self
    }

    pub fn with_glyph_cache(&mut self, glyphs: Arc<GlyphCache>) -> &mut Self {
        self.glyphs = glyphs;
        self
    }

    pub fn glyph_cache(&self) -> Arc<GlyphCache> {
        Arc::clone(&self.glyphs)
    }

    pub fn vector(
        &mut self,
        name: &str,
        steps: impl IntoIterator<Item = VectorStep>,
    ) -> CaptchaResult<&mut Self> {
        check_name(name)?;
        let steps: Vec<VectorStep> = steps.into_iter().collect();
        append(&mut self.vector, name, steps);
        Ok(self)
    }

    pub fn raster(
        &mut self,
        name: &str,
        steps: impl IntoIterator<Item = RasterStep>,
    ) -> CaptchaResult<&mut Self> {
        check_name(name)?;
        let steps: Vec<RasterStep> = steps.into_iter().collect();
        if steps.iter().any(RasterStep::is_encode) {
            return Err(CaptchaError::config(format!(
                "encode steps are added from the output format, not to layer '{name}'"
            )));
        }
        append(&mut self.raster, name, steps);
        Ok(self)
    }

    pub fn build(&self) -> CaptchaResult<Mixer> {
        if !self.raster.iter().any(|(name, _)| name == MASTER_LAYER) {
            return Err(CaptchaError::config(format!(
                "no raster layer named '{MASTER_LAYER}' was configured"
            )));
        }
        let raster = self
            .raster
            .iter()
            .map(|(name, steps)| {
                let mut steps = steps.clone();
                if name == MASTER_LAYER
                    && let Some(format) = self.format
                {
                    steps.push(RasterStep::Encode(format));
                }
                (name.clone(), steps)
            })
            .collect();

        tracing::debug!(
            vector_layers = self.vector.len(),
            raster_layers = self.raster.len(),
            format = ?self.format,
            "build mixer"
        );
        Ok(Mixer::new(
            self.size,
            self.format,
            self.vector.clone(),
            raster,
            Arc::clone(&self.backend),
            Arc::clone(&self.glyphs),
        ))
    }
}

fn check_name(name: &str) -> CaptchaResult<()> {
    if name.trim().is_empty() {
        return Err(CaptchaError::config("layer name must not be empty"));
    }
    Ok(())
}

fn append<S>(layers: &mut Vec<(String, Vec<S>)>, name: &str, steps: Vec<S>) {
    match layers.iter_mut().find(|(n, _)| n == name) {
        Some((_, existing)) => existing.extend(steps),
        None => layers.push((name.to_owned(), steps)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/builder.rs"]
mod tests;

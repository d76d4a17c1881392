use std::{fmt, sync::Arc};

use crate::{
    foundation::error::CaptchaResult,
    geometry::layer::VectorLayer,
    pipeline::{
        context::CaptchaContext,
        processor::{RasterProcessor, VectorProcessor},
    },
    raster::{backend::ImageFormat, layer::RasterLayer},
    value::signal::Signal,
};

/// One entry of a vector layer's step list.
#[derive(Clone)]
pub enum VectorStep {
    Process(Arc<dyn VectorProcessor>),
    Tick(Arc<Signal>),
}

impl VectorStep {
    pub fn process(processor: impl VectorProcessor + 'static) -> Self {
        Self::Process(Arc::new(processor))
    }

    pub fn tick(signal: &Arc<Signal>) -> Self {
        Self::Tick(Arc::clone(signal))
    }
}

impl fmt::Debug for VectorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process(p) => f.debug_tuple("Process").field(&p.name()).finish(),
            Self::Tick(s) => f.debug_tuple("Tick").field(&s.name()).finish(),
        }
    }
}

/// One entry of a raster layer's step list.
///
/// `Encode` is reserved: the builder appends it to the master layer from its
/// output format and rejects it anywhere else.
#[derive(Clone)]
pub enum RasterStep {
    Process(Arc<dyn RasterProcessor>),
    Tick(Arc<Signal>),
    Encode(ImageFormat),
}

impl RasterStep {
    pub fn process(processor: impl RasterProcessor + 'static) -> Self {
        Self::Process(Arc::new(processor))
    }

    pub fn tick(signal: &Arc<Signal>) -> Self {
        Self::Tick(Arc::clone(signal))
    }

    pub(crate) fn is_encode(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}

impl fmt::Debug for RasterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process(p) => f.debug_tuple("Process").field(&p.name()).finish(),
            Self::Tick(s) => f.debug_tuple("Tick").field(&s.name()).finish(),
            Self::Encode(format) => f.debug_tuple("Encode").field(format).finish(),
        }
    }
}

pub(crate) fn run_vector_steps(
    steps: &[VectorStep],
    layer: &mut VectorLayer,
    ctx: &CaptchaContext,
) -> CaptchaResult<()> {
    for step in steps {
        match step {
            VectorStep::Process(p) => {
                tracing::trace!(processor = p.name(), "vector step");
                p.process(layer, ctx)?;
            }
            VectorStep::Tick(signal) => signal.fire(),
        }
    }
    Ok(())
}

/// Runs raster steps in order. Returns the encoded bytes if an `Encode` step ran.
pub(crate) fn run_raster_steps(
    steps: &[RasterStep],
    layer: &mut RasterLayer,
    ctx: &CaptchaContext,
) -> CaptchaResult<Option<Vec<u8>>> {
    let mut encoded = None;
    for step in steps {
        match step {
            RasterStep::Process(p) => {
                tracing::trace!(processor = p.name(), "raster step");
                p.process(layer, ctx)?;
            }
            RasterStep::Tick(signal) => signal.fire(),
            RasterStep::Encode(format) => {
                tracing::trace!(?format, "encode");
                encoded = Some(ctx.backend().encode(layer, *format)?);
            }
        }
    }
    Ok(encoded)
}

//! captcha-mixer generates randomized captcha images from layered pipelines.
//!
//! A [`MixerBuilder`] collects ordered processor steps for named vector layers
//! (geometry: glyphs, lines, curves) and raster layers (RGBA pixel buffers). The
//! compiled [`Mixer`] is immutable and runs every vector layer, then every raster
//! layer, for each [`Mixer::generate`] call, returning the `"master"` raster layer
//! as raw RGBA or an encoded image.
//!
//! Processor parameters are [`Value`] providers: constants, random ranges, cyclic
//! sequences, repeaters, and hold-until-[`Signal`] switchers.
#![forbid(unsafe_code)]

mod foundation;
mod geometry;
mod pipeline;
mod processors;
mod raster;
mod value;

pub use crate::foundation::config::{GlyphCacheSettings, MixerSettings};
pub use crate::foundation::core::{CaptchaImage, CaptchaParams, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{CaptchaError, CaptchaResult};

pub use crate::geometry::cache::{GlyphCache, GlyphKey};
pub use crate::geometry::glyph::{Font, GlyphSource};
pub use crate::geometry::instruction::{Instruction, PointRole};
pub use crate::geometry::layer::VectorLayer;
pub use crate::geometry::object::VectorObject;
pub use crate::geometry::path::VectorPath;
pub use crate::geometry::skeleton::skeletonize;

pub use crate::raster::backend::{
    Brush, ImageFormat, LineCap, LineJoin, Paint, RasterBackend, SkiaBackend, StrokeStyle,
};
pub use crate::raster::blend::{
    MixMode, add_colors, apply_mask, apply_mask_in_place, draw, draw_in_place, hue_shift, invert,
    set_pixels,
};
pub use crate::raster::color::{Rgba8, hsb_to_rgb, rgb_to_hsb};
pub use crate::raster::layer::RasterLayer;

pub use crate::pipeline::MASTER_LAYER;
pub use crate::pipeline::builder::MixerBuilder;
pub use crate::pipeline::context::CaptchaContext;
pub use crate::pipeline::mixer::Mixer;
pub use crate::pipeline::processor::{RasterProcessor, VectorProcessor};
pub use crate::pipeline::step::{RasterStep, VectorStep};

pub use crate::value::provider::{Value, ValueProvider};
pub use crate::value::random::RandomSource;
pub use crate::value::signal::{Advance, Signal};
pub use crate::value::switch::{Selector, Switcher};

/// Ready-made processors.
pub mod processor {
    pub use crate::processors::Anchor;
    pub use crate::processors::raster::{
        AddColors, Background, Blur, Composite, DrawVector, Fill, HueShift, Isolated,
        InvertColors, Noise, SetPixels,
    };
    pub use crate::processors::shapes::{self, ShapeFn, ShapeParams, ShapeSample};
    pub use crate::processors::vector::{
        ClearObjects, CopyObjects, Create, MoveObjects, RotateObjects, ScaleObjects, Text,
    };
}

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod mixer;
pub(crate) mod processor;
pub(crate) mod step;

/// Name of the raster layer whose final pixels become the captcha image.
pub const MASTER_LAYER: &str = "master";

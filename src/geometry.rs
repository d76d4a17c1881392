pub(crate) mod cache;
pub(crate) mod curve;
pub(crate) mod glyph;
pub(crate) mod instruction;
pub(crate) mod layer;
pub(crate) mod object;
pub(crate) mod path;
pub(crate) mod skeleton;
pub(crate) mod transform;

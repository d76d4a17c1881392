pub(crate) mod backend;
pub(crate) mod blend;
pub(crate) mod blur;
pub(crate) mod color;
pub(crate) mod layer;

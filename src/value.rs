pub(crate) mod provider;
pub(crate) mod random;
pub(crate) mod signal;
pub(crate) mod switch;

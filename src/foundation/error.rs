/// Convenience result type used across the crate.
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// Top-level error taxonomy.
///
/// `Config` errors are raised while a pipeline is being assembled and never during
/// generation. Everything else aborts the single `generate` call that hit it.
#[derive(thiserror::Error, Debug)]
pub enum CaptchaError {
    /// Invalid configuration: sizes, names, provider arguments, settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// A processor referenced a layer that is not part of the context.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// A discrete parameter was outside of its accepted range.
    #[error("range error: {0}")]
    Range(String),

    /// Rasterization backend failure.
    #[error("render error: {0}")]
    Render(String),

    /// Image encode or decode failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptchaError {
    /// Build a [`CaptchaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CaptchaError::Lookup`] value.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Build a [`CaptchaError::Range`] value.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Build a [`CaptchaError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CaptchaError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// True for errors raised while assembling a pipeline.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

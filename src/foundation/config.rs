use std::time::Duration;

use crate::{
    foundation::core::Size,
    foundation::error::{CaptchaError, CaptchaResult},
    raster::backend::ImageFormat,
};

const CACHE_CAPACITY_ENV: &str = "CAPTCHA_GLYPH_CACHE_CAPACITY";
const CACHE_TTL_ENV: &str = "CAPTCHA_GLYPH_CACHE_TTL_SECS";

/// Bounds of the shared glyph and skeleton cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlyphCacheSettings {
    /// Maximum number of retained entries.
    pub capacity: usize,
    /// Entries older than this are recomputed on next access.
    pub ttl_secs: u64,
    /// Decimal places kept from a skeleton quality before it becomes part of a cache key.
    pub quality_decimals: u32,
}

impl Default for GlyphCacheSettings {
    fn default() -> Self {
        Self {
            capacity: 512,
            ttl_secs: 600,
            quality_decimals: 2,
        }
    }
}

impl GlyphCacheSettings {
    /// Defaults, with capacity and TTL overridable from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let capacity = std::env::var(CACHE_CAPACITY_ENV)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.capacity);
        let ttl_secs = std::env::var(CACHE_TTL_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.ttl_secs);
        Self {
            capacity,
            ttl_secs,
            ..defaults
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn validate(&self) -> CaptchaResult<()> {
        if self.capacity == 0 {
            return Err(CaptchaError::config("glyph cache capacity must be > 0"));
        }
        if self.ttl_secs == 0 {
            return Err(CaptchaError::config("glyph cache ttl must be > 0"));
        }
        if self.quality_decimals > 6 {
            return Err(CaptchaError::config(
                "glyph cache quality_decimals must be <= 6",
            ));
        }
        Ok(())
    }
}

/// Serializable description of a mixer's global settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MixerSettings {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub format: Option<ImageFormat>,
    /// Seed for the builder's shared random source; `None` means non-deterministic.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub glyph_cache: GlyphCacheSettings,
}

impl MixerSettings {
    pub fn from_json(json: &str) -> CaptchaResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| CaptchaError::config(format!("invalid mixer settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn size(&self) -> CaptchaResult<Size> {
        Size::new(self.width, self.height)
    }

    pub fn validate(&self) -> CaptchaResult<()> {
        self.size()?;
        if let Some(format) = self.format {
            format.validate()?;
        }
        self.glyph_cache.validate()
    }
}

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use crate::{
    foundation::config::GlyphCacheSettings,
    foundation::error::CaptchaResult,
    foundation::math::{quantize, round_to},
    geometry::{glyph::GlyphSource, object::VectorObject, skeleton::skeletonize},
};

/// Identity of a cached glyph: the character, its source, and the skeleton quality
/// (rounded) when the entry is a skeleton rather than a raw outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    pub ch: char,
    pub source: u64,
    pub quality: Option<i64>,
}

struct Slot {
    created: Instant,
    value: Mutex<Option<Arc<VectorObject>>>,
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<GlyphKey, Arc<Slot>>,
    lru: VecDeque<GlyphKey>,
}

/// Process-wide cache of glyph outlines and skeletons.
///
/// Each key is computed at most once while it stays resident; concurrent requests
/// for the same key wait on the first one. Callers always receive their own deep
/// copy.
pub struct GlyphCache {
    capacity: usize,
    ttl: Duration,
    quality_decimals: u32,
    state: Mutex<CacheState>,
}

impl std::fmt::Debug for GlyphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new(GlyphCacheSettings::from_env())
    }
}

/// Held outside the map: a creation is running or a caller is waiting on it.
fn in_use(slot: &Arc<Slot>) -> bool {
    Arc::strong_count(slot) > 1
}

impl GlyphCache {
    pub fn new(settings: GlyphCacheSettings) -> Self {
        Self::with_limits(
            settings.capacity,
            settings.ttl(),
            settings.quality_decimals,
        )
    }

    pub(crate) fn with_limits(capacity: usize, ttl: Duration, quality_decimals: u32) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            quality_decimals,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn key(&self, source: &dyn GlyphSource, ch: char, quality: Option<f64>) -> GlyphKey {
        GlyphKey {
            ch,
            source: source.id(),
            quality: quality.map(|q| quantize(q, self.quality_decimals)),
        }
    }

    /// Raw outline of `ch`.
    pub fn outline(&self, source: &dyn GlyphSource, ch: char) -> CaptchaResult<VectorObject> {
        let key = self.key(source, ch, None);
        self.get_or_create(key, || source.outline(ch))
    }

    /// Skeleton of `ch`, built from the (cached) outline.
    ///
    /// The quality is rounded like the key before skeletonizing, so every request
    /// mapping to one key sees the same geometry.
    pub fn skeleton(
        &self,
        source: &dyn GlyphSource,
        ch: char,
        quality: f64,
    ) -> CaptchaResult<VectorObject> {
        let key = self.key(source, ch, Some(quality));
        let quality = round_to(quality, self.quality_decimals);
        self.get_or_create(key, || {
            let outline = self.outline(source, ch)?;
            skeletonize(&outline, quality)
        })
    }

    pub fn get_or_create(
        &self,
        key: GlyphKey,
        create: impl FnOnce() -> CaptchaResult<VectorObject>,
    ) -> CaptchaResult<VectorObject> {
        let slot = self.slot(key);
        let mut value = slot.value.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(object) = value.as_ref() {
            tracing::trace!(?key, "glyph cache hit");
            return Ok(VectorObject::clone(object));
        }
        tracing::debug!(?key, "glyph cache miss");
        let object = Arc::new(create()?);
        *value = Some(Arc::clone(&object));
        Ok(VectorObject::clone(&object))
    }

    fn slot(&self, key: GlyphKey) -> Arc<Slot> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = state
            .slots
            .get(&key)
            .is_some_and(|slot| !in_use(slot) && slot.created.elapsed() >= self.ttl);
        if expired {
            tracing::debug!(?key, "glyph cache entry expired");
            state.slots.remove(&key);
        }

        let slot = Arc::clone(state.slots.entry(key).or_insert_with(|| {
            Arc::new(Slot {
                created: Instant::now(),
                value: Mutex::new(None),
            })
        }));

        if let Some(pos) = state.lru.iter().position(|k| *k == key) {
            state.lru.remove(pos);
        }
        state.lru.push_back(key);
        self.evict_excess(&mut state);
        slot
    }

    /// Drops least recently used entries until the cache fits its capacity.
    ///
    /// Slots still held by a caller are skipped, so the cache may stay over capacity
    /// until those creations finish.
    fn evict_excess(&self, state: &mut CacheState) {
        while state.slots.len() > self.capacity {
            let Some(pos) = state
                .lru
                .iter()
                .position(|k| state.slots.get(k).is_none_or(|slot| !in_use(slot)))
            else {
                break;
            };
            if let Some(old) = state.lru.remove(pos) {
                tracing::debug!(key = ?old, "glyph cache evict");
                state.slots.remove(&old);
            }
        }
    }

    pub fn invalidate(&self, key: &GlyphKey) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = state.lru.iter().position(|k| k == key) {
            state.lru.remove(pos);
        }
        state.slots.remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.slots.clear();
        state.lru.clear();
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .slots
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/cache.rs"]
mod tests;

use std::sync::{
    Barrier, mpsc,
    atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::foundation::core::Point;
use crate::foundation::error::CaptchaError;
use crate::geometry::path::VectorPath;

struct BoxGlyphs {
    calls: AtomicUsize,
}

impl BoxGlyphs {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl GlyphSource for BoxGlyphs {
    fn id(&self) -> u64 {
        7
    }

    fn outline(&self, ch: char) -> CaptchaResult<VectorObject> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if ch == '?' {
            return Err(CaptchaError::range("no glyph"));
        }
        Ok(VectorObject::from_path(
            VectorPath::new().rect(Point::new(0.0, -1.0), Point::new(0.6, 0.0)),
        ))
    }

    fn advance(&self, _ch: char) -> CaptchaResult<f64> {
        Ok(0.6)
    }
}

fn cache(capacity: usize) -> GlyphCache {
    GlyphCache::with_limits(capacity, Duration::from_secs(600), 2)
}

#[test]
fn outline_is_created_once_and_copied_out() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(8);

    let mut a = cache.outline(&glyphs, 'A').unwrap();
    a.translate(10.0, 10.0);
    let b = cache.outline(&glyphs, 'A').unwrap();

    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 1);
    assert_ne!(a, b);
    assert_eq!(b.bounds().unwrap().x0, 0.0);
}

#[test]
fn quality_is_rounded_into_the_key() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(8);
    assert_eq!(
        cache.key(&glyphs, 'A', Some(1.001)),
        cache.key(&glyphs, 'A', Some(1.004))
    );
    assert_ne!(
        cache.key(&glyphs, 'A', Some(1.0)),
        cache.key(&glyphs, 'A', Some(1.5))
    );
    assert_ne!(cache.key(&glyphs, 'A', None), cache.key(&glyphs, 'A', Some(1.0)));
}

#[test]
fn skeleton_reuses_cached_outline() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(8);
    let s1 = cache.skeleton(&glyphs, 'A', 1.0).unwrap();
    let s2 = cache.skeleton(&glyphs, 'A', 2.0).unwrap();
    assert!(!s1.is_empty());
    assert!(!s2.is_empty());
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 1);
    // outline + two skeletons
    assert_eq!(cache.len(), 3);
}

#[test]
fn failures_are_not_cached() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(8);
    assert!(cache.outline(&glyphs, '?').is_err());
    assert!(cache.outline(&glyphs, '?').is_err());
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(2);
    cache.outline(&glyphs, 'A').unwrap();
    cache.outline(&glyphs, 'B').unwrap();
    cache.outline(&glyphs, 'A').unwrap();
    cache.outline(&glyphs, 'C').unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 3);

    cache.outline(&glyphs, 'A').unwrap();
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 3);
    cache.outline(&glyphs, 'B').unwrap();
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn expired_entries_are_recomputed() {
    let glyphs = BoxGlyphs::new();
    let cache = GlyphCache::with_limits(8, Duration::ZERO, 2);
    cache.outline(&glyphs, 'A').unwrap();
    cache.outline(&glyphs, 'A').unwrap();
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn invalidate_and_clear() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(8);
    cache.outline(&glyphs, 'A').unwrap();
    cache.outline(&glyphs, 'B').unwrap();

    let key = cache.key(&glyphs, 'A', None);
    assert!(cache.invalidate(&key));
    assert!(!cache.invalidate(&key));
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
    cache.outline(&glyphs, 'B').unwrap();
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn concurrent_requests_create_once() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(8);
    let threads = 8;
    let barrier = Barrier::new(threads);

    std::thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                barrier.wait();
                cache.skeleton(&glyphs, 'W', 1.0).unwrap()
            });
        }
    });

    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 2);
}

#[test]
fn skeleton_depends_only_on_the_rounded_quality() {
    let glyphs = BoxGlyphs::new();

    let primed = cache(8);
    primed.skeleton(&glyphs, 'A', 1.2451).unwrap();
    let from_primed = primed.skeleton(&glyphs, 'A', 1.2549).unwrap();

    let fresh = cache(8);
    let from_fresh = fresh.skeleton(&glyphs, 'A', 1.2549).unwrap();

    assert_eq!(from_primed, from_fresh);
    let outline = glyphs.outline('A').unwrap();
    assert_eq!(from_fresh, skeletonize(&outline, 1.25).unwrap());
}

#[test]
fn skeleton_survives_a_capacity_of_one() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(1);
    let first = cache.skeleton(&glyphs, 'I', 1.0).unwrap();
    for _ in 0..2 {
        assert_eq!(cache.skeleton(&glyphs, 'I', 1.0).unwrap(), first);
    }
    assert_eq!(glyphs.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn entry_being_created_is_not_evicted() {
    let glyphs = BoxGlyphs::new();
    let cache = cache(1);
    let key = GlyphKey {
        ch: 'K',
        source: 99,
        quality: None,
    };
    let created = AtomicUsize::new(0);

    cache
        .get_or_create(key, || {
            created.fetch_add(1, Ordering::SeqCst);
            // Fills the cache past capacity while 'K' is still being built.
            cache.outline(&glyphs, 'B')?;
            cache.outline(&glyphs, 'C')?;
            Ok(VectorObject::default())
        })
        .unwrap();
    cache
        .get_or_create(key, || {
            created.fetch_add(1, Ordering::SeqCst);
            Ok(VectorObject::default())
        })
        .unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn entry_being_created_does_not_expire() {
    let cache = GlyphCache::with_limits(8, Duration::ZERO, 2);
    let key = GlyphKey {
        ch: 'T',
        source: 5,
        quality: None,
    };
    let created = AtomicUsize::new(0);
    let (started, wait_started) = mpsc::channel();

    std::thread::scope(|s| {
        let first = s.spawn(|| {
            cache.get_or_create(key, || {
                created.fetch_add(1, Ordering::SeqCst);
                started.send(()).unwrap();
                std::thread::sleep(Duration::from_millis(50));
                Ok(VectorObject::from_path(
                    VectorPath::new().move_to(Point::new(1.0, 2.0)),
                ))
            })
        });
        wait_started.recv().unwrap();
        let second = cache
            .get_or_create(key, || {
                created.fetch_add(1, Ordering::SeqCst);
                Ok(VectorObject::default())
            })
            .unwrap();
        assert_eq!(first.join().unwrap().unwrap(), second);
    });

    assert_eq!(created.load(Ordering::SeqCst), 1);
}

use super::*;

#[test]
fn random_range_stays_within_bounds() {
    let v = Value::random_range(-3i32, 4).unwrap();
    for _ in 0..500 {
        let x = v.next();
        assert!((-3..=4).contains(&x));
    }
}

#[test]
fn random_range_degenerate_interval_is_constant() {
    let v = Value::random_range(2.5f64, 2.5).unwrap();
    assert_eq!(v.next(), 2.5);
}

#[test]
fn random_range_rejects_inverted_and_nan_bounds() {
    assert!(Value::random_range(5u32, 1).unwrap_err().is_config());
    assert!(Value::random_range(f64::NAN, 1.0).unwrap_err().is_config());
}

#[test]
fn random_range_rejects_unsampleable_float_bounds() {
    for (lo, hi) in [
        (0.0, f64::INFINITY),
        (f64::NEG_INFINITY, 0.0),
        (-f64::MAX, f64::MAX),
    ] {
        let err = Value::random_range(lo, hi).unwrap_err();
        assert!(err.is_config(), "{lo}..={hi}: {err}");
    }
    // Wide but finite spans stay usable.
    let wide = Value::random_range(-1e300_f64, 1e300_f64).unwrap();
    for _ in 0..100 {
        assert!(wide.next().is_finite());
    }
}

#[test]
fn seeded_sources_are_reproducible() {
    let a = Value::random_range_with(RandomSource::seeded(42), 0u32, 1_000_000).unwrap();
    let b = Value::random_range_with(RandomSource::seeded(42), 0u32, 1_000_000).unwrap();
    let xs: Vec<u32> = (0..16).map(|_| a.next()).collect();
    let ys: Vec<u32> = (0..16).map(|_| b.next()).collect();
    assert_eq!(xs, ys);
}

#[test]
fn seeded_source_is_shared_between_providers() {
    let shared = RandomSource::seeded(9);
    let a = Value::random_range_with(shared.clone(), 0u64, u64::MAX).unwrap();
    let b = Value::random_range_with(shared, 0u64, u64::MAX).unwrap();

    let reference = RandomSource::seeded(9);
    let full = Uniform::new_inclusive(0u64, u64::MAX).unwrap();
    let first = reference.sample(&full);
    let second = reference.sample(&full);

    assert_eq!(a.next(), first);
    assert_eq!(b.next(), second);
}

#[test]
fn random_bool_extremes() {
    let never = Value::random_bool(0.0, RandomSource::thread()).unwrap();
    let always = Value::random_bool(1.0, RandomSource::thread()).unwrap();
    for _ in 0..50 {
        assert!(!never.next());
        assert!(always.next());
    }
    assert!(Value::random_bool(1.5, RandomSource::thread()).is_err());
}

#[test]
fn choose_only_returns_listed_values() {
    let v = Value::choose(vec!["a", "b"], RandomSource::seeded(1)).unwrap();
    for _ in 0..20 {
        assert!(matches!(v.next(), "a" | "b"));
    }
    assert!(Value::<u8>::choose(vec![], RandomSource::thread()).is_err());
}

#[test]
fn from_seed_none_is_thread() {
    assert!(matches!(RandomSource::from_seed(None), RandomSource::Thread));
    assert!(matches!(RandomSource::from_seed(Some(3)), RandomSource::Seeded(_)));
}

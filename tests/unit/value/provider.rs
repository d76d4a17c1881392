use std::sync::atomic::AtomicU32;

use super::*;

fn counter() -> (Arc<AtomicU32>, Value<u32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    let value = Value::new(move || c.fetch_add(1, Ordering::SeqCst));
    (calls, value)
}

#[test]
fn constant_always_returns_same_value() {
    let v = Value::constant(7i32);
    for _ in 0..5 {
        assert_eq!(v.next(), 7);
    }
    let from: Value<f64> = 1.5.into();
    assert_eq!(from.next(), 1.5);
}

#[test]
fn carousel_cycles_in_order() {
    let v = Value::carousel(vec!['a', 'b', 'c']).unwrap();
    let got: String = (0..8).map(|_| v.next()).collect();
    assert_eq!(got, "abcabcab");
}

#[test]
fn carousel_index_matches_modulo_for_many_pulls() {
    let values: Vec<u32> = vec![10, 20, 30, 40, 50];
    let v = Value::carousel(values.clone()).unwrap();
    for i in 0..103 {
        assert_eq!(v.next(), values[i % values.len()]);
    }
}

#[test]
fn carousel_rejects_empty() {
    assert!(Value::<u8>::carousel(vec![]).unwrap_err().is_config());
}

#[test]
fn converter_forwards_one_pull_per_call() {
    let (calls, source) = counter();
    let doubled = source.map(|v| v * 2);
    assert_eq!(doubled.next(), 0);
    assert_eq!(doubled.next(), 2);
    assert_eq!(doubled.next(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn repeater_pulls_every_kth_call() {
    let (calls, source) = counter();
    let v = source.repeat(3).unwrap();
    let got: Vec<u32> = (0..7).map(|_| v.next()).collect();
    assert_eq!(got, vec![0, 0, 0, 1, 1, 1, 2]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn repeater_period_one_pulls_every_call() {
    let (_, source) = counter();
    let v = source.repeat(1).unwrap();
    assert_eq!((0..4).map(|_| v.next()).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn repeater_rejects_zero_period() {
    assert!(Value::constant(1u8).repeat(0).unwrap_err().is_config());
}

#[test]
fn clones_share_state() {
    let v = Value::carousel(vec![1u8, 2]).unwrap();
    let w = v.clone();
    assert_eq!(v.next(), 1);
    assert_eq!(w.next(), 2);
    assert_eq!(v.next(), 1);
}

use super::*;

#[test]
fn switcher_holds_until_advanced() {
    let s = Switcher::new(Value::carousel(vec![1, 2, 3]).unwrap());
    let v = s.value();
    assert_eq!(v.next(), 1);
    assert_eq!(v.next(), 1);
    s.advance();
    assert_eq!(v.next(), 2);
    assert_eq!(v.next(), 2);
    s.advance();
    s.advance();
    assert_eq!(v.next(), 3);
}

#[test]
fn switcher_advances_on_signal() {
    let signal = Signal::new("glyph");
    let s = Switcher::on(&signal, Value::carousel(vec!['x', 'y']).unwrap());
    let v = s.value();
    assert_eq!(signal.subscriber_count(), 1);
    assert_eq!(v.next(), 'x');
    signal.fire();
    assert_eq!(v.next(), 'y');
    assert_eq!(v.next(), 'y');
    signal.fire();
    assert_eq!(v.next(), 'x');
}

#[test]
fn selector_swaps_whole_source() {
    let evens = Value::carousel(vec![0, 2, 4]).unwrap();
    let odds = Value::carousel(vec![1, 3, 5]).unwrap();
    let sources = Value::carousel(vec![evens, odds]).unwrap();
    let sel = Selector::new(sources);
    let v = sel.value();

    assert_eq!(v.next(), 0);
    assert_eq!(v.next(), 2);
    sel.advance();
    assert_eq!(v.next(), 1);
    assert_eq!(v.next(), 3);
    sel.advance();
    // The evens carousel kept its own cursor.
    assert_eq!(v.next(), 4);
}

#[test]
fn selector_on_signal_subscribes() {
    let signal = Signal::new("palette");
    let sel = Selector::on(&signal, Value::constant(Value::constant(9u8)));
    assert_eq!(signal.subscriber_count(), 1);
    assert_eq!(sel.value().next(), 9);
    signal.fire();
    assert_eq!(sel.value().next(), 9);
}

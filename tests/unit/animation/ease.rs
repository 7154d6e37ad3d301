use super::*;

#[test]
fn in_out_sine_endpoints_and_midpoint() {
    assert!(ease_in_out_sine(0.0).abs() < 1e-12);
    assert!((ease_in_out_sine(1.0) - 1.0).abs() < 1e-12);
    assert!((ease_in_out_sine(0.5) - 0.5).abs() < 1e-12);
}

#[test]
fn in_out_sine_is_symmetric_and_monotonic() {
    let mut prev = ease_in_out_sine(0.0);
    for i in 1..=100 {
        let t = f64::from(i) / 100.0;
        let v = ease_in_out_sine(t);
        assert!(v >= prev);
        assert!((v + ease_in_out_sine(1.0 - t) - 1.0).abs() < 1e-12);
        prev = v;
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(ease_in_out_sine(-1.0), 0.0);
    assert!((ease_in_out_sine(3.0) - 1.0).abs() < 1e-12);
}

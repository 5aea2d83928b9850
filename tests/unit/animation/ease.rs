use super::*;

#[test]
fn endpoints_are_stable() {
    for f in TimingFunction::ALL {
        assert!(f.apply(0.0).abs() < 1e-6, "{f} at 0");
        assert!((f.apply(1.0) - 1.0).abs() < 1e-6, "{f} at 1");
    }
}

#[test]
fn monotonic_over_fifty_samples() {
    for f in TimingFunction::ALL {
        let mut prev = f.apply(0.0);
        for i in 1..=50 {
            let y = f.apply(f64::from(i) / 50.0);
            assert!(y + 1e-12 >= prev, "{f} decreased at sample {i}");
            assert!((0.0..=1.0).contains(&y));
            prev = y;
        }
    }
}

#[test]
fn linear_is_identity_and_clamps() {
    assert_eq!(TimingFunction::Linear.apply(0.3), 0.3);
    assert_eq!(TimingFunction::Linear.apply(-1.0), 0.0);
    assert_eq!(TimingFunction::Linear.apply(2.0), 1.0);
}

#[test]
fn ease_in_out_is_symmetric_about_the_midpoint() {
    let f = TimingFunction::EaseInOut;
    assert!((f.apply(0.5) - 0.5).abs() < 1e-9);
    for x in [0.1, 0.2, 0.35] {
        assert!((f.apply(x) + f.apply(1.0 - x) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn ease_in_starts_slow_and_ease_out_starts_fast() {
    assert!(TimingFunction::EaseIn.apply(0.25) < 0.25);
    assert!(TimingFunction::EaseOut.apply(0.25) > 0.25);
}

#[test]
fn curve_inverts_the_x_component() {
    let curve = TimingFunction::Ease.curve().unwrap();
    // Reference value of CSS `ease` at x = 0.5.
    assert!((curve.evaluate(0.5) - 0.8024033877399112).abs() < 1e-6);
}

#[test]
fn names_round_trip_through_from_str() {
    for f in TimingFunction::ALL {
        assert_eq!(f.css_name().parse::<TimingFunction>().unwrap(), f);
    }
}

#[test]
fn unknown_name_is_a_configuration_error() {
    let err = "bouncy".parse::<TimingFunction>().unwrap_err();
    assert!(matches!(err, KanimateError::Configuration(_)));
    assert!(err.to_string().contains("bouncy"));
}

#[test]
fn deserializes_from_css_names() {
    let f: TimingFunction = serde_json::from_str("\"ease-in-out\"").unwrap();
    assert_eq!(f, TimingFunction::EaseInOut);
    assert!(serde_json::from_str::<TimingFunction>("\"steps\"").is_err());
}

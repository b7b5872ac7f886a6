use super::*;

#[test]
fn endpoints_are_fixed() {
    for name in Ease::NAMES {
        let e = Ease::from_name(name).unwrap();
        assert!(e.apply(0.0).abs() < 1e-9, "{name} at 0");
        assert!((e.apply(1.0) - 1.0).abs() < 1e-9, "{name} at 1");
    }
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InQuad.apply(-3.0), 0.0);
    assert_eq!(Ease::InQuad.apply(3.0), 1.0);
}

#[test]
fn out_back_overshoots() {
    let peak = (1..100)
        .map(|i| Ease::OutBack.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn unknown_name_is_none() {
    assert!(Ease::from_name("bouncy").is_none());
}

#[test]
fn names_match_serde_names() {
    for (name, ease) in Ease::NAMES.iter().zip(Ease::ALL) {
        let parsed: Ease = serde_json::from_value(serde_json::json!(name)).unwrap();
        assert_eq!(parsed, ease);
    }
}

#[test]
fn in_out_curves_pass_through_midpoint() {
    for e in [Ease::InOutQuad, Ease::InOutCubic, Ease::InOutSine] {
        assert!((e.apply(0.5) - 0.5).abs() < 1e-12, "{e:?}");
    }
    assert!(Ease::InCubic.apply(0.3) < Ease::InQuad.apply(0.3));
    assert!(Ease::OutCubic.apply(0.3) > Ease::OutQuad.apply(0.3));
}

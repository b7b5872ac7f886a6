use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    assert_eq!(ColorDef::parse("#ff0000").unwrap(), ColorDef::rgba(1.0, 0.0, 0.0, 1.0));
    assert_eq!(ColorDef::parse("#fff").unwrap(), ColorDef::white());

    let c = ColorDef::parse("#0000ff80").unwrap();
    assert!((c.b - 1.0).abs() < 1e-9);
    assert!((c.a - (128.0 / 255.0)).abs() < 1e-9);
}

#[test]
fn parses_rgb_functions_and_names() {
    let c = ColorDef::parse("rgba(255, 0, 0, 0.5)").unwrap();
    assert_eq!(c, ColorDef::rgba(1.0, 0.0, 0.0, 0.5));
    let c = ColorDef::parse("rgb(0 255 0)").unwrap();
    assert_eq!(c, ColorDef::rgba(0.0, 1.0, 0.0, 1.0));
    assert_eq!(ColorDef::parse("White").unwrap(), ColorDef::white());
    assert_eq!(ColorDef::parse("transparent").unwrap().a, 0.0);
}

#[test]
fn rejects_garbage() {
    assert!(ColorDef::parse("big").is_err());
    assert!(ColorDef::parse("#12345").is_err());
    assert!(ColorDef::parse("rgb(1,2)").is_err());
}

#[test]
fn rejects_signed_hex_pairs() {
    assert!(ColorDef::parse("#+f+f+f").is_err());
    assert!(ColorDef::parse("#+fff").is_err());
    assert!(ColorDef::parse("#ff00-1").is_err());
}

#[test]
fn deserializes_object_array_and_hsla() {
    let c: ColorDef = serde_json::from_value(json!({"r": 0.25, "g": 0.5, "b": 0.75})).unwrap();
    assert_eq!(c, ColorDef::rgba(0.25, 0.5, 0.75, 1.0));

    let c: ColorDef = serde_json::from_value(json!([0.25, 0.5, 0.75, 0.9])).unwrap();
    assert_eq!(c, ColorDef::rgba(0.25, 0.5, 0.75, 0.9));

    let c: ColorDef = serde_json::from_value(json!({"h": 0.0, "s": 1.0, "l": 0.5})).unwrap();
    assert!((c.r - 1.0).abs() < 1e-9);
    assert!(c.g.abs() < 1e-9);
}

#[test]
fn premultiplies_and_serializes_as_hex() {
    let c = ColorDef::rgba(1.0, 1.0, 1.0, 0.5);
    let p = c.to_rgba8_premul();
    assert_eq!((p.r, p.a), (128, 128));
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#ffffff80"));
}

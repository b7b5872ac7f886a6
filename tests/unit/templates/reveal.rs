use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::scene::model::{DrawNode, Shape};
use serde_json::{Value, json};

fn ctx(frame: u64, duration_frames: u64) -> RenderCtx {
    RenderCtx {
        frame,
        duration_frames,
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 100,
            height: 50,
        },
    }
}

fn bind<T: serde::de::DeserializeOwned>(schema: Schema, props: Value) -> T {
    let map = schema.validate(&props).unwrap();
    serde_json::from_value(Value::Object(map)).unwrap()
}

#[test]
fn wipe_covers_progressively_in_each_direction() {
    let ltr: WipeConfig = bind(Wipe.schema(), json!({ "ease": "linear" }));
    assert!(Wipe.render(&ctx(0, 11), &ltr).is_empty());
    assert_eq!(ltr.covered(&ctx(5, 11)), Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(ltr.covered(&ctx(10, 11)), Rect::new(0.0, 0.0, 100.0, 50.0));

    let btt: WipeConfig = bind(
        Wipe.schema(),
        json!({ "direction": "bottom_to_top", "ease": "linear" }),
    );
    assert_eq!(btt.covered(&ctx(5, 11)), Rect::new(0.0, 25.0, 100.0, 50.0));

    let out: WipeConfig = bind(Wipe.schema(), json!({ "mode": "out", "ease": "linear" }));
    assert_eq!(out.covered(&ctx(0, 11)), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert!(Wipe.render(&ctx(10, 11), &out).is_empty());
}

#[test]
fn wipe_rejects_unknown_direction() {
    assert!(Wipe.schema().validate(&json!({ "direction": "diagonal" })).is_err());
}

#[test]
fn circle_reveal_reaches_farthest_corner() {
    let c: CircleRevealConfig = bind(
        CircleReveal.schema(),
        json!({ "x": 0.0, "y": 0.0, "ease": "linear" }),
    );
    assert!(CircleReveal.render(&ctx(0, 11), &c).is_empty());

    let full = (100.0f64 * 100.0 + 50.0 * 50.0).sqrt();
    assert!((c.full_radius(&ctx(0, 11)) - full).abs() < 1e-9);

    let scene = CircleReveal.render(&ctx(10, 11), &c);
    let DrawNode::Group { children, .. } = &scene.nodes[0] else {
        panic!("expected group");
    };
    match &children[0] {
        DrawNode::Fill {
            shape: Shape::Ellipse { center, radii },
            ..
        } => {
            assert_eq!(*center, Point::ZERO);
            assert!((radii.x - full).abs() < 1e-9);
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn lower_third_is_offscreen_at_edges_and_in_place_mid_window() {
    let c: LowerThirdConfig = bind(LowerThird.schema(), json!({}));
    let shift = |frame| match LowerThird.render(&ctx(frame, 60), &c).nodes.as_slice() {
        [DrawNode::Group { transform, .. }] => transform.translation().x,
        other => panic!("unexpected nodes {other:?}"),
    };
    assert!(shift(0) < -55.0);
    assert_eq!(shift(30), 0.0);
    assert!(shift(59) < -55.0);
}

#[test]
fn lower_third_without_subtitle_has_one_text_run() {
    let c: LowerThirdConfig = bind(LowerThird.schema(), json!({ "subtitle": "" }));
    let scene = LowerThird.render(&ctx(30, 60), &c);
    let DrawNode::Group { children, .. } = &scene.nodes[0] else {
        panic!("expected group");
    };
    let texts = children
        .iter()
        .filter(|n| matches!(n, DrawNode::Text(_)))
        .count();
    assert_eq!(texts, 1);
}

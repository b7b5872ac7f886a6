use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::scene::model::DrawNode;
use crate::schema::field::Schema;
use serde_json::{Value, json};

fn ctx(frame: u64, duration_frames: u64) -> RenderCtx {
    RenderCtx {
        frame,
        duration_frames,
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 1280,
            height: 720,
        },
    }
}

fn bind<T: serde::de::DeserializeOwned>(schema: Schema, props: Value) -> T {
    let map = schema.validate(&props).unwrap();
    serde_json::from_value(Value::Object(map)).unwrap()
}

fn group_parts(scene: &Scene) -> (&Affine, f64, &[DrawNode]) {
    match scene.nodes.as_slice() {
        [DrawNode::Group {
            transform,
            opacity,
            children,
        }] => (transform, *opacity, children),
        other => panic!("expected a single group, got {other:?}"),
    }
}

#[test]
fn fade_defaults_font_size_and_is_opaque_mid_window() {
    let c: FadeConfig = bind(Fade.schema(), json!({ "text": "Hi" }));
    assert_eq!(c.font_size, 40.0);

    let scene = Fade.render(&ctx(15, 30), &c);
    let (_, opacity, children) = group_parts(&scene);
    assert_eq!(opacity, 1.0);
    match children {
        [DrawNode::Text(run)] => {
            assert_eq!(run.text, "Hi");
            assert_eq!(run.font_size, 40.0);
            assert_eq!(run.align, TextAlign::Center);
        }
        other => panic!("unexpected children {other:?}"),
    }
}

#[test]
fn fade_is_invisible_on_first_and_last_frame() {
    let c: FadeConfig = bind(Fade.schema(), json!({ "text": "Hi" }));
    assert!(Fade.render(&ctx(0, 30), &c).is_empty());
    assert!(Fade.render(&ctx(29, 30), &c).is_empty());
    let (_, mid_in, _) = group_parts(&Fade.render(&ctx(5, 30), &c));
    assert!((mid_in - 0.5).abs() < 1e-9);
}

#[test]
fn slide_in_starts_offscreen_and_settles() {
    let c: SlideInConfig = bind(SlideIn.schema(), json!({ "edge": "right" }));
    let start = SlideIn.render(&ctx(0, 90), &c);
    let (t0, _, _) = group_parts(&start);
    assert_eq!(t0.translation().x, 1280.0);

    let late = SlideIn.render(&ctx(89, 90), &c);
    let (t1, _, _) = group_parts(&late);
    assert!(t1.translation().x.abs() < 5.0);
    assert_eq!(t1.translation().y, 0.0);
}

#[test]
fn bounce_text_waits_for_delay() {
    let c: BounceTextConfig = bind(BounceText.schema(), json!({ "delayFrames": 10 }));
    assert!(BounceText.render(&ctx(9, 60), &c).is_empty());
    assert!(!BounceText.render(&ctx(10, 60), &c).is_empty());
}

#[test]
fn typewriter_reveals_characters_over_time() {
    let c: TypewriterConfig = bind(
        Typewriter.schema(),
        json!({ "text": "abcdef", "charsPerSecond": 3, "cursor": false }),
    );
    assert!(Typewriter.render(&ctx(0, 90), &c).is_empty());
    let at = |frame| match Typewriter.render(&ctx(frame, 90), &c).nodes.as_slice() {
        [DrawNode::Text(run)] => run.text.clone(),
        other => panic!("unexpected nodes {other:?}"),
    };
    assert_eq!(at(12), "a");
    assert_eq!(at(35), "abc");
    assert_eq!(at(89), "abcdef");
}

#[test]
fn typewriter_cursor_shows_while_typing() {
    let c: TypewriterConfig = bind(Typewriter.schema(), json!({ "text": "abcdef" }));
    match Typewriter.render(&ctx(0, 90), &c).nodes.as_slice() {
        [DrawNode::Text(run)] => assert_eq!(run.text, "|"),
        other => panic!("unexpected nodes {other:?}"),
    }
}

#[test]
fn counter_reaches_target_with_formatting() {
    let c: CounterConfig = bind(
        Counter.schema(),
        json!({ "startValue": 0, "endValue": 50, "decimals": 1, "prefix": "$", "suffix": "k" }),
    );
    assert_eq!(c.format(c.value_at(&ctx(0, 30))), "$0.0k");
    assert_eq!(c.format(c.value_at(&ctx(29, 30))), "$50.0k");

    let fast: CounterConfig = bind(
        Counter.schema(),
        json!({ "endValue": 10, "countFrames": 5, "ease": "linear" }),
    );
    assert_eq!(fast.value_at(&ctx(5, 30)), 10.0);
    assert_eq!(fast.value_at(&ctx(20, 30)), 10.0);
    assert!(Counter.schema().validate(&json!({ "ease": "wobbly" })).is_err());
}

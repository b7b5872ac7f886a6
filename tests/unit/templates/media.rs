use super::*;
use crate::foundation::core::{Canvas, Fps, Point};
use serde_json::{Value, json};

fn ctx(frame: u64) -> RenderCtx {
    RenderCtx {
        frame,
        duration_frames: 11,
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 200,
            height: 100,
        },
    }
}

fn bind(props: Value) -> KenBurnsConfig {
    let map = KenBurns.schema().validate(&props).unwrap();
    serde_json::from_value(Value::Object(map)).unwrap()
}

#[test]
fn empty_source_draws_nothing() {
    assert!(KenBurns.render(&ctx(5), &bind(json!({}))).is_empty());
}

#[test]
fn zoom_is_centered_and_reaches_end_scale() {
    let c = bind(json!({ "src": "photo.jpg", "endScale": 2.0, "ease": "linear" }));
    let start = c.transform(&ctx(0));
    assert_eq!(start * Point::new(10.0, 10.0), Point::new(10.0, 10.0));

    let end = c.transform(&ctx(10));
    assert_eq!(end * Point::new(100.0, 50.0), Point::new(100.0, 50.0));
    assert_eq!(end * Point::new(0.0, 0.0), Point::new(-100.0, -50.0));
}

#[test]
fn pan_is_relative_to_canvas() {
    let c = bind(json!({ "src": "photo.jpg", "endScale": 1.0, "panX": 0.1, "ease": "linear" }));
    assert_eq!(c.transform(&ctx(10)) * Point::new(0.0, 0.0), Point::new(20.0, 0.0));
}

#[test]
fn image_node_covers_canvas() {
    let c = bind(json!({ "src": "photo.jpg" }));
    let scene = KenBurns.render(&ctx(3), &c);
    let DrawNode::Group { children, .. } = &scene.nodes[0] else {
        panic!("expected group");
    };
    assert_eq!(
        children[0],
        DrawNode::Image {
            src: "photo.jpg".to_owned(),
            dest: ctx(0).canvas.rect(),
            fit: Fit::Cover,
        }
    );
}

use super::*;
use crate::foundation::core::{Canvas, Fps};
use crate::scene::model::{DrawNode, Shape};
use serde_json::{Value, json};

fn ctx(frame: u64) -> RenderCtx {
    RenderCtx {
        frame,
        duration_frames: 120,
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 1000,
            height: 1000,
        },
    }
}

fn bind(props: Value) -> BarChartConfig {
    let map = BarChart.schema().validate(&props).unwrap();
    serde_json::from_value(Value::Object(map)).unwrap()
}

fn bar_rects(scene: &Scene) -> Vec<Rect> {
    scene
        .nodes
        .iter()
        .filter_map(|n| match n {
            DrawNode::Fill {
                shape: Shape::Rect { rect, .. },
                ..
            } => Some(*rect),
            _ => None,
        })
        .collect()
}

#[test]
fn default_data_has_four_bars() {
    let c = bind(json!({}));
    assert_eq!(c.bars.len(), 4);
    assert_eq!(c.scale_max(), 34.0);
}

#[test]
fn bars_grow_in_sequence_and_reach_scaled_height() {
    let c = bind(json!({
        "bars": [{ "label": "a", "value": 5 }, { "label": "b", "value": 10 }],
        "growFrames": 10,
        "staggerFrames": 10,
        "ease": "linear"
    }));
    assert_eq!(c.growth(1, 9), 0.0);
    assert_eq!(c.growth(0, 5), 0.5);

    assert!(bar_rects(&BarChart.render(&ctx(0), &c)).is_empty());
    assert_eq!(bar_rects(&BarChart.render(&ctx(5), &c)).len(), 1);

    let done = bar_rects(&BarChart.render(&ctx(100), &c));
    assert_eq!(done.len(), 2);
    // Plot spans 150..800 vertically.
    assert!((done[1].height() - 650.0).abs() < 1e-9);
    assert!((done[0].height() - 325.0).abs() < 1e-9);
}

#[test]
fn max_value_overrides_data_scale() {
    let c = bind(json!({ "bars": [{ "value": 10 }], "maxValue": 20 }));
    assert_eq!(c.scale_max(), 20.0);
    let zero = bind(json!({ "bars": [{ "value": 0 }] }));
    assert_eq!(zero.scale_max(), 1.0);
}

#[test]
fn bars_require_values() {
    assert!(BarChart.schema().validate(&json!({ "bars": [{ "label": "x" }] })).is_err());
}

use super::*;
use crate::foundation::core::FrameIndex;
use crate::scene::model::Layer;

fn frame(idx: u64, item_id: &str, width: f64) -> EvaluatedFrame {
    let mut scene = Scene::new();
    scene.fill_rect(
        Rect::new(0.0, 0.0, width, 10.0),
        Rgba8Premul::from_straight_rgba(255, 0, 0, 255),
    );
    EvaluatedFrame {
        frame: FrameIndex(idx),
        layers: vec![Layer {
            item_id: item_id.to_owned(),
            track_index: 0,
            local_frame: idx,
            scene,
        }],
        audio: Vec::new(),
    }
}

#[test]
fn identical_content_matches_across_frames() {
    assert_eq!(
        fingerprint_frame(&frame(0, "a", 10.0)),
        fingerprint_frame(&frame(7, "b", 10.0))
    );
}

#[test]
fn geometry_changes_the_fingerprint() {
    assert_ne!(
        fingerprint_frame(&frame(0, "a", 10.0)),
        fingerprint_frame(&frame(0, "a", 11.0))
    );
}

#[test]
fn empty_layer_list_differs_from_empty_scene_layer() {
    let mut with_empty = frame(0, "a", 1.0);
    with_empty.layers[0].scene = Scene::new();
    let mut none = frame(0, "a", 1.0);
    none.layers.clear();
    assert_ne!(fingerprint_frame(&with_empty), fingerprint_frame(&none));
}

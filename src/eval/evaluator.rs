use crate::compile::resolve::ResolvedComposition;
use crate::foundation::core::FrameIndex;
use crate::registry::animation::RenderCtx;
use crate::scene::model::{AudioCue, EvaluatedFrame, Layer};

/// Evaluate every item active at `frame`.
///
/// Layers come out bottom to top: tracks in document order, items in track order. Items outside
/// their window contribute nothing, and an item whose scene is empty still yields a layer.
pub(crate) fn evaluate_frame(comp: &ResolvedComposition, frame: FrameIndex) -> EvaluatedFrame {
    let mut layers = Vec::new();
    let mut audio = Vec::new();

    for item in &comp.items {
        let Some(local_frame) = item.window.local_frame(frame) else {
            continue;
        };
        let ctx = RenderCtx {
            frame: local_frame,
            duration_frames: item.window.duration_frames,
            fps: comp.fps,
            canvas: comp.canvas,
        };

        if let Some(src) = item.renderer.audio() {
            audio.push(AudioCue {
                item_id: item.id.clone(),
                src: src.src.clone(),
                volume: src.volume,
                source_time_secs: src.source_time_secs(ctx.secs()),
            });
        }

        layers.push(Layer {
            item_id: item.id.clone(),
            track_index: item.track_index,
            local_frame,
            scene: item.renderer.render(&ctx),
        });
    }

    EvaluatedFrame {
        frame,
        layers,
        audio,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;

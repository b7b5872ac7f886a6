use crate::animation::ease::Ease;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::foundation::core::{Affine, Vec2};
use crate::registry::animation::{Animation, RenderCtx};
use crate::scene::model::{DrawNode, Fit, Scene};
use crate::schema::field::{Field, Schema};
use crate::templates::{ease_field, window_opacity};
use serde::Deserialize;

/// Slow zoom and pan over a still image.
pub(crate) struct KenBurns;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KenBurnsConfig {
    src: String,
    start_scale: f64,
    end_scale: f64,
    pan_x: f64,
    pan_y: f64,
    ease: Ease,
    fade_in_frames: u64,
    fade_out_frames: u64,
}

impl KenBurnsConfig {
    /// Transform applied around the canvas center at `progress`.
    fn transform(&self, ctx: &RenderCtx) -> Affine {
        let opts = InterpolateOpts::eased(self.ease);
        let p = ctx.progress();
        let scale = interpolate(p, [0.0, 1.0], [self.start_scale, self.end_scale], opts);
        let pan = Vec2::new(
            interpolate(p, [0.0, 1.0], [0.0, self.pan_x], opts) * f64::from(ctx.canvas.width),
            interpolate(p, [0.0, 1.0], [0.0, self.pan_y], opts) * f64::from(ctx.canvas.height),
        );
        let c = ctx.canvas.center().to_vec2();
        Affine::translate(c + pan) * Affine::scale(scale) * Affine::translate(-c)
    }
}

impl Animation for KenBurns {
    type Config = KenBurnsConfig;

    fn schema(&self) -> Schema {
        Schema::new()
            .field(
                Field::string("src")
                    .default("")
                    .describe("Image path relative to the composition; empty draws nothing"),
            )
            .field(Field::number("startScale").default(1.0).min(0.01))
            .field(Field::number("endScale").default(1.2).min(0.01))
            .field(
                Field::number("panX")
                    .default(0.0)
                    .describe("Horizontal drift as a fraction of the canvas width"),
            )
            .field(Field::number("panY").default(0.0))
            .field(ease_field("ease", "in_out_quad"))
            .field(Field::integer("fadeInFrames").default(0).min(0.0))
            .field(Field::integer("fadeOutFrames").default(0).min(0.0))
    }

    fn render(&self, ctx: &RenderCtx, c: &KenBurnsConfig) -> Scene {
        let mut scene = Scene::new();
        if c.src.trim().is_empty() {
            return scene;
        }
        let mut inner = Scene::new();
        inner.push(DrawNode::Image {
            src: c.src.clone(),
            dest: ctx.canvas.rect(),
            fit: Fit::Cover,
        });
        scene.group(
            c.transform(ctx),
            window_opacity(ctx, c.fade_in_frames, c.fade_out_frames),
            inner,
        );
        scene
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/media.rs"]
mod tests;

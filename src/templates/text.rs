use crate::animation::ease::Ease;
use crate::animation::interpolate::{InterpolateOpts, interpolate, interpolate_clamped};
use crate::animation::spring::{SpringConfig, spring, spring_between};
use crate::foundation::core::{Affine, Point, Vec2};
use crate::registry::animation::{Animation, RenderCtx};
use crate::scene::color::ColorDef;
use crate::scene::model::{Scene, TextAlign};
use crate::schema::field::{Field, Schema};
use crate::templates::{ease_field, label, window_opacity};
use serde::Deserialize;

fn text_fields(schema: Schema, text: &str, font_size: f64) -> Schema {
    schema
        .field(Field::string("text").default(text))
        .field(Field::number("fontSize").default(font_size).min(1.0))
        .field(Field::color("color").default("#ffffff"))
}

/// Text that fades in and out at the edges of its item window.
pub(crate) struct Fade;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FadeConfig {
    text: String,
    font_size: f64,
    color: ColorDef,
    fade_in_frames: u64,
    fade_out_frames: u64,
}

impl Animation for Fade {
    type Config = FadeConfig;

    fn schema(&self) -> Schema {
        text_fields(Schema::new(), "", 40.0)
            .field(Field::integer("fadeInFrames").default(10).min(0.0))
            .field(Field::integer("fadeOutFrames").default(10).min(0.0))
    }

    fn render(&self, ctx: &RenderCtx, c: &FadeConfig) -> Scene {
        let mut scene = Scene::new();
        if c.text.is_empty() {
            return scene;
        }
        let mut inner = Scene::new();
        inner.text(label(
            c.text.as_str(),
            ctx.canvas.center(),
            c.font_size,
            c.color,
            TextAlign::Center,
        ));
        let opacity = window_opacity(ctx, c.fade_in_frames, c.fade_out_frames);
        scene.group(Affine::IDENTITY, opacity, inner);
        scene
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Text entering from an edge, driven by a spring.
pub(crate) struct SlideIn;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SlideInConfig {
    text: String,
    font_size: f64,
    color: ColorDef,
    edge: Edge,
    damping: f64,
    stiffness: f64,
    fade_out_frames: u64,
}

impl Animation for SlideIn {
    type Config = SlideInConfig;

    fn schema(&self) -> Schema {
        text_fields(Schema::new(), "Slide in", 64.0)
            .field(Field::enumeration("edge", &["left", "right", "top", "bottom"]).default("left"))
            .field(Field::number("damping").default(14.0).min(0.0))
            .field(Field::number("stiffness").default(120.0).min(1.0))
            .field(Field::integer("fadeOutFrames").default(0).min(0.0))
    }

    fn render(&self, ctx: &RenderCtx, c: &SlideInConfig) -> Scene {
        let cfg = SpringConfig {
            damping: c.damping,
            stiffness: c.stiffness,
            ..SpringConfig::default()
        };
        let remaining = 1.0 - spring(ctx.frame, ctx.fps, cfg);
        let w = f64::from(ctx.canvas.width);
        let h = f64::from(ctx.canvas.height);
        let offset = match c.edge {
            Edge::Left => Vec2::new(-w * remaining, 0.0),
            Edge::Right => Vec2::new(w * remaining, 0.0),
            Edge::Top => Vec2::new(0.0, -h * remaining),
            Edge::Bottom => Vec2::new(0.0, h * remaining),
        };

        let mut inner = Scene::new();
        inner.text(label(
            c.text.as_str(),
            ctx.canvas.center(),
            c.font_size,
            c.color,
            TextAlign::Center,
        ));
        let mut scene = Scene::new();
        scene.group(
            Affine::translate(offset),
            window_opacity(ctx, 0, c.fade_out_frames),
            inner,
        );
        scene
    }
}

/// Text that drops from above and settles with an elastic overshoot.
pub(crate) struct BounceText;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BounceTextConfig {
    text: String,
    font_size: f64,
    color: ColorDef,
    delay_frames: u64,
    bounciness: f64,
}

impl Animation for BounceText {
    type Config = BounceTextConfig;

    fn schema(&self) -> Schema {
        text_fields(Schema::new(), "Bounce!", 96.0)
            .field(Field::integer("delayFrames").default(0).min(0.0))
            .field(
                Field::number("bounciness")
                    .default(0.5)
                    .min(0.0)
                    .max(1.0)
                    .describe("0 settles without overshoot, 1 keeps bouncing"),
            )
    }

    fn render(&self, ctx: &RenderCtx, c: &BounceTextConfig) -> Scene {
        let mut scene = Scene::new();
        if ctx.frame < c.delay_frames {
            return scene;
        }
        // Damping from critical (20 at stiffness 100) down to 2.
        let cfg = SpringConfig {
            damping: 20.0 - 18.0 * c.bounciness.clamp(0.0, 1.0),
            stiffness: 100.0,
            ..SpringConfig::default()
        };
        let center = ctx.canvas.center();
        let y = spring_between(
            ctx.frame,
            ctx.fps,
            cfg,
            -c.font_size,
            center.y,
            c.delay_frames,
        );
        let squash = spring_between(ctx.frame, ctx.fps, cfg, 0.6, 1.0, c.delay_frames).max(0.1);

        let mut inner = Scene::new();
        inner.text(label(
            c.text.as_str(),
            Point::ZERO,
            c.font_size,
            c.color,
            TextAlign::Center,
        ));
        let transform = Affine::translate((center.x, y)) * Affine::scale_non_uniform(1.0, squash);
        scene.group(transform, 1.0, inner);
        scene
    }
}

/// Text typed out character by character.
pub(crate) struct Typewriter;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TypewriterConfig {
    text: String,
    font_size: f64,
    color: ColorDef,
    chars_per_second: f64,
    cursor: bool,
    x: f64,
    y: f64,
}

impl TypewriterConfig {
    fn visible_chars(&self, ctx: &RenderCtx) -> usize {
        let n = (ctx.secs() * self.chars_per_second.max(0.0)).floor();
        (n as usize).min(self.text.chars().count())
    }
}

impl Animation for Typewriter {
    type Config = TypewriterConfig;

    fn schema(&self) -> Schema {
        text_fields(Schema::new(), "Hello, world", 48.0)
            .field(Field::number("charsPerSecond").default(20.0).min(0.0))
            .field(Field::bool("cursor").default(true))
            .field(Field::number("x").default(0.1))
            .field(Field::number("y").default(0.5))
    }

    fn render(&self, ctx: &RenderCtx, c: &TypewriterConfig) -> Scene {
        let shown = c.visible_chars(ctx);
        let mut line: String = c.text.chars().take(shown).collect();
        // Two blinks per second.
        let cursor_on = (ctx.secs() * 2.0).floor() as u64 % 2 == 0;
        if c.cursor && (cursor_on || shown < c.text.chars().count()) {
            line.push('|');
        }

        let mut scene = Scene::new();
        if line.is_empty() {
            return scene;
        }
        let at = Point::new(
            c.x * f64::from(ctx.canvas.width),
            c.y * f64::from(ctx.canvas.height),
        );
        scene.text(label(line, at, c.font_size, c.color, TextAlign::Start));
        scene
    }
}

/// A number counting between two values over the item window.
pub(crate) struct Counter;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CounterConfig {
    start_value: f64,
    end_value: f64,
    decimals: u32,
    prefix: String,
    suffix: String,
    font_size: f64,
    color: ColorDef,
    ease: Ease,
    #[serde(default)]
    count_frames: Option<u64>,
}

impl CounterConfig {
    fn value_at(&self, ctx: &RenderCtx) -> f64 {
        let t = match self.count_frames {
            Some(n) if n > 0 => interpolate_clamped(ctx.frame as f64, [0.0, n as f64], [0.0, 1.0]),
            _ => ctx.progress(),
        };
        interpolate(
            t,
            [0.0, 1.0],
            [self.start_value, self.end_value],
            InterpolateOpts::eased(self.ease),
        )
    }

    fn format(&self, value: f64) -> String {
        let decimals = self.decimals.min(6) as usize;
        format!("{}{value:.decimals$}{}", self.prefix, self.suffix)
    }
}

impl Animation for Counter {
    type Config = CounterConfig;

    fn schema(&self) -> Schema {
        Schema::new()
            .field(Field::number("startValue").default(0.0))
            .field(Field::number("endValue").default(100.0))
            .field(Field::integer("decimals").default(0).min(0.0).max(6.0))
            .field(Field::string("prefix").default(""))
            .field(Field::string("suffix").default(""))
            .field(Field::number("fontSize").default(120.0).min(1.0))
            .field(Field::color("color").default("#ffffff"))
            .field(ease_field("ease", "out_cubic"))
            .field(
                Field::integer("countFrames")
                    .min(1.0)
                    .optional()
                    .describe("Frames to reach the target; the whole window when absent"),
            )
    }

    fn render(&self, ctx: &RenderCtx, c: &CounterConfig) -> Scene {
        let mut scene = Scene::new();
        scene.text(label(
            c.format(c.value_at(ctx)),
            ctx.canvas.center(),
            c.font_size,
            c.color,
            TextAlign::Center,
        ));
        scene
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/text.rs"]
mod tests;

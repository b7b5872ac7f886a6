use crate::animation::ease::Ease;
use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::foundation::core::{Affine, Point, Rect, Vec2};
use crate::registry::animation::{Animation, RenderCtx};
use crate::scene::color::ColorDef;
use crate::scene::model::{Scene, TextAlign};
use crate::schema::field::{Field, Schema};
use crate::templates::{ease_field, label, window_opacity};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RevealMode {
    /// Coverage grows from nothing to the full canvas.
    In,
    /// Coverage shrinks from the full canvas to nothing.
    Out,
}

fn coverage(ctx: &RenderCtx, ease: Ease, mode: RevealMode) -> f64 {
    let t = ease.apply(ctx.progress());
    match mode {
        RevealMode::In => t,
        RevealMode::Out => 1.0 - t,
    }
}

/// Name/title bar that slides in from the left and slides back out at the end.
pub(crate) struct LowerThird;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LowerThirdConfig {
    title: String,
    subtitle: String,
    title_size: f64,
    subtitle_size: f64,
    text_color: ColorDef,
    bar_color: ColorDef,
    accent_color: ColorDef,
    transition_frames: u64,
}

impl Animation for LowerThird {
    type Config = LowerThirdConfig;

    fn schema(&self) -> Schema {
        Schema::new()
            .field(Field::string("title").default("Jane Doe"))
            .field(Field::string("subtitle").default("Founder"))
            .field(Field::number("titleSize").default(48.0).min(1.0))
            .field(Field::number("subtitleSize").default(28.0).min(1.0))
            .field(Field::color("textColor").default("#ffffff"))
            .field(Field::color("barColor").default("rgba(0, 0, 0, 0.75)"))
            .field(Field::color("accentColor").default("#3b82f6"))
            .field(Field::integer("transitionFrames").default(12).min(1.0))
    }

    fn render(&self, ctx: &RenderCtx, c: &LowerThirdConfig) -> Scene {
        let w = f64::from(ctx.canvas.width);
        let h = f64::from(ctx.canvas.height);
        let pad = c.title_size * 0.4;
        let has_sub = !c.subtitle.is_empty();
        let bar_h = c.title_size + pad * 2.0 + if has_sub { c.subtitle_size + pad } else { 0.0 };
        let bar = Rect::new(0.05 * w, 0.85 * h - bar_h, 0.55 * w, 0.85 * h);
        let accent = Rect::new(bar.x0, bar.y0, bar.x0 + pad * 0.5, bar.y1);

        let n = c.transition_frames.max(1) as f64;
        let slide_in = Ease::OutCubic.apply(ctx.frame as f64 / n);
        let slide_out = Ease::InCubic.apply(1.0 - ctx.frames_left() as f64 / n);
        let shift = (1.0 - slide_in + slide_out) * -(bar.x1 + 1.0);

        let mut inner = Scene::new();
        inner.fill_rect(bar, c.bar_color.to_rgba8_premul());
        inner.fill_rect(accent, c.accent_color.to_rgba8_premul());
        let text_x = accent.x1 + pad;
        inner.text(label(
            c.title.as_str(),
            Point::new(text_x, bar.y0 + pad + c.title_size / 2.0),
            c.title_size,
            c.text_color,
            TextAlign::Start,
        ));
        if has_sub {
            inner.text(label(
                c.subtitle.as_str(),
                Point::new(text_x, bar.y1 - pad - c.subtitle_size / 2.0),
                c.subtitle_size,
                c.text_color.with_opacity(0.8),
                TextAlign::Start,
            ));
        }

        let mut scene = Scene::new();
        scene.group(Affine::translate((shift, 0.0)), 1.0, inner);
        scene
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum WipeDir {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// A solid panel sweeping across the canvas.
pub(crate) struct Wipe;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WipeConfig {
    color: ColorDef,
    direction: WipeDir,
    mode: RevealMode,
    ease: Ease,
}

impl WipeConfig {
    fn covered(&self, ctx: &RenderCtx) -> Rect {
        let full = ctx.canvas.rect();
        let t = coverage(ctx, self.ease, self.mode);
        let (w, h) = (full.width(), full.height());
        match self.direction {
            WipeDir::LeftToRight => Rect::new(0.0, 0.0, w * t, h),
            WipeDir::RightToLeft => Rect::new(w * (1.0 - t), 0.0, w, h),
            WipeDir::TopToBottom => Rect::new(0.0, 0.0, w, h * t),
            WipeDir::BottomToTop => Rect::new(0.0, h * (1.0 - t), w, h),
        }
    }
}

impl Animation for Wipe {
    type Config = WipeConfig;

    fn schema(&self) -> Schema {
        Schema::new()
            .field(Field::color("color").default("#000000"))
            .field(
                Field::enumeration(
                    "direction",
                    &["left_to_right", "right_to_left", "top_to_bottom", "bottom_to_top"],
                )
                .default("left_to_right"),
            )
            .field(Field::enumeration("mode", &["in", "out"]).default("in"))
            .field(ease_field("ease", "in_out_cubic"))
    }

    fn render(&self, ctx: &RenderCtx, c: &WipeConfig) -> Scene {
        let mut scene = Scene::new();
        let r = c.covered(ctx);
        if r.width() > 0.0 && r.height() > 0.0 {
            scene.fill_rect(r, c.color.to_rgba8_premul());
        }
        scene
    }
}

/// A circle of color growing from (or shrinking to) an anchor point.
pub(crate) struct CircleReveal;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CircleRevealConfig {
    color: ColorDef,
    x: f64,
    y: f64,
    mode: RevealMode,
    ease: Ease,
    fade_out_frames: u64,
}

impl CircleRevealConfig {
    fn center(&self, ctx: &RenderCtx) -> Point {
        Point::new(
            self.x * f64::from(ctx.canvas.width),
            self.y * f64::from(ctx.canvas.height),
        )
    }

    /// Radius that covers the whole canvas from the anchor.
    fn full_radius(&self, ctx: &RenderCtx) -> f64 {
        let c = self.center(ctx);
        let r = ctx.canvas.rect();
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x0, r.y1),
            Point::new(r.x1, r.y1),
        ]
        .into_iter()
        .map(|p| (p - c).hypot())
        .fold(0.0, f64::max)
    }
}

impl Animation for CircleReveal {
    type Config = CircleRevealConfig;

    fn schema(&self) -> Schema {
        Schema::new()
            .field(Field::color("color").default("#ffffff"))
            .field(Field::number("x").default(0.5))
            .field(Field::number("y").default(0.5))
            .field(Field::enumeration("mode", &["in", "out"]).default("in"))
            .field(ease_field("ease", "out_cubic"))
            .field(Field::integer("fadeOutFrames").default(0).min(0.0))
    }

    fn render(&self, ctx: &RenderCtx, c: &CircleRevealConfig) -> Scene {
        let radius = interpolate(
            coverage(ctx, Ease::Linear, c.mode),
            [0.0, 1.0],
            [0.0, c.full_radius(ctx)],
            InterpolateOpts::eased(c.ease),
        );
        let mut scene = Scene::new();
        if radius <= 0.0 {
            return scene;
        }
        let mut inner = Scene::new();
        inner.fill_ellipse(c.center(ctx), Vec2::new(radius, radius), c.color.to_rgba8_premul());
        scene.group(Affine::IDENTITY, window_opacity(ctx, 0, c.fade_out_frames), inner);
        scene
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/reveal.rs"]
mod tests;

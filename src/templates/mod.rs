//! Built-in animation templates.
//!
//! Every template accepts `{}` as a complete configuration: each field carries a default.

use crate::animation::ease::Ease;
use crate::animation::interpolate::interpolate_clamped;
use crate::foundation::core::Point;
use crate::registry::animation::RenderCtx;
use crate::registry::store::{AnimationRegistry, RegistryEntry};
use crate::scene::color::ColorDef;
use crate::scene::model::{TextAlign, TextRun};
use crate::schema::field::Field;

pub(crate) mod chart;
pub(crate) mod media;
pub(crate) mod reveal;
pub(crate) mod text;

/// Category of title and caption templates.
pub const CATEGORY_TEXT: &str = "text";
/// Category of full-frame transitions.
pub const CATEGORY_TRANSITION: &str = "transition";
/// Category of data visualizations.
pub const CATEGORY_DATA: &str = "data";
/// Category of image treatments.
pub const CATEGORY_MEDIA: &str = "media";

/// Register every built-in template into `registry`.
///
/// Existing entries with the same ids are replaced.
pub fn register_builtin(registry: &mut AnimationRegistry) {
    let entries = [
        RegistryEntry::new("Fade", "Fade", text::Fade)
            .category(CATEGORY_TEXT)
            .description("Text that fades in, holds, and fades out"),
        RegistryEntry::new("SlideIn", "Slide In", text::SlideIn)
            .category(CATEGORY_TEXT)
            .description("Text sliding in from a canvas edge on a spring"),
        RegistryEntry::new("BounceText", "Bounce Text", text::BounceText)
            .category(CATEGORY_TEXT)
            .description("Text dropping in with an elastic bounce"),
        RegistryEntry::new("Typewriter", "Typewriter", text::Typewriter)
            .category(CATEGORY_TEXT)
            .description("Text revealed character by character with a blinking cursor"),
        RegistryEntry::new("Counter", "Counter", text::Counter)
            .category(CATEGORY_DATA)
            .description("Number counting from one value to another"),
        RegistryEntry::new("LowerThird", "Lower Third", reveal::LowerThird)
            .category(CATEGORY_TEXT)
            .description("Name and title bar sliding in near the bottom edge"),
        RegistryEntry::new("Wipe", "Wipe", reveal::Wipe)
            .category(CATEGORY_TRANSITION)
            .description("Solid panel sweeping across the canvas"),
        RegistryEntry::new("CircleReveal", "Circle Reveal", reveal::CircleReveal)
            .category(CATEGORY_TRANSITION)
            .description("Growing or shrinking circle of color"),
        RegistryEntry::new("BarChart", "Bar Chart", chart::BarChart)
            .category(CATEGORY_DATA)
            .description("Vertical bars growing to their values one after another"),
        RegistryEntry::new("KenBurns", "Ken Burns", media::KenBurns)
            .category(CATEGORY_MEDIA)
            .description("Slow zoom and pan across a still image"),
    ];
    for entry in entries {
        registry.register(entry);
    }
}

fn ease_field(name: &str, default: &str) -> Field {
    Field::enumeration(name, &Ease::NAMES).default(default)
}

/// Opacity ramp: 0 to 1 over the first `fade_in` frames, 1 to 0 over the last `fade_out`.
fn window_opacity(ctx: &RenderCtx, fade_in: u64, fade_out: u64) -> f64 {
    let f = ctx.frame as f64;
    let in_o = if fade_in == 0 {
        1.0
    } else {
        interpolate_clamped(f, [0.0, fade_in as f64], [0.0, 1.0])
    };
    let out_o = if fade_out == 0 {
        1.0
    } else {
        interpolate_clamped(ctx.frames_left() as f64, [0.0, fade_out as f64], [0.0, 1.0])
    };
    in_o.min(out_o)
}

/// Text run centered vertically on `at`.
fn label(
    text: impl Into<String>,
    at: Point,
    size: f64,
    color: ColorDef,
    align: TextAlign,
) -> TextRun {
    TextRun {
        text: text.into(),
        origin: Point::new(at.x, at.y - size / 2.0),
        font_size: size,
        color: color.to_rgba8_premul(),
        align,
        max_width: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/mod.rs"]
mod tests;

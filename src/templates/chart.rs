use crate::animation::ease::Ease;
use crate::foundation::core::{Point, Rect};
use crate::registry::animation::{Animation, RenderCtx};
use crate::scene::color::ColorDef;
use crate::scene::model::{Scene, TextAlign};
use crate::schema::field::{Field, Schema};
use crate::templates::{ease_field, label};
use serde::Deserialize;
use serde_json::json;

/// Vertical bars that grow to their values in sequence.
pub(crate) struct BarChart;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Bar {
    label: String,
    value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BarChartConfig {
    bars: Vec<Bar>,
    bar_color: ColorDef,
    label_color: ColorDef,
    label_size: f64,
    #[serde(default)]
    max_value: Option<f64>,
    grow_frames: u64,
    stagger_frames: u64,
    ease: Ease,
    show_values: bool,
}

impl BarChartConfig {
    fn scale_max(&self) -> f64 {
        let data_max = self.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        match self.max_value {
            Some(m) if m > 0.0 => m,
            _ if data_max > 0.0 => data_max,
            _ => 1.0,
        }
    }

    /// Growth of bar `i` in `[0, 1]` at `frame`.
    fn growth(&self, i: usize, frame: u64) -> f64 {
        let start = self.stagger_frames.saturating_mul(i as u64);
        if frame < start {
            return 0.0;
        }
        let t = (frame - start) as f64 / self.grow_frames.max(1) as f64;
        self.ease.apply(t)
    }
}

impl Animation for BarChart {
    type Config = BarChartConfig;

    fn schema(&self) -> Schema {
        Schema::new()
            .field(
                Field::array_of(
                    "bars",
                    Schema::new()
                        .field(Field::string("label").default(""))
                        .field(Field::number("value").min(0.0)),
                )
                .default(json!([
                    { "label": "Q1", "value": 12 },
                    { "label": "Q2", "value": 19 },
                    { "label": "Q3", "value": 27 },
                    { "label": "Q4", "value": 34 }
                ])),
            )
            .field(Field::color("barColor").default("#3b82f6"))
            .field(Field::color("labelColor").default("#ffffff"))
            .field(Field::number("labelSize").default(28.0).min(1.0))
            .field(
                Field::number("maxValue")
                    .min(0.0)
                    .optional()
                    .describe("Value mapped to full height; the largest bar when absent"),
            )
            .field(Field::integer("growFrames").default(20).min(1.0))
            .field(Field::integer("staggerFrames").default(4).min(0.0))
            .field(ease_field("ease", "out_cubic"))
            .field(Field::bool("showValues").default(true))
    }

    fn render(&self, ctx: &RenderCtx, c: &BarChartConfig) -> Scene {
        let mut scene = Scene::new();
        if c.bars.is_empty() {
            return scene;
        }
        let w = f64::from(ctx.canvas.width);
        let h = f64::from(ctx.canvas.height);
        let plot = Rect::new(0.1 * w, 0.15 * h, 0.9 * w, 0.8 * h);
        let slot = plot.width() / c.bars.len() as f64;
        let bar_w = slot * 0.6;
        let max = c.scale_max();

        for (i, bar) in c.bars.iter().enumerate() {
            let g = c.growth(i, ctx.frame);
            let full = (bar.value / max).clamp(0.0, 1.0) * plot.height();
            let top = plot.y1 - full * g;
            let cx = plot.x0 + slot * (i as f64 + 0.5);
            if g > 0.0 && full > 0.0 {
                scene.fill_rounded_rect(
                    Rect::new(cx - bar_w / 2.0, top, cx + bar_w / 2.0, plot.y1),
                    bar_w * 0.08,
                    c.bar_color.to_rgba8_premul(),
                );
            }
            if !bar.label.is_empty() {
                scene.text(label(
                    bar.label.as_str(),
                    Point::new(cx, plot.y1 + c.label_size),
                    c.label_size,
                    c.label_color,
                    TextAlign::Center,
                ));
            }
            if c.show_values && g > 0.0 {
                scene.text(label(
                    format!("{}", (bar.value * g).round()),
                    Point::new(cx, top - c.label_size),
                    c.label_size,
                    c.label_color.with_opacity(g),
                    TextAlign::Center,
                ));
            }
        }
        scene
    }
}

#[cfg(test)]
#[path = "../../tests/unit/templates/chart.rs"]
mod tests;

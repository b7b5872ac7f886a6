use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::registry::animation::RenderCtx;
use crate::scene::color::ColorDef;
use crate::scene::model::{DrawNode, Fit, Scene, TextAlign, TextRun};
use crate::schema::field::{Field, Schema};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Built-in item kinds that never go through the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Full-canvas color fill.
    Solid,
    /// Single text block.
    Text,
    /// Video clip with its audio track.
    Video,
    /// Audio-only clip.
    Voice,
}

impl PrimitiveKind {
    /// Every primitive kind.
    pub const ALL: [PrimitiveKind; 4] = [Self::Solid, Self::Text, Self::Video, Self::Voice];

    /// Match an item `type` tag.
    pub fn from_type(tag: &str) -> Option<Self> {
        match tag {
            "solid" => Some(Self::Solid),
            "text" => Some(Self::Text),
            "video" => Some(Self::Video),
            "voice" => Some(Self::Voice),
            _ => None,
        }
    }

    /// The `type` tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Text => "text",
            Self::Video => "video",
            Self::Voice => "voice",
        }
    }

    /// Configuration schema of the kind.
    pub fn schema(self) -> Schema {
        match self {
            Self::Solid => Schema::new()
                .field(Field::color("color").default("#000000"))
                .field(Field::number("opacity").default(1.0).min(0.0).max(1.0)),
            Self::Text => Schema::new()
                .field(Field::string("text").describe("Text content"))
                .field(Field::number("fontSize").default(64.0).min(1.0))
                .field(Field::color("color").default("#ffffff"))
                .field(Field::enumeration("align", &["start", "center", "end"]).default("center"))
                .field(
                    Field::number("x")
                        .default(0.5)
                        .describe("Anchor x as a fraction of the canvas width"),
                )
                .field(
                    Field::number("y")
                        .default(0.5)
                        .describe("Anchor y as a fraction of the canvas height"),
                )
                .field(Field::number("maxWidth").min(1.0).optional()),
            Self::Video => Schema::new()
                .field(Field::string("src"))
                .field(Field::number("volume").default(1.0).min(0.0))
                .field(Field::enumeration("fit", &["cover", "contain", "fill"]).default("cover"))
                .field(
                    Field::number("startFrom")
                        .default(0.0)
                        .min(0.0)
                        .describe("Offset into the source in seconds"),
                )
                .field(Field::number("playbackRate").default(1.0).min(0.0)),
            Self::Voice => Schema::new()
                .field(Field::string("src"))
                .field(Field::number("volume").default(1.0).min(0.0))
                .field(Field::number("startFrom").default(0.0).min(0.0)),
        }
    }

    /// Bind validated properties.
    pub(crate) fn bind(self, props: Map<String, Value>) -> ReelResult<BoundPrimitive> {
        fn typed<T: for<'de> Deserialize<'de>>(
            kind: PrimitiveKind,
            props: Map<String, Value>,
        ) -> ReelResult<T> {
            serde_json::from_value(Value::Object(props)).map_err(|e| {
                ReelError::serde(format!("failed to bind {} config: {e}", kind.tag()))
            })
        }
        Ok(match self {
            Self::Solid => BoundPrimitive::Solid(typed(self, props)?),
            Self::Text => BoundPrimitive::Text(typed(self, props)?),
            Self::Video => BoundPrimitive::Video(typed(self, props)?),
            Self::Voice => BoundPrimitive::Voice(typed(self, props)?),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SolidConfig {
    color: ColorDef,
    opacity: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TextConfig {
    text: String,
    font_size: f64,
    color: ColorDef,
    align: TextAlign,
    x: f64,
    y: f64,
    #[serde(default)]
    max_width: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoConfig {
    src: String,
    volume: f64,
    fit: Fit,
    start_from: f64,
    playback_rate: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceConfig {
    src: String,
    volume: f64,
    start_from: f64,
}

/// Audio contributed by a primitive while its item is active.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AudioSource {
    pub(crate) src: String,
    pub(crate) volume: f64,
    pub(crate) start_from_secs: f64,
    pub(crate) playback_rate: f64,
}

impl AudioSource {
    /// Position in the source media at an item-local time.
    pub(crate) fn source_time_secs(&self, local_secs: f64) -> f64 {
        (self.start_from_secs + local_secs * self.playback_rate).max(0.0)
    }
}

/// A primitive with its configuration bound.
#[derive(Clone, Debug)]
pub(crate) enum BoundPrimitive {
    Solid(SolidConfig),
    Text(TextConfig),
    Video(VideoConfig),
    Voice(VoiceConfig),
}

impl BoundPrimitive {
    pub(crate) fn render(&self, ctx: &RenderCtx) -> Scene {
        let mut scene = Scene::new();
        match self {
            Self::Solid(c) => {
                let color = c.color.with_opacity(c.opacity).to_rgba8_premul();
                scene.fill_rect(ctx.canvas.rect(), color);
            }
            Self::Text(c) => {
                let w = f64::from(ctx.canvas.width);
                let h = f64::from(ctx.canvas.height);
                scene.text(TextRun {
                    text: c.text.clone(),
                    origin: Point::new(c.x * w, c.y * h) - Vec2::new(0.0, c.font_size / 2.0),
                    font_size: c.font_size,
                    color: c.color.to_rgba8_premul(),
                    align: c.align,
                    max_width: c.max_width,
                });
            }
            Self::Video(c) => {
                scene.push(DrawNode::Video {
                    src: c.src.clone(),
                    dest: ctx.canvas.rect(),
                    fit: c.fit,
                    source_time_secs: (c.start_from + ctx.secs() * c.playback_rate).max(0.0),
                });
            }
            Self::Voice(_) => {}
        }
        scene
    }

    /// Audio contribution, `None` for silent kinds or zero volume.
    pub(crate) fn audio(&self) -> Option<AudioSource> {
        let source = match self {
            Self::Video(c) => AudioSource {
                src: c.src.clone(),
                volume: c.volume,
                start_from_secs: c.start_from,
                playback_rate: c.playback_rate,
            },
            Self::Voice(c) => AudioSource {
                src: c.src.clone(),
                volume: c.volume,
                start_from_secs: c.start_from,
                playback_rate: 1.0,
            },
            Self::Solid(_) | Self::Text(_) => return None,
        };
        (source.volume > 0.0).then_some(source)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/primitive.rs"]
mod tests;

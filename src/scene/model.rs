use crate::foundation::core::{Affine, FrameIndex, Point, Rect, Rgba8Premul, Vec2};
use serde::Serialize;

/// Fill geometry understood by every backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle with optional corner radius.
    Rect {
        /// Bounds in canvas pixels.
        rect: Rect,
        /// Corner radius in pixels (0 = sharp).
        radius: f64,
    },
    /// Axis-aligned ellipse.
    Ellipse {
        /// Center point.
        center: Point,
        /// Horizontal/vertical radii.
        radii: Vec2,
    },
    /// Pie slice (circle segment) starting at `start_angle` radians, sweeping clockwise.
    Pie {
        /// Circle center.
        center: Point,
        /// Outer radius.
        radius: f64,
        /// Start angle in radians (0 = +x axis).
        start_angle: f64,
        /// Sweep in radians.
        sweep: f64,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices in order.
        points: Vec<Point>,
    },
    /// Arbitrary outline in SVG path syntax (`M0,0 L10,0 ...`).
    Path {
        /// Path data.
        d: String,
    },
}

/// Horizontal anchoring of a text run relative to its origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Origin is the left edge.
    Start,
    /// Origin is the horizontal center.
    #[default]
    Center,
    /// Origin is the right edge.
    End,
}

/// A single line (or wrapped block) of text.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextRun {
    /// Text content.
    pub text: String,
    /// Anchor point; `y` is the top of the first line.
    pub origin: Point,
    /// Font size in pixels.
    pub font_size: f64,
    /// Fill color.
    pub color: Rgba8Premul,
    /// Horizontal anchoring.
    pub align: TextAlign,
    /// Wrap width, if any.
    pub max_width: Option<f64>,
}

/// How a media source is fitted into its destination rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fit {
    /// Scale to cover the destination, cropping overflow.
    #[default]
    Cover,
    /// Scale to fit inside the destination, letterboxing.
    Contain,
    /// Stretch to the destination.
    Fill,
}

/// One draw command of a [`Scene`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawNode {
    /// Solid fill of a shape.
    Fill {
        /// Geometry.
        #[serde(flatten)]
        shape: Shape,
        /// Fill color.
        color: Rgba8Premul,
    },
    /// Text run.
    Text(TextRun),
    /// Still image.
    Image {
        /// Asset source (relative path or URL).
        src: String,
        /// Destination rectangle.
        dest: Rect,
        /// Fit mode.
        fit: Fit,
    },
    /// Video frame sampled at `source_time_secs`.
    Video {
        /// Asset source (relative path or URL).
        src: String,
        /// Destination rectangle.
        dest: Rect,
        /// Fit mode.
        fit: Fit,
        /// Time in the source media.
        source_time_secs: f64,
    },
    /// Children drawn with an extra transform and opacity.
    Group {
        /// Transform applied on top of the parent transform.
        transform: Affine,
        /// Opacity multiplier in `[0, 1]`.
        opacity: f64,
        /// Child nodes.
        children: Vec<DrawNode>,
    },
}

/// Ordered display list produced by a renderer for one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    /// Draw commands, painted in order.
    pub nodes: Vec<DrawNode>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `true` when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a raw node.
    pub fn push(&mut self, node: DrawNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8Premul) -> &mut Self {
        self.fill_rounded_rect(rect, 0.0, color)
    }

    /// Fill a rounded rectangle.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Rgba8Premul) -> &mut Self {
        self.push(DrawNode::Fill {
            shape: Shape::Rect {
                rect,
                radius: radius.max(0.0),
            },
            color,
        })
    }

    /// Fill an ellipse.
    pub fn fill_ellipse(&mut self, center: Point, radii: Vec2, color: Rgba8Premul) -> &mut Self {
        self.push(DrawNode::Fill {
            shape: Shape::Ellipse { center, radii },
            color,
        })
    }

    /// Add a text run.
    pub fn text(&mut self, run: TextRun) -> &mut Self {
        self.push(DrawNode::Text(run))
    }

    /// Wrap `inner` in a group; skipped entirely when fully transparent or empty.
    pub fn group(&mut self, transform: Affine, opacity: f64, inner: Scene) -> &mut Self {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || inner.is_empty() {
            return self;
        }
        self.push(DrawNode::Group {
            transform,
            opacity,
            children: inner.nodes,
        })
    }
}

/// An audio source audible at a frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioCue {
    /// Timeline item that owns the cue.
    pub item_id: String,
    /// Asset source.
    pub src: String,
    /// Linear volume.
    pub volume: f64,
    /// Position in the source media.
    pub source_time_secs: f64,
}

/// The scene contributed by one active item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layer {
    /// Timeline item id.
    pub item_id: String,
    /// Index of the owning track (stacking order).
    pub track_index: usize,
    /// Item-local frame the scene was rendered at.
    pub local_frame: u64,
    /// Rendered display list.
    pub scene: Scene,
}

/// Everything visible and audible at one composition frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluatedFrame {
    /// Absolute frame.
    pub frame: FrameIndex,
    /// Layers bottom to top.
    pub layers: Vec<Layer>,
    /// Active audio cues.
    pub audio: Vec<AudioCue>,
}

impl EvaluatedFrame {
    /// Ids of items that produced a layer, bottom to top.
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.item_id.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

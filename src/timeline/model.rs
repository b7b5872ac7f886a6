use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Frame rate as written in a composition document: `30` or `{"num": 30000, "den": 1001}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FpsDef {
    /// Whole frames per second.
    Whole(u32),
    /// Rational frames per second.
    Rational {
        /// Numerator.
        num: u32,
        /// Denominator.
        den: u32,
    },
}

/// Root of the timeline wire document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDef {
    /// Frame rate, default 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<FpsDef>,
    /// Canvas width, default 1920.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Canvas height, default 1080.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Total length; defaults to the latest item end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_frames: Option<u64>,
    /// Tracks, bottom to top.
    #[serde(default)]
    pub tracks: Vec<TrackDef>,
}

/// One track of time-scoped items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackDef {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Items in paint order.
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

/// Item keys owned by the timeline. An animation schema may not declare them as config fields.
pub const RESERVED_ITEM_KEYS: [&str; 4] = ["id", "type", "from", "durationInFrames"];

/// One timeline item. Every key besides the four window/identity keys is configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDef {
    /// Item id, unique by convention.
    pub id: String,
    /// Primitive kind or registered animation id.
    #[serde(rename = "type")]
    pub kind: String,
    /// First frame of the window.
    pub from: i64,
    /// Window length; `<= 0` is never active.
    pub duration_in_frames: i64,
    /// Remaining keys, validated against the resolved schema.
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl ItemDef {
    /// Exclusive end of the window, `None` when the item can never be active.
    pub fn end(&self) -> Option<u64> {
        if self.from < 0 || self.duration_in_frames <= 0 {
            return None;
        }
        Some((self.from as u64).saturating_add(self.duration_in_frames as u64))
    }
}

use crate::foundation::error::{ReelError, ReelResult};
use std::fmt;

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute frame on the composition timeline, starting at 0.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames `[start, end)` of the composition timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame.
    pub start: FrameIndex,
    /// One past the last frame.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Range from `start` up to (not including) `end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> ReelResult<Self> {
        if start > end {
            return Err(ReelError::validation(format!(
                "frame range {}..{} ends before it starts",
                start.0, end.0
            )));
        }
        Ok(Self { start, end })
    }

    /// Frame count.
    pub fn len_frames(self) -> u64 {
        self.end.0 - self.start.0
    }

    /// `true` for a zero-length range.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// `true` when `f` falls inside the range.
    pub fn contains(self, f: FrameIndex) -> bool {
        (self.start..self.end).contains(&f)
    }

    /// Consecutive sub-ranges of at most `size` frames covering `self` in order.
    pub fn chunks(self, size: u64) -> impl Iterator<Item = FrameRange> {
        let size = size.max(1);
        let end = self.end.0;
        (self.start.0..end).step_by(size as usize).map(move |s| FrameRange {
            start: FrameIndex(s),
            end: FrameIndex(s.saturating_add(size).min(end)),
        })
    }
}

/// Rational frame rate `num / den` frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Frames.
    pub num: u32,
    /// Seconds; never zero.
    pub den: u32,
}

impl Fps {
    /// Frame rate with both parts non-zero.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if num == 0 || den == 0 {
            return Err(ReelError::validation(format!(
                "frame rate {num}/{den} must have a non-zero numerator and denominator"
            )));
        }
        Ok(Self { num, den })
    }

    /// Timestamp of `frames` frames in seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        frames as f64 * f64::from(self.den) / f64::from(self.num)
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Output size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The whole canvas as a rectangle at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Middle of the canvas.
    pub fn center(self) -> Point {
        self.rect().center()
    }

    /// Size of one RGBA8 frame in bytes.
    pub fn frame_bytes(self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * 4
    }
}

/// RGBA8 color with the color channels already multiplied by alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let mul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        Self {
            r: mul(r),
            g: mul(g),
            b: mul(b),
            a,
        }
    }

    /// The same color with every channel scaled by `opacity`, clamped to `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        let scale = |c: u8| (f64::from(c) * o).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: scale(self.a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

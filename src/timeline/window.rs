use crate::foundation::core::FrameIndex;

/// Where the playhead sits relative to an item window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemPhase {
    /// `frame < from`.
    NotYetActive,
    /// `from <= frame < from + duration`.
    Active,
    /// `frame >= from + duration`.
    Finished,
}

/// Half-open activation window of a timeline item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemWindow {
    /// First active frame.
    pub from: u64,
    /// Number of active frames; zero never activates.
    pub duration_frames: u64,
}

impl ItemWindow {
    /// Window from the signed document values; non-positive durations collapse to zero.
    pub fn new(from: u64, duration_in_frames: i64) -> Self {
        Self {
            from,
            duration_frames: u64::try_from(duration_in_frames).unwrap_or(0),
        }
    }

    /// Exclusive end frame.
    pub fn end(self) -> u64 {
        self.from.saturating_add(self.duration_frames)
    }

    /// Phase at an absolute frame.
    pub fn phase(self, frame: FrameIndex) -> ItemPhase {
        if frame.0 < self.from {
            ItemPhase::NotYetActive
        } else if frame.0 < self.end() {
            ItemPhase::Active
        } else {
            ItemPhase::Finished
        }
    }

    /// Item-relative frame while active.
    pub fn local_frame(self, frame: FrameIndex) -> Option<u64> {
        match self.phase(frame) {
            ItemPhase::Active => Some(frame.0 - self.from),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/window.rs"]
mod tests;

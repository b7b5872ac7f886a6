use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;
use crate::scene::model::EvaluatedFrame;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Premultiplied pixel at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Backend contract for turning an evaluated frame into pixels.
pub(crate) trait RenderBackend {
    fn render_frame(&mut self, canvas: Canvas, frame: &EvaluatedFrame) -> ReelResult<FrameRGBA>;
}

use crate::error::AxisResult;
use crate::render::{FrameCounts, RenderFrame, Renderer};

/// Headless renderer: validates each frame and remembers what it held.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_counts: FrameCounts,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> AxisResult<()> {
        frame.validate()?;
        self.last_counts = frame.counts();
        self.frames_rendered += 1;
        Ok(())
    }
}

mod frame;
mod null_renderer;
mod primitives;

pub use frame::{FrameCounts, FrameLine, FrameText, PrimitiveRole, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, TextPrimitive};

use crate::error::AxisResult;

/// Rendering backend. Frames arrive fully materialized, so a backend never
/// sees solver or layout state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> AxisResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderer, PangoLabelMeasurer, draw_frame};

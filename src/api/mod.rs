//! Axis objects and the per-allocation layout pipeline built on top of
//! [`crate::core`].

mod axis;
mod axis_config;
mod axis_layout_driver;
mod axis_measure;
mod axis_options;
mod axis_render_frame_builder;
mod axis_variant;
mod label_measurer;

pub use axis::{Axis, AxisTitle};
pub use axis_config::{AxisConfig, AxisStyle, DEFAULT_MAX_RELAYOUT_PASSES, RelayoutLimits};
pub use axis_layout_driver::{AxisLayoutDriver, LayoutReport, LayoutStatus};
pub use axis_options::AxisOptionValue;
pub use axis_render_frame_builder::{AxisPalette, build_axis_frame};
pub use axis_variant::{AxisVariant, TIME_INCREMENT_BASE};
pub use label_measurer::{
    HeuristicLabelMeasurer, LabelMeasurer, MarkupRun, markup_runs, strip_markup,
};

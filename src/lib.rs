//! chart-axes: axis auto-scaling and tic placement for chart widgets.
//!
//! [`core`] holds the pure pieces: scale solvers, the tic set reconciler,
//! label formatting and value to pixel mapping. [`api`] wires them into an
//! [`Axis`] that [`AxisLayoutDriver`] lays out for a pixel allocation, and
//! [`render`] turns the result into backend-agnostic draw primitives.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{
    Axis, AxisConfig, AxisLayoutDriver, AxisStyle, AxisVariant, LayoutReport, LayoutStatus,
    build_axis_frame,
};
pub use error::{AxisError, AxisResult};

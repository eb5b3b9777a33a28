//! String-keyed option access for hosts that configure axes by name.
//!
//! Only this boundary understands option names; the solver and the layout
//! driver work on the typed [`AxisConfig`] / [`AxisStyle`] fields.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::axis_config::{AxisConfig, AxisStyle};
use crate::error::{AxisError, AxisResult};

/// Untyped option value handed over by a host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisOptionValue {
    Bool(bool),
    UInt(u32),
    Float(f64),
}

impl AxisOptionValue {
    fn kind(self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
        }
    }

    /// Floats accept unsigned integers too.
    fn as_float(self, name: &str) -> AxisResult<f64> {
        match self {
            Self::Float(value) => Ok(value),
            Self::UInt(value) => Ok(f64::from(value)),
            Self::Bool(_) => Err(type_error(name, "float", self)),
        }
    }

    fn as_bool(self, name: &str) -> AxisResult<bool> {
        match self {
            Self::Bool(value) => Ok(value),
            _ => Err(type_error(name, "bool", self)),
        }
    }

    fn as_uint(self, name: &str) -> AxisResult<u32> {
        match self {
            Self::UInt(value) => Ok(value),
            _ => Err(type_error(name, "unsigned integer", self)),
        }
    }
}

impl From<f64> for AxisOptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AxisOptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for AxisOptionValue {
    fn from(value: u32) -> Self {
        Self::UInt(value)
    }
}

fn type_error(name: &str, expected: &'static str, got: AxisOptionValue) -> AxisError {
    warn!(option = name, expected, got = got.kind(), "axis option has the wrong type");
    AxisError::OptionType {
        name: name.to_owned(),
        expected,
    }
}

fn unknown_option(name: &str) -> AxisError {
    warn!(option = name, "unknown axis option");
    AxisError::UnknownOption(name.to_owned())
}

impl AxisConfig {
    /// Option names understood by [`Self::set_option`].
    pub const OPTION_NAMES: [&'static str; 20] = [
        "scale-beg-val",
        "scale-end-val",
        "scale-increment-val",
        "scale-auto-increment",
        "scale-limits-automatic",
        "scale-increment-base",
        "tics-beg-val",
        "tics-end-val",
        "tics-automatic",
        "mtics-beg-val",
        "mtics-end-val",
        "mtics",
        "mtics-automatic",
        "axis-orientation",
        "axis-direction-outside",
        "axis-beg-pix-x",
        "axis-beg-pix-y",
        "axis-end-pix-x",
        "axis-end-pix-y",
        "force-beg-end",
    ];

    pub fn set_option(&mut self, name: &str, value: impl Into<AxisOptionValue>) -> AxisResult<()> {
        let value = value.into();
        match name {
            "scale-beg-val" => self.scale_begin = value.as_float(name)?,
            "scale-end-val" => self.scale_end = value.as_float(name)?,
            "scale-increment-val" => self.scale_increment = value.as_float(name)?,
            "scale-auto-increment" => self.scale_auto_increment = value.as_bool(name)?,
            "scale-limits-automatic" => self.scale_limits_automatic = value.as_bool(name)?,
            "scale-increment-base" => self.scale_increment_base = value.as_float(name)?,
            "tics-beg-val" => self.tics_begin = value.as_float(name)?,
            "tics-end-val" => self.tics_end = value.as_float(name)?,
            "tics-automatic" => self.tics_automatic = value.as_bool(name)?,
            "mtics-beg-val" => self.mtics_begin = value.as_float(name)?,
            "mtics-end-val" => self.mtics_end = value.as_float(name)?,
            "mtics" => self.mtics = value.as_uint(name)?,
            "mtics-automatic" => self.mtics_automatic = value.as_bool(name)?,
            "axis-orientation" => self.orientation = value.as_float(name)?,
            "axis-direction-outside" => self.outer_direction = value.as_float(name)?,
            "axis-beg-pix-x" => self.begin_pix_x = value.as_float(name)?,
            "axis-beg-pix-y" => self.begin_pix_y = value.as_float(name)?,
            "axis-end-pix-x" => self.end_pix_x = value.as_float(name)?,
            "axis-end-pix-y" => self.end_pix_y = value.as_float(name)?,
            "force-beg-end" => self.force_begin_end = value.as_bool(name)?,
            _ => return Err(unknown_option(name)),
        }
        Ok(())
    }

    /// Builder form of [`Self::set_option`].
    pub fn with_option(mut self, name: &str, value: impl Into<AxisOptionValue>) -> AxisResult<Self> {
        self.set_option(name, value)?;
        Ok(self)
    }

    pub fn option(&self, name: &str) -> AxisResult<AxisOptionValue> {
        Ok(match name {
            "scale-beg-val" => self.scale_begin.into(),
            "scale-end-val" => self.scale_end.into(),
            "scale-increment-val" => self.scale_increment.into(),
            "scale-auto-increment" => self.scale_auto_increment.into(),
            "scale-limits-automatic" => self.scale_limits_automatic.into(),
            "scale-increment-base" => self.scale_increment_base.into(),
            "tics-beg-val" => self.tics_begin.into(),
            "tics-end-val" => self.tics_end.into(),
            "tics-automatic" => self.tics_automatic.into(),
            "mtics-beg-val" => self.mtics_begin.into(),
            "mtics-end-val" => self.mtics_end.into(),
            "mtics" => self.mtics.into(),
            "mtics-automatic" => self.mtics_automatic.into(),
            "axis-orientation" => self.orientation.into(),
            "axis-direction-outside" => self.outer_direction.into(),
            "axis-beg-pix-x" => self.begin_pix_x.into(),
            "axis-beg-pix-y" => self.begin_pix_y.into(),
            "axis-end-pix-x" => self.end_pix_x.into(),
            "axis-end-pix-y" => self.end_pix_y.into(),
            "force-beg-end" => self.force_begin_end.into(),
            _ => return Err(unknown_option(name)),
        })
    }
}

impl AxisStyle {
    pub const OPTION_NAMES: [&'static str; 10] = [
        "scale-min-diff-pix",
        "scale-max-diff-pix",
        "line-width",
        "show-title",
        "label-font-size",
        "tics-in-length",
        "tics-out-length",
        "label-distance",
        "show-label",
        "tics-line-width",
    ];

    pub fn set_option(&mut self, name: &str, value: impl Into<AxisOptionValue>) -> AxisResult<()> {
        let value = value.into();
        match name {
            "scale-min-diff-pix" => self.min_pixel_gap = value.as_float(name)?,
            "scale-max-diff-pix" => self.max_pixel_gap = value.as_float(name)?,
            "line-width" => self.line_width = value.as_float(name)?,
            "show-title" => self.show_title = value.as_bool(name)?,
            "label-font-size" => self.label_font_size = value.as_float(name)?,
            "tics-in-length" => self.tics.inner_length = value.as_float(name)?,
            "tics-out-length" => self.tics.outer_length = value.as_float(name)?,
            "label-distance" => self.tics.label_distance = value.as_float(name)?,
            "show-label" => self.tics.show_label = value.as_bool(name)?,
            "tics-line-width" => self.tics.line_width = value.as_float(name)?,
            _ => return Err(unknown_option(name)),
        }
        Ok(())
    }

    pub fn with_option(mut self, name: &str, value: impl Into<AxisOptionValue>) -> AxisResult<Self> {
        self.set_option(name, value)?;
        Ok(self)
    }

    pub fn option(&self, name: &str) -> AxisResult<AxisOptionValue> {
        Ok(match name {
            "scale-min-diff-pix" => self.min_pixel_gap.into(),
            "scale-max-diff-pix" => self.max_pixel_gap.into(),
            "line-width" => self.line_width.into(),
            "show-title" => self.show_title.into(),
            "label-font-size" => self.label_font_size.into(),
            "tics-in-length" => self.tics.inner_length.into(),
            "tics-out-length" => self.tics.outer_length.into(),
            "label-distance" => self.tics.label_distance.into(),
            "show-label" => self.tics.show_label.into(),
            "tics-line-width" => self.tics.line_width.into(),
            _ => return Err(unknown_option(name)),
        })
    }
}

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::core::solver::ScaleRequest;
use crate::core::tic::TicStyle;
use crate::error::{AxisError, AxisResult};

/// Default bound on chained layout passes.
pub const DEFAULT_MAX_RELAYOUT_PASSES: usize = 3;

/// Persisted per-axis state: data extent, increment, tic ranges, anchors.
///
/// The layout driver overwrites the automatic fields after each successful
/// pass; everything else is read verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AxisConfig {
    #[serde(rename = "scale-beg-val")]
    pub scale_begin: f64,
    #[serde(rename = "scale-end-val")]
    pub scale_end: f64,
    #[serde(rename = "scale-increment-val")]
    pub scale_increment: f64,
    pub scale_auto_increment: bool,
    pub scale_limits_automatic: bool,
    pub scale_increment_base: f64,
    #[serde(rename = "tics-beg-val")]
    pub tics_begin: f64,
    #[serde(rename = "tics-end-val")]
    pub tics_end: f64,
    pub tics_automatic: bool,
    #[serde(rename = "mtics-beg-val")]
    pub mtics_begin: f64,
    #[serde(rename = "mtics-end-val")]
    pub mtics_end: f64,
    pub mtics: u32,
    pub mtics_automatic: bool,
    #[serde(rename = "axis-orientation")]
    pub orientation: f64,
    #[serde(rename = "axis-direction-outside")]
    pub outer_direction: f64,
    #[serde(rename = "axis-beg-pix-x")]
    pub begin_pix_x: f64,
    #[serde(rename = "axis-beg-pix-y")]
    pub begin_pix_y: f64,
    #[serde(rename = "axis-end-pix-x")]
    pub end_pix_x: f64,
    #[serde(rename = "axis-end-pix-y")]
    pub end_pix_y: f64,
    #[serde(rename = "force-beg-end")]
    pub force_begin_end: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            scale_begin: 0.0,
            scale_end: 100.0,
            scale_increment: 100.0,
            scale_auto_increment: true,
            scale_limits_automatic: true,
            scale_increment_base: 10.0,
            tics_begin: 0.0,
            tics_end: 100.0,
            tics_automatic: true,
            mtics_begin: 0.0,
            mtics_end: 100.0,
            mtics: 4,
            mtics_automatic: true,
            orientation: 0.0,
            outer_direction: FRAC_PI_2,
            begin_pix_x: 0.0,
            begin_pix_y: 0.0,
            end_pix_x: 0.0,
            end_pix_y: 0.0,
            force_begin_end: false,
        }
    }
}

impl AxisConfig {
    #[must_use]
    pub fn with_scale(mut self, begin: f64, end: f64) -> Self {
        self.scale_begin = begin;
        self.scale_end = end;
        self
    }

    #[must_use]
    pub fn with_increment(mut self, increment: f64, automatic: bool) -> Self {
        self.scale_increment = increment;
        self.scale_auto_increment = automatic;
        self
    }

    #[must_use]
    pub fn with_limits_automatic(mut self, automatic: bool) -> Self {
        self.scale_limits_automatic = automatic;
        self
    }

    #[must_use]
    pub fn with_increment_base(mut self, base: f64) -> Self {
        self.scale_increment_base = base;
        self
    }

    #[must_use]
    pub fn with_tics(mut self, begin: f64, end: f64, automatic: bool) -> Self {
        self.tics_begin = begin;
        self.tics_end = end;
        self.tics_automatic = automatic;
        self
    }

    #[must_use]
    pub fn with_mtics(mut self, begin: f64, end: f64, count: u32, automatic: bool) -> Self {
        self.mtics_begin = begin;
        self.mtics_end = end;
        self.mtics = count;
        self.mtics_automatic = automatic;
        self
    }

    /// Orientation of the line and the direction considered outside, both in
    /// radians.
    #[must_use]
    pub fn with_direction(mut self, orientation: f64, outer_direction: f64) -> Self {
        self.orientation = orientation;
        self.outer_direction = outer_direction;
        self
    }

    /// Pins the line to explicit pixel anchors and bypasses the solver.
    #[must_use]
    pub fn with_forced_anchors(mut self, begin: (f64, f64), end: (f64, f64)) -> Self {
        self.begin_pix_x = begin.0;
        self.begin_pix_y = begin.1;
        self.end_pix_x = end.0;
        self.end_pix_y = end.1;
        self.force_begin_end = true;
        self
    }

    pub fn validate(&self) -> AxisResult<()> {
        for (name, value) in [
            ("scale-beg-val", self.scale_begin),
            ("scale-end-val", self.scale_end),
            ("scale-increment-val", self.scale_increment),
            ("tics-beg-val", self.tics_begin),
            ("tics-end-val", self.tics_end),
            ("mtics-beg-val", self.mtics_begin),
            ("mtics-end-val", self.mtics_end),
            ("axis-orientation", self.orientation),
            ("axis-direction-outside", self.outer_direction),
            ("axis-beg-pix-x", self.begin_pix_x),
            ("axis-beg-pix-y", self.begin_pix_y),
            ("axis-end-pix-x", self.end_pix_x),
            ("axis-end-pix-y", self.end_pix_y),
        ] {
            if !value.is_finite() {
                return Err(AxisError::InvalidConfig(format!(
                    "`{name}` must be finite, got {value}"
                )));
            }
        }
        if !self.scale_increment_base.is_finite() || self.scale_increment_base <= 1.0 {
            return Err(AxisError::InvalidConfig(format!(
                "`scale-increment-base` must be finite and > 1, got {}",
                self.scale_increment_base
            )));
        }
        Ok(())
    }

    /// Solver input built from the persisted fields and the style window.
    #[must_use]
    pub fn scale_request(&self, style: &AxisStyle) -> ScaleRequest {
        ScaleRequest::new(self.scale_begin, self.scale_end)
            .with_increment(self.scale_increment, self.scale_auto_increment)
            .with_auto_limits(self.scale_limits_automatic)
            .with_increment_base(self.scale_increment_base)
            .with_tics(self.tics_begin, self.tics_end, self.tics_automatic)
            .with_pixel_window(style.min_pixel_gap, style.max_pixel_gap)
            .with_force_begin_end(self.force_begin_end)
    }

    pub fn from_json_str(json: &str) -> AxisResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| AxisError::InvalidConfig(format!("axis config json: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> AxisResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AxisError::InvalidConfig(format!("axis config json: {err}")))
    }
}

/// Style constraints consumed by the solver and the tic space probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AxisStyle {
    #[serde(rename = "scale-min-diff-pix")]
    pub min_pixel_gap: f64,
    #[serde(rename = "scale-max-diff-pix")]
    pub max_pixel_gap: f64,
    pub line_width: f64,
    pub show_title: bool,
    pub label_font_size: f64,
    #[serde(flatten)]
    pub tics: TicStyle,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            min_pixel_gap: 40.0,
            max_pixel_gap: 300.0,
            line_width: 1.0,
            show_title: true,
            label_font_size: 12.0,
            tics: TicStyle::default(),
        }
    }
}

impl AxisStyle {
    #[must_use]
    pub fn with_pixel_window(mut self, min_pixel_gap: f64, max_pixel_gap: f64) -> Self {
        self.min_pixel_gap = min_pixel_gap;
        self.max_pixel_gap = max_pixel_gap;
        self
    }

    #[must_use]
    pub fn with_tic_style(mut self, tics: TicStyle) -> Self {
        self.tics = tics;
        self
    }

    #[must_use]
    pub fn with_show_title(mut self, show_title: bool) -> Self {
        self.show_title = show_title;
        self
    }

    pub fn validate(&self) -> AxisResult<()> {
        if !self.min_pixel_gap.is_finite()
            || !self.max_pixel_gap.is_finite()
            || self.min_pixel_gap < 0.0
            || self.min_pixel_gap > self.max_pixel_gap
        {
            return Err(AxisError::InvalidConfig(format!(
                "pixel window [{}, {}] must be finite, non-negative and ordered",
                self.min_pixel_gap, self.max_pixel_gap
            )));
        }
        if !self.line_width.is_finite() || self.line_width < 0.0 {
            return Err(AxisError::InvalidConfig(format!(
                "`line-width` must be finite and >= 0, got {}",
                self.line_width
            )));
        }
        if !self.label_font_size.is_finite() || self.label_font_size <= 0.0 {
            return Err(AxisError::InvalidConfig(format!(
                "`label-font-size` must be finite and > 0, got {}",
                self.label_font_size
            )));
        }
        let tics = &self.tics;
        for (name, value) in [
            ("tics-in-length", tics.inner_length),
            ("tics-out-length", tics.outer_length),
            ("label-distance", tics.label_distance),
            ("tics-line-width", tics.line_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AxisError::InvalidConfig(format!(
                    "`{name}` must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> AxisResult<Self> {
        let style: Self = serde_json::from_str(json)
            .map_err(|err| AxisError::InvalidConfig(format!("axis style json: {err}")))?;
        style.validate()?;
        Ok(style)
    }

    pub fn to_json_string(&self) -> AxisResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| AxisError::InvalidConfig(format!("axis style json: {err}")))
    }
}

/// Bound on chained layout passes requested through the relayout flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayoutLimits {
    pub max_passes: usize,
}

impl Default for RelayoutLimits {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_RELAYOUT_PASSES,
        }
    }
}

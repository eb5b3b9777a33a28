use crate::core::PixelPoint;
use crate::error::{AxisError, AxisResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    pub fn validate(self) -> AxisResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        if channels.iter().all(|value| (0.0..=1.0).contains(value)) {
            Ok(())
        } else {
            Err(AxisError::InvalidData(format!(
                "color channels must lie in [0, 1], got {channels:?}"
            )))
        }
    }
}

fn ensure_finite(point: PixelPoint, what: &str) -> AxisResult<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(AxisError::InvalidData(format!(
            "{what} must be finite, got ({}, {})",
            point.x, point.y
        )))
    }
}

/// Stroked segment in absolute pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub from: PixelPoint,
    pub to: PixelPoint,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(from: PixelPoint, to: PixelPoint, stroke_width: f64, color: Color) -> Self {
        Self {
            from,
            to,
            stroke_width,
            color,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.from.distance_to(self.to)
    }

    pub fn validate(&self) -> AxisResult<()> {
        ensure_finite(self.from, "line start")?;
        ensure_finite(self.to, "line end")?;
        if !(self.stroke_width > 0.0) || !self.stroke_width.is_finite() {
            return Err(AxisError::InvalidData(format!(
                "line stroke width must be finite and > 0, got {}",
                self.stroke_width
            )));
        }
        self.color.validate()
    }
}

/// Label drawn with its top-left corner at `origin`. `markup` uses the Pango
/// subset the label measurers understand (`<sup>` and entities).
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub markup: String,
    pub origin: PixelPoint,
    pub font_size_px: f64,
    pub color: Color,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(markup: impl Into<String>, origin: PixelPoint, font_size_px: f64, color: Color) -> Self {
        Self {
            markup: markup.into(),
            origin,
            font_size_px,
            color,
        }
    }

    pub fn validate(&self) -> AxisResult<()> {
        if self.markup.is_empty() {
            return Err(AxisError::InvalidData("label markup is empty".to_owned()));
        }
        ensure_finite(self.origin, "label origin")?;
        if !(self.font_size_px > 0.0) || !self.font_size_px.is_finite() {
            return Err(AxisError::InvalidData(format!(
                "label font size must be finite and > 0, got {}",
                self.font_size_px
            )));
        }
        self.color.validate()
    }
}

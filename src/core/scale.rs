use serde::{Deserialize, Serialize};

use crate::core::primitives::contains_inclusive;
use crate::core::types::PixelPoint;

/// Space in which data values are interpolated along the axis line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingSpace {
    Linear,
    Logarithmic,
}

/// Pixel anchors and data extent of one axis line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLine {
    pub begin: PixelPoint,
    pub end: PixelPoint,
    pub begin_value: f64,
    pub end_value: f64,
    /// Angle (radians) of the direction considered outside the plot area.
    pub outer_direction: f64,
}

impl AxisLine {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.begin.distance_to(self.end)
    }
}

/// Result of projecting a data value onto the axis line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedPoint {
    pub point: PixelPoint,
    pub in_range: bool,
}

/// Value to pixel projection along an arbitrarily oriented axis line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    space: MappingSpace,
    line: AxisLine,
}

impl CoordinateMapper {
    #[must_use]
    pub fn new(space: MappingSpace, line: AxisLine) -> Self {
        Self { space, line }
    }

    #[must_use]
    pub fn space(&self) -> MappingSpace {
        self.space
    }

    #[must_use]
    pub fn line(&self) -> &AxisLine {
        &self.line
    }

    /// Whether `value` lies between the begin and end values, inclusive and
    /// independent of direction. Log axes reject non-positive values.
    #[must_use]
    pub fn in_range(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.space == MappingSpace::Logarithmic && value <= 0.0 {
            return false;
        }
        contains_inclusive(self.line.begin_value, self.line.end_value, value)
    }

    #[must_use]
    pub fn to_pixel(&self, value: f64) -> MappedPoint {
        let line = &self.line;
        let point = match self.space {
            MappingSpace::Linear => PixelPoint::new(
                interpolate_linear(line.begin.x, line.end.x, line.begin_value, line.end_value, value),
                interpolate_linear(line.begin.y, line.end.y, line.begin_value, line.end_value, value),
            ),
            MappingSpace::Logarithmic => {
                if value <= 0.0 || line.begin_value <= 0.0 || line.end_value <= 0.0 {
                    return MappedPoint {
                        point: line.begin,
                        in_range: false,
                    };
                }
                let (begin_log, end_log, value_log) =
                    (line.begin_value.ln(), line.end_value.ln(), value.ln());
                PixelPoint::new(
                    interpolate_log(line.begin.x, line.end.x, begin_log, end_log, value_log),
                    interpolate_log(line.begin.y, line.end.y, begin_log, end_log, value_log),
                )
            }
        };

        MappedPoint {
            point,
            in_range: self.in_range(value),
        }
    }

    /// Unit vector pointing from the axis line into the plotted area.
    #[must_use]
    pub fn inner_direction(&self) -> PixelPoint {
        inner_direction(self.line.outer_direction)
    }

    /// Inverse of [`Self::to_pixel`]: projects `point` orthogonally onto the
    /// axis line and interpolates back into data space.
    #[must_use]
    pub fn to_value(&self, point: PixelPoint) -> Option<f64> {
        let line = &self.line;
        let dx = line.end.x - line.begin.x;
        let dy = line.end.y - line.begin.y;
        let length_sq = dx * dx + dy * dy;
        if length_sq == 0.0 || !length_sq.is_finite() || !point.is_finite() {
            return None;
        }

        let t = ((point.x - line.begin.x) * dx + (point.y - line.begin.y) * dy) / length_sq;
        let value = match self.space {
            MappingSpace::Linear => line.begin_value + t * (line.end_value - line.begin_value),
            MappingSpace::Logarithmic => {
                if line.begin_value <= 0.0 || line.end_value <= 0.0 {
                    return None;
                }
                let begin_log = line.begin_value.ln();
                (begin_log + t * (line.end_value.ln() - begin_log)).exp()
            }
        };
        value.is_finite().then_some(value)
    }
}

/// `(-sin(outer), cos(outer))`.
#[must_use]
pub fn inner_direction(outer_direction: f64) -> PixelPoint {
    PixelPoint::new(-outer_direction.sin(), outer_direction.cos())
}

fn interpolate_linear(begin_pix: f64, end_pix: f64, begin_value: f64, end_value: f64, value: f64) -> f64 {
    if begin_pix == end_pix || begin_value == end_value {
        return begin_pix;
    }
    begin_pix + (value - begin_value) * (end_pix - begin_pix) / (end_value - begin_value)
}

fn interpolate_log(begin_pix: f64, end_pix: f64, begin_log: f64, end_log: f64, value_log: f64) -> f64 {
    if begin_pix == end_pix || begin_log == end_log {
        return 0.5 * (begin_pix + end_pix);
    }
    begin_pix + (value_log - begin_log) * (end_pix - begin_pix) / (end_log - begin_log)
}

#[cfg(test)]
mod tests {
    use super::{AxisLine, CoordinateMapper, MappingSpace};
    use crate::core::types::PixelPoint;

    fn vertical_line(begin_value: f64, end_value: f64) -> AxisLine {
        AxisLine {
            begin: PixelPoint::new(10.0, 200.0),
            end: PixelPoint::new(10.0, 0.0),
            begin_value,
            end_value,
            outer_direction: std::f64::consts::FRAC_PI_2,
        }
    }

    #[test]
    fn constant_screen_axis_stays_on_begin_pixel() {
        let mapper = CoordinateMapper::new(MappingSpace::Linear, vertical_line(0.0, 100.0));
        let mapped = mapper.to_pixel(25.0);
        assert_eq!(mapped.point.x, 10.0);
        assert_eq!(mapped.point.y, 150.0);
        assert!(mapped.in_range);
    }

    #[test]
    fn log_degenerate_range_lands_on_midpoint() {
        let mapper = CoordinateMapper::new(MappingSpace::Logarithmic, vertical_line(10.0, 10.0));
        let mapped = mapper.to_pixel(10.0);
        assert_eq!(mapped.point.y, 100.0);
    }
}

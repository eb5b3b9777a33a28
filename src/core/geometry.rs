//! Allocation geometry shared by the layout driver and the scale probe:
//! free space left after tic borders and title, axis anchors and the title
//! rectangle.

use serde::{Deserialize, Serialize};

use crate::core::types::{Allocation, Borders, LabelSize, PixelPoint};

/// Part of an allocation left for the axis line, relative to the
/// allocation origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FreeSpace {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Rectangle handed to the title label, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TitleAllocation {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Pixel anchors of the axis line, relative to the allocation origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Anchors {
    pub begin: PixelPoint,
    pub end: PixelPoint,
}

impl Anchors {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.begin.distance_to(self.end)
    }
}

/// Space inside `allocation` that is not claimed by `borders`.
///
/// When the borders do not fit, the origin is split proportionally and the
/// extent collapses to one pixel. A visible `title` then takes its
/// projection onto the outward direction.
#[must_use]
pub fn free_space(
    allocation: Allocation,
    borders: Borders,
    title: Option<LabelSize>,
    outer_direction: f64,
) -> FreeSpace {
    let horizontal = borders.left + borders.right;
    let vertical = borders.top + borders.bottom;
    let fits_horizontally = allocation.width > horizontal;
    let fits_vertically = allocation.height > vertical;

    let mut space = FreeSpace {
        x: if fits_horizontally {
            borders.left
        } else {
            proportional_share(allocation.width, borders.left, horizontal)
        },
        y: if fits_vertically {
            borders.top
        } else {
            proportional_share(allocation.height, borders.top, vertical)
        },
        width: if fits_horizontally {
            allocation.width - horizontal
        } else {
            1
        },
        height: if fits_vertically {
            allocation.height - vertical
        } else {
            1
        },
    };
    space.width = space.width.max(0);
    space.height = space.height.max(0);

    if let Some(title) = title {
        let (sin, cos) = outer_direction.sin_cos();
        if fits_horizontally {
            space.width -= (sin.abs() * f64::from(title.width)) as i32;
            if sin < 0.0 {
                space.x += (-sin * f64::from(title.width)) as i32;
            }
        }
        if fits_vertically {
            space.height -= (cos.abs() * f64::from(title.height)) as i32;
            if cos >= 0.0 {
                space.y += (cos * f64::from(title.height)) as i32;
            }
        }
        space.width = space.width.max(0);
        space.height = space.height.max(0);
    }

    space
}

fn proportional_share(extent: i32, part: i32, total: i32) -> i32 {
    if total <= 0 {
        return 0;
    }
    (i64::from(extent) * i64::from(part) / i64::from(total)) as i32
}

/// Line anchors inside `space` for a line at `orientation` radians from the
/// screen vertical, clamped into the free space.
#[must_use]
pub fn anchors(space: FreeSpace, orientation: f64) -> Anchors {
    let (sin, cos) = orientation.sin_cos();
    let x0 = f64::from(space.x);
    let y0 = f64::from(space.y);
    let width = f64::from(space.width);
    let height = f64::from(space.height);
    let center_x = x0 + 0.5 * width;
    let center_y = y0 + 0.5 * height;

    let half_x = 0.5 * (height + 0.5) / cos.abs();
    let half_y = 0.5 * (width + 0.5) / sin.abs();

    Anchors {
        begin: PixelPoint::new(
            clamp_nan_safe(sin * half_x + center_x, x0, x0 + width),
            clamp_nan_safe(-cos * half_y + center_y, y0, y0 + height),
        ),
        end: PixelPoint::new(
            clamp_nan_safe(-sin * half_x + center_x, x0, x0 + width),
            clamp_nan_safe(cos * half_y + center_y, y0, y0 + height),
        ),
    }
}

/// `max(min(value, hi), lo)`: infinities land on a bound, NaN on `lo`.
fn clamp_nan_safe(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}

/// Length of the axis line that fits into `space` at `orientation`.
#[must_use]
pub fn line_length(space: FreeSpace, orientation: f64) -> f64 {
    let width = f64::from(space.width);
    let height = f64::from(space.height);
    let line_height = ((std::f64::consts::FRAC_PI_2 - orientation).tan().abs() * (width + 0.5))
        .min(height);
    let line_width = (orientation.tan().abs() * (height + 0.5)).min(width);
    let length = line_width.hypot(line_height);
    if length.is_finite() { length } else { 0.0 }
}

/// Title rectangle on the outward side of the free space.
#[must_use]
pub fn title_allocation(
    allocation: Allocation,
    space: FreeSpace,
    borders: Borders,
    title: LabelSize,
    outer_direction: f64,
) -> TitleAllocation {
    let (sin, cos) = outer_direction.sin_cos();
    let span_x = space.width + borders.right + borders.left + title.width;
    let span_y = space.height + borders.bottom + borders.top + title.height;

    TitleAllocation {
        x: allocation.x + space.x - borders.left - title.width
            + ((0.5 + 0.5 * sin) * f64::from(span_x)) as i32,
        y: allocation.y + space.y - borders.top - title.height
            + ((0.5 - 0.5 * cos) * f64::from(span_y)) as i32,
        width: title.width,
        height: title.height,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::{FreeSpace, anchors, free_space, line_length, title_allocation};
    use crate::core::types::{Allocation, Borders, LabelSize};

    #[test]
    fn free_space_subtracts_borders_and_title() {
        let borders = Borders {
            top: 7,
            bottom: 7,
            left: 6,
            right: 32,
        };
        let space = free_space(
            Allocation::new(0, 0, 100, 400),
            borders,
            Some(LabelSize::new(10, 40)),
            FRAC_PI_2,
        );
        assert_eq!(space.x, 6);
        assert_eq!(space.width, 100 - 38 - 10);
        assert_eq!(space.y, 7);
        assert_eq!(space.height, 400 - 14);
    }

    #[test]
    fn crowded_allocation_keeps_one_pixel() {
        let borders = Borders {
            top: 0,
            bottom: 0,
            left: 30,
            right: 10,
        };
        let space = free_space(Allocation::new(0, 0, 20, 50), borders, None, 0.0);
        assert_eq!(space.x, 15);
        assert_eq!(space.width, 1);
    }

    #[test]
    fn vertical_line_runs_top_to_bottom() {
        let space = FreeSpace {
            x: 10,
            y: 5,
            width: 40,
            height: 200,
        };
        let line = anchors(space, 0.0);
        assert_eq!(line.begin.y, 5.0);
        assert_eq!(line.end.y, 205.0);
        assert_eq!(line.begin.x, 30.0);
        assert!((line_length(space, 0.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn horizontal_line_direction_follows_orientation_sign() {
        let space = FreeSpace {
            x: 0,
            y: 0,
            width: 300,
            height: 20,
        };
        let left_to_right = anchors(space, -FRAC_PI_2);
        assert_eq!(left_to_right.begin.x, 0.0);
        assert_eq!(left_to_right.end.x, 300.0);

        let right_to_left = anchors(space, FRAC_PI_2);
        assert_eq!(right_to_left.begin.x, 300.0);
        assert_eq!(right_to_left.end.x, 0.0);
        assert!((line_length(space, FRAC_PI_2) - 300.0).abs() < 1e-6);
    }

    #[test]
    fn title_sits_on_outward_side() {
        let allocation = Allocation::new(0, 0, 100, 100);
        let space = FreeSpace {
            x: 10,
            y: 0,
            width: 80,
            height: 100,
        };
        let title = title_allocation(
            allocation,
            space,
            Borders {
                left: 10,
                ..Borders::default()
            },
            LabelSize::new(10, 20),
            -FRAC_PI_2,
        );
        assert_eq!(title.x, -10);
        assert_eq!(title.width, 10);
    }
}

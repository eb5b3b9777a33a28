use serde::{Deserialize, Serialize};

use crate::core::types::{Borders, LabelSize, PixelPoint, Side, SideSpace};

/// Extra length added to tic lines while measuring so that round-off never
/// clips the outermost pixel.
const TIC_LENGTH_SLACK: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicKind {
    Major,
    Minor,
}

/// Style lengths consumed by [`TicSpaceProbe`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TicStyle {
    #[serde(rename = "tics-in-length")]
    pub inner_length: f64,
    #[serde(rename = "tics-out-length")]
    pub outer_length: f64,
    pub label_distance: f64,
    pub show_label: bool,
    #[serde(rename = "tics-line-width")]
    pub line_width: f64,
}

impl Default for TicStyle {
    fn default() -> Self {
        Self {
            inner_length: 6.0,
            outer_length: 6.0,
            label_distance: 6.0,
            show_label: true,
            line_width: 1.0,
        }
    }
}

/// Label alignment relative to the tic position, in units of the label size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelAlign {
    pub x: f64,
    pub y: f64,
}

impl LabelAlign {
    /// Centers labels across the axis: `(-0.5 |dir.y|, -0.5 |dir.x|)`.
    #[must_use]
    pub fn for_inner_direction(inner_direction: PixelPoint) -> Self {
        Self {
            x: -0.5 * inner_direction.y.abs(),
            y: -0.5 * inner_direction.x.abs(),
        }
    }
}

impl Default for LabelAlign {
    fn default() -> Self {
        Self { x: 0.0, y: -0.5 }
    }
}

/// One materialised major or minor tic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tic {
    pub kind: TicKind,
    pub value: f64,
    pub screen_pos: PixelPoint,
    pub inner_direction: PixelPoint,
    pub label_align: LabelAlign,
    /// Markup text; minor tics never carry one.
    pub label: Option<String>,
    pub label_size: LabelSize,
    pub visible: bool,
}

impl Tic {
    #[must_use]
    pub fn major(value: f64, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::minor(value)
        }
        .with_kind(TicKind::Major)
    }

    #[must_use]
    pub fn minor(value: f64) -> Self {
        Self {
            kind: TicKind::Minor,
            value,
            screen_pos: PixelPoint::default(),
            inner_direction: PixelPoint::default(),
            label_align: LabelAlign::default(),
            label: None,
            label_size: LabelSize::default(),
            visible: true,
        }
    }

    #[must_use]
    fn with_kind(mut self, kind: TicKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, inner_direction: PixelPoint) -> Self {
        self.inner_direction = inner_direction;
        self.label_align = LabelAlign::for_inner_direction(inner_direction);
        self
    }

    #[must_use]
    pub fn with_label_size(mut self, size: LabelSize) -> Self {
        self.label_size = size;
        self
    }

    #[must_use]
    pub fn is_major(&self) -> bool {
        self.kind == TicKind::Major
    }

    /// Label markup, if this tic has a non-empty one.
    #[must_use]
    pub fn label_markup(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }
}

/// Measures the pixel space a tic needs on each side of its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicSpaceProbe {
    style: TicStyle,
}

impl TicSpaceProbe {
    #[must_use]
    pub fn new(style: TicStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &TicStyle {
        &self.style
    }

    fn shows_label(&self, tic: &Tic) -> bool {
        self.style.show_label && tic.is_major() && tic.label_markup().is_some()
    }

    /// Space between the tic position and the edge of its footprint on `side`.
    #[must_use]
    pub fn space_to_position(&self, tic: &Tic, side: Side) -> SideSpace {
        let (nx, ny) = normalized(tic.inner_direction);
        let inner = self.style.inner_length + TIC_LENGTH_SLACK;
        let outer = self.style.outer_length + TIC_LENGTH_SLACK;
        let show_label = self.shows_label(tic);
        let reach = outer + if show_label { self.style.label_distance } else { 0.0 };
        let (width, height) = if show_label {
            (
                f64::from(tic.label_size.width),
                f64::from(tic.label_size.height),
            )
        } else {
            (0.0, 0.0)
        };
        let align = tic.label_align;
        let half_line = 0.5 * self.style.line_width;

        let space = match side {
            Side::Left => {
                let label_shift = if nx >= 0.0 {
                    (align.x - nx) * width
                } else {
                    align.x * width
                };
                (-nx * inner).max(nx * reach - label_shift) + ny.abs() * half_line
            }
            Side::Right => {
                let label_shift = if nx < 0.0 {
                    (align.x + nx) * width
                } else {
                    align.x * width
                };
                (nx * inner).max(-nx * reach - label_shift) + ny.abs() * half_line
            }
            Side::Top => {
                let label_shift = if ny >= 0.0 {
                    (align.y - ny) * height
                } else {
                    align.y * height
                };
                (-ny * inner).max(ny * reach - label_shift) + nx.abs() * half_line
            }
            Side::Bottom => {
                let label_shift = if ny <= 0.0 {
                    (align.y + ny) * height
                } else {
                    align.y * height
                };
                (ny * inner).max(-ny * reach - label_shift) + nx.abs() * half_line
            }
        };

        let space = if space.is_finite() { space as i32 } else { 0 };
        SideSpace::new(space, space)
    }

    /// Maximum space required on every side across `tics`.
    #[must_use]
    pub fn borders<'a>(&self, tics: impl IntoIterator<Item = &'a Tic>) -> Borders {
        let mut borders = Borders::default();
        for tic in tics {
            for side in Side::ALL {
                borders.include(side, self.space_to_position(tic, side));
            }
        }
        borders
    }

    /// Top-left corner of the label box of `tic`, if it shows a label.
    #[must_use]
    pub fn label_origin(&self, tic: &Tic) -> Option<PixelPoint> {
        if !self.shows_label(tic) {
            return None;
        }
        let (nx, ny) = normalized(tic.inner_direction);
        let width = f64::from(tic.label_size.width);
        let height = f64::from(tic.label_size.height);
        let align = tic.label_align;
        let outer = self.style.outer_length;
        let distance = self.style.label_distance;
        let line_width = self.style.line_width;

        let x_shift = if nx > 0.0 {
            (align.x - nx) * width
        } else {
            align.x * width
        };
        let y_shift = if ny > 0.0 {
            (align.y - ny) * height
        } else {
            align.y * height
        };

        Some(PixelPoint::new(
            tic.screen_pos.x - nx * outer + (0.5 * ny * line_width).abs() - nx * distance + x_shift,
            tic.screen_pos.y - ny * outer + (0.5 * nx * line_width).abs() - ny * distance + y_shift,
        ))
    }
}

fn normalized(direction: PixelPoint) -> (f64, f64) {
    let length = direction.x.hypot(direction.y);
    if length > 0.0 && length.is_finite() {
        (direction.x / length, direction.y / length)
    } else {
        (0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Tic, TicSpaceProbe, TicStyle};
    use crate::core::types::{LabelSize, PixelPoint, Side};

    #[test]
    fn label_extends_opposite_to_inner_direction() {
        let probe = TicSpaceProbe::new(TicStyle::default());
        let tic = Tic::major(10.0, "10")
            .with_orientation(PixelPoint::new(-1.0, 0.0))
            .with_label_size(LabelSize::new(20, 14));

        assert_eq!(probe.space_to_position(&tic, Side::Left).natural, 6);
        assert_eq!(probe.space_to_position(&tic, Side::Right).natural, 32);
        assert_eq!(probe.space_to_position(&tic, Side::Top).natural, 7);
        assert_eq!(probe.space_to_position(&tic, Side::Bottom).natural, 7);
    }

    #[test]
    fn minor_tics_never_reserve_label_space() {
        let probe = TicSpaceProbe::new(TicStyle::default());
        let tic = Tic::minor(5.0)
            .with_orientation(PixelPoint::new(0.0, -1.0))
            .with_label_size(LabelSize::new(30, 14));

        assert_eq!(probe.space_to_position(&tic, Side::Bottom).natural, 6);
        assert!(probe.label_origin(&tic).is_none());
    }
}

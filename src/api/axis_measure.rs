use crate::core::tic::{TicKind, TicSpaceProbe};
use crate::core::types::{Orientation, Side, SideSpace, SizeRequest};

use super::axis::Axis;

impl Axis {
    /// Space the axis needs beyond its begin anchor on `side`.
    ///
    /// Same value as [`Axis::space_to_end`]: both ends report the full footprint.
    #[must_use]
    pub fn space_to_begin(&self, side: Side) -> SideSpace {
        self.space_to_anchor(side)
    }

    /// Space the axis needs beyond its end anchor on `side`. See
    /// [`Axis::space_to_begin`].
    #[must_use]
    pub fn space_to_end(&self, side: Side) -> SideSpace {
        self.space_to_anchor(side)
    }

    /// Both anchors report the widest major tic plus the title share on the
    /// outward side.
    fn space_to_anchor(&self, side: Side) -> SideSpace {
        let probe = TicSpaceProbe::new(self.style.tics);
        let mut space = self
            .tics
            .iter_kind(TicKind::Major)
            .map(|(_, tic)| probe.space_to_position(tic, side))
            .fold(SideSpace::default(), SideSpace::merge);

        if let Some(title) = self.title.as_ref().filter(|_| self.title_shown()) {
            let (sin, cos) = self.config.outer_direction.sin_cos();
            let share: f64 = match side {
                Side::Left if sin < 0.0 => -sin * f64::from(title.size.width),
                Side::Right if sin > 0.0 => sin * f64::from(title.size.width),
                Side::Bottom if cos < 0.0 => -cos * f64::from(title.size.height),
                Side::Top if cos > 0.0 => cos * f64::from(title.size.height),
                _ => 0.0,
            };
            space.minimum += share as i32;
            space.natural += share as i32;
        }
        space
    }

    /// Size request along `orientation`: the minimum tic gap projected onto
    /// it, the line width across it, the tic overhang on both sides and the
    /// title.
    #[must_use]
    pub fn measure(&self, orientation: Orientation) -> SizeRequest {
        let (sin, cos) = self.config.orientation.sin_cos();
        let gap = self.style.min_pixel_gap + 0.5;
        let line_width = self.style.line_width;
        let (projected, start_side, stop_side) = match orientation {
            Orientation::Horizontal => (
                (sin.abs() * gap + cos.abs() * line_width) as i32,
                Side::Left,
                Side::Right,
            ),
            Orientation::Vertical => (
                (cos.abs() * gap + sin.abs() * line_width) as i32,
                Side::Top,
                Side::Bottom,
            ),
        };

        let probe = TicSpaceProbe::new(self.style.tics);
        let (start, stop) = self.tics.iter_kind(TicKind::Major).fold(
            (SideSpace::default(), SideSpace::default()),
            |(start, stop), (_, tic)| {
                (
                    start.merge(probe.space_to_position(tic, start_side)),
                    stop.merge(probe.space_to_position(tic, stop_side)),
                )
            },
        );

        let mut request = SizeRequest {
            minimum: start.minimum + stop.minimum + projected,
            natural: start.natural + stop.natural + projected,
        };

        if let Some(title) = self.title.as_ref().filter(|_| self.title_shown()) {
            let (outer_sin, outer_cos) = self.config.outer_direction.sin_cos();
            let (along, across, extent) = match orientation {
                Orientation::Horizontal => {
                    (outer_sin.abs(), outer_cos.abs(), f64::from(title.size.width))
                }
                Orientation::Vertical => {
                    (outer_cos.abs(), outer_sin.abs(), f64::from(title.size.height))
                }
            };
            let add = (along * extent) as i32;
            let floor = across * extent;
            request.minimum = f64::from(request.minimum + add).max(floor) as i32;
            request.natural = f64::from(request.natural + add).max(floor) as i32;
        }
        request
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::axis_config::{AxisConfig, AxisStyle};
use super::axis_variant::AxisVariant;
use crate::core::geometry::TitleAllocation;
use crate::core::label::LabelFormatter;
use crate::core::primitives::ordered_bounds;
use crate::core::scale::{AxisLine, CoordinateMapper, MappedPoint};
use crate::core::tic::{Tic, TicKind};
use crate::core::tic_set::{TicId, TicSet};
use crate::core::types::{Allocation, LabelSize, PixelPoint};
use crate::error::AxisResult;

/// Optional title label of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub markup: String,
    pub visible: bool,
    /// Preferred size, refreshed by every layout pass.
    pub size: LabelSize,
    /// Rectangle assigned by the last layout pass, in absolute coordinates.
    pub allocation: Option<TitleAllocation>,
}

impl AxisTitle {
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            visible: true,
            size: LabelSize::default(),
            allocation: None,
        }
    }
}

/// One drawn data-to-pixel line: persisted configuration plus the tics it
/// owns exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub(super) variant: AxisVariant,
    pub(super) config: AxisConfig,
    pub(super) style: AxisStyle,
    pub(super) tics: TicSet,
    pub(super) title: Option<AxisTitle>,
    pub(super) allocation: Allocation,
    pub(super) visible: bool,
    pub(super) needs_relayout: bool,
}

impl Axis {
    #[must_use]
    pub fn new(variant: AxisVariant) -> Self {
        let mut config =
            AxisConfig::default().with_increment_base(variant.default_increment_base());
        if variant == AxisVariant::Logarithmic {
            config = config
                .with_scale(1.0, 100.0)
                .with_increment(10.0, true)
                .with_tics(1.0, 100.0, true);
        }
        Self {
            variant,
            config,
            style: AxisStyle::default(),
            tics: TicSet::new(),
            title: None,
            allocation: Allocation::default(),
            visible: true,
            needs_relayout: false,
        }
    }

    #[must_use]
    pub fn linear() -> Self {
        Self::new(AxisVariant::Linear)
    }

    #[must_use]
    pub fn logarithmic() -> Self {
        Self::new(AxisVariant::Logarithmic)
    }

    #[must_use]
    pub fn time() -> Self {
        Self::new(AxisVariant::Time)
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, config: AxisConfig) -> AxisResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_style(mut self, style: AxisStyle) -> AxisResult<Self> {
        style.validate()?;
        self.style = style;
        Ok(self)
    }

    #[must_use]
    pub fn with_title(mut self, markup: impl Into<String>) -> Self {
        self.title = Some(AxisTitle::new(markup));
        self
    }

    #[must_use]
    pub fn variant(&self) -> AxisVariant {
        self.variant
    }

    #[must_use]
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Mutable configuration; marks the axis for relayout.
    pub fn config_mut(&mut self) -> &mut AxisConfig {
        self.needs_relayout = true;
        &mut self.config
    }

    #[must_use]
    pub fn style(&self) -> &AxisStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut AxisStyle {
        self.needs_relayout = true;
        &mut self.style
    }

    #[must_use]
    pub fn tics(&self) -> &TicSet {
        &self.tics
    }

    #[must_use]
    pub fn title(&self) -> Option<&AxisTitle> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: Option<AxisTitle>) {
        self.title = title;
        self.needs_relayout = true;
    }

    /// Whether the title takes part in layout and drawing.
    #[must_use]
    pub fn title_shown(&self) -> bool {
        self.style.show_title && self.title.as_ref().is_some_and(|title| title.visible)
    }

    #[must_use]
    pub fn allocation(&self) -> Allocation {
        self.allocation
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            let mapper = self.mapper();
            for (_, tic) in self.tics.iter_mut() {
                tic.visible = visible && mapper.in_range(tic.value);
            }
            self.needs_relayout = true;
        }
    }

    #[must_use]
    pub fn needs_relayout(&self) -> bool {
        self.needs_relayout
    }

    /// Reads and clears the one-shot relayout request.
    pub fn take_needs_relayout(&mut self) -> bool {
        std::mem::take(&mut self.needs_relayout)
    }

    #[must_use]
    pub fn major_values(&self) -> Vec<f64> {
        self.tics.values(TicKind::Major)
    }

    #[must_use]
    pub fn minor_values(&self) -> Vec<f64> {
        self.tics.values(TicKind::Minor)
    }

    /// Major tics in value order.
    pub fn majors(&self) -> impl Iterator<Item = (TicId, &Tic)> {
        self.ordered(TicKind::Major)
    }

    /// Minor tics in value order.
    pub fn minors(&self) -> impl Iterator<Item = (TicId, &Tic)> {
        self.ordered(TicKind::Minor)
    }

    fn ordered(&self, kind: TicKind) -> impl Iterator<Item = (TicId, &Tic)> {
        self.tics
            .ordered_ids(kind)
            .into_iter()
            .filter_map(|id| self.tics.get(id).map(|tic| (id, tic)))
    }

    /// Mapper over the persisted anchors, relative to the allocation origin.
    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        let config = &self.config;
        CoordinateMapper::new(
            self.variant.mapping_space(),
            AxisLine {
                begin: PixelPoint::new(config.begin_pix_x, config.begin_pix_y),
                end: PixelPoint::new(config.end_pix_x, config.end_pix_y),
                begin_value: config.scale_begin,
                end_value: config.scale_end,
                outer_direction: config.outer_direction,
            },
        )
    }

    #[must_use]
    pub fn formatter(&self) -> LabelFormatter {
        self.variant.formatter(
            self.config.tics_begin,
            self.config.tics_end,
            self.config.scale_increment_base,
        )
    }

    /// Absolute pixel position of `value`.
    #[must_use]
    pub fn to_pixel(&self, value: f64) -> MappedPoint {
        let mapped = self.mapper().to_pixel(value);
        MappedPoint {
            point: self.to_absolute(mapped.point),
            ..mapped
        }
    }

    /// Data value under an absolute pixel position.
    #[must_use]
    pub fn to_value(&self, point: PixelPoint) -> Option<f64> {
        self.mapper().to_value(PixelPoint::new(
            point.x - f64::from(self.allocation.x),
            point.y - f64::from(self.allocation.y),
        ))
    }

    #[must_use]
    pub fn inner_direction(&self) -> PixelPoint {
        self.mapper().inner_direction()
    }

    pub(super) fn to_absolute(&self, point: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            point.x + f64::from(self.allocation.x),
            point.y + f64::from(self.allocation.y),
        )
    }

    /// Widens the scale so that it includes `value`. Returns whether a limit
    /// moved; the next layout pass then re-solves the axis.
    pub fn include_value(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let (min, max) = ordered_bounds(self.config.scale_begin, self.config.scale_end);
        let ascending = self.config.scale_begin <= self.config.scale_end;
        let slot = if value < min {
            if ascending {
                &mut self.config.scale_begin
            } else {
                &mut self.config.scale_end
            }
        } else if value > max {
            if ascending {
                &mut self.config.scale_end
            } else {
                &mut self.config.scale_begin
            }
        } else {
            return false;
        };
        *slot = value;
        self.needs_relayout = true;
        debug!(
            value,
            scale_begin = self.config.scale_begin,
            scale_end = self.config.scale_end,
            "scale widened to include value"
        );
        true
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::linear()
    }
}

#[cfg(test)]
mod tests {
    use super::Axis;

    #[test]
    fn include_value_moves_the_nearer_limit() {
        let mut axis = Axis::linear();
        assert!(!axis.include_value(50.0));
        assert!(axis.include_value(-10.0));
        assert_eq!(axis.config().scale_begin, -10.0);
        assert!(axis.include_value(250.0));
        assert_eq!(axis.config().scale_end, 250.0);
        assert!(axis.take_needs_relayout());
        assert!(!axis.take_needs_relayout());
    }

    #[test]
    fn descending_scale_keeps_its_direction() {
        let mut axis = Axis::linear();
        axis.config_mut().scale_begin = 100.0;
        axis.config_mut().scale_end = 0.0;
        assert!(axis.include_value(120.0));
        assert_eq!(axis.config().scale_begin, 120.0);
        assert_eq!(axis.config().scale_end, 0.0);
    }
}

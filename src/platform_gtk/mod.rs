//! GTK4 embedding: draws one [`Axis`] into a `DrawingArea`, re-running the
//! layout driver whenever the widget size changes.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk::prelude::*;
use tracing::warn;

use crate::api::{Axis, AxisLayoutDriver, AxisPalette, LayoutReport, build_axis_frame};
use crate::core::Allocation;
use crate::render::{PangoLabelMeasurer, draw_frame};

struct AxisWidgetState {
    axis: Axis,
    driver: AxisLayoutDriver<PangoLabelMeasurer>,
    palette: AxisPalette,
    allocation: Option<Allocation>,
    last_report: Option<LayoutReport>,
}

impl AxisWidgetState {
    fn relayout(&mut self, allocation: Allocation) {
        let stale = self.allocation != Some(allocation) || self.axis.needs_relayout();
        if stale {
            let report = self.driver.allocate_until_stable(&mut self.axis, allocation);
            self.allocation = (!report.is_aborted()).then_some(allocation);
            self.last_report = Some(report);
        }
    }
}

/// Owns a `DrawingArea` and the axis drawn into it.
pub struct GtkAxisAdapter {
    area: gtk::DrawingArea,
    state: Rc<RefCell<AxisWidgetState>>,
}

impl GtkAxisAdapter {
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        let font_size = axis.style().label_font_size;
        let state = Rc::new(RefCell::new(AxisWidgetState {
            axis,
            driver: AxisLayoutDriver::new().with_measurer(PangoLabelMeasurer::new(font_size)),
            palette: AxisPalette::default(),
            allocation: None,
            last_report: None,
        }));

        let area = gtk::DrawingArea::new();
        area.set_hexpand(true);
        area.set_vexpand(true);

        let draw_state = Rc::clone(&state);
        area.set_draw_func(move |_, context, width, height| {
            let mut state = draw_state.borrow_mut();
            state.relayout(Allocation::new(0, 0, width, height));
            let frame = match build_axis_frame(&state.axis, &state.palette) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!(error = %err, "failed to build axis frame");
                    return;
                }
            };
            if let Err(err) = draw_frame(context, &frame) {
                warn!(error = %err, "failed to draw axis frame");
            }
        });

        Self { area, state }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    pub fn set_palette(&self, palette: AxisPalette) {
        self.state.borrow_mut().palette = palette;
        self.area.queue_draw();
    }

    /// Runs `update` on the axis and schedules a redraw; the next draw lays
    /// the axis out again if `update` requested it.
    pub fn update_axis<T>(&self, update: impl FnOnce(&mut Axis) -> T) -> T {
        let result = update(&mut self.state.borrow_mut().axis);
        self.area.queue_draw();
        result
    }

    #[must_use]
    pub fn last_report(&self) -> Option<LayoutReport> {
        self.state.borrow().last_report.clone()
    }
}

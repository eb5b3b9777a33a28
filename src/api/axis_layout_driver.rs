use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::axis::Axis;
use super::axis_config::RelayoutLimits;
use super::label_measurer::{HeuristicLabelMeasurer, LabelMeasurer};
use crate::core::geometry::{
    self, Anchors, FreeSpace, TitleAllocation, free_space, line_length, title_allocation,
};
use crate::core::label::LabelFormatter;
use crate::core::mtics::{linear_minor_tic_values, log_minor_tic_values};
use crate::core::primitives::ordered_bounds;
use crate::core::scale::{MappingSpace, inner_direction};
use crate::core::solver::{
    LineLengthProbe, ScaleCandidate, ScaleSolution, SolveOutcome, SolveStatus, SolverLimits,
};
use crate::core::tic::{LabelAlign, Tic, TicKind, TicSpaceProbe};
use crate::core::tic_set::{
    MAX_TICS_PER_PASS, ReconcileReport, ReconcileRequest, TicProgression, TicSet,
    TicSetReconciler, TolerancePolicy, ValueMatcher,
};
use crate::core::types::{Allocation, Borders, LabelSize, PixelPoint};
use crate::error::{AxisError, AxisResult};

/// How a layout pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutStatus {
    /// The solver found a candidate inside the pixel window.
    Converged,
    /// The solver stopped early and committed its closest candidate.
    BestEffort,
    /// Manual tics lie entirely outside the scale; no solve was run.
    Skipped,
    /// Invalid input or solver failure; the axis was left untouched.
    Aborted,
    /// Every relayout pass changed the tic set.
    Unsettled,
}

/// Summary of one allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub status: LayoutStatus,
    pub solve: Option<SolveOutcome>,
    pub majors: ReconcileReport,
    pub minors: ReconcileReport,
    pub borders: Borders,
    pub free_space: FreeSpace,
    pub anchors: Anchors,
    pub title_allocation: Option<TitleAllocation>,
    pub minor_count: u32,
    pub needs_relayout: bool,
    pub passes: usize,
    pub error: Option<AxisError>,
}

impl LayoutReport {
    fn aborted(error: AxisError) -> Self {
        Self {
            status: LayoutStatus::Aborted,
            solve: None,
            majors: ReconcileReport::default(),
            minors: ReconcileReport::default(),
            borders: Borders::default(),
            free_space: FreeSpace::default(),
            anchors: Anchors::default(),
            title_allocation: None,
            minor_count: 0,
            needs_relayout: false,
            passes: 1,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.status == LayoutStatus::Aborted
    }
}

/// Scale, increment and minor tic plan of a successful solve.
#[derive(Debug, Clone, Copy)]
struct ScalePlan {
    outcome: SolveOutcome,
    minor_count: u32,
    mtics_range: (f64, f64),
}

/// Runs the per-allocation pipeline of an axis: solve the scale against the
/// pixel footprint of its begin and end tics, reconcile majors and minors,
/// measure labels, then place the line, the tics and the title.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLayoutDriver<M: LabelMeasurer = HeuristicLabelMeasurer> {
    measurer: M,
    solver_limits: SolverLimits,
    relayout_limits: RelayoutLimits,
    tolerance: TolerancePolicy,
}

impl AxisLayoutDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for AxisLayoutDriver {
    fn default() -> Self {
        Self {
            measurer: HeuristicLabelMeasurer::default(),
            solver_limits: SolverLimits::default(),
            relayout_limits: RelayoutLimits::default(),
            tolerance: TolerancePolicy::default(),
        }
    }
}

impl<M: LabelMeasurer> AxisLayoutDriver<M> {
    #[must_use]
    pub fn with_measurer<N: LabelMeasurer>(self, measurer: N) -> AxisLayoutDriver<N> {
        AxisLayoutDriver {
            measurer,
            solver_limits: self.solver_limits,
            relayout_limits: self.relayout_limits,
            tolerance: self.tolerance,
        }
    }

    #[must_use]
    pub fn with_solver_limits(mut self, limits: SolverLimits) -> Self {
        self.solver_limits = limits;
        self
    }

    #[must_use]
    pub fn with_relayout_limits(mut self, limits: RelayoutLimits) -> Self {
        self.relayout_limits = limits;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: TolerancePolicy) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// One layout pass for `allocation`. Invalid input or a failed solve
    /// leaves every persisted field and the tic set as they were.
    pub fn allocate(&self, axis: &mut Axis, allocation: Allocation) -> LayoutReport {
        if let Err(err) = check_inputs(axis, allocation) {
            warn!(error = %err, "axis layout aborted");
            return LayoutReport::aborted(err);
        }

        let title_size = axis
            .title_shown()
            .then(|| axis.title.as_ref().map(|title| self.measurer.measure(&title.markup)))
            .flatten();

        let config = &axis.config;
        let (scale_min, scale_max) = ordered_bounds(config.scale_begin, config.scale_end);
        let both_below = config.tics_begin <= scale_min && config.tics_end <= scale_min;
        let both_above = config.tics_begin >= scale_max && config.tics_end >= scale_max;
        let set_tics = config.tics_automatic || !(both_below || both_above);

        let plan = if set_tics {
            match self.plan_scale(axis, allocation, title_size) {
                Ok(plan) => Some(plan),
                Err(err) => {
                    warn!(error = %err, variant = ?axis.variant, "axis scale solve failed");
                    return LayoutReport::aborted(err);
                }
            }
        } else {
            debug!(
                tics_begin = config.tics_begin,
                tics_end = config.tics_end,
                "manual tics outside the scale, skipping solve"
            );
            None
        };

        axis.allocation = allocation;
        let inner = inner_direction(axis.config.outer_direction);

        let (majors, minors) = match plan {
            Some(plan) => {
                persist_plan(axis, &plan);
                self.reconcile_tics(axis, &plan, inner)
            }
            None => (
                clear_kind(&mut axis.tics, TicKind::Major),
                clear_kind(&mut axis.tics, TicKind::Minor),
            ),
        };

        for (_, tic) in axis.tics.iter_mut() {
            tic.inner_direction = inner;
            tic.label_align = LabelAlign::for_inner_direction(inner);
            tic.label_size = tic
                .label_markup()
                .map_or_else(LabelSize::default, |markup| self.measurer.measure(markup));
        }

        let force = axis.config.force_begin_end;
        let borders = if force {
            Borders::default()
        } else {
            let probe = TicSpaceProbe::new(axis.style.tics);
            probe.borders(axis.tics.iter_kind(TicKind::Major).map(|(_, tic)| tic))
        };

        let space = free_space(
            allocation,
            borders,
            title_size.filter(|_| !force),
            axis.config.outer_direction,
        );
        let anchors = if force {
            Anchors {
                begin: PixelPoint::new(axis.config.begin_pix_x, axis.config.begin_pix_y),
                end: PixelPoint::new(axis.config.end_pix_x, axis.config.end_pix_y),
            }
        } else {
            let anchors = geometry::anchors(space, axis.config.orientation);
            axis.config.begin_pix_x = anchors.begin.x;
            axis.config.begin_pix_y = anchors.begin.y;
            axis.config.end_pix_x = anchors.end.x;
            axis.config.end_pix_y = anchors.end.y;
            anchors
        };

        let title_rect = title_size.map(|size| {
            title_allocation(allocation, space, borders, size, axis.config.outer_direction)
        });
        if let Some(title) = axis.title.as_mut() {
            if let Some(size) = title_size {
                title.size = size;
            }
            title.allocation = title_rect;
        }

        place_tics(axis);

        let needs_relayout = majors.is_structural_change() || minors.is_structural_change();
        axis.needs_relayout = needs_relayout;

        let status = match plan.map(|plan| plan.outcome.status) {
            Some(SolveStatus::Converged) => LayoutStatus::Converged,
            Some(SolveStatus::BestEffort) => LayoutStatus::BestEffort,
            None => LayoutStatus::Skipped,
        };
        debug!(
            ?status,
            majors = majors.kept.len() + majors.added.len(),
            minors = minors.kept.len() + minors.added.len(),
            needs_relayout,
            "axis layout pass"
        );

        LayoutReport {
            status,
            solve: plan.map(|plan| plan.outcome),
            majors,
            minors,
            borders,
            free_space: space,
            anchors,
            title_allocation: title_rect,
            minor_count: plan.map_or(0, |plan| plan.minor_count),
            needs_relayout,
            passes: 1,
            error: None,
        }
    }

    /// Repeats [`Self::allocate`] while a pass changes the tic set, up to
    /// the relayout limit.
    pub fn allocate_until_stable(&self, axis: &mut Axis, allocation: Allocation) -> LayoutReport {
        let max_passes = self.relayout_limits.max_passes.max(1);
        let mut report = self.allocate(axis, allocation);
        let mut passes = 1;

        while !report.is_aborted() && axis.take_needs_relayout() {
            if passes >= max_passes {
                warn!(passes, "axis layout did not settle");
                report.status = LayoutStatus::Unsettled;
                break;
            }
            report = self.allocate(axis, allocation);
            passes += 1;
        }

        report.passes = passes;
        report
    }

    fn plan_scale(
        &self,
        axis: &Axis,
        allocation: Allocation,
        title: Option<LabelSize>,
    ) -> AxisResult<ScalePlan> {
        let request = axis.config.scale_request(&axis.style);
        let mut probe = TicFootprintProbe {
            axis,
            measurer: &self.measurer,
            allocation,
            title,
            template: Tic::major(0.0, "")
                .with_orientation(inner_direction(axis.config.outer_direction)),
            matcher: ValueMatcher::Relative {
                tolerance: self.tolerance.relative,
            },
        };
        let outcome =
            axis.variant
                .solve(&request, &mut probe, self.solver_limits, self.tolerance)?;
        let solution = outcome.solution;
        check_major_count(axis, &solution, self.tolerance.relative)?;

        let config = &axis.config;
        let (minor_count, mtics_range) = if config.mtics_automatic {
            let count = axis
                .variant
                .mtick_deriver(config.scale_increment_base)
                .derive(solution.increment)?;
            let range = match axis.variant.mapping_space() {
                MappingSpace::Linear => (solution.scale_begin, solution.scale_end),
                MappingSpace::Logarithmic => (solution.tics_begin, solution.tics_end),
            };
            (count, range)
        } else {
            (config.mtics, (config.mtics_begin, config.mtics_end))
        };

        Ok(ScalePlan {
            outcome,
            minor_count,
            mtics_range,
        })
    }

    fn reconcile_tics(
        &self,
        axis: &mut Axis,
        plan: &ScalePlan,
        inner: PixelPoint,
    ) -> (ReconcileReport, ReconcileReport) {
        let solution = plan.outcome.solution;
        let tolerance = self.tolerance.relative;
        let reconciler = TicSetReconciler::new(self.tolerance);
        let formatter = axis.formatter();
        let progression = axis.variant.progression(&solution);
        let scale_range = (solution.scale_begin, solution.scale_end);

        let major_values = intersect((solution.tics_begin, solution.tics_end), scale_range)
            .map(|range| (range, progression.values_within(range, tolerance, MAX_TICS_PER_PASS)));
        let majors = match &major_values {
            Some((range, values)) => reconciler.reconcile(
                &mut axis.tics,
                ReconcileRequest {
                    kind: TicKind::Major,
                    targets: values,
                    grid: Some(progression),
                    excluded_grid: None,
                    range: *range,
                },
                &Tic::major(0.0, "").with_orientation(inner),
                |value| Some(formatter.format(value)),
            ),
            None => clear_kind(&mut axis.tics, TicKind::Major),
        };

        let placed: Vec<f64> = major_values.map(|(_, values)| values).unwrap_or_default();
        let minors = match intersect(plan.mtics_range, scale_range) {
            Some(range) => {
                let (targets, grid, excluded_grid) = match progression {
                    TicProgression::Additive { begin, step } => (
                        linear_minor_tic_values(
                            &placed,
                            step,
                            plan.minor_count,
                            plan.mtics_range,
                            scale_range,
                            tolerance,
                        ),
                        Some(TicProgression::Additive {
                            begin,
                            step: step / f64::from(plan.minor_count + 1),
                        }),
                        Some(progression),
                    ),
                    TicProgression::Multiplicative { factor, .. } => (
                        log_minor_tic_values(
                            &placed,
                            factor,
                            solution.increment,
                            plan.minor_count,
                            range,
                            tolerance,
                        ),
                        None,
                        None,
                    ),
                };
                reconciler.reconcile(
                    &mut axis.tics,
                    ReconcileRequest {
                        kind: TicKind::Minor,
                        targets: &targets,
                        grid,
                        excluded_grid,
                        range,
                    },
                    &Tic::minor(0.0).with_orientation(inner),
                    |_| None,
                )
            }
            None => clear_kind(&mut axis.tics, TicKind::Minor),
        };

        trace!(
            majors_added = majors.added.len(),
            majors_removed = majors.removed.len(),
            minors_added = minors.added.len(),
            minors_removed = minors.removed.len(),
            relabeled = majors.relabeled,
            "tics reconciled"
        );
        (majors, minors)
    }
}

/// Fails instead of letting the major tics be truncated to a prefix of
/// the scale.
fn check_major_count(axis: &Axis, solution: &ScaleSolution, tolerance: f64) -> AxisResult<()> {
    let scale_range = (solution.scale_begin, solution.scale_end);
    let Some(range) = intersect((solution.tics_begin, solution.tics_end), scale_range) else {
        return Ok(());
    };
    let count = axis
        .variant
        .progression(solution)
        .count_within(range, tolerance);
    if count > MAX_TICS_PER_PASS {
        warn!(
            count,
            limit = MAX_TICS_PER_PASS,
            increment = solution.increment,
            "increment yields too many major tics"
        );
        return Err(AxisError::InvalidIncrement(solution.increment));
    }
    Ok(())
}

fn check_inputs(axis: &Axis, allocation: Allocation) -> AxisResult<()> {
    if !allocation.is_valid() {
        return Err(AxisError::InvalidGeometry(format!(
            "allocation must have a non-negative size, got {}x{}",
            allocation.width, allocation.height
        )));
    }
    axis.config.validate()?;
    axis.style.validate()
}

fn persist_plan(axis: &mut Axis, plan: &ScalePlan) {
    let solution = plan.outcome.solution;
    let config = &mut axis.config;
    config.scale_begin = solution.scale_begin;
    config.scale_end = solution.scale_end;
    config.scale_increment = solution.increment;
    config.tics_begin = solution.tics_begin;
    config.tics_end = solution.tics_end;
    config.mtics = plan.minor_count;
    config.mtics_begin = plan.mtics_range.0;
    config.mtics_end = plan.mtics_range.1;
}

/// Moves every tic onto the line and refreshes its visibility.
fn place_tics(axis: &mut Axis) {
    let mapper = axis.mapper();
    let origin_x = f64::from(axis.allocation.x);
    let origin_y = f64::from(axis.allocation.y);
    let visible = axis.visible;
    for (_, tic) in axis.tics.iter_mut() {
        let mapped = mapper.to_pixel(tic.value);
        tic.screen_pos = PixelPoint::new(mapped.point.x + origin_x, mapped.point.y + origin_y);
        tic.visible = visible && mapped.in_range;
    }
}

/// Overlap of two inclusive ranges of any direction.
fn intersect(a: (f64, f64), b: (f64, f64)) -> Option<(f64, f64)> {
    let (a_min, a_max) = ordered_bounds(a.0, a.1);
    let (b_min, b_max) = ordered_bounds(b.0, b.1);
    let low = a_min.max(b_min);
    let high = a_max.min(b_max);
    (low <= high).then_some((low, high))
}

fn clear_kind(set: &mut TicSet, kind: TicKind) -> ReconcileReport {
    let removed = set
        .ids_of_kind(kind)
        .into_iter()
        .filter_map(|id| set.remove(id))
        .collect();
    ReconcileReport {
        removed,
        ..ReconcileReport::default()
    }
}

/// Line length left for a candidate once its begin and end tics, and the
/// title, have claimed their share of the allocation.
struct TicFootprintProbe<'a, M> {
    axis: &'a Axis,
    measurer: &'a M,
    allocation: Allocation,
    title: Option<LabelSize>,
    template: Tic,
    matcher: ValueMatcher,
}

impl<M: LabelMeasurer> TicFootprintProbe<'_, M> {
    fn footprint_tic(&self, value: f64, formatter: &LabelFormatter) -> Tic {
        let label = formatter.format(value);
        let cached = self
            .axis
            .tics
            .iter_kind(TicKind::Major)
            .map(|(_, tic)| tic)
            .find(|tic| {
                self.matcher.same_value(tic.value, value) && tic.label.as_deref() == Some(&label)
            })
            .map(|tic| tic.label_size);
        let size = cached.unwrap_or_else(|| self.measurer.measure(&label));

        let mut tic = self.template.clone().with_label_size(size);
        tic.value = value;
        tic.label = Some(label);
        tic
    }
}

impl<M: LabelMeasurer> LineLengthProbe for TicFootprintProbe<'_, M> {
    fn line_length(&mut self, candidate: &ScaleCandidate) -> AxisResult<f64> {
        let config = &self.axis.config;
        if config.force_begin_end {
            return Ok(PixelPoint::new(config.begin_pix_x, config.begin_pix_y)
                .distance_to(PixelPoint::new(config.end_pix_x, config.end_pix_y)));
        }

        let formatter = self.axis.variant.formatter(
            candidate.tics_begin,
            candidate.tics_end,
            config.scale_increment_base,
        );
        let begin = self.footprint_tic(candidate.tics_begin, &formatter);
        let end = self.footprint_tic(candidate.tics_end, &formatter);
        let borders = TicSpaceProbe::new(self.axis.style.tics).borders([&begin, &end]);
        let space = free_space(self.allocation, borders, self.title, config.outer_direction);
        Ok(line_length(space, config.orientation))
    }
}

#[cfg(test)]
mod tests {
    use super::intersect;

    #[test]
    fn intersection_ignores_direction() {
        assert_eq!(intersect((100.0, 0.0), (50.0, 150.0)), Some((50.0, 100.0)));
        assert_eq!(intersect((0.0, 1.0), (2.0, 3.0)), None);
        assert_eq!(intersect((0.0, 1.0), (1.0, 3.0)), Some((1.0, 1.0)));
    }
}

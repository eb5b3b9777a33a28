//! Arena of materialised tics and the value-keyed reconciliation pass.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::primitives::{DEFAULT_STEP_TOLERANCE, contains_with_slack, is_on_grid};
use crate::core::tic::{Tic, TicKind};

/// Upper bound on target values accepted by one reconciliation pass.
pub const MAX_TICS_PER_PASS: usize = 10_000;

/// Stable handle of a tic inside a [`TicSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicId(u64);

impl TicId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Insertion-ordered arena of the tics owned by one axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicSet {
    tics: IndexMap<TicId, Tic>,
    next_id: u64,
}

impl TicSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tics.is_empty()
    }

    pub fn insert(&mut self, tic: Tic) -> TicId {
        let id = TicId(self.next_id);
        self.next_id += 1;
        self.tics.insert(id, tic);
        id
    }

    /// Removes a tic, keeping the insertion order of the remaining ones.
    pub fn remove(&mut self, id: TicId) -> Option<Tic> {
        self.tics.shift_remove(&id)
    }

    #[must_use]
    pub fn get(&self, id: TicId) -> Option<&Tic> {
        self.tics.get(&id)
    }

    pub fn get_mut(&mut self, id: TicId) -> Option<&mut Tic> {
        self.tics.get_mut(&id)
    }

    pub fn clear(&mut self) {
        self.tics.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (TicId, &Tic)> {
        self.tics.iter().map(|(id, tic)| (*id, tic))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TicId, &mut Tic)> {
        self.tics.iter_mut().map(|(id, tic)| (*id, tic))
    }

    pub fn iter_kind(&self, kind: TicKind) -> impl Iterator<Item = (TicId, &Tic)> {
        self.iter().filter(move |(_, tic)| tic.kind == kind)
    }

    #[must_use]
    pub fn ids_of_kind(&self, kind: TicKind) -> Vec<TicId> {
        self.iter_kind(kind).map(|(id, _)| id).collect()
    }

    /// Ids of `kind` ordered by value, ties broken by creation order.
    #[must_use]
    pub fn ordered_ids(&self, kind: TicKind) -> Vec<TicId> {
        let mut ids: Vec<(OrderedFloat<f64>, TicId)> = self
            .iter_kind(kind)
            .map(|(id, tic)| (OrderedFloat(tic.value), id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Visible tics of `kind` in value order.
    #[must_use]
    pub fn visible_ids(&self, kind: TicKind) -> Vec<TicId> {
        self.ordered_ids(kind)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|tic| tic.visible))
            .collect()
    }

    /// Values of `kind` in value order.
    #[must_use]
    pub fn values(&self, kind: TicKind) -> Vec<f64> {
        self.ordered_ids(kind)
            .into_iter()
            .filter_map(|id| self.get(id).map(|tic| tic.value))
            .collect()
    }

    /// First tic of `kind` whose value matches `value` under `matcher`.
    #[must_use]
    pub fn find_value(&self, kind: TicKind, value: f64, matcher: &ValueMatcher) -> Option<TicId> {
        self.iter_kind(kind)
            .find(|(_, tic)| matcher.same_value(tic.value, value))
            .map(|(id, _)| id)
    }
}

/// Sequence that target values are generated from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TicProgression {
    /// `begin + k * step`.
    Additive { begin: f64, step: f64 },
    /// `begin * factor^k`.
    Multiplicative { begin: f64, factor: f64 },
}

impl TicProgression {
    /// Position of `value` measured in steps from the progression begin.
    #[must_use]
    pub fn steps_from_begin(&self, value: f64) -> f64 {
        match *self {
            Self::Additive { begin, step } => (value - begin) / step,
            Self::Multiplicative { begin, factor } => {
                if value <= 0.0 || begin <= 0.0 {
                    return f64::NAN;
                }
                (value / begin).ln() / factor.ln()
            }
        }
    }

    /// Whether `value` is `begin` advanced by a whole number of steps.
    #[must_use]
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        is_on_grid(self.steps_from_begin(value), tolerance)
    }

    /// Number of progression members inside `range`, before any cap.
    #[must_use]
    pub fn count_within(&self, range: (f64, f64), tolerance: f64) -> usize {
        self.step_bounds(range, tolerance)
            .map_or(0, |(low, high)| ((high - low) as usize).saturating_add(1))
    }

    /// Members of the progression inside `range` (inclusive, with the step
    /// tolerance), in progression order and capped at `limit` values.
    #[must_use]
    pub fn values_within(&self, range: (f64, f64), tolerance: f64, limit: usize) -> Vec<f64> {
        let Some((low, high)) = self.step_bounds(range, tolerance) else {
            return Vec::new();
        };

        let count = ((high - low) as usize).saturating_add(1).min(limit);
        (0..count)
            .map(|offset| {
                let k = low + offset as f64;
                match *self {
                    Self::Additive { begin, step } => begin + k * step,
                    Self::Multiplicative { begin, factor } => begin * factor.powi(k as i32),
                }
            })
            .collect()
    }

    fn step_bounds(&self, range: (f64, f64), tolerance: f64) -> Option<(f64, f64)> {
        let first = self.steps_from_begin(range.0);
        let second = self.steps_from_begin(range.1);
        if !first.is_finite() || !second.is_finite() {
            return None;
        }
        let low = (first.min(second) - tolerance).ceil();
        let high = (first.max(second) + tolerance).floor();
        (low <= high).then_some((low, high))
    }

    #[must_use]
    pub fn matcher(&self, tolerance: f64) -> ValueMatcher {
        match *self {
            Self::Additive { step, .. } => ValueMatcher::Additive {
                step: step.abs(),
                tolerance,
            },
            Self::Multiplicative { factor, .. } => ValueMatcher::Multiplicative {
                log_factor: factor.ln().abs(),
                tolerance,
            },
        }
    }
}

/// Value equality under a floating tolerance scaled to the tic spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueMatcher {
    Additive { step: f64, tolerance: f64 },
    Multiplicative { log_factor: f64, tolerance: f64 },
    Relative { tolerance: f64 },
}

impl ValueMatcher {
    #[must_use]
    pub fn same_value(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        match *self {
            Self::Additive { step, tolerance } => step > 0.0 && (a - b).abs() / step < tolerance,
            Self::Multiplicative {
                log_factor,
                tolerance,
            } => {
                a > 0.0 && b > 0.0 && log_factor > 0.0 && (a / b).ln().abs() / log_factor < tolerance
            }
            Self::Relative { tolerance } => (a - b).abs() <= tolerance * a.abs().max(b.abs()),
        }
    }

    /// Absolute slack applied to range checks around `value`.
    #[must_use]
    pub fn slack(&self, value: f64) -> f64 {
        match *self {
            Self::Additive { step, tolerance } => step * tolerance,
            Self::Multiplicative {
                log_factor,
                tolerance,
            } => value.abs() * log_factor * tolerance,
            Self::Relative { tolerance } => value.abs() * tolerance,
        }
    }
}

/// Floating tolerance used when matching tic values, in units of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TolerancePolicy {
    pub relative: f64,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        Self {
            relative: DEFAULT_STEP_TOLERANCE,
        }
    }
}

/// Target state for one kind of tic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileRequest<'a> {
    pub kind: TicKind,
    pub targets: &'a [f64],
    /// Grid existing tics must sit on; `None` matches against targets only.
    pub grid: Option<TicProgression>,
    /// Grid whose positions are reserved for other tics (majors for minors).
    pub excluded_grid: Option<TicProgression>,
    /// Inclusive value range; direction does not matter.
    pub range: (f64, f64),
}

/// Partition of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub kept: Vec<TicId>,
    pub added: Vec<TicId>,
    pub removed: Vec<Tic>,
    pub relabeled: usize,
}

impl ReconcileReport {
    /// Whether tics were created or destroyed.
    #[must_use]
    pub fn is_structural_change(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Matches existing tics against target values, creating, keeping and
/// destroying tics so that every target has exactly one tic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TicSetReconciler {
    policy: TolerancePolicy,
}

impl TicSetReconciler {
    #[must_use]
    pub fn new(policy: TolerancePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> TolerancePolicy {
        self.policy
    }

    /// Runs one pass. `make_label` supplies the label of created tics and the
    /// refreshed label of kept ones; `template` is cloned for new tics.
    pub fn reconcile(
        &self,
        set: &mut TicSet,
        request: ReconcileRequest<'_>,
        template: &Tic,
        mut make_label: impl FnMut(f64) -> Option<String>,
    ) -> ReconcileReport {
        let tolerance = self.policy.relative;
        let matcher = request
            .grid
            .map_or(ValueMatcher::Relative { tolerance }, |grid| {
                grid.matcher(tolerance)
            });

        let targets = if request.targets.len() > MAX_TICS_PER_PASS {
            warn!(
                requested = request.targets.len(),
                limit = MAX_TICS_PER_PASS,
                "truncating tic targets"
            );
            &request.targets[..MAX_TICS_PER_PASS]
        } else {
            request.targets
        };

        let mut report = ReconcileReport::default();
        let mut approved: Vec<TicId> = Vec::new();

        for id in set.ids_of_kind(request.kind) {
            let Some(value) = set.get(id).map(|tic| tic.value) else {
                continue;
            };
            let in_range =
                contains_with_slack(request.range.0, request.range.1, value, matcher.slack(value));
            let on_grid = request
                .grid
                .is_none_or(|grid| grid.contains(value, tolerance));
            let reserved = request
                .excluded_grid
                .is_some_and(|grid| grid.contains(value, tolerance));
            let duplicate = approved.iter().any(|other| {
                set.get(*other)
                    .is_some_and(|tic| matcher.same_value(tic.value, value))
            });

            if in_range && on_grid && !reserved && !duplicate {
                approved.push(id);
            } else if let Some(tic) = set.remove(id) {
                trace!(value, in_range, on_grid, reserved, duplicate, "drop tic");
                report.removed.push(tic);
            }
        }

        let mut placed: Vec<f64> = Vec::with_capacity(targets.len());
        for &target in targets {
            if placed.iter().any(|value| matcher.same_value(*value, target)) {
                continue;
            }
            placed.push(target);

            let claimed = approved.iter().position(|id| {
                set.get(*id)
                    .is_some_and(|tic| matcher.same_value(tic.value, target))
            });

            match claimed {
                Some(index) => {
                    let id = approved.remove(index);
                    if let Some(tic) = set.get_mut(id) {
                        tic.value = target;
                        if tic.is_major() {
                            let label = make_label(target);
                            if tic.label != label {
                                tic.label = label;
                                report.relabeled += 1;
                            }
                        }
                    }
                    report.kept.push(id);
                }
                None => {
                    let mut tic = template.clone();
                    tic.kind = request.kind;
                    tic.value = target;
                    tic.label = match request.kind {
                        TicKind::Major => make_label(target),
                        TicKind::Minor => None,
                    };
                    let id = set.insert(tic);
                    trace!(value = target, "create tic");
                    report.added.push(id);
                }
            }
        }

        for id in approved {
            if let Some(tic) = set.remove(id) {
                trace!(value = tic.value, "drop unclaimed tic");
                report.removed.push(tic);
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::{ReconcileRequest, TicProgression, TicSet, TicSetReconciler, ValueMatcher};
    use crate::core::tic::{Tic, TicKind};

    #[test]
    fn ordered_ids_sort_by_value() {
        let mut set = TicSet::new();
        let high = set.insert(Tic::major(30.0, "30"));
        let low = set.insert(Tic::major(10.0, "10"));
        assert_eq!(set.ordered_ids(TicKind::Major), vec![low, high]);
    }

    #[test]
    fn multiplicative_grid_detects_decades() {
        let grid = TicProgression::Multiplicative {
            begin: 1.0,
            factor: 10.0,
        };
        assert!(grid.contains(1000.0, 1e-9));
        assert!(!grid.contains(500.0, 1e-9));
    }

    #[test]
    fn progression_values_stay_inside_range() {
        let additive = TicProgression::Additive {
            begin: 100.0,
            step: -20.0,
        };
        assert_eq!(
            additive.values_within((0.0, 100.0), 1e-9, 100),
            vec![100.0, 80.0, 60.0, 40.0, 20.0, 0.0]
        );

        let decades = TicProgression::Multiplicative {
            begin: 1.0,
            factor: 10.0,
        };
        assert_eq!(
            decades.values_within((1.0, 1000.0), 1e-9, 100),
            vec![1.0, 10.0, 100.0, 1000.0]
        );
        assert_eq!(decades.values_within((1.0, 1000.0), 1e-9, 2).len(), 2);
        assert_eq!(decades.count_within((1.0, 1000.0), 1e-9), 4);
    }

    #[test]
    fn additive_matcher_scales_with_step() {
        let matcher = ValueMatcher::Additive {
            step: 0.1,
            tolerance: 1e-9,
        };
        assert!(matcher.same_value(0.30000000000000004, 0.3));
        assert!(!matcher.same_value(0.3, 0.31));
    }

    #[test]
    fn duplicate_targets_create_one_tic() {
        let mut set = TicSet::new();
        let report = TicSetReconciler::default().reconcile(
            &mut set,
            ReconcileRequest {
                kind: TicKind::Major,
                targets: &[0.0, 0.0, 10.0],
                grid: Some(TicProgression::Additive {
                    begin: 0.0,
                    step: 10.0,
                }),
                excluded_grid: None,
                range: (0.0, 10.0),
            },
            &Tic::major(0.0, ""),
            |value| Some(format!("{value}")),
        );
        assert_eq!(report.added.len(), 2);
        assert_eq!(set.len(), 2);
    }
}

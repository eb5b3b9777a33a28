use tracing::{debug, trace, warn};

use super::{
    BestCandidate, Commit, LineLengthProbe, ScaleCandidate, ScaleRequest, ScaleSolver,
    SearchState, SolveOutcome, SolverLimits, finish, pixel_gap,
};
use crate::core::primitives::{
    ceil_with_tolerance, floor_with_tolerance, is_close, magnitude_exponent, power_of,
};
use crate::core::tic_set::TolerancePolicy;
use crate::error::{AxisError, AxisResult};

const FALLBACK_LOG_BEGIN: f64 = 0.01;
const FALLBACK_LOG_END: f64 = 100.0;

/// Replaces non-positive limits so that a log scale is defined: a
/// non-positive end becomes `100 * begin`, a non-positive begin becomes
/// `0.01 * end`, and `[0.01, 100]` is used when both are unusable.
#[must_use]
pub fn correct_log_range(begin: f64, end: f64) -> (f64, f64) {
    let begin_ok = begin > 0.0 && begin.is_finite();
    let end_ok = end > 0.0 && end.is_finite();
    match (begin_ok, end_ok) {
        (true, true) => (begin, end),
        (true, false) => (begin, FALLBACK_LOG_END * begin),
        (false, true) => (FALLBACK_LOG_BEGIN * end, end),
        (false, false) => (FALLBACK_LOG_BEGIN, FALLBACK_LOG_END),
    }
}

/// Multiplicative counterpart of the linear search: increments are powers of
/// the base and tics step by `value *= increment`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogScaleSolver {
    limits: SolverLimits,
    tolerance: TolerancePolicy,
}

#[derive(Debug, Clone, Copy)]
struct LogProposal {
    candidate: ScaleCandidate,
    /// Number of increments between the down-scaled begin and end.
    down_scaled_steps: f64,
}

impl LogScaleSolver {
    #[must_use]
    pub fn new(limits: SolverLimits) -> Self {
        Self {
            limits,
            tolerance: TolerancePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: TolerancePolicy) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Rounds `value` to a power of `increment`, outward or inward.
    fn round_to_power(&self, value: f64, increment: f64, up: bool) -> f64 {
        let steps = value.ln() / increment.ln();
        let steps = if up {
            ceil_with_tolerance(steps, self.tolerance.relative)
        } else {
            floor_with_tolerance(steps, self.tolerance.relative)
        };
        power_of(increment, steps as i32)
    }

    fn rounded_pair(&self, begin: f64, end: f64, increment: f64, outward: bool) -> (f64, f64) {
        let ascending = begin <= end;
        let begin_up = ascending != outward;
        (
            self.round_to_power(begin, increment, begin_up),
            self.round_to_power(end, increment, !begin_up),
        )
    }

    fn propose(
        &self,
        request: &ScaleRequest,
        begin: f64,
        end: f64,
        down_scaled_difference: f64,
    ) -> AxisResult<LogProposal> {
        let increment = if request.auto_increment {
            down_scaled_difference
        } else {
            request.increment
        };
        if !increment.is_finite() || increment <= 1.0 {
            return Err(AxisError::InvalidIncrement(increment));
        }

        let (scale_begin, scale_end) = if request.auto_limits {
            self.rounded_pair(begin, end, increment, true)
        } else {
            (begin, end)
        };
        let (down_scaled_begin, down_scaled_end) =
            self.rounded_pair(scale_begin, scale_end, down_scaled_difference, true);

        let (tics_begin, tics_end) = if !request.tics_automatic {
            (request.tics_begin, request.tics_end)
        } else if request.auto_limits {
            (down_scaled_begin, down_scaled_end)
        } else {
            self.rounded_pair(scale_begin, scale_end, increment, false)
        };

        if [scale_begin, scale_end, tics_begin, tics_end]
            .iter()
            .any(|value| !value.is_finite() || *value <= 0.0)
        {
            return Err(AxisError::NonFiniteCandidate {
                stage: "log candidate limits",
            });
        }

        Ok(LogProposal {
            candidate: ScaleCandidate {
                scale_begin,
                scale_end,
                increment,
                tics_begin,
                tics_end,
            },
            down_scaled_steps: (down_scaled_end / down_scaled_begin).ln().abs()
                / down_scaled_difference.ln(),
        })
    }

    fn measure(
        probe: &mut dyn LineLengthProbe,
        candidate: &ScaleCandidate,
    ) -> AxisResult<(f64, f64)> {
        let line_length = probe.line_length(candidate)?;
        let gap = pixel_gap(
            line_length,
            candidate.increment.ln(),
            (candidate.scale_end / candidate.scale_begin).ln().abs(),
        )?;
        Ok((line_length, gap))
    }
}

impl ScaleSolver for LogScaleSolver {
    fn solve(
        &self,
        request: &ScaleRequest,
        probe: &mut dyn LineLengthProbe,
    ) -> AxisResult<SolveOutcome> {
        let (begin, end) = correct_log_range(request.scale_begin, request.scale_end);
        if (begin, end) != (request.scale_begin, request.scale_end) {
            warn!(
                requested_begin = request.scale_begin,
                requested_end = request.scale_end,
                begin,
                end,
                "log scale limits must be positive; substituting a defined range"
            );
        }
        let corrected = ScaleRequest {
            scale_begin: begin,
            scale_end: end,
            ..*request
        };
        corrected.validate()?;
        let request = &corrected;

        let base = request.increment_base;
        let ratio = if end > begin { end / begin } else { begin / end };
        let magnitude = magnitude_exponent(ratio, base);

        let mut suppression = 0i32;
        let mut iterations = 0usize;
        let mut proposal: Option<LogProposal> = None;
        let mut commit: Option<Commit> = None;
        let mut best: Option<BestCandidate> = None;
        let mut failure: Option<AxisError> = None;
        let mut state = SearchState::Init;

        loop {
            state = match state {
                SearchState::Init => SearchState::ProposeIncrement,
                SearchState::ProposeIncrement => {
                    let down_scaled_difference = power_of(base, magnitude - suppression);
                    if self.limits.exhausted(iterations) {
                        warn!(iterations, "log scale search hit its iteration cap");
                        SearchState::Reject
                    } else if is_close(down_scaled_difference, 1.0, self.tolerance.relative)
                        || down_scaled_difference < 1.0
                    {
                        if commit.is_some() {
                            SearchState::Converged
                        } else {
                            // The range is narrower than one power of the
                            // base: fall back to a single step of the base.
                            iterations += 1;
                            match self.propose(request, begin, end, base) {
                                Ok(next) => {
                                    proposal = Some(next);
                                    SearchState::Measure
                                }
                                Err(err) => {
                                    failure = Some(err);
                                    SearchState::Aborted
                                }
                            }
                        }
                    } else {
                        iterations += 1;
                        match self.propose(request, begin, end, down_scaled_difference) {
                            Ok(next) => {
                                proposal = Some(next);
                                SearchState::Measure
                            }
                            Err(err) => {
                                failure = Some(err);
                                SearchState::Aborted
                            }
                        }
                    }
                }
                SearchState::Measure => {
                    let Some(current) = proposal else {
                        return Err(AxisError::NonFiniteCandidate {
                            stage: "missing proposal",
                        });
                    };
                    let candidate = current.candidate;
                    match Self::measure(probe, &candidate) {
                        Err(err) => {
                            failure = Some(err);
                            SearchState::Aborted
                        }
                        Ok((line_length, gap)) => {
                            BestCandidate::offer(&mut best, request, candidate, gap);
                            trace!(
                                iteration = iterations,
                                increment = candidate.increment,
                                scale_begin = candidate.scale_begin,
                                scale_end = candidate.scale_end,
                                line_length,
                                pixel_gap = gap,
                                suppression,
                                "log scale candidate"
                            );

                            let single_step =
                                is_close(current.down_scaled_steps, 1.0, self.tolerance.relative);
                            if single_step && request.below_window(gap) {
                                warn!(
                                    pixel_gap = gap,
                                    min_pixel_gap = request.min_pixel_gap,
                                    "scale-min-diff-pix / scale-max-diff-pix cannot be fulfilled; reconsider the automatic axis options"
                                );
                                commit = Some(Commit {
                                    candidate,
                                    pixel_gap: gap,
                                });
                                SearchState::Accept
                            } else if !request.auto_increment
                                || !request.auto_limits
                                || request.force_begin_end
                            {
                                commit = Some(Commit {
                                    candidate,
                                    pixel_gap: gap,
                                });
                                SearchState::Accept
                            } else if request.below_window(gap) {
                                SearchState::Reject
                            } else {
                                if request.in_window(gap) {
                                    commit = Some(Commit {
                                        candidate,
                                        pixel_gap: gap,
                                    });
                                }
                                if candidate.increment <= base {
                                    // A single base step was measured; nothing finer exists.
                                    SearchState::Converged
                                } else {
                                    suppression += 1;
                                    SearchState::ProposeIncrement
                                }
                            }
                        }
                    }
                }
                SearchState::Accept | SearchState::Converged => break,
                SearchState::Reject => {
                    if commit.is_none() {
                        warn!(
                            min_pixel_gap = request.min_pixel_gap,
                            max_pixel_gap = request.max_pixel_gap,
                            "no log increment satisfies the pixel window; using closest candidate"
                        );
                    }
                    break;
                }
                SearchState::Aborted => {
                    let err = failure.take().unwrap_or(AxisError::NonFiniteCandidate {
                        stage: "log search",
                    });
                    warn!(error = %err, iteration = iterations, "log scale search aborted");
                    return Err(err);
                }
            };
        }

        let outcome = finish(request, commit, best, iterations)?;
        debug!(
            iterations = outcome.iterations,
            increment = outcome.solution.increment,
            scale_begin = outcome.solution.scale_begin,
            scale_end = outcome.solution.scale_end,
            status = ?outcome.status,
            "log scale solved"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::correct_log_range;

    #[test]
    fn non_positive_limits_are_replaced() {
        assert_eq!(correct_log_range(-5.0, 10.0), (0.1, 10.0));
        assert_eq!(correct_log_range(2.0, 0.0), (2.0, 200.0));
        assert_eq!(correct_log_range(0.0, -1.0), (0.01, 100.0));
        assert_eq!(correct_log_range(1.0, 1000.0), (1.0, 1000.0));
    }
}

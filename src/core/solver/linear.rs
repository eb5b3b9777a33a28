use tracing::{debug, trace, warn};

use super::{
    BestCandidate, Commit, LineLengthProbe, ScaleCandidate, ScaleRequest, ScaleSolver,
    SearchState, SolveOutcome, SolverLimits, finish, pixel_gap,
};
use crate::core::primitives::{
    ceil_with_tolerance, floor_with_tolerance, is_close, magnitude_exponent,
    magnitude_exponent_ceil, power_of, scale_by_power_of_ten,
};
use crate::core::tic_set::TolerancePolicy;
use crate::error::{AxisError, AxisResult};

/// Direction in which the mantissa/exponent cycle walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchDirection {
    /// Increments shrink: `base^floor(log span) * 10^exp / mantissa`.
    Finer,
    /// Increments grow: `base^ceil(log span) * 10^exp * mantissa`.
    Coarser,
}

/// Mantissa/exponent state of the linear search.
#[derive(Debug, Clone, Copy)]
struct MantissaCycle {
    mantissa: f64,
    exponent: i32,
    direction: SearchDirection,
}

impl MantissaCycle {
    fn new() -> Self {
        Self {
            mantissa: 1.0,
            exponent: 0,
            direction: SearchDirection::Finer,
        }
    }

    /// 1 -> 2 -> 4 -> 5 -> 1, moving the exponent on wrap-around.
    fn advance(&mut self) {
        self.mantissa = if self.mantissa == 1.0 {
            2.0
        } else if self.mantissa == 2.0 {
            4.0
        } else if self.mantissa == 4.0 {
            5.0
        } else {
            match self.direction {
                SearchDirection::Finer => self.exponent -= 1,
                SearchDirection::Coarser => self.exponent += 1,
            }
            1.0
        };
    }

    fn switch_to_coarser(&mut self) {
        self.direction = SearchDirection::Coarser;
        self.exponent = -1;
        self.mantissa = 1.0;
    }
}

/// Candidate of one iteration plus the down-scaled pair it was derived from.
#[derive(Debug, Clone, Copy)]
struct Proposal {
    candidate: ScaleCandidate,
    down_scaled_difference: f64,
    down_scaled_span: f64,
}

/// Nice-number search for additive axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearScaleSolver {
    limits: SolverLimits,
    tolerance: TolerancePolicy,
}

impl LinearScaleSolver {
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

    fn propose(&self, request: &ScaleRequest, cycle: &MantissaCycle) -> AxisResult<Proposal> {
        let tolerance = self.tolerance.relative;
        let base = request.increment_base;
        let span = (request.scale_end - request.scale_begin).abs();

        let down_scaled_difference = match cycle.direction {
            SearchDirection::Finer => {
                let magnitude = power_of(base, magnitude_exponent(span, base));
                scale_by_power_of_ten(magnitude, cycle.exponent) / cycle.mantissa
            }
            SearchDirection::Coarser => {
                let magnitude = power_of(base, magnitude_exponent_ceil(span, base));
                scale_by_power_of_ten(magnitude, cycle.exponent) * cycle.mantissa
            }
        };
        if !down_scaled_difference.is_finite() || down_scaled_difference <= 0.0 {
            return Err(AxisError::NonFiniteCandidate {
                stage: "down-scaled difference",
            });
        }

        let increment = if request.auto_increment {
            down_scaled_difference
        } else {
            request.increment
        };

        let ascending = request.scale_begin <= request.scale_end;
        let round_outward = request.auto_limits == ascending;
        let (begin_steps, end_steps) = if round_outward {
            (
                floor_with_tolerance(request.scale_begin / increment, tolerance),
                ceil_with_tolerance(request.scale_end / increment, tolerance),
            )
        } else {
            (
                ceil_with_tolerance(request.scale_begin / increment, tolerance),
                floor_with_tolerance(request.scale_end / increment, tolerance),
            )
        };
        let mut scale_begin = begin_steps * increment;
        let mut scale_end = end_steps * increment;

        let (down_begin_steps, down_end_steps) = if scale_begin <= scale_end {
            (
                floor_with_tolerance(scale_begin / down_scaled_difference, tolerance),
                ceil_with_tolerance(scale_end / down_scaled_difference, tolerance),
            )
        } else {
            (
                ceil_with_tolerance(scale_begin / down_scaled_difference, tolerance),
                floor_with_tolerance(scale_end / down_scaled_difference, tolerance),
            )
        };
        let down_scaled_begin = down_begin_steps * down_scaled_difference;
        let down_scaled_end = down_end_steps * down_scaled_difference;

        if request.auto_limits && request.auto_increment {
            scale_begin = down_scaled_begin;
            scale_end = down_scaled_end;
        }

        let (tics_begin, tics_end) = if request.tics_automatic {
            (scale_begin, scale_end)
        } else {
            (request.tics_begin, request.tics_end)
        };
        let (scale_begin, scale_end) = if request.auto_limits {
            (scale_begin, scale_end)
        } else {
            (request.scale_begin, request.scale_end)
        };

        let candidate = ScaleCandidate {
            scale_begin,
            scale_end,
            increment,
            tics_begin,
            tics_end,
        };
        if [scale_begin, scale_end, tics_begin, tics_end, increment]
            .iter()
            .any(|value| !value.is_finite())
        {
            return Err(AxisError::NonFiniteCandidate {
                stage: "candidate limits",
            });
        }

        Ok(Proposal {
            candidate,
            down_scaled_difference,
            down_scaled_span: (down_scaled_end - down_scaled_begin).abs(),
        })
    }
}

impl ScaleSolver for LinearScaleSolver {
    fn solve(
        &self,
        request: &ScaleRequest,
        probe: &mut dyn LineLengthProbe,
    ) -> AxisResult<SolveOutcome> {
        request.validate()?;

        let initial_span = (request.scale_end - request.scale_begin).abs();
        let base = request.increment_base;
        let mut cycle = MantissaCycle::new();
        let mut first_iteration = true;
        let mut iterations = 0usize;
        let mut proposal: Option<Proposal> = None;
        let mut commit: Option<Commit> = None;
        let mut best: Option<BestCandidate> = None;
        let mut failure: Option<AxisError> = None;
        let mut state = SearchState::Init;

        loop {
            state = match state {
                SearchState::Init => SearchState::ProposeIncrement,
                SearchState::ProposeIncrement => {
                    if self.limits.exhausted(iterations) {
                        warn!(
                            iterations,
                            begin = request.scale_begin,
                            end = request.scale_end,
                            "linear scale search hit its iteration cap"
                        );
                        SearchState::Reject
                    } else {
                        iterations += 1;
                        match self.propose(request, &cycle) {
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
                SearchState::Measure => 'measure: {
                    let Some(current) = proposal else {
                        return Err(AxisError::NonFiniteCandidate {
                            stage: "missing proposal",
                        });
                    };
                    let candidate = current.candidate;
                    let measured = probe.line_length(&candidate).and_then(|line_length| {
                        pixel_gap(
                            line_length,
                            candidate.increment,
                            (candidate.scale_end - candidate.scale_begin).abs(),
                        )
                        .map(|gap| (line_length, gap))
                    });
                    let (line_length, gap) = match measured {
                        Ok(measured) => measured,
                        Err(err) => {
                            failure = Some(err);
                            break 'measure SearchState::Aborted;
                        }
                    };
                    BestCandidate::offer(&mut best, request, candidate, gap);
                    let in_window = request.in_window(gap);
                    trace!(
                        iteration = iterations,
                        increment = candidate.increment,
                        scale_begin = candidate.scale_begin,
                        scale_end = candidate.scale_end,
                        line_length,
                        pixel_gap = gap,
                        direction = ?cycle.direction,
                        "linear scale candidate"
                    );

                    let overshot = match cycle.direction {
                        SearchDirection::Finer => request.below_window(gap),
                        SearchDirection::Coarser => request.above_window(gap),
                    };
                    if overshot && !first_iteration {
                        SearchState::Reject
                    } else {
                        if in_window {
                            commit = Some(Commit {
                                candidate,
                                pixel_gap: gap,
                            });
                        }

                        let was_first = first_iteration;
                        first_iteration = false;
                        if was_first && request.below_window(gap) {
                            cycle.switch_to_coarser();
                            SearchState::ProposeIncrement
                        } else if in_window && cycle.direction == SearchDirection::Coarser {
                            SearchState::Converged
                        } else {
                            let spans_single_step = is_close(
                                current.down_scaled_difference,
                                current.down_scaled_span,
                                self.tolerance.relative,
                            ) && (request.below_window(gap)
                                || cycle.direction == SearchDirection::Coarser);
                            let left_range = match cycle.direction {
                                SearchDirection::Finer => {
                                    current.down_scaled_difference < initial_span * f64::EPSILON
                                }
                                SearchDirection::Coarser => {
                                    current.down_scaled_difference > initial_span * base * base
                                }
                            };

                            if spans_single_step
                                || left_range
                                || !request.auto_increment
                                || !request.auto_limits
                                || request.force_begin_end
                            {
                                if !in_window {
                                    warn!(
                                        pixel_gap = gap,
                                        min_pixel_gap = request.min_pixel_gap,
                                        max_pixel_gap = request.max_pixel_gap,
                                        "scale-min-diff-pix / scale-max-diff-pix cannot be fulfilled; reconsider the automatic axis options"
                                    );
                                }
                                commit = Some(Commit {
                                    candidate,
                                    pixel_gap: gap,
                                });
                                SearchState::Accept
                            } else {
                                cycle.advance();
                                SearchState::ProposeIncrement
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
                            "no linear increment satisfies the pixel window; using closest candidate"
                        );
                    }
                    break;
                }
                SearchState::Aborted => {
                    let err = failure.take().unwrap_or(AxisError::NonFiniteCandidate {
                        stage: "linear search",
                    });
                    warn!(error = %err, iteration = iterations, "linear scale search aborted");
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
            "linear scale solved"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{MantissaCycle, SearchDirection};

    #[test]
    fn mantissa_cycle_wraps_and_moves_exponent() {
        let mut cycle = MantissaCycle::new();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push((cycle.mantissa, cycle.exponent));
            cycle.advance();
        }
        assert_eq!(seen, vec![(1.0, 0), (2.0, 0), (4.0, 0), (5.0, 0), (1.0, -1)]);

        cycle.switch_to_coarser();
        assert_eq!(cycle.direction, SearchDirection::Coarser);
        assert_eq!(cycle.exponent, -1);
    }
}

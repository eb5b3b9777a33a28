//! Iterative "nice number" search for scale limits and tic increments.
//!
//! Both solvers walk candidate increments, ask a [`LineLengthProbe`] how long
//! the axis line would be with the candidate's begin/end tics in place, and
//! accept the candidate whose pixel distance between two major tics lands
//! inside `[min_pixel_gap, max_pixel_gap]`.

mod linear;
mod log;

pub use linear::LinearScaleSolver;
pub use log::{LogScaleSolver, correct_log_range};

use serde::{Deserialize, Serialize};

use crate::error::{AxisError, AxisResult};

/// Iteration bound applied when none is configured explicitly.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Relative slack on both pixel window bounds.
const WINDOW_RELATIVE_SLACK: f64 = 1e-9;

/// Inputs of one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRequest {
    pub scale_begin: f64,
    pub scale_end: f64,
    pub increment: f64,
    pub increment_base: f64,
    pub auto_increment: bool,
    pub auto_limits: bool,
    pub tics_automatic: bool,
    pub tics_begin: f64,
    pub tics_end: f64,
    pub min_pixel_gap: f64,
    pub max_pixel_gap: f64,
    pub force_begin_end: bool,
}

impl ScaleRequest {
    /// Automatic request over `scale_begin..scale_end` with the default
    /// pixel window (40..300) and base 10.
    #[must_use]
    pub fn new(scale_begin: f64, scale_end: f64) -> Self {
        Self {
            scale_begin,
            scale_end,
            increment: (scale_end - scale_begin).abs(),
            increment_base: 10.0,
            auto_increment: true,
            auto_limits: true,
            tics_automatic: true,
            tics_begin: scale_begin,
            tics_end: scale_end,
            min_pixel_gap: 40.0,
            max_pixel_gap: 300.0,
            force_begin_end: false,
        }
    }

    #[must_use]
    pub fn with_pixel_window(mut self, min_pixel_gap: f64, max_pixel_gap: f64) -> Self {
        self.min_pixel_gap = min_pixel_gap;
        self.max_pixel_gap = max_pixel_gap;
        self
    }

    #[must_use]
    pub fn with_increment(mut self, increment: f64, auto_increment: bool) -> Self {
        self.increment = increment;
        self.auto_increment = auto_increment;
        self
    }

    #[must_use]
    pub fn with_auto_limits(mut self, auto_limits: bool) -> Self {
        self.auto_limits = auto_limits;
        self
    }

    #[must_use]
    pub fn with_increment_base(mut self, base: f64) -> Self {
        self.increment_base = base;
        self
    }

    #[must_use]
    pub fn with_tics(mut self, tics_begin: f64, tics_end: f64, tics_automatic: bool) -> Self {
        self.tics_begin = tics_begin;
        self.tics_end = tics_end;
        self.tics_automatic = tics_automatic;
        self
    }

    #[must_use]
    pub fn with_force_begin_end(mut self, force_begin_end: bool) -> Self {
        self.force_begin_end = force_begin_end;
        self
    }

    pub(crate) fn validate(&self) -> AxisResult<()> {
        // The span itself must be representable, not just the limits.
        if !self.scale_begin.is_finite()
            || !self.scale_end.is_finite()
            || !(self.scale_end - self.scale_begin).is_finite()
            || self.scale_begin == self.scale_end
        {
            return Err(AxisError::DegenerateRange {
                begin: self.scale_begin,
                end: self.scale_end,
            });
        }
        if !(self.increment_base > 1.0) || !self.increment_base.is_finite() {
            return Err(AxisError::InvalidConfig(format!(
                "scale-increment-base must be finite and > 1, got {}",
                self.increment_base
            )));
        }
        if !self.min_pixel_gap.is_finite()
            || !self.max_pixel_gap.is_finite()
            || self.min_pixel_gap < 0.0
            || self.min_pixel_gap > self.max_pixel_gap
        {
            return Err(AxisError::InvalidConfig(format!(
                "pixel gap window [{}, {}] is invalid",
                self.min_pixel_gap, self.max_pixel_gap
            )));
        }
        if !self.auto_increment && (!self.increment.is_finite() || self.increment <= 0.0) {
            return Err(AxisError::InvalidIncrement(self.increment));
        }
        Ok(())
    }

    /// Boundary ties accept, with a relative slack so that the answer does
    /// not depend on the magnitude of the scale.
    fn in_window(&self, pixel_gap: f64) -> bool {
        !self.below_window(pixel_gap) && !self.above_window(pixel_gap)
    }

    fn below_window(&self, pixel_gap: f64) -> bool {
        pixel_gap < self.min_pixel_gap * (1.0 - WINDOW_RELATIVE_SLACK)
    }

    fn above_window(&self, pixel_gap: f64) -> bool {
        pixel_gap > self.max_pixel_gap * (1.0 + WINDOW_RELATIVE_SLACK)
    }

    fn window_distance(&self, pixel_gap: f64) -> f64 {
        if self.in_window(pixel_gap) {
            0.0
        } else if pixel_gap < self.min_pixel_gap {
            self.min_pixel_gap - pixel_gap
        } else if pixel_gap > self.max_pixel_gap {
            pixel_gap - self.max_pixel_gap
        } else {
            0.0
        }
    }
}

/// Limits and tics proposed for one search iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleCandidate {
    pub scale_begin: f64,
    pub scale_end: f64,
    pub increment: f64,
    pub tics_begin: f64,
    pub tics_end: f64,
}

/// Committed result of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleSolution {
    pub scale_begin: f64,
    pub scale_end: f64,
    pub increment: f64,
    pub tics_begin: f64,
    pub tics_end: f64,
    pub converged: bool,
}

impl ScaleSolution {
    /// Major step signed by the scale direction.
    #[must_use]
    pub fn signed_increment(&self) -> f64 {
        if self.scale_begin <= self.scale_end {
            self.increment
        } else {
            -self.increment
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The committed candidate lies inside the pixel window.
    Converged,
    /// No candidate satisfied the window; the closest one was committed.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub solution: ScaleSolution,
    pub status: SolveStatus,
    pub iterations: usize,
    /// Pixel distance between two major tics for the committed candidate.
    pub pixel_gap: f64,
}

/// Named states of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    Init,
    ProposeIncrement,
    Measure,
    Accept,
    Reject,
    Converged,
    Aborted,
}

/// Bounds on the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverLimits {
    /// `None` runs the search until a termination criterion fires.
    pub max_iterations: Option<usize>,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

impl SolverLimits {
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
        }
    }

    fn exhausted(&self, iterations: usize) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
    }
}

/// Reports the usable axis line length for a candidate, after the candidate's
/// begin and end tics have taken their share of the allocation.
pub trait LineLengthProbe {
    fn line_length(&mut self, candidate: &ScaleCandidate) -> AxisResult<f64>;
}

/// Probe with a constant line length, independent of the candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedExtent(pub f64);

impl LineLengthProbe for FixedExtent {
    fn line_length(&mut self, _candidate: &ScaleCandidate) -> AxisResult<f64> {
        Ok(self.0)
    }
}

impl<F> LineLengthProbe for F
where
    F: FnMut(&ScaleCandidate) -> AxisResult<f64>,
{
    fn line_length(&mut self, candidate: &ScaleCandidate) -> AxisResult<f64> {
        self(candidate)
    }
}

/// Common interface of the linear and logarithmic solvers.
pub trait ScaleSolver {
    fn solve(
        &self,
        request: &ScaleRequest,
        probe: &mut dyn LineLengthProbe,
    ) -> AxisResult<SolveOutcome>;

    /// Solves against a constant pixel extent.
    fn solve_for_extent(&self, request: &ScaleRequest, pixel_extent: f64) -> AxisResult<SolveOutcome> {
        self.solve(request, &mut FixedExtent(pixel_extent))
    }
}

/// Candidate closest to the pixel window seen so far.
#[derive(Debug, Clone, Copy)]
struct BestCandidate {
    candidate: ScaleCandidate,
    pixel_gap: f64,
    distance: f64,
}

impl BestCandidate {
    fn offer(best: &mut Option<Self>, request: &ScaleRequest, candidate: ScaleCandidate, pixel_gap: f64) {
        let distance = request.window_distance(pixel_gap);
        if best.is_none_or(|current| distance < current.distance) {
            *best = Some(Self {
                candidate,
                pixel_gap,
                distance,
            });
        }
    }
}

/// Candidate committed by the search, together with its measured gap.
#[derive(Debug, Clone, Copy)]
struct Commit {
    candidate: ScaleCandidate,
    pixel_gap: f64,
}

fn finish(
    request: &ScaleRequest,
    commit: Option<Commit>,
    best: Option<BestCandidate>,
    iterations: usize,
) -> AxisResult<SolveOutcome> {
    let commit = match (commit, best) {
        (Some(commit), _) => commit,
        (None, Some(best)) => Commit {
            candidate: best.candidate,
            pixel_gap: best.pixel_gap,
        },
        (None, None) => {
            return Err(AxisError::NonFiniteCandidate {
                stage: "search produced no candidate",
            });
        }
    };

    let converged = request.in_window(commit.pixel_gap);
    let candidate = commit.candidate;
    Ok(SolveOutcome {
        solution: ScaleSolution {
            scale_begin: candidate.scale_begin,
            scale_end: candidate.scale_end,
            increment: candidate.increment,
            tics_begin: candidate.tics_begin,
            tics_end: candidate.tics_end,
            converged,
        },
        status: if converged {
            SolveStatus::Converged
        } else {
            SolveStatus::BestEffort
        },
        iterations,
        pixel_gap: commit.pixel_gap,
    })
}

fn pixel_gap(line_length: f64, step_span: f64, scale_span: f64) -> AxisResult<f64> {
    if !line_length.is_finite() || line_length < 0.0 {
        return Err(AxisError::InvalidGeometry(format!(
            "line length must be finite and >= 0, got {line_length}"
        )));
    }
    if scale_span == 0.0 {
        return Ok(f64::INFINITY);
    }
    let gap = line_length * step_span / scale_span;
    if !gap.is_finite() {
        return Err(AxisError::NonFiniteCandidate { stage: "pixel gap" });
    }
    Ok(gap)
}

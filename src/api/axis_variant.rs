use serde::{Deserialize, Serialize};

use crate::core::label::{LabelFormatter, LabelStyle};
use crate::core::mtics::MtickDeriver;
use crate::core::scale::MappingSpace;
use crate::core::solver::{
    LineLengthProbe, LinearScaleSolver, LogScaleSolver, ScaleRequest, ScaleSolution, ScaleSolver,
    SolveOutcome, SolverLimits,
};
use crate::core::tic_set::{TicProgression, TolerancePolicy};
use crate::error::AxisResult;

/// Base of the nice-number search on time axes (seconds, minutes).
pub const TIME_INCREMENT_BASE: f64 = 60.0;

/// Axis flavour; selects mapping space, labels, solver and minor tic rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AxisVariant {
    #[default]
    Linear,
    Logarithmic,
    /// Linear axis over seconds, labelled `H:MM:SS`.
    Time,
}

impl AxisVariant {
    #[must_use]
    pub fn mapping_space(self) -> MappingSpace {
        match self {
            Self::Linear | Self::Time => MappingSpace::Linear,
            Self::Logarithmic => MappingSpace::Logarithmic,
        }
    }

    #[must_use]
    pub fn label_style(self) -> LabelStyle {
        match self {
            Self::Linear => LabelStyle::Decimal,
            Self::Logarithmic => LabelStyle::Logarithmic,
            Self::Time => LabelStyle::Clock,
        }
    }

    #[must_use]
    pub fn default_increment_base(self) -> f64 {
        match self {
            Self::Linear | Self::Logarithmic => 10.0,
            Self::Time => TIME_INCREMENT_BASE,
        }
    }

    #[must_use]
    pub fn formatter(self, tics_begin: f64, tics_end: f64, base: f64) -> LabelFormatter {
        LabelFormatter::new(self.label_style(), tics_begin, tics_end, base)
    }

    /// Minor tic rule. Log axes always judge the mantissa against base 10.
    #[must_use]
    pub fn mtick_deriver(self, base: f64) -> MtickDeriver {
        match self {
            Self::Linear | Self::Time => MtickDeriver::linear(base),
            Self::Logarithmic => MtickDeriver::logarithmic(),
        }
    }

    /// Progression the major tics of a committed solution follow: additive
    /// steps of the signed increment, or multiplication by the increment
    /// (its inverse on descending log axes).
    #[must_use]
    pub fn progression(self, solution: &ScaleSolution) -> TicProgression {
        match self {
            Self::Linear | Self::Time => TicProgression::Additive {
                begin: solution.tics_begin,
                step: solution.signed_increment(),
            },
            Self::Logarithmic => TicProgression::Multiplicative {
                begin: solution.tics_begin,
                factor: if solution.scale_begin <= solution.scale_end {
                    solution.increment
                } else {
                    solution.increment.recip()
                },
            },
        }
    }

    pub fn solve(
        self,
        request: &ScaleRequest,
        probe: &mut dyn LineLengthProbe,
        limits: SolverLimits,
        tolerance: TolerancePolicy,
    ) -> AxisResult<SolveOutcome> {
        match self {
            Self::Linear | Self::Time => LinearScaleSolver::new(limits)
                .with_tolerance(tolerance)
                .solve(request, probe),
            Self::Logarithmic => LogScaleSolver::new(limits)
                .with_tolerance(tolerance)
                .solve(request, probe),
        }
    }
}

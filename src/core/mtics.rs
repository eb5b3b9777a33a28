//! Minor tic count derivation and minor tic value generation.

use smallvec::SmallVec;

use crate::core::primitives::{contains_with_slack, is_close, magnitude_exponent, power_of};
use crate::core::scale::MappingSpace;
use crate::error::{AxisError, AxisResult};

const MANTISSA_TOLERANCE: f64 = 1e-9;

/// Upper bound on minor tics generated per major interval.
pub const MAX_MINOR_TICS_PER_INTERVAL: u32 = 1_000;

/// Maps the mantissa of a major increment onto a minor tic count:
/// `2.5`/`5` give 4, `2`/`4` give 3 and `1` gives 9.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MtickDeriver {
    space: MappingSpace,
    base: f64,
}

impl MtickDeriver {
    #[must_use]
    pub fn new(space: MappingSpace, base: f64) -> Self {
        Self { space, base }
    }

    #[must_use]
    pub fn linear(base: f64) -> Self {
        Self::new(MappingSpace::Linear, base)
    }

    /// Log increments are always decomposed against base 10.
    #[must_use]
    pub fn logarithmic() -> Self {
        Self::new(MappingSpace::Logarithmic, 10.0)
    }

    pub fn derive(&self, increment: f64) -> AxisResult<u32> {
        if !increment.is_finite() || increment <= 0.0 {
            return Err(AxisError::InvalidIncrement(increment));
        }
        let base = match self.space {
            MappingSpace::Linear if self.base > 1.0 => self.base,
            _ => 10.0,
        };

        let exponent = magnitude_exponent(increment, base);
        let mantissa = increment / power_of(base, exponent);
        let matches = |candidate: f64| is_close(mantissa, candidate, MANTISSA_TOLERANCE);

        let count = if matches(2.5) || matches(5.0) {
            4
        } else if matches(2.0) || matches(4.0) {
            3
        } else if matches(1.0) {
            9
        } else {
            match self.space {
                MappingSpace::Linear => 3,
                MappingSpace::Logarithmic => {
                    let derived = (increment / power_of(10.0, exponent - 1) - 1.0).round();
                    derived.clamp(0.0, f64::from(MAX_MINOR_TICS_PER_INTERVAL)) as u32
                }
            }
        };
        Ok(count.min(MAX_MINOR_TICS_PER_INTERVAL))
    }
}

/// Minor tic values for a linear axis: `count` evenly spaced values inside
/// every major interval, including the interval ahead of the first major.
/// Only values inside both `range` and `scale_range` are returned.
#[must_use]
pub fn linear_minor_tic_values(
    majors: &[f64],
    signed_increment: f64,
    count: u32,
    range: (f64, f64),
    scale_range: (f64, f64),
    tolerance: f64,
) -> Vec<f64> {
    let Some(&first) = majors.first() else {
        return Vec::new();
    };
    if count == 0 || signed_increment == 0.0 || !signed_increment.is_finite() {
        return Vec::new();
    }

    let step = signed_increment / f64::from(count + 1);
    let slack = tolerance * signed_increment.abs();
    let mut starts: SmallVec<[f64; 16]> = SmallVec::with_capacity(majors.len() + 1);
    starts.push(first - signed_increment);
    starts.extend(majors.iter().copied());

    let mut values = Vec::new();
    for start in starts {
        for i in 1..=count {
            let value = start + f64::from(i) * step;
            if contains_with_slack(range.0, range.1, value, slack)
                && contains_with_slack(scale_range.0, scale_range.1, value, slack)
            {
                values.push(value);
            }
        }
    }
    values
}

/// Minor tic values for a log axis. Inside each decade `[lo, hi)` the values
/// `lo * i * increment / (count + 1)` strictly between `lo` and `hi` are
/// produced, which yields the classic `2..9` ladder for an increment of 10.
#[must_use]
pub fn log_minor_tic_values(
    majors: &[f64],
    signed_factor: f64,
    increment: f64,
    count: u32,
    range: (f64, f64),
    tolerance: f64,
) -> Vec<f64> {
    let Some(&first) = majors.first() else {
        return Vec::new();
    };
    if count == 0 || !(signed_factor > 0.0) || signed_factor == 1.0 || !(increment > 1.0) {
        return Vec::new();
    }

    let mut starts: SmallVec<[f64; 16]> = SmallVec::with_capacity(majors.len() + 1);
    starts.push(first / signed_factor);
    starts.extend(majors.iter().copied());

    let mut values = Vec::new();
    for start in starts {
        let next = start * signed_factor;
        let (lo, hi) = if start <= next { (start, next) } else { (next, start) };
        for i in 1..=count {
            let value = lo * f64::from(i) * increment / f64::from(count + 1);
            let inside_interval =
                value > lo * (1.0 + tolerance) && value < hi * (1.0 - tolerance);
            if inside_interval && contains_with_slack(range.0, range.1, value, tolerance * value) {
                values.push(value);
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::{MtickDeriver, linear_minor_tic_values, log_minor_tic_values};

    #[test]
    fn derives_counts_from_mantissa() {
        let deriver = MtickDeriver::linear(10.0);
        assert_eq!(deriver.derive(50.0).expect("count"), 4);
        assert_eq!(deriver.derive(20.0).expect("count"), 3);
        assert_eq!(deriver.derive(10.0).expect("count"), 9);
        assert_eq!(deriver.derive(0.25).expect("count"), 4);
        assert_eq!(deriver.derive(3.0).expect("count"), 3);
        assert!(deriver.derive(0.0).is_err());
    }

    #[test]
    fn log_fallback_uses_next_lower_power() {
        let deriver = MtickDeriver::logarithmic();
        assert_eq!(deriver.derive(10.0).expect("count"), 9);
        assert_eq!(deriver.derive(30.0).expect("count"), 29);
    }

    #[test]
    fn linear_minors_cover_interval_before_first_major() {
        let values =
            linear_minor_tic_values(&[10.0, 20.0], 10.0, 1, (0.0, 20.0), (0.0, 20.0), 1e-9);
        assert_eq!(values, vec![5.0, 15.0]);
    }

    #[test]
    fn log_minors_form_decade_ladder() {
        let values = log_minor_tic_values(&[1.0, 10.0], 10.0, 10.0, 9, (1.0, 10.0), 1e-9);
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }
}

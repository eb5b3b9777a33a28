//! Numeric helpers shared by the solvers, the reconciler and the formatters.

/// Relative tolerance (in units of one increment) used to decide whether two
/// tic values denote the same position.
pub const DEFAULT_STEP_TOLERANCE: f64 = 1e-9;

/// Returns `(min, max)` of two values.
#[must_use]
pub fn ordered_bounds(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Inclusive containment test independent of the direction of `a..b`.
#[must_use]
pub fn contains_inclusive(a: f64, b: f64, value: f64) -> bool {
    let (min, max) = ordered_bounds(a, b);
    value >= min && value <= max
}

/// Inclusive containment with a slack of `slack` on both ends.
#[must_use]
pub fn contains_with_slack(a: f64, b: f64, value: f64, slack: f64) -> bool {
    let (min, max) = ordered_bounds(a, b);
    value >= min - slack && value <= max + slack
}

/// Fractional part of a position measured in steps, folded into `[0, 1)`.
#[must_use]
pub fn grid_residual(offset_in_steps: f64) -> f64 {
    offset_in_steps.rem_euclid(1.0)
}

/// Whether a position measured in steps sits on an integer grid point.
#[must_use]
pub fn is_on_grid(offset_in_steps: f64, tolerance: f64) -> bool {
    if !offset_in_steps.is_finite() {
        return false;
    }
    let residual = grid_residual(offset_in_steps);
    residual < tolerance || (1.0 - residual) < tolerance
}

/// `floor(log_base(value))`, corrected for the round-off of `ln(x) / ln(base)`
/// right at integer powers (e.g. `log10(1000)` landing on `2.9999999999999996`).
#[must_use]
pub fn magnitude_exponent(value: f64, base: f64) -> i32 {
    let raw = (value.ln() / base.ln()).floor();
    if !raw.is_finite() {
        return 0;
    }
    let mut exponent = raw as i32;
    let tolerance = 1.0 + 1e-12;
    if base.powi(exponent + 1) <= value * tolerance {
        exponent += 1;
    } else if base.powi(exponent) > value * tolerance {
        exponent -= 1;
    }
    exponent
}

/// Same as [`magnitude_exponent`] but rounding up.
#[must_use]
pub fn magnitude_exponent_ceil(value: f64, base: f64) -> i32 {
    let floor = magnitude_exponent(value, base);
    if is_close(base.powi(floor), value, 1e-12) {
        floor
    } else {
        floor + 1
    }
}

/// `value * 10^exponent`, dividing for negative exponents so that results
/// like `100 / 10 / 4 = 2.5` stay exact.
#[must_use]
pub fn scale_by_power_of_ten(value: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        value * 10f64.powi(exponent)
    } else {
        value / 10f64.powi(-exponent)
    }
}

/// `base^exponent`, dividing for negative exponents.
#[must_use]
pub fn power_of(base: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        base.powi(exponent)
    } else {
        1.0 / base.powi(-exponent)
    }
}

/// Relative closeness test, falling back to absolute for values near zero.
#[must_use]
pub fn is_close(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance * scale
}

/// `floor(value)` that treats values within `tolerance` of an integer as that
/// integer, so `0.3 / 0.1` floors to 3 rather than 2.
#[must_use]
pub fn floor_with_tolerance(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < tolerance {
        rounded
    } else {
        value.floor()
    }
}

/// Ceiling counterpart of [`floor_with_tolerance`].
#[must_use]
pub fn ceil_with_tolerance(value: f64, tolerance: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < tolerance {
        rounded
    } else {
        value.ceil()
    }
}

/// Snaps `value` onto the nearest multiple of `step` when it is within
/// `tolerance` steps of it. Keeps accumulated sums such as `0.1 * 3` clean.
#[must_use]
pub fn snap_to_step(value: f64, step: f64, tolerance: f64) -> f64 {
    if step == 0.0 || !step.is_finite() {
        return value;
    }
    let steps = value / step;
    let rounded = steps.round();
    if (steps - rounded).abs() < tolerance {
        rounded * step
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{
        is_on_grid, magnitude_exponent, magnitude_exponent_ceil, ordered_bounds,
        scale_by_power_of_ten, snap_to_step,
    };

    #[test]
    fn magnitude_exponent_is_exact_at_powers() {
        assert_eq!(magnitude_exponent(1000.0, 10.0), 3);
        assert_eq!(magnitude_exponent(999.0, 10.0), 2);
        assert_eq!(magnitude_exponent(0.001, 10.0), -3);
        assert_eq!(magnitude_exponent(3600.0, 60.0), 2);
        assert_eq!(magnitude_exponent(59.0, 60.0), 0);
    }

    #[test]
    fn magnitude_exponent_ceil_rounds_up_between_powers() {
        assert_eq!(magnitude_exponent_ceil(100.0, 10.0), 2);
        assert_eq!(magnitude_exponent_ceil(150.0, 10.0), 3);
    }

    #[test]
    fn grid_check_accepts_both_sides_of_an_integer() {
        assert!(is_on_grid(3.0, 1e-9));
        assert!(is_on_grid(2.999_999_999_99, 1e-9));
        assert!(is_on_grid(-1.000_000_000_01, 1e-9));
        assert!(!is_on_grid(2.5, 1e-9));
        assert!(!is_on_grid(f64::NAN, 1e-9));
    }

    #[test]
    fn power_of_ten_scaling_divides_for_negative_exponents() {
        assert_eq!(scale_by_power_of_ten(100.0, -1) / 4.0, 2.5);
        assert_eq!(scale_by_power_of_ten(2.0, 2), 200.0);
    }

    #[test]
    fn snapping_only_touches_near_multiples() {
        assert_eq!(snap_to_step(20.000_000_000_000_004, 10.0, 1e-9), 20.0);
        assert_eq!(snap_to_step(0.35, 0.1, 1e-9), 0.35);
        assert_eq!(ordered_bounds(5.0, -1.0), (-1.0, 5.0));
    }
}

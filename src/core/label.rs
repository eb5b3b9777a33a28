use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{magnitude_exponent, power_of};

const SCIENTIFIC_MAGNITUDE_THRESHOLD: f64 = 1.0e4;
const SCIENTIFIC_SMALL_THRESHOLD: f64 = 1.0e-3;
const SCIENTIFIC_RELATIVE_SPAN: f64 = 1.0e-3;
const GENERAL_SIGNIFICANT_DIGITS: usize = 6;

/// Label flavour produced for a tic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelStyle {
    /// `%g`-style decimals, switching to `m×b<sup>e</sup>` markup for extreme ranges.
    Decimal,
    /// Mantissa and power of the increment base.
    Logarithmic,
    /// `H:MM:SS` for values measured in seconds.
    Clock,
}

/// Tic label formatter bound to the current tics range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFormatter {
    style: LabelStyle,
    tics_begin: f64,
    tics_end: f64,
    base: f64,
}

impl LabelFormatter {
    #[must_use]
    pub fn new(style: LabelStyle, tics_begin: f64, tics_end: f64, base: f64) -> Self {
        Self {
            style,
            tics_begin,
            tics_end,
            base,
        }
    }

    #[must_use]
    pub fn style(&self) -> LabelStyle {
        self.style
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self.style {
            LabelStyle::Decimal => {
                format_tic_label(value, self.tics_begin, self.tics_end, self.base)
            }
            LabelStyle::Logarithmic => format_log_tic_label(value, self.base),
            LabelStyle::Clock => format_clock_label(value),
        }
    }
}

/// Whether a tics range is labelled in scientific markup: it spans at least
/// four orders of magnitude, is tiny in absolute terms, or is narrow relative
/// to its begin value.
#[must_use]
pub fn uses_scientific_notation(tics_begin: f64, tics_end: f64) -> bool {
    let span = (tics_begin - tics_end).abs();
    let large = (tics_begin.abs() >= SCIENTIFIC_MAGNITUDE_THRESHOLD
        || tics_end.abs() >= SCIENTIFIC_MAGNITUDE_THRESHOLD)
        && span >= SCIENTIFIC_MAGNITUDE_THRESHOLD;
    let small = (tics_begin.abs() <= SCIENTIFIC_SMALL_THRESHOLD
        || tics_end.abs() <= SCIENTIFIC_SMALL_THRESHOLD)
        && span <= SCIENTIFIC_SMALL_THRESHOLD;
    let narrow = span <= SCIENTIFIC_RELATIVE_SPAN * tics_begin.abs();
    large || small || narrow
}

/// Label of a linear axis tic.
#[must_use]
pub fn format_tic_label(value: f64, tics_begin: f64, tics_end: f64, base: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if uses_scientific_notation(tics_begin, tics_end) {
        return scientific_markup(value, base);
    }
    format_general(value, GENERAL_SIGNIFICANT_DIGITS)
}

/// Label of a logarithmic axis tic: `1` stays plain, `500` becomes
/// `5×10<sup>2</sup>`.
#[must_use]
pub fn format_log_tic_label(value: f64, base: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    scientific_markup(value, base)
}

/// `H:MM:SS` label for a value in seconds; hours are unbounded.
#[must_use]
pub fn format_clock_label(value: f64) -> String {
    if value == 0.0 {
        return "0:00:00".to_owned();
    }
    if !value.is_finite() {
        return format_general(value, GENERAL_SIGNIFICANT_DIGITS);
    }
    let whole_seconds = value.abs().floor();
    let Some(delta) = TimeDelta::try_seconds(whole_seconds as i64) else {
        return format_general(value, GENERAL_SIGNIFICANT_DIGITS);
    };

    let sign = if value < 0.0 && whole_seconds > 0.0 { "-" } else { "" };
    format!(
        "{sign}{}:{:02}:{:02}",
        delta.num_hours(),
        delta.num_minutes() % 60,
        delta.num_seconds() % 60
    )
}

/// `mantissa×base<sup>exponent</sup>` markup, collapsing to the plain mantissa
/// when the exponent is zero.
#[must_use]
pub fn scientific_markup(value: f64, base: f64) -> String {
    if value == 0.0 || !value.is_finite() || !(base > 1.0) {
        return format_general(value, GENERAL_SIGNIFICANT_DIGITS);
    }
    let exponent = magnitude_exponent(value.abs(), base);
    let mantissa = value / power_of(base, exponent);
    let mantissa = format_general(mantissa, GENERAL_SIGNIFICANT_DIGITS);
    if exponent == 0 {
        return mantissa;
    }
    format!(
        "{mantissa}\u{d7}{}<sup>{exponent}</sup>",
        format_general(base, GENERAL_SIGNIFICANT_DIGITS)
    )
}

/// C `%g` equivalent with `precision` significant digits: trailing zeros are
/// dropped and exponent form is used below `1e-4` or from `10^precision` up.
#[must_use]
pub fn format_general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction_zeros(mantissa),
            exponent.unsigned_abs()
        );
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    trim_fraction_zeros(&format!("{value:.decimals$}")).to_owned()
}

fn trim_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

use chart_axes::api::AxisVariant;
use chart_axes::core::label::{format_clock_label, uses_scientific_notation};
use chart_axes::core::{LabelFormatter, LabelStyle};

#[test]
fn decimal_labels_use_general_format() {
    let formatter = LabelFormatter::new(LabelStyle::Decimal, 0.0, 100.0, 10.0);
    assert_eq!(formatter.format(0.0), "0");
    assert_eq!(formatter.format(20.0), "20");
    assert_eq!(formatter.format(0.1 + 0.2), "0.3");
    assert_eq!(formatter.format(-2.5), "-2.5");
}

#[test]
fn wide_ranges_switch_to_scientific_markup() {
    assert!(uses_scientific_notation(0.0, 50_000.0));
    let formatter = LabelFormatter::new(LabelStyle::Decimal, 0.0, 50_000.0, 10.0);
    assert_eq!(formatter.format(20_000.0), "2\u{d7}10<sup>4</sup>");
    assert_eq!(formatter.format(0.0), "0");
}

#[test]
fn narrow_ranges_switch_to_scientific_markup() {
    assert!(uses_scientific_notation(1000.0, 1000.5));
    assert!(!uses_scientific_notation(0.0, 100.0));
    let formatter = LabelFormatter::new(LabelStyle::Decimal, 1000.0, 1000.5, 10.0);
    assert_eq!(formatter.format(1000.25), "1.00025\u{d7}10<sup>3</sup>");
}

#[test]
fn log_labels_show_powers() {
    let formatter = LabelFormatter::new(LabelStyle::Logarithmic, 1.0, 1000.0, 10.0);
    assert_eq!(formatter.format(1.0), "1");
    assert_eq!(formatter.format(500.0), "5\u{d7}10<sup>2</sup>");
    assert_eq!(formatter.format(1000.0), "1\u{d7}10<sup>3</sup>");
    assert_eq!(formatter.format(0.01), "1\u{d7}10<sup>-2</sup>");
}

#[test]
fn clock_labels_are_hours_minutes_seconds() {
    assert_eq!(format_clock_label(0.0), "0:00:00");
    assert_eq!(format_clock_label(3725.0), "1:02:05");
    assert_eq!(format_clock_label(90_000.0), "25:00:00");
    assert_eq!(format_clock_label(-65.0), "-0:01:05");
}

#[test]
fn variants_pick_their_label_style() {
    assert_eq!(AxisVariant::Time.formatter(0.0, 3600.0, 60.0).format(1800.0), "0:30:00");
    assert_eq!(
        AxisVariant::Logarithmic.formatter(1.0, 100.0, 10.0).format(100.0),
        "1\u{d7}10<sup>2</sup>"
    );
    assert_eq!(AxisVariant::Linear.label_style(), LabelStyle::Decimal);
}

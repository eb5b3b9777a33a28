use chart_axes::api::AxisVariant;
use chart_axes::core::{
    AxisLine, CoordinateMapper, LinearScaleSolver, LogScaleSolver, MappingSpace, PixelPoint,
    ReconcileRequest, ScaleRequest, ScaleSolver, SolveStatus, Tic, TicKind, TicProgression,
    TicSet, TicSetReconciler,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_solution_covers_the_requested_range(
        begin in -10_000.0f64..10_000.0,
        span in 0.01f64..100_000.0,
        extent in 100.0f64..2_000.0
    ) {
        let end = begin + span;
        let outcome = LinearScaleSolver::default()
            .solve_for_extent(&ScaleRequest::new(begin, end), extent)
            .expect("finite request solves");
        let solution = outcome.solution;
        let slack = |value: f64| solution.increment * 1e-6 + value.abs() * 1e-12;

        prop_assert!(solution.increment > 0.0);
        prop_assert!(solution.scale_begin <= begin + slack(begin));
        prop_assert!(solution.scale_end >= end - slack(end));
        prop_assert!(solution.tics_begin <= solution.tics_end);
    }

    #[test]
    fn converged_gap_lies_inside_the_pixel_window(
        begin in -1_000.0f64..1_000.0,
        span in 0.1f64..10_000.0,
        extent in 100.0f64..2_000.0
    ) {
        let request = ScaleRequest::new(begin, begin + span).with_pixel_window(40.0, 300.0);
        let outcome = LinearScaleSolver::default()
            .solve_for_extent(&request, extent)
            .expect("solve");
        if outcome.status == SolveStatus::Converged {
            prop_assert!(outcome.pixel_gap >= 40.0 * (1.0 - 1e-9));
            prop_assert!(outcome.pixel_gap <= 300.0 * (1.0 + 1e-9));
        }
    }

    #[test]
    fn log_solution_stays_positive(
        begin_exp in -6i32..6,
        decades in 1i32..8,
        extent in 100.0f64..2_000.0
    ) {
        let begin = 10f64.powi(begin_exp) * 1.5;
        let end = begin * 10f64.powi(decades);
        let request = ScaleRequest::new(begin, end).with_increment(10.0, true);
        let solution = LogScaleSolver::default()
            .solve_for_extent(&request, extent)
            .expect("solve")
            .solution;

        prop_assert!(solution.scale_begin > 0.0);
        prop_assert!(solution.scale_begin <= begin * (1.0 + 1e-9));
        prop_assert!(solution.scale_end >= end * (1.0 - 1e-9));
        prop_assert!(solution.increment > 1.0);
    }

    #[test]
    fn mapping_round_trips_along_any_line(
        x0 in -500.0f64..500.0,
        y0 in -500.0f64..500.0,
        dx in 10.0f64..1_000.0,
        angle in 0.0f64..std::f64::consts::TAU,
        fraction in 0.0f64..1.0
    ) {
        let line = AxisLine {
            begin: PixelPoint::new(x0, y0),
            end: PixelPoint::new(x0 + dx * angle.cos(), y0 + dx * angle.sin()),
            begin_value: -20.0,
            end_value: 80.0,
            outer_direction: 0.0,
        };
        let mapper = CoordinateMapper::new(MappingSpace::Linear, line);
        let value = -20.0 + 100.0 * fraction;
        let mapped = mapper.to_pixel(value);

        prop_assert!(mapped.in_range);
        let back = mapper.to_value(mapped.point).expect("non-degenerate line");
        prop_assert!((back - value).abs() <= 1e-6);
    }

    #[test]
    fn progression_values_stay_inside_the_range(
        begin in -100.0f64..100.0,
        step in 0.01f64..50.0,
        low in -1_000.0f64..1_000.0,
        width in 0.0f64..1_000.0
    ) {
        let tolerance = 1e-9;
        let progression = TicProgression::Additive { begin, step };
        let values = progression.values_within((low + width, low), tolerance, 10_000);
        let slack = step * 1e-6;

        for pair in values.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
        for value in values {
            prop_assert!(value >= low - slack && value <= low + width + slack);
            prop_assert!(progression.contains(value, 1e-6));
        }
    }

    #[test]
    fn reconciling_the_same_targets_twice_is_a_no_op(
        begin in -100i32..100,
        count in 1usize..40,
        step in 1.0f64..20.0
    ) {
        let progression = TicProgression::Additive { begin: f64::from(begin), step };
        let range = (f64::from(begin), f64::from(begin) + step * (count - 1) as f64);
        let targets = progression.values_within(range, 1e-9, 1_000);
        let request = ReconcileRequest {
            kind: TicKind::Major,
            targets: &targets,
            grid: Some(progression),
            excluded_grid: None,
            range,
        };

        let mut set = TicSet::new();
        let reconciler = TicSetReconciler::default();
        let template = Tic::major(0.0, "");
        let label = |value: f64| Some(format!("{value}"));
        let first = reconciler.reconcile(&mut set, request, &template, label);
        let second = reconciler.reconcile(&mut set, request, &template, label);

        prop_assert_eq!(first.added.len(), targets.len());
        prop_assert!(!second.is_structural_change());
        prop_assert_eq!(second.kept.len(), targets.len());
        prop_assert_eq!(set.len(), targets.len());
    }

    #[test]
    fn zero_is_always_labelled_plainly(
        begin in -1.0e9f64..1.0e9,
        span in 1.0e-9f64..1.0e9,
        logarithmic in any::<bool>()
    ) {
        let variant = if logarithmic { AxisVariant::Logarithmic } else { AxisVariant::Linear };
        let formatter = variant.formatter(begin, begin + span, 10.0);
        prop_assert_eq!(formatter.format(0.0), "0");
    }
}

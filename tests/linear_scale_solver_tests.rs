use approx::assert_relative_eq;
use chart_axes::AxisError;
use chart_axes::core::{
    LinearScaleSolver, ScaleCandidate, ScaleRequest, ScaleSolver, SolveStatus, SolverLimits,
};

#[test]
fn finest_increment_inside_window_wins() {
    let outcome = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(0.0, 100.0), 400.0)
        .expect("solve");

    assert_eq!(outcome.status, SolveStatus::Converged);
    assert_relative_eq!(outcome.solution.increment, 10.0, epsilon = 1e-9);
    assert_relative_eq!(outcome.pixel_gap, 40.0, epsilon = 1e-9);
    assert_eq!(outcome.solution.scale_begin, 0.0);
    assert_relative_eq!(outcome.solution.scale_end, 100.0, epsilon = 1e-9);
    assert_relative_eq!(outcome.solution.tics_end, 100.0, epsilon = 1e-9);
}

#[test]
fn automatic_limits_round_outward() {
    let outcome = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(3.0, 97.0), 400.0)
        .expect("solve");

    let solution = outcome.solution;
    assert_relative_eq!(solution.increment, 10.0, epsilon = 1e-9);
    assert_relative_eq!(solution.scale_begin, 0.0, epsilon = 1e-9);
    assert_relative_eq!(solution.scale_end, 100.0, epsilon = 1e-9);
}

#[test]
fn manual_limits_keep_scale_and_round_tics_inward() {
    let request = ScaleRequest::new(3.0, 97.0).with_auto_limits(false);
    let outcome = LinearScaleSolver::default()
        .solve_for_extent(&request, 400.0)
        .expect("solve");
    let solution = outcome.solution;

    assert_eq!((solution.scale_begin, solution.scale_end), (3.0, 97.0));
    assert_eq!(outcome.iterations, 1);
    assert_relative_eq!(solution.increment, 10.0, epsilon = 1e-9);
    assert_relative_eq!(solution.tics_begin, 10.0, epsilon = 1e-9);
    assert_relative_eq!(solution.tics_end, 90.0, epsilon = 1e-9);
}

#[test]
fn manual_limits_stop_after_the_first_trial() {
    let request = ScaleRequest::new(0.0, 100.0).with_auto_limits(false);
    let outcome = LinearScaleSolver::default()
        .solve_for_extent(&request, 400.0)
        .expect("solve");

    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.status, SolveStatus::BestEffort);
    assert_relative_eq!(outcome.solution.increment, 100.0, epsilon = 1e-9);
    assert_eq!(
        (outcome.solution.scale_begin, outcome.solution.scale_end),
        (0.0, 100.0)
    );
}

#[test]
fn window_boundary_tie_is_accepted_at_any_magnitude() {
    let tiny = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(0.0, 1e-10), 400.0)
        .expect("solve");
    assert_eq!(tiny.status, SolveStatus::Converged);
    assert_relative_eq!(tiny.solution.increment, 1e-11, max_relative = 1e-9);
    assert_relative_eq!(tiny.pixel_gap, 40.0, max_relative = 1e-9);

    let huge = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(0.0, 1e10), 400.0)
        .expect("solve");
    assert_eq!(huge.status, SolveStatus::Converged);
    assert_relative_eq!(huge.solution.increment, 1e9, max_relative = 1e-9);
}

#[test]
fn overflowing_span_is_rejected() {
    let err = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(-1e308, 1e308), 400.0)
        .expect_err("span overflows");
    assert!(matches!(err, AxisError::DegenerateRange { .. }));
}

#[test]
fn limits_rounded_past_f64_max_are_rejected() {
    let err = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(0.0, 1.7e308), 400.0)
        .expect_err("rounded limit overflows");
    assert!(matches!(err, AxisError::NonFiniteCandidate { .. }));
}

#[test]
fn manual_increment_is_measured_once() {
    let request = ScaleRequest::new(0.0, 100.0).with_increment(25.0, false);
    let outcome = LinearScaleSolver::default()
        .solve_for_extent(&request, 400.0)
        .expect("solve");

    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.solution.increment, 25.0);
    assert_relative_eq!(outcome.pixel_gap, 100.0, epsilon = 1e-9);
}

#[test]
fn descending_scale_keeps_direction_and_positive_increment() {
    let solution = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(100.0, 0.0), 400.0)
        .expect("solve")
        .solution;

    assert_relative_eq!(solution.increment, 10.0, epsilon = 1e-9);
    assert_relative_eq!(solution.signed_increment(), -10.0, epsilon = 1e-9);
    assert_relative_eq!(solution.scale_begin, 100.0, epsilon = 1e-9);
    assert_relative_eq!(solution.scale_end, 0.0, epsilon = 1e-9);
}

#[test]
fn short_line_falls_back_to_single_step() {
    let outcome = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(0.0, 100.0), 20.0)
        .expect("solve");

    assert_eq!(outcome.status, SolveStatus::BestEffort);
    assert_relative_eq!(outcome.solution.increment, 100.0, epsilon = 1e-9);
    assert!(!outcome.solution.converged);
}

#[test]
fn iteration_cap_commits_closest_candidate() {
    let solver = LinearScaleSolver::new(SolverLimits {
        max_iterations: Some(1),
    });
    let outcome = solver
        .solve_for_extent(&ScaleRequest::new(0.0, 100.0), 400.0)
        .expect("solve");

    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.status, SolveStatus::BestEffort);
    assert_relative_eq!(outcome.solution.increment, 100.0, epsilon = 1e-9);
}

#[test]
fn degenerate_range_is_rejected() {
    let err = LinearScaleSolver::default()
        .solve_for_extent(&ScaleRequest::new(5.0, 5.0), 400.0)
        .expect_err("degenerate");
    assert!(matches!(err, AxisError::DegenerateRange { .. }));
}

#[test]
fn probe_errors_abort_the_search() {
    let mut probe = |_: &ScaleCandidate| -> Result<f64, AxisError> {
        Err(AxisError::InvalidGeometry("no line".to_owned()))
    };
    let err = LinearScaleSolver::default()
        .solve(&ScaleRequest::new(0.0, 1.0), &mut probe)
        .expect_err("probe failure");
    assert!(matches!(err, AxisError::InvalidGeometry(_)));
}

#[test]
fn probe_sees_every_candidate() {
    let mut seen = Vec::new();
    let mut probe = |candidate: &ScaleCandidate| -> Result<f64, AxisError> {
        seen.push(candidate.increment);
        Ok(400.0)
    };
    LinearScaleSolver::default()
        .solve(&ScaleRequest::new(0.0, 100.0), &mut probe)
        .expect("solve");

    assert_eq!(seen.len(), 6);
    assert_relative_eq!(seen[0], 100.0, epsilon = 1e-9);
    assert_relative_eq!(seen[1], 50.0, epsilon = 1e-9);
    assert_relative_eq!(seen[5], 5.0, epsilon = 1e-9);
}

use chart_axes::api::{Axis, AxisConfig, AxisLayoutDriver, AxisPalette, build_axis_frame};
use chart_axes::core::{Allocation, LinearScaleSolver, LogScaleSolver, ScaleRequest, ScaleSolver};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_linear_solve(c: &mut Criterion) {
    let solver = LinearScaleSolver::default();
    let request = ScaleRequest::new(-1_234.5, 98_765.4).with_auto_limits(true);

    c.bench_function("linear_scale_solve", |b| {
        b.iter(|| {
            solver
                .solve_for_extent(black_box(&request), black_box(1_200.0))
                .expect("solve")
        })
    });
}

fn bench_log_solve(c: &mut Criterion) {
    let solver = LogScaleSolver::default();
    let request = ScaleRequest::new(0.003, 4.2e7)
        .with_increment(10.0, true)
        .with_auto_limits(true);

    c.bench_function("log_scale_solve", |b| {
        b.iter(|| {
            solver
                .solve_for_extent(black_box(&request), black_box(800.0))
                .expect("solve")
        })
    });
}

fn bench_relayout_on_resize(c: &mut Criterion) {
    let driver = AxisLayoutDriver::new();
    let config = AxisConfig::default().with_scale(0.0, 12_345.0);
    let mut axis = Axis::linear()
        .with_config(config)
        .expect("valid config")
        .with_title("Distance [m]");

    c.bench_function("axis_relayout_on_resize", |b| {
        let mut width = 400;
        b.iter(|| {
            width = if width >= 1_600 { 400 } else { width + 37 };
            let report =
                driver.allocate_until_stable(&mut axis, Allocation::new(0, 0, width, 60));
            black_box(report.passes)
        })
    });
}

fn bench_frame_build(c: &mut Criterion) {
    let driver = AxisLayoutDriver::new();
    let mut axis = Axis::logarithmic();
    axis.config_mut().scale_end = 1.0e9;
    driver.allocate_until_stable(&mut axis, Allocation::new(0, 0, 80, 900));
    let palette = AxisPalette::default();

    c.bench_function("axis_frame_build", |b| {
        b.iter(|| build_axis_frame(black_box(&axis), &palette).expect("frame"))
    });
}

criterion_group!(
    benches,
    bench_linear_solve,
    bench_log_solve,
    bench_relayout_on_resize,
    bench_frame_build
);
criterion_main!(benches);

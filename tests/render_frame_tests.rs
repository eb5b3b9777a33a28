use std::f64::consts::{FRAC_PI_2, PI};

use chart_axes::api::{Axis, AxisConfig, AxisLayoutDriver, AxisPalette, build_axis_frame};
use chart_axes::core::{Allocation, PixelPoint, Viewport};
use chart_axes::render::{
    Color, LinePrimitive, NullRenderer, PrimitiveRole, RenderFrame, Renderer, TextPrimitive,
};
use chart_axes::AxisError;

fn laid_out_axis() -> Axis {
    let config = AxisConfig::default().with_direction(-FRAC_PI_2, PI);
    let mut axis = Axis::linear().with_config(config).expect("config");
    AxisLayoutDriver::new().allocate_until_stable(&mut axis, Allocation::new(0, 0, 400, 40));
    axis
}

#[test]
fn frame_holds_line_tics_and_labels() {
    let axis = laid_out_axis();
    let frame = build_axis_frame(&axis, &AxisPalette::default()).expect("frame");

    assert_eq!(frame.viewport, Viewport::new(400, 40));
    let counts = frame.counts();
    assert_eq!(counts.axis_lines, 1);
    assert_eq!(counts.major_tics, 6);
    assert_eq!(counts.minor_tics, 15);
    assert_eq!(counts.tic_labels, 6);
    assert_eq!(counts.titles, 0);

    let labels: Vec<_> = frame
        .texts_of(PrimitiveRole::TicLabel)
        .map(|text| text.markup.as_str())
        .collect();
    assert_eq!(labels, ["0", "20", "40", "60", "80", "100"]);

    let main = frame.lines_of(PrimitiveRole::AxisLine).next().expect("axis line");
    assert!((main.length() - 378.0).abs() < 1e-6);
    assert!(frame
        .lines_of(PrimitiveRole::MajorTic)
        .all(|tic| (tic.length() - 12.0).abs() < 1e-9));
    assert!(frame
        .lines_of(PrimitiveRole::MinorTic)
        .all(|tic| (tic.length() - 6.0).abs() < 1e-9));
}

#[test]
fn null_renderer_counts_primitives() {
    let axis = laid_out_axis();
    let frame = build_axis_frame(&axis, &AxisPalette::default()).expect("frame");

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    renderer.render(&frame).expect("render again");
    assert_eq!(renderer.last_counts, frame.counts());
    assert_eq!(renderer.last_counts.total(), 28);
    assert_eq!(renderer.frames_rendered, 2);
}

#[test]
fn hidden_axis_builds_an_empty_frame() {
    let mut axis = laid_out_axis();
    axis.set_visible(false);
    let frame = build_axis_frame(&axis, &AxisPalette::default()).expect("frame");
    assert!(frame.is_empty());
}

#[test]
fn title_is_drawn_with_its_own_color() {
    let config = AxisConfig::default().with_direction(-FRAC_PI_2, PI);
    let mut axis = Axis::linear()
        .with_config(config)
        .expect("config")
        .with_title("Distance");
    AxisLayoutDriver::new().allocate_until_stable(&mut axis, Allocation::new(0, 0, 400, 80));

    let title_color = Color::rgb(0.8, 0.1, 0.1);
    let palette = AxisPalette {
        title_color,
        ..AxisPalette::default()
    };
    let frame = build_axis_frame(&axis, &palette).expect("frame");
    assert_eq!(frame.counts().titles, 1);
    let title = frame.texts_of(PrimitiveRole::Title).next().expect("title text");
    assert_eq!(title.markup, "Distance");
    assert_eq!(title.color, title_color);
}

#[test]
fn out_of_range_palette_color_is_rejected() {
    let axis = laid_out_axis();
    let palette = AxisPalette::default().with_color(Color::rgba(1.5, 0.0, 0.0, 1.0));
    assert!(matches!(
        build_axis_frame(&axis, &palette),
        Err(AxisError::InvalidData(_))
    ));
}

#[test]
fn invalid_primitives_fail_validation() {
    let frame = RenderFrame::new(Viewport::new(10, 10)).with_line(
        PrimitiveRole::MajorTic,
        LinePrimitive::new(
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(f64::NAN, 1.0),
            1.0,
            Color::BLACK,
        ),
    );
    assert!(matches!(frame.validate(), Err(AxisError::InvalidData(_))));

    let frame = RenderFrame::new(Viewport::new(0, 10));
    assert!(matches!(
        NullRenderer::default().render(&frame),
        Err(AxisError::InvalidGeometry(_))
    ));

    let frame = RenderFrame::new(Viewport::new(10, 10)).with_text(
        PrimitiveRole::TicLabel,
        TextPrimitive::new("", PixelPoint::new(1.0, 1.0), 12.0, Color::BLACK),
    );
    assert!(frame.validate().is_err());
}

use super::axis::Axis;
use crate::core::tic::{Tic, TicKind, TicSpaceProbe};
use crate::core::types::{PixelPoint, Viewport};
use crate::error::AxisResult;
use crate::render::{Color, LinePrimitive, PrimitiveRole, RenderFrame, TextPrimitive};

/// Colors and minor tic scaling used when turning a laid-out axis into draw
/// primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPalette {
    pub line_color: Color,
    pub tic_color: Color,
    pub label_color: Color,
    pub title_color: Color,
    /// Minor tic length relative to a major tic.
    pub minor_tic_scale: f64,
}

impl Default for AxisPalette {
    fn default() -> Self {
        Self {
            line_color: Color::BLACK,
            tic_color: Color::BLACK,
            label_color: Color::BLACK,
            title_color: Color::BLACK,
            minor_tic_scale: 0.5,
        }
    }
}

impl AxisPalette {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self.tic_color = color;
        self.label_color = color;
        self.title_color = color;
        self
    }
}

/// Draw primitives for the last layout of `axis`: the line between its
/// anchors, every visible tic, the labels of visible majors and the title.
/// A hidden axis yields an empty frame.
pub fn build_axis_frame(axis: &Axis, palette: &AxisPalette) -> AxisResult<RenderFrame> {
    let mut frame = RenderFrame::new(Viewport::covering(axis.allocation()));
    if !axis.is_visible() {
        return Ok(frame);
    }

    let style = axis.style();
    let config = axis.config();
    if style.line_width > 0.0 {
        let begin = axis.to_absolute(PixelPoint::new(config.begin_pix_x, config.begin_pix_y));
        let end = axis.to_absolute(PixelPoint::new(config.end_pix_x, config.end_pix_y));
        frame.push_line(
            PrimitiveRole::AxisLine,
            LinePrimitive::new(begin, end, style.line_width, palette.line_color),
        );
    }

    let probe = TicSpaceProbe::new(style.tics);
    let tics = axis.majors().chain(axis.minors()).map(|(_, tic)| tic);
    for tic in tics.filter(|tic| tic.visible) {
        if let Some(line) = tic_line(tic, &probe, palette) {
            let role = match tic.kind {
                TicKind::Major => PrimitiveRole::MajorTic,
                TicKind::Minor => PrimitiveRole::MinorTic,
            };
            frame.push_line(role, line);
        }
        if let (Some(origin), Some(markup)) = (probe.label_origin(tic), tic.label_markup()) {
            frame.push_text(
                PrimitiveRole::TicLabel,
                TextPrimitive::new(markup, origin, style.label_font_size, palette.label_color),
            );
        }
    }

    if axis.title_shown() {
        if let Some((title, rect)) = axis
            .title()
            .and_then(|title| title.allocation.map(|rect| (title, rect)))
        {
            if !title.markup.is_empty() {
                frame.push_text(
                    PrimitiveRole::Title,
                    TextPrimitive::new(
                        title.markup.clone(),
                        PixelPoint::new(f64::from(rect.x), f64::from(rect.y)),
                        style.label_font_size,
                        palette.title_color,
                    ),
                );
            }
        }
    }

    frame.validate()?;
    Ok(frame)
}

/// Tic stroke from the outer to the inner end; minors are scaled down.
fn tic_line(tic: &Tic, probe: &TicSpaceProbe, palette: &AxisPalette) -> Option<LinePrimitive> {
    let style = probe.style();
    if style.line_width <= 0.0 {
        return None;
    }
    let scale = match tic.kind {
        TicKind::Major => 1.0,
        TicKind::Minor => palette.minor_tic_scale,
    };
    let inner = style.inner_length * scale;
    let outer = style.outer_length * scale;
    if inner + outer <= 0.0 {
        return None;
    }

    let dir = tic.inner_direction;
    let pos = tic.screen_pos;
    Some(LinePrimitive::new(
        PixelPoint::new(pos.x - dir.x * outer, pos.y - dir.y * outer),
        PixelPoint::new(pos.x + dir.x * inner, pos.y + dir.y * inner),
        style.line_width,
        palette.tic_color,
    ))
}

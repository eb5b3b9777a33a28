use std::io::Write;

use cairo::{Context, Format, ImageSurface, LineCap};
use pango::FontDescription;
use pango::prelude::FontMapExt;

use crate::api::LabelMeasurer;
use crate::core::LabelSize;
use crate::error::{AxisError, AxisResult};
use crate::render::{Color, FrameCounts, PrimitiveRole, RenderFrame, Renderer, TextPrimitive};

const LABEL_FONT_FAMILY: &str = "Sans";

/// Offscreen Cairo renderer: every frame is painted onto a cleared image
/// surface, which can then be exported as PNG.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    background: Color,
    last_counts: FrameCounts,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> AxisResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(AxisError::InvalidGeometry(format!(
                "cairo surface must be non-empty, got {width}x{height}"
            )));
        }
        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| backend_error("creating surface", err))?;
        Ok(Self {
            surface,
            background: Color::WHITE,
            last_counts: FrameCounts::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_background(&mut self, color: Color) -> AxisResult<()> {
        color.validate()?;
        self.background = color;
        Ok(())
    }

    /// Primitives drawn by the last successful [`Renderer::render`].
    #[must_use]
    pub fn last_counts(&self) -> FrameCounts {
        self.last_counts
    }

    pub fn write_png(&self, target: &mut impl Write) -> AxisResult<()> {
        self.surface
            .write_to_png(target)
            .map_err(|err| AxisError::InvalidData(format!("writing png: {err}")))
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> AxisResult<()> {
        let context =
            Context::new(&self.surface).map_err(|err| backend_error("creating context", err))?;
        set_color(&context, self.background);
        context
            .paint()
            .map_err(|err| backend_error("clearing surface", err))?;
        self.last_counts = draw_frame(&context, frame)?;
        Ok(())
    }
}

/// Draws `frame` onto a host context, e.g. the one a GTK draw function
/// receives. Nothing is cleared first.
pub fn draw_frame(context: &Context, frame: &RenderFrame) -> AxisResult<FrameCounts> {
    frame.validate()?;

    for item in &frame.lines {
        let line = &item.line;
        // The axis line overshoots by half a stroke so it meets the outer tics.
        context.set_line_cap(match item.role {
            PrimitiveRole::AxisLine => LineCap::Square,
            _ => LineCap::Butt,
        });
        set_color(context, line.color);
        context.set_line_width(line.stroke_width);
        context.move_to(line.from.x, line.from.y);
        context.line_to(line.to.x, line.to.y);
        context
            .stroke()
            .map_err(|err| backend_error("stroking line", err))?;
    }

    for item in &frame.texts {
        show_markup(context, &item.text);
    }

    Ok(frame.counts())
}

fn show_markup(context: &Context, text: &TextPrimitive) {
    let layout = pangocairo::functions::create_layout(context);
    layout.set_font_description(Some(&font_description(text.font_size_px)));
    layout.set_markup(&text.markup);
    set_color(context, text.color);
    context.move_to(text.origin.x, text.origin.y);
    pangocairo::functions::show_layout(context, &layout);
}

/// [`LabelMeasurer`] backed by a PangoCairo font map, so measured sizes
/// match what [`draw_frame`] renders.
#[derive(Debug)]
pub struct PangoLabelMeasurer {
    context: pango::Context,
    font: FontDescription,
}

impl PangoLabelMeasurer {
    #[must_use]
    pub fn new(font_size_px: f64) -> Self {
        Self {
            context: pangocairo::FontMap::default().create_context(),
            font: font_description(font_size_px),
        }
    }
}

impl Default for PangoLabelMeasurer {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl LabelMeasurer for PangoLabelMeasurer {
    fn measure(&self, markup: &str) -> LabelSize {
        if markup.is_empty() {
            return LabelSize::default();
        }
        let layout = pango::Layout::new(&self.context);
        layout.set_font_description(Some(&self.font));
        layout.set_markup(markup);
        let (width, height) = layout.pixel_size();
        LabelSize::new(width, height)
    }
}

fn font_description(font_size_px: f64) -> FontDescription {
    let mut font = FontDescription::from_string(LABEL_FONT_FAMILY);
    font.set_absolute_size(font_size_px * f64::from(pango::SCALE));
    font
}

fn set_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn backend_error(stage: &str, err: cairo::Error) -> AxisError {
    AxisError::InvalidData(format!("cairo failed {stage}: {err}"))
}

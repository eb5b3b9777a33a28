use crate::core::Viewport;
use crate::error::{AxisError, AxisResult};
use crate::render::{LinePrimitive, TextPrimitive};

/// What a primitive depicts. Backends may style by role; the frame keeps
/// primitives of one role in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveRole {
    AxisLine,
    MajorTic,
    MinorTic,
    TicLabel,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLine {
    pub role: PrimitiveRole,
    pub line: LinePrimitive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameText {
    pub role: PrimitiveRole,
    pub text: TextPrimitive,
}

/// Primitive tally of a frame, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCounts {
    pub axis_lines: usize,
    pub major_tics: usize,
    pub minor_tics: usize,
    pub tic_labels: usize,
    pub titles: usize,
}

impl FrameCounts {
    fn bump(&mut self, role: PrimitiveRole) {
        let slot = match role {
            PrimitiveRole::AxisLine => &mut self.axis_lines,
            PrimitiveRole::MajorTic => &mut self.major_tics,
            PrimitiveRole::MinorTic => &mut self.minor_tics,
            PrimitiveRole::TicLabel => &mut self.tic_labels,
            PrimitiveRole::Title => &mut self.titles,
        };
        *slot += 1;
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.axis_lines + self.major_tics + self.minor_tics + self.tic_labels + self.titles
    }
}

/// Draw primitives of one axis, in absolute pixels of a `viewport`-sized
/// target. Lines are drawn before texts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<FrameLine>,
    pub texts: Vec<FrameText>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn push_line(&mut self, role: PrimitiveRole, line: LinePrimitive) {
        self.lines.push(FrameLine { role, line });
    }

    pub fn push_text(&mut self, role: PrimitiveRole, text: TextPrimitive) {
        self.texts.push(FrameText { role, text });
    }

    #[must_use]
    pub fn with_line(mut self, role: PrimitiveRole, line: LinePrimitive) -> Self {
        self.push_line(role, line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, role: PrimitiveRole, text: TextPrimitive) -> Self {
        self.push_text(role, text);
        self
    }

    pub fn lines_of(&self, role: PrimitiveRole) -> impl Iterator<Item = &LinePrimitive> {
        self.lines
            .iter()
            .filter(move |item| item.role == role)
            .map(|item| &item.line)
    }

    pub fn texts_of(&self, role: PrimitiveRole) -> impl Iterator<Item = &TextPrimitive> {
        self.texts
            .iter()
            .filter(move |item| item.role == role)
            .map(|item| &item.text)
    }

    #[must_use]
    pub fn counts(&self) -> FrameCounts {
        let mut counts = FrameCounts::default();
        let roles = self.lines.iter().map(|item| item.role);
        for role in roles.chain(self.texts.iter().map(|item| item.role)) {
            counts.bump(role);
        }
        counts
    }

    pub fn validate(&self) -> AxisResult<()> {
        if !self.viewport.is_valid() {
            return Err(AxisError::InvalidGeometry(format!(
                "viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.lines.iter().try_for_each(|item| item.line.validate())?;
        self.texts.iter().try_for_each(|item| item.text.validate())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{PrimitiveRole, RenderFrame};
    use crate::core::{PixelPoint, Viewport};
    use crate::render::{Color, LinePrimitive, TextPrimitive};

    #[test]
    fn counts_follow_roles() {
        let tic = LinePrimitive::new(PixelPoint::new(0.0, 0.0), PixelPoint::new(0.0, 6.0), 1.0, Color::BLACK);
        let frame = RenderFrame::new(Viewport::new(10, 10))
            .with_line(PrimitiveRole::MajorTic, tic)
            .with_line(PrimitiveRole::MinorTic, tic)
            .with_line(PrimitiveRole::MinorTic, tic)
            .with_text(
                PrimitiveRole::TicLabel,
                TextPrimitive::new("1", PixelPoint::new(0.0, 8.0), 12.0, Color::BLACK),
            );

        let counts = frame.counts();
        assert_eq!((counts.major_tics, counts.minor_tics, counts.tic_labels), (1, 2, 1));
        assert_eq!(counts.total(), 4);
        assert_eq!(frame.lines_of(PrimitiveRole::MinorTic).count(), 2);
    }
}

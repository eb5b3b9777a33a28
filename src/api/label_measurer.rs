use crate::core::types::LabelSize;

/// Produces the preferred pixel size of a label from its markup text.
pub trait LabelMeasurer {
    fn measure(&self, markup: &str) -> LabelSize;
}

impl<M: LabelMeasurer + ?Sized> LabelMeasurer for &M {
    fn measure(&self, markup: &str) -> LabelSize {
        (**self).measure(markup)
    }
}

/// Deterministic, font-free measurer: fixed advance per glyph, superscript
/// runs at reduced size and raised by a third of the line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicLabelMeasurer {
    pub font_size_px: f64,
    pub char_width_ratio: f64,
    pub line_height_ratio: f64,
    pub superscript_scale: f64,
}

impl Default for HeuristicLabelMeasurer {
    fn default() -> Self {
        Self::with_font_size(12.0)
    }
}

impl HeuristicLabelMeasurer {
    #[must_use]
    pub fn with_font_size(font_size_px: f64) -> Self {
        Self {
            font_size_px,
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
            superscript_scale: 0.7,
        }
    }
}

impl LabelMeasurer for HeuristicLabelMeasurer {
    fn measure(&self, markup: &str) -> LabelSize {
        let runs = markup_runs(markup);
        if runs.iter().all(|run| run.text.is_empty()) {
            return LabelSize::default();
        }

        let advance = self.font_size_px * self.char_width_ratio;
        let mut width = 0.0;
        let mut raised = false;
        for run in &runs {
            let glyphs = run.text.chars().count() as f64;
            if run.superscript {
                width += glyphs * advance * self.superscript_scale;
                raised |= glyphs > 0.0;
            } else {
                width += glyphs * advance;
            }
        }

        let line_height = self.font_size_px * self.line_height_ratio;
        let height = if raised {
            line_height * (1.0 + 1.0 / 3.0)
        } else {
            line_height
        };
        LabelSize::new(width.ceil() as i32, height.ceil() as i32)
    }
}

/// Text run of a markup string together with its superscript state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRun {
    pub text: String,
    pub superscript: bool,
}

/// Splits Pango-style markup into plain text runs. Only `<sup>` changes the
/// run state; other tags are dropped and `&amp;`-style entities decoded.
#[must_use]
pub fn markup_runs(markup: &str) -> Vec<MarkupRun> {
    let mut runs = vec![MarkupRun {
        text: String::new(),
        superscript: false,
    }];
    let mut depth = 0usize;
    let mut rest = markup;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(close) = rest.find('>') {
                let tag = rest[1..close].trim();
                match tag {
                    "sup" => depth += 1,
                    "/sup" => depth = depth.saturating_sub(1),
                    _ => {}
                }
                let superscript = depth > 0;
                if runs.last().is_some_and(|run| run.superscript != superscript) {
                    runs.push(MarkupRun {
                        text: String::new(),
                        superscript,
                    });
                }
                rest = &rest[close + 1..];
                continue;
            }
        }

        let (decoded, consumed) = decode_entity(rest).unwrap_or((ch, ch.len_utf8()));
        if let Some(run) = runs.last_mut() {
            run.text.push(decoded);
        }
        rest = &rest[consumed..];
    }

    runs.retain(|run| !run.text.is_empty());
    runs
}

/// Markup with all tags removed and entities decoded.
#[must_use]
pub fn strip_markup(markup: &str) -> String {
    markup_runs(markup)
        .into_iter()
        .map(|run| run.text)
        .collect()
}

fn decode_entity(text: &str) -> Option<(char, usize)> {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];
    ENTITIES
        .iter()
        .find(|(entity, _)| text.starts_with(entity))
        .map(|(entity, ch)| (*ch, entity.len()))
}

#[cfg(test)]
mod tests {
    use super::{HeuristicLabelMeasurer, LabelMeasurer, markup_runs, strip_markup};

    #[test]
    fn superscript_runs_are_split() {
        let runs = markup_runs("5\u{d7}10<sup>2</sup>");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "5\u{d7}10");
        assert!(runs[1].superscript);
        assert_eq!(strip_markup("a &amp; <b>b</b>"), "a & b");
    }

    #[test]
    fn superscript_raises_label_height() {
        let measurer = HeuristicLabelMeasurer::default();
        let plain = measurer.measure("500");
        let raised = measurer.measure("5\u{d7}10<sup>2</sup>");
        assert_eq!(plain.height, 15);
        assert!(raised.height > plain.height);
        assert_eq!(measurer.measure("").width, 0);
    }
}

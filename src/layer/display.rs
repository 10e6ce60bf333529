use crate::{Layer, Spanned, Text};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

/// Internal representation of one rendered span line.
struct IncludedSpan {
    start: usize,
    end: usize,
    label: String,
}

/// Renders layers underneath their text, one marker line per annotation.
///
/// ```text
/// Üks kaks kolm
///     ╰──╯words
/// ╰───────────╯sentences(id=1)
/// ```
pub struct LayerDisplay<'a> {
    text: &'a Text,
    include_spans: Vec<IncludedSpan>,
}

impl<'a> std::fmt::Display for LayerDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // control characters (newlines, tabs) would break the column layout
        let opening_line: String = self
            .text
            .as_str()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let char_to_byte: Vec<usize> = opening_line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(opening_line.len()))
            .collect();
        let column = |pos: usize| {
            let byte = char_to_byte[pos.min(char_to_byte.len() - 1)];
            UnicodeWidthStr::width(&opening_line[..byte])
        };

        f.write_str(&opening_line)?;

        for span in self.include_spans.iter() {
            f.write_char('\n')?;

            let start_col = column(span.start);
            let end_col = column(span.end);
            for _ in 0..start_col {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_col.saturating_sub(start_col) > 1 {
                f.write_char('╯')?;
            }

            f.write_str(&span.label)?;
        }

        Ok(())
    }
}

impl<'a> LayerDisplay<'a> {
    pub fn new(text: &'a Text) -> Self {
        LayerDisplay {
            text,
            include_spans: Vec::new(),
        }
    }

    pub fn include(&mut self, layer: &Layer) {
        for span in layer {
            for annotation in span.annotations() {
                let label = if annotation.is_empty() {
                    layer.name().to_string()
                } else {
                    format!("{}({})", layer.name(), annotation)
                };
                self.include_spans.push(IncludedSpan {
                    start: span.start(),
                    end: span.end(),
                    label,
                });
            }
        }
    }

    /// Takes self
    pub fn with(mut self, layer: &Layer) -> Self {
        self.include(layer);
        self
    }
}

use crate::{SegmentationError, SegmentationResult};
use layered_text::{Annotation, Layer, Span, Spanned, Text};
use tracing::{debug, trace};

type TrimFn = Box<dyn for<'a> Fn(&'a str) -> &'a str>;
type DecorateFn = Box<dyn Fn(&str) -> Annotation>;

/// Tags the stretches of text that no span of the input layers covers.
///
/// ```
/// use layered_segmentation::GapTagger;
/// use layered_text::{tokenize_words, Annotation, Text};
///
/// let mut text = Text::new("Üks, kaks");
/// text.set_layer(tokenize_words(text.as_str())).unwrap();
///
/// let gaps = GapTagger::new("gaps", ["tokens"])
///     .with_trim(str::trim)
///     .with_decorator(["gap_length"], |gap| {
///         Annotation::new().with("gap_length", gap.chars().count())
///     })
///     .tag(&text)
///     .unwrap();
/// assert!(gaps.is_empty());
/// ```
pub struct GapTagger {
    output_layer: String,
    input_layers: Vec<String>,
    attributes: Vec<String>,
    trim: Option<TrimFn>,
    decorator: Option<DecorateFn>,
}

impl std::fmt::Debug for GapTagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GapTagger")
            .field("output_layer", &self.output_layer)
            .field("input_layers", &self.input_layers)
            .field("attributes", &self.attributes)
            .field("trim", &self.trim.is_some())
            .field("decorator", &self.decorator.is_some())
            .finish()
    }
}

impl GapTagger {
    pub fn new<I, S>(output_layer: impl Into<String>, input_layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GapTagger {
            output_layer: output_layer.into(),
            input_layers: input_layers.into_iter().map(Into::into).collect(),
            attributes: Vec::new(),
            trim: None,
            decorator: None,
        }
    }

    /// Narrow every gap to the subslice `trim` returns; gaps trimmed to
    /// nothing, or to a string that is not part of the gap, are dropped.
    pub fn with_trim<F>(mut self, trim: F) -> Self
    where
        F: for<'a> Fn(&'a str) -> &'a str + 'static,
    {
        self.trim = Some(Box::new(trim));
        self
    }

    /// Annotate every gap from its (trimmed) text. `attributes` is the schema
    /// of the output layer and must match what `decorator` returns.
    pub fn with_decorator<I, S, F>(mut self, attributes: I, decorator: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str) -> Annotation + 'static,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self.decorator = Some(Box::new(decorator));
        self
    }

    pub fn output_layer(&self) -> &str {
        &self.output_layer
    }

    pub fn tag(&self, text: &Text) -> SegmentationResult<Layer> {
        let mut covered: Vec<Span> = Vec::new();
        for name in &self.input_layers {
            let layer = text
                .layer(name)
                .ok_or_else(|| SegmentationError::MissingLayer(name.clone()))?;
            covered.extend(layer.iter().map(|span| span.interval()));
        }
        covered.sort();

        let mut gaps = Layer::new(self.output_layer.clone(), self.attributes.clone());
        let mut cursor = 0;
        for span in &covered {
            if span.start > cursor {
                self.add_gap(text, Span::new(cursor, span.start), &mut gaps)?;
            }
            cursor = cursor.max(span.end);
        }
        if cursor < text.len() {
            self.add_gap(text, Span::new(cursor, text.len()), &mut gaps)?;
        }

        debug!(layer = %self.output_layer, gaps = gaps.len(), "tagged gaps");
        Ok(gaps)
    }

    pub fn tag_into(&self, text: &mut Text) -> SegmentationResult<()> {
        let gaps = self.tag(text)?;
        text.set_layer(gaps)?;
        Ok(())
    }

    fn add_gap(&self, text: &Text, gap: Span, gaps: &mut Layer) -> SegmentationResult<()> {
        let gap_text = text.span_text(&gap);
        let (span, content) = match &self.trim {
            None => (gap, gap_text),
            Some(trim) => {
                let trimmed = trim(gap_text);
                let offset = match byte_offset(gap_text, trimmed) {
                    Some(byte) if !trimmed.is_empty() => gap_text[..byte].chars().count(),
                    _ => {
                        trace!(%gap, "gap trimmed away");
                        return Ok(());
                    }
                };
                let start = gap.start + offset;
                (Span::new(start, start + trimmed.chars().count()), trimmed)
            }
        };

        let annotation = match &self.decorator {
            Some(decorator) => decorator(content),
            None => Annotation::new(),
        };
        gaps.add_span(span, annotation)?;
        Ok(())
    }
}

/// Byte position of `part` inside `whole`, if `part` is a subslice of it.
fn byte_offset(whole: &str, part: &str) -> Option<usize> {
    let offset = (part.as_ptr() as usize).checked_sub(whole.as_ptr() as usize)?;
    let in_bounds = offset + part.len() <= whole.len();
    (in_bounds && whole.is_char_boundary(offset)).then(|| offset)
}

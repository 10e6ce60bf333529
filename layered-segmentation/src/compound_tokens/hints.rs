use crate::pattern::PatternMatch;
use crate::{SegmentationError, SegmentationResult};
use layered_text::{Layer, Text};
use std::collections::HashMap;
use tracing::trace;

/// Prefix of pattern types that only exist to block other patterns.
pub const NEGATIVE_PREFIX: &str = "negative:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub end: usize,
    pub pattern_type: Option<String>,
    pub normalized: Option<String>,
}

/// Index the accepted hints of `matches` by start position.
///
/// Negative hints and hints spanning a separator are dropped. Two hints with
/// the same start mean the matcher failed to resolve its conflicts, which is
/// an error.
pub fn collect_hints(
    matches: &Layer,
    text: &Text,
    separators: &[String],
) -> SegmentationResult<HashMap<usize, Hint>> {
    let mut hints: HashMap<usize, Hint> = HashMap::new();
    let mut texts: HashMap<usize, &str> = HashMap::new();

    for span in matches {
        let hit = PatternMatch::from_layer_span(span);
        if hit
            .pattern_type
            .as_deref()
            .map_or(false, |t| t.starts_with(NEGATIVE_PREFIX))
        {
            continue;
        }

        let covered = text.span_text(&hit.span);
        if let Some(previous) = texts.get(&hit.span.start) {
            return Err(SegmentationError::OverlappingHints {
                start: hit.span.start,
                hints: vec![previous.to_string(), covered.to_string()],
            });
        }
        texts.insert(hit.span.start, covered);
        if separators.iter().any(|sep| covered.contains(sep.as_str())) {
            trace!(span = %hit.span, "hint crosses a separator");
            continue;
        }

        hints.insert(
            hit.span.start,
            Hint {
                end: hit.span.end,
                pattern_type: hit.pattern_type,
                normalized: hit.normalized,
            },
        );
    }

    Ok(hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{MATCH_ATTRIBUTES, PATTERN_TYPE};
    use layered_text::{Annotation, Span};

    fn hit(pattern_type: &str) -> Annotation {
        let mut hit = PatternMatch::new(Span::new(0, 0));
        hit.pattern_type = Some(pattern_type.to_string());
        hit.to_annotation()
    }

    #[test]
    fn negative_and_separated_hints_are_dropped() {
        let text = Text::new("12\n\n000 ja 5 000");
        let mut layer = Layer::new("hints", MATCH_ATTRIBUTES);
        layer.add_span(Span::new(0, 7), hit("number")).unwrap();
        layer.add_span(Span::new(8, 10), hit("negative:word")).unwrap();
        layer.add_span(Span::new(11, 16), hit("number")).unwrap();

        let hints = collect_hints(&layer, &text, &["\n\n".to_string()]).unwrap();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[&11].end, 16);
        assert_eq!(hints[&11].pattern_type.as_deref(), Some("number"));
    }

    #[test]
    fn shared_start_is_fatal() {
        let text = Text::new("5 000 000");
        let mut layer = Layer::new("hints", [PATTERN_TYPE]).ambiguous();
        layer
            .add_span(Span::new(0, 5), Annotation::new().with(PATTERN_TYPE, "number"))
            .unwrap();
        layer
            .add_span(Span::new(0, 9), Annotation::new().with(PATTERN_TYPE, "number"))
            .unwrap();

        match collect_hints(&layer, &text, &[]) {
            Err(SegmentationError::OverlappingHints { start, hints }) => {
                assert_eq!(start, 0);
                assert_eq!(hints, vec!["5 000", "5 000 000"]);
            }
            other => panic!("expected overlapping hints, got {:?}", other),
        }
    }
}

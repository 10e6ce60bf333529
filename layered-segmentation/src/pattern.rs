//! The pattern-matching seam: anything that turns a text into a flat,
//! non-overlapping layer of pattern matches.

use crate::SegmentationResult;
use layered_text::{Annotation, AttrValue, Layer, LayerSpan, Span, Spanned, Text};

pub const PATTERN_TYPE: &str = "pattern_type";
pub const NORMALIZED: &str = "normalized";
pub const PRIORITY: &str = "priority";
pub const LEFT_STRICT: &str = "left_strict";
pub const RIGHT_STRICT: &str = "right_strict";

/// Attribute schema of a match layer.
pub const MATCH_ATTRIBUTES: [&str; 5] = [PATTERN_TYPE, NORMALIZED, PRIORITY, LEFT_STRICT, RIGHT_STRICT];

/// Produces a plain layer of non-overlapping matches over a text.
///
/// Conflicts between the vocabulary's patterns are resolved by the matcher
/// itself; callers treat the output as final.
pub trait PatternMatcher {
    fn match_patterns(&self, text: &Text) -> SegmentationResult<Layer>;
}

impl<M: PatternMatcher + ?Sized> PatternMatcher for Box<M> {
    fn match_patterns(&self, text: &Text) -> SegmentationResult<Layer> {
        (**self).match_patterns(text)
    }
}

/// Typed view of one match.
///
/// Reading is lenient: attributes a matcher does not produce take their
/// defaults (no type, no normalization, priority 0, strict boundaries).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub span: Span,
    pub pattern_type: Option<String>,
    pub normalized: Option<String>,
    pub priority: i64,
    pub left_strict: bool,
    pub right_strict: bool,
}

impl PatternMatch {
    pub fn new(span: Span) -> Self {
        PatternMatch {
            span,
            pattern_type: None,
            normalized: None,
            priority: 0,
            left_strict: true,
            right_strict: true,
        }
    }

    pub fn from_layer_span(span: &LayerSpan) -> Self {
        let annotation = span.annotation();
        let text = |name: &str| annotation.get(name).and_then(AttrValue::as_str).map(String::from);
        let flag = |name: &str| match annotation.get(name) {
            Some(AttrValue::Bool(value)) => *value,
            _ => true,
        };
        PatternMatch {
            span: span.interval(),
            pattern_type: text(PATTERN_TYPE),
            normalized: text(NORMALIZED),
            priority: annotation
                .get(PRIORITY)
                .and_then(AttrValue::as_int)
                .unwrap_or(0),
            left_strict: flag(LEFT_STRICT),
            right_strict: flag(RIGHT_STRICT),
        }
    }

    pub fn to_annotation(&self) -> Annotation {
        Annotation::new()
            .with(PATTERN_TYPE, self.pattern_type.clone())
            .with(NORMALIZED, self.normalized.clone())
            .with(PRIORITY, self.priority)
            .with(LEFT_STRICT, self.left_strict)
            .with(RIGHT_STRICT, self.right_strict)
    }
}

impl Spanned for PatternMatch {
    fn start(&self) -> usize {
        self.span.start
    }

    fn end(&self) -> usize {
        self.span.end
    }

    fn base_spans(&self) -> Vec<Span> {
        vec![self.span]
    }
}

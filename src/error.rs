//! Error types for layers and texts.

use crate::Span;
use thiserror::Error;

/// Violations of a layer's own invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error("layer '{layer}': annotation attributes {found:?} do not match schema {expected:?}")]
    SchemaMismatch {
        layer: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("layer '{layer}' has no attribute '{attribute}'")]
    UnknownAttribute { layer: String, attribute: String },

    #[error("layer '{layer}': attribute '{attribute}' has an unusable value: {reason}")]
    InvalidAttributeValue {
        layer: String,
        attribute: String,
        reason: String,
    },

    #[error("layer '{layer}' is unambiguous but span {span} received a second annotation")]
    AmbiguousAnnotation { layer: String, span: Span },

    #[error("layer '{layer}': span {span} overlaps {existing}")]
    Overlap {
        layer: String,
        span: Span,
        existing: Span,
    },

    #[error("layer '{layer}': span {span} has no annotation")]
    MissingAnnotation { layer: String, span: Span },

    #[error("layer '{layer}': enveloping spans only fit enveloping layers and vice versa (span {span})")]
    ShapeMismatch { layer: String, span: Span },

    #[error("layer '{layer}': invalid span [{start}, {end})")]
    InvalidSpan {
        layer: String,
        start: usize,
        end: usize,
    },

    #[error("layer '{0}' is ambiguous; attribute lists need an unambiguous layer")]
    AmbiguousLayer(String),
}

/// Errors raised when assigning a layer to a [`Text`](crate::Text).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("layer '{layer}': span {span} lies outside the text (length {len})")]
    OutOfBounds { layer: String, span: Span, len: usize },

    #[error("layer '{layer}' depends on '{dependency}', which is not in the text")]
    MissingDependency { layer: String, dependency: String },

    #[error("layer '{layer}' cannot depend on itself")]
    SelfReference { layer: String },

    #[error("attached layer '{layer}' has {found} spans but parent '{parent}' has {expected}")]
    AttachedCountMismatch {
        layer: String,
        parent: String,
        expected: usize,
        found: usize,
    },

    #[error("attached layer '{layer}': span {span} does not match parent span {parent_span}")]
    AttachedExtentMismatch {
        layer: String,
        span: Span,
        parent_span: Span,
    },

    #[error("enveloping layer '{layer}': component {component} is not a span of '{enveloped}'")]
    UnknownComponent {
        layer: String,
        enveloped: String,
        component: Span,
    },

    #[error("enveloping layer '{layer}': components of {span} are not contiguous in '{enveloped}'")]
    NonContiguousComponents {
        layer: String,
        enveloped: String,
        span: Span,
    },

    #[error("layer '{0}' not found")]
    UnknownLayer(String),

    #[error(transparent)]
    Layer(#[from] LayerError),
}

/// Errors crossing the record (persistence) boundary.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layer record '{0}' is both attached and enveloping")]
    ConflictingRelation(String),

    #[error("layer record '{layer}': invalid span [{start}, {end})")]
    InvalidSpan {
        layer: String,
        start: usize,
        end: usize,
    },

    #[error("layer record '{0}' has an enveloping span without components")]
    EmptyEnvelope(String),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Text(#[from] TextError),
}

use layered_text::{LayerError, TextError};
use thiserror::Error;

/// Errors raised while excerpting or splitting a text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("invalid excerpt window [{start}, {end}) for a text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("layer '{0}' not found")]
    UnknownLayer(String),

    #[error("layer '{layer}' is kept but the layer it depends on, '{dependency}', is not")]
    MissingDependency { layer: String, dependency: String },

    /// Ambiguous attached and ambiguous enveloping layers cannot be excerpted.
    #[error("layer '{layer}' is an ambiguous {kind} layer, which cannot be excerpted")]
    UnsupportedLayerShape { layer: String, kind: &'static str },

    #[error("layer dependencies form a cycle through '{0}'")]
    DependencyCycle(String),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Layer(#[from] LayerError),
}

pub type SplitResult<T> = Result<T, SplitError>;

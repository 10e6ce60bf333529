//! Error types for the segmentation taggers.

use layered_text::{LayerError, TextError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a tagger from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern {pattern:?} has no capture group {group}")]
    MissingGroup { pattern: String, group: usize },

    #[error("boundary pattern {pattern:?} must be strict on at least one side")]
    LooseBoundaries { pattern: String },

    #[error("custom abbreviations are given, but abbreviation tagging is switched off")]
    AbbreviationsDisabled,
}

/// Errors raised while tagging a text.
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("input layer '{0}' not found")]
    MissingLayer(String),

    /// Two accepted hints start at the same position. The pattern matcher is
    /// expected to resolve every conflict, so this is never recoverable.
    #[error("overlapping tokenization hints at position {start}: {hints:?}")]
    OverlappingHints { start: usize, hints: Vec<String> },

    #[error("boundary hint [{start}, {end}) is loose on both sides")]
    LooseBoundaries { start: usize, end: usize },

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Text(#[from] TextError),
}

pub type SegmentationResult<T> = Result<T, SegmentationError>;

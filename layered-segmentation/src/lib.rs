#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Segmentation taggers for layered-text.
//!
//! ## Taggers
//!
//! - [`GapTagger`] - Tags text no span of the input layers covers
//! - [`CompoundTokenTagger`] - Joins tokens into compound tokens
//! - [`RegexTagger`] - Matches a vocabulary of [`PatternRule`]s
//!
//! ## Seams
//!
//! - [`PatternMatcher`] - Text to a flat layer of pattern matches
//! - [`TokenNormalizer`] - Canonical form of a hyphenated word
//!
//! ## Example
//!
//! ```
//! use layered_segmentation::{CompoundTokenConfig, CompoundTokenTagger};
//! use layered_text::{tokenize_words, Text};
//!
//! let mut text = Text::new("Ta oli vää-ää-ääga väsinud");
//! text.set_layer(tokenize_words(text.as_str())).unwrap();
//!
//! let tagger = CompoundTokenTagger::from_config(CompoundTokenConfig::default()).unwrap();
//! let compounds = tagger.tag(&text).unwrap();
//! assert_eq!(compounds.len(), 1);
//! assert_eq!(text.span_text(&compounds.spans()[0]), "vää-ää-ääga");
//! ```

pub mod compound_tokens;
mod config;
mod error;
mod gaps;
mod normalizer;
mod pattern;
mod regex_tagger;

pub use compound_tokens::CompoundTokenTagger;
pub use config::{load_ignore_list, CompoundTokenConfig, ABBREVIATION_CATEGORY};
pub use error::{ConfigError, SegmentationError, SegmentationResult};
pub use gaps::GapTagger;
pub use normalizer::{HyphenNormalizer, TokenNormalizer};
pub use pattern::{
    PatternMatch, PatternMatcher, LEFT_STRICT, MATCH_ATTRIBUTES, NORMALIZED, PATTERN_TYPE,
    PRIORITY, RIGHT_STRICT,
};
pub use regex_tagger::{Normalization, PatternRule, RegexTagger};

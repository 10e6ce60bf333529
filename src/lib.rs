#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Multi-layer text annotation.
//!
//! A [`Text`] is a base string plus named [`Layer`]s. Each layer holds
//! ordered spans annotated with schema-checked attributes, and may stand
//! alone, attach 1:1 to a parent layer, or envelope spans of another layer.
//!
//! ## Core Types
//!
//! - [`Span`] / [`EnvelopingSpan`] / [`Extent`] - Character intervals
//! - [`Annotation`] / [`AttrValue`] - Per-span attributes
//! - [`Layer`] / [`AttributeList`] - Span collections and attribute projections
//! - [`Text`] - Base text and its layers
//!
//! ## Operations
//!
//! - [`layer_operations`] - Sorted insertion, coverage queries, conflict resolution
//! - [`record`] - Lossless conversion to JSON-shaped records
//! - [`LayerDisplay`] - Render layers under their text
//!
//! ## Example
//!
//! ```
//! use layered_text::{tokenize_words, LayerDisplay, Text};
//!
//! let mut text = Text::new("Tere maailm");
//! text.set_layer(tokenize_words(text.as_str())).unwrap();
//!
//! let tokens = text.layer("tokens").unwrap();
//! assert_eq!(tokens.len(), 2);
//! println!("{}", LayerDisplay::new(&text).with(tokens));
//! ```

mod annotation;
mod error;
mod layer;
pub mod layer_operations;
pub mod record;
mod span;
mod text;
mod tokenize;

pub use annotation::{Annotation, AttrValue};
pub use error::{LayerError, RecordError, TextError};
pub use layer::{AttributeList, Layer, LayerDisplay, LayerSpan, Relation};
pub use layer_operations::{Coverage, ConflictResolver, ConflictStrategy};
pub use span::{EnvelopingSpan, Extent, Span, Spanned};
pub use text::Text;
pub use tokenize::{tokenize_words, TOKENS_LAYER};

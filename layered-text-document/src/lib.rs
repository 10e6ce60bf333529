#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Document-level operations for layered-text.
//!
//! ## Core Operations
//!
//! - [`excerpt`] - Cut a character window out of a text, remapping its layers
//! - [`split_by`] / [`split_by_sentences`] - One excerpt per span of a layer
//! - [`layers_to_keep_default`] - Dependency closure of a layer
//!
//! ## Example
//!
//! ```
//! use layered_text::{tokenize_words, Text};
//! use layered_text_document::excerpt;
//!
//! let mut text = Text::new("Tere maailm");
//! text.set_layer(tokenize_words(text.as_str())).unwrap();
//!
//! let piece = excerpt(&text, 5, 11, None, false).unwrap();
//! assert_eq!(piece.as_str(), "maailm");
//! assert_eq!(piece.layer("tokens").unwrap().len(), 1);
//! ```

mod dependencies;
mod error;
mod splitting;

pub use dependencies::layers_to_keep_default;
pub use error::{SplitError, SplitResult};
pub use splitting::{excerpt, split_by, split_by_sentences, SENTENCES_LAYER};

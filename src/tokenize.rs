//! Word-boundary tokenization producing a plain `tokens` layer.

use crate::{Annotation, Layer, Span};
use unicode_segmentation::UnicodeSegmentation;

/// Name of the layer produced by [`tokenize_words`].
pub const TOKENS_LAYER: &str = "tokens";

/// Split `text` on Unicode word boundaries, dropping whitespace.
///
/// Punctuation becomes its own token, so `"vää-ää-ääga"` yields five tokens
/// and `"e.g."` yields `"e.g"` and `"."`.
pub fn tokenize_words(text: &str) -> Layer {
    let mut layer = Layer::new(TOKENS_LAYER, Vec::<String>::new());
    let mut char_pos = 0;
    let mut byte_pos = 0;

    for (byte_start, segment) in text.split_word_bound_indices() {
        char_pos += text[byte_pos..byte_start].chars().count();
        let start = char_pos;
        let end = start + segment.chars().count();
        char_pos = end;
        byte_pos = byte_start + segment.len();

        if segment.chars().all(char::is_whitespace) {
            continue;
        }
        layer
            .add_span(Span::new(start, end), Annotation::new())
            .expect("word segments are disjoint");
    }

    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Text;

    fn token_texts(text: &str) -> Vec<String> {
        let doc = Text::new(text);
        tokenize_words(text)
            .iter()
            .map(|span| doc.span_text(span).to_string())
            .collect()
    }

    #[test]
    fn punctuation_is_split_off() {
        assert_eq!(
            token_texts("vää-ää-ääga, 15-17."),
            vec!["vää", "-", "ää", "-", "ääga", ",", "15", "-", "17", "."]
        );
    }

    #[test]
    fn offsets_are_in_characters() {
        let layer = tokenize_words("Üks kaks");
        assert_eq!(layer.intervals(), vec![Span::new(0, 3), Span::new(4, 8)]);
    }

    #[test]
    fn whitespace_only_text_has_no_tokens() {
        assert!(tokenize_words(" \n\n  ").is_empty());
        assert_eq!(token_texts("a\n\nb"), vec!["a", "b"]);
    }
}

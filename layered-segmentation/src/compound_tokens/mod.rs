//! Joins tokens that should be read as one word into an enveloping
//! `compound_tokens` layer.
//!
//! Tagging runs in three stages:
//!
//! 1. The hint matcher marks spans such as numbers with digit groups or
//!    abbreviations with their period; see [`hints`].
//! 2. A sweep over the tokens turns hints into candidates and adds custom
//!    abbreviations and hyphenated words; see [`hyphenation`].
//! 3. When boundary patterns are configured, a second matcher joins the
//!    candidates with adjacent material, e.g. a case ending.
//!
//! Overlapping candidates are finally resolved in favour of the longer one.

pub mod hints;
pub mod hyphenation;
mod second_pass;

use crate::config::CompoundTokenConfig;
use crate::normalizer::{HyphenNormalizer, TokenNormalizer};
use crate::pattern::{PatternMatcher, NORMALIZED};
use crate::regex_tagger::RegexTagger;
use crate::{ConfigError, SegmentationError, SegmentationResult};
use hints::{collect_hints, Hint};
use hyphenation::{HyphenationScanner, TokenClass};
use layered_text::layer_operations::{disambiguate, first_annotation, resolve_conflicts};
use layered_text::{
    Annotation, AttrValue, ConflictStrategy, EnvelopingSpan, Layer, Span, Spanned, Text,
};
use std::collections::HashSet;
use tracing::{debug, trace};

pub const TYPE: &str = "type";

/// Attribute schema of the output layer.
pub const COMPOUND_ATTRIBUTES: [&str; 2] = [NORMALIZED, TYPE];

pub const TOKENIZATION_HINT: &str = "tokenization_hint";
pub const HYPHENATION: &str = "hyphenation";
pub const NON_ENDING_ABBREVIATION: &str = "non_ending_abbreviation";
pub const CASE_ENDING: &str = "case_ending";
pub const SIGN: &str = "sign";

/// A compound token under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub(crate) spans: Vec<Span>,
    pub(crate) types: Vec<String>,
    pub(crate) normalized: Option<String>,
}

impl Candidate {
    pub(crate) fn new(spans: Vec<Span>, types: Vec<String>, normalized: Option<String>) -> Self {
        Candidate {
            spans,
            types,
            normalized,
        }
    }

    fn single(spans: &[Span], kind: &str, normalized: Option<String>) -> Self {
        Candidate::new(spans.to_vec(), vec![kind.to_string()], normalized)
    }

    fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }

    fn annotation(&self) -> Annotation {
        Annotation::new()
            .with(NORMALIZED, self.normalized.clone())
            .with(TYPE, AttrValue::str_list(self.types.iter().cloned()))
    }
}

impl Spanned for Candidate {
    fn start(&self) -> usize {
        self.spans.first().map_or(0, |s| s.start)
    }

    fn end(&self) -> usize {
        self.spans.last().map_or(0, |s| s.end)
    }

    fn base_spans(&self) -> Vec<Span> {
        self.spans.clone()
    }
}

pub(crate) fn crosses_separator<S: Spanned>(text: &Text, span: &S, separators: &[String]) -> bool {
    let covered = text.span_text(span);
    separators.iter().any(|sep| covered.contains(sep.as_str()))
}

/// Tags compound tokens over a `tokens` layer.
///
/// Build it from a [`CompoundTokenConfig`]; the pattern matchers and the
/// hyphen normalizer can be swapped afterwards.
pub struct CompoundTokenTagger {
    output_layer: String,
    input_tokens_layer: String,
    hint_matcher: Box<dyn PatternMatcher>,
    boundary_matcher: Option<Box<dyn PatternMatcher>>,
    normalizer: Box<dyn TokenNormalizer>,
    tag_hyphenations: bool,
    custom_abbreviations: Vec<String>,
    separators: Vec<String>,
    ignored_words: HashSet<String>,
}

impl std::fmt::Debug for CompoundTokenTagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundTokenTagger")
            .field("output_layer", &self.output_layer)
            .field("input_tokens_layer", &self.input_tokens_layer)
            .field("second_pass", &self.boundary_matcher.is_some())
            .field("tag_hyphenations", &self.tag_hyphenations)
            .field("custom_abbreviations", &self.custom_abbreviations)
            .field("separators", &self.separators)
            .field("ignored_words", &self.ignored_words.len())
            .finish()
    }
}

impl CompoundTokenTagger {
    pub fn from_config(config: CompoundTokenConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ignored_words = config.ignored_words()?;

        let hint_matcher = RegexTagger::new("tokenization_hints", config.active_hint_patterns())?;
        let boundary_matcher: Option<Box<dyn PatternMatcher>> = if config.boundary_patterns.is_empty() {
            None
        } else {
            Some(Box::new(RegexTagger::new(
                "tokenization_hints",
                config.boundary_patterns.iter().cloned(),
            )?))
        };

        Ok(CompoundTokenTagger {
            output_layer: config.output_layer,
            input_tokens_layer: config.input_tokens_layer,
            hint_matcher: Box::new(hint_matcher),
            boundary_matcher,
            normalizer: Box::new(HyphenNormalizer),
            tag_hyphenations: config.tag_hyphenations,
            custom_abbreviations: config.custom_abbreviations,
            separators: config.do_not_join_on_strings,
            ignored_words,
        })
    }

    pub fn with_hint_matcher(mut self, matcher: impl PatternMatcher + 'static) -> Self {
        self.hint_matcher = Box::new(matcher);
        self
    }

    /// Enables the second pass with `matcher` producing the boundary hints.
    pub fn with_boundary_matcher(mut self, matcher: impl PatternMatcher + 'static) -> Self {
        self.boundary_matcher = Some(Box::new(matcher));
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl TokenNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn output_layer(&self) -> &str {
        &self.output_layer
    }

    pub fn tag(&self, text: &Text) -> SegmentationResult<Layer> {
        let tokens: Vec<Span> = text
            .layer(&self.input_tokens_layer)
            .ok_or_else(|| SegmentationError::MissingLayer(self.input_tokens_layer.clone()))?
            .iter()
            .map(|span| span.interval())
            .collect();

        let hint_matches = self.hint_matcher.match_patterns(text)?;
        let hints = collect_hints(&hint_matches, text, &self.separators)?;

        let mut queue: Vec<Candidate> = Vec::new();
        let mut scanner = HyphenationScanner::default();
        let mut last_end: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            if !self.custom_abbreviations.is_empty() {
                self.add_custom_abbreviation(text, &tokens, i, &mut queue);
            }
            if let Some(hint) = hints.get(&token.start) {
                self.apply_hint(&tokens, i, hint, &mut queue);
            }
            if self.tag_hyphenations {
                let class = TokenClass::of(text.span_text(token), last_end == Some(token.start));
                if let Some(run) = scanner.feed(i, class) {
                    self.add_hyphenation(text, &tokens[run], &mut queue);
                }
            }
            last_end = Some(token.end);
        }
        if self.tag_hyphenations {
            if let Some(run) = scanner.finish(tokens.len()) {
                self.add_hyphenation(text, &tokens[run], &mut queue);
            }
        }

        if let Some(matcher) = &self.boundary_matcher {
            let boundary_matches = matcher.match_patterns(text)?;
            queue = second_pass::apply_boundary_hints(
                text,
                &tokens,
                &boundary_matches,
                &self.separators,
                queue,
            )?;
        }

        self.finalize(queue)
    }

    pub fn tag_into(&self, text: &mut Text) -> SegmentationResult<()> {
        let layer = self.tag(text)?;
        text.set_layer(layer)?;
        Ok(())
    }

    fn add_custom_abbreviation(&self, text: &Text, tokens: &[Span], i: usize, queue: &mut Vec<Candidate>) {
        let token = text.span_text(&tokens[i]);
        if !self.custom_abbreviations.iter().any(|a| a == token) {
            return;
        }

        // a trailing period is taken along unless it closes the token layer
        let period = tokens
            .get(i + 1)
            .filter(|next| i + 2 < tokens.len() && next.start == tokens[i].end)
            .filter(|next| text.span_text(*next) == ".");
        let candidate = match period {
            Some(_) => Candidate::single(
                &tokens[i..i + 2],
                NON_ENDING_ABBREVIATION,
                Some(format!("{}.", token)),
            ),
            None => Candidate::single(&tokens[i..i + 1], NON_ENDING_ABBREVIATION, None),
        };
        if crosses_separator(text, &candidate, &self.separators) {
            return;
        }

        if let Some(last) = queue.last() {
            if last.start() < candidate.start() && candidate.end() < last.end() {
                trace!(span = %candidate.interval(), "custom abbreviation inside a compound");
                return;
            }
            if last.end() == candidate.end() {
                if last.has_type(NON_ENDING_ABBREVIATION) {
                    return;
                }
                trace!(span = %last.interval(), "compound replaced by a custom abbreviation");
                queue.pop();
            }
        }
        queue.push(candidate);
    }

    fn apply_hint(&self, tokens: &[Span], i: usize, hint: &Hint, queue: &mut Vec<Candidate>) {
        let mut last_token = None;
        for (j, token) in tokens.iter().enumerate().skip(i) {
            if token.end == hint.end {
                last_token = Some(j);
            } else if hint.end < token.start {
                break;
            }
        }
        let last_token = match last_token {
            Some(j) => j,
            None => {
                trace!(start = tokens[i].start, end = hint.end, "hint does not end on a token");
                return;
            }
        };

        let kind = hint.pattern_type.as_deref().unwrap_or(TOKENIZATION_HINT);
        let candidate = Candidate::single(&tokens[i..=last_token], kind, hint.normalized.clone());

        if !self.custom_abbreviations.is_empty() {
            if let Some(last) = queue.last() {
                if last.start() <= candidate.start() && candidate.start() < last.end() {
                    return;
                }
            }
        }
        queue.push(candidate);
    }

    fn add_hyphenation(&self, text: &Text, run: &[Span], queue: &mut Vec<Candidate>) {
        let (first, last) = match (run.first(), run.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return,
        };
        let word = text.slice(first.start, last.end);
        // numeric ranges such as 15-17 are not words
        if !word.chars().any(char::is_alphabetic) {
            return;
        }

        let normalized = if self.ignored_words.contains(word) {
            None
        } else {
            Some(self.normalizer.normalize(word)).filter(|normal| normal != word)
        };
        queue.push(Candidate::single(run, HYPHENATION, normalized));
    }

    fn finalize(&self, queue: Vec<Candidate>) -> SegmentationResult<Layer> {
        let mut candidates = Layer::new(self.output_layer.clone(), COMPOUND_ATTRIBUTES)
            .enveloping(self.input_tokens_layer.clone())
            .ambiguous();
        for candidate in &queue {
            if let Some(envelope) = EnvelopingSpan::new(candidate.spans.clone()) {
                candidates.add_span(envelope, candidate.annotation())?;
            }
        }

        let resolved = resolve_conflicts(&candidates, ConflictStrategy::Max, None, false)?;
        let layer = disambiguate(&resolved, first_annotation)?;
        debug!(
            layer = %self.output_layer,
            candidates = queue.len(),
            compounds = layer.len(),
            "tagged compound tokens"
        );
        Ok(layer)
    }
}

//! A [`PatternMatcher`] over a vocabulary of regular expressions.

use crate::pattern::{PatternMatch, PatternMatcher, MATCH_ATTRIBUTES, PRIORITY};
use crate::{ConfigError, SegmentationResult};
use layered_text::layer_operations::disambiguate;
use layered_text::{Annotation, AttrValue, ConflictResolver, ConflictStrategy, Layer, Span, Text};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How the `normalized` value of a match is derived from the matched text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalization {
    /// No normalized form.
    #[default]
    None,
    /// Always this string.
    Literal { value: String },
    /// The matched text with all whitespace removed.
    RemoveWhitespace,
    /// The matched text with every match of `pattern` replaced.
    Replace { pattern: String, replacement: String },
}

fn strict() -> bool {
    true
}

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRule {
    pub regex: String,
    #[serde(default)]
    pub pattern_type: Option<String>,
    /// Capture group whose extent becomes the match. Group 0 is the whole match.
    #[serde(default)]
    pub group: usize,
    /// Lower wins when equally long matches overlap.
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub normalized: Normalization,
    #[serde(default = "strict")]
    pub left_strict: bool,
    #[serde(default = "strict")]
    pub right_strict: bool,
    /// Free-form grouping used to switch whole families of rules off.
    #[serde(default)]
    pub category: Option<String>,
}

impl PatternRule {
    pub fn new(pattern_type: impl Into<String>, regex: impl Into<String>) -> Self {
        PatternRule {
            regex: regex.into(),
            pattern_type: Some(pattern_type.into()),
            group: 0,
            priority: 0,
            normalized: Normalization::None,
            left_strict: true,
            right_strict: true,
            category: None,
        }
    }

    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_normalized(mut self, normalized: Normalization) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_boundaries(mut self, left_strict: bool, right_strict: bool) -> Self {
        self.left_strict = left_strict;
        self.right_strict = right_strict;
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: PatternRule,
    regex: Regex,
    replace: Option<(Regex, String)>,
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl CompiledRule {
    fn new(rule: PatternRule) -> Result<Self, ConfigError> {
        let regex = compile(&rule.regex)?;
        if rule.group >= regex.captures_len() {
            return Err(ConfigError::MissingGroup {
                pattern: rule.regex.clone(),
                group: rule.group,
            });
        }
        let replace = match &rule.normalized {
            Normalization::Replace {
                pattern,
                replacement,
            } => Some((compile(pattern)?, replacement.clone())),
            _ => None,
        };
        Ok(CompiledRule {
            rule,
            regex,
            replace,
        })
    }

    fn normalize(&self, matched: &str) -> Option<String> {
        match &self.rule.normalized {
            Normalization::None => None,
            Normalization::Literal { value } => Some(value.clone()),
            Normalization::RemoveWhitespace => {
                Some(matched.chars().filter(|c| !c.is_whitespace()).collect())
            }
            Normalization::Replace { .. } => self
                .replace
                .as_ref()
                .map(|(regex, replacement)| regex.replace_all(matched, replacement.as_str()).into_owned()),
        }
    }
}

/// Matches every rule over the text, then keeps a non-overlapping subset:
/// longer matches first (by default), then lower priority.
#[derive(Debug, Clone)]
pub struct RegexTagger {
    output_layer: String,
    rules: Vec<CompiledRule>,
    strategy: ConflictStrategy,
}

impl RegexTagger {
    pub fn new(
        output_layer: impl Into<String>,
        rules: impl IntoIterator<Item = PatternRule>,
    ) -> Result<Self, ConfigError> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RegexTagger {
            output_layer: output_layer.into(),
            rules,
            strategy: ConflictStrategy::Max,
        })
    }

    pub fn with_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PatternMatcher for RegexTagger {
    fn match_patterns(&self, text: &Text) -> SegmentationResult<Layer> {
        let mut candidates = Layer::new(self.output_layer.clone(), MATCH_ATTRIBUTES).ambiguous();
        for compiled in &self.rules {
            for captures in compiled.regex.captures_iter(text.as_str()) {
                let found = match captures.get(compiled.rule.group) {
                    Some(found) if !found.as_str().is_empty() => found,
                    _ => continue,
                };
                let span = Span::new(text.char_offset(found.start()), text.char_offset(found.end()));
                let hit = PatternMatch {
                    span,
                    pattern_type: compiled.rule.pattern_type.clone(),
                    normalized: compiled.normalize(found.as_str()),
                    priority: compiled.rule.priority,
                    left_strict: compiled.rule.left_strict,
                    right_strict: compiled.rule.right_strict,
                };
                trace!(layer = %self.output_layer, %span, pattern_type = ?hit.pattern_type, "pattern match");
                candidates.add_span(span, hit.to_annotation())?;
            }
        }

        let resolved = ConflictResolver::new(self.strategy)
            .with_priority_attribute(PRIORITY)
            .keep_equal(false)
            .resolve(&candidates)?;
        Ok(disambiguate(&resolved, lowest_priority)?)
    }
}

/// Among identical extents, the rule with the lowest priority (then the
/// earliest rule) wins.
fn lowest_priority(annotations: &[Annotation]) -> Annotation {
    annotations
        .iter()
        .min_by_key(|annotation| {
            annotation
                .get(PRIORITY)
                .and_then(AttrValue::as_int)
                .unwrap_or(0)
        })
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_text::Spanned;

    fn matches(tagger: &RegexTagger, text: &str) -> Vec<(String, Option<String>, Option<String>)> {
        let text = Text::new(text);
        let layer = tagger.match_patterns(&text).unwrap();
        layer
            .iter()
            .map(|span| {
                let hit = PatternMatch::from_layer_span(span);
                (text.span_text(span).to_string(), hit.pattern_type, hit.normalized)
            })
            .collect()
    }

    #[test]
    fn longest_match_wins() {
        let tagger = RegexTagger::new(
            "hints",
            vec![
                PatternRule::new("number", r"\d+"),
                PatternRule::new("number", r"\d+ \d{3}")
                    .with_normalized(Normalization::RemoveWhitespace),
            ],
        )
        .unwrap();
        assert_eq!(
            matches(&tagger, "Maksis 12 000 ja 7 eurot"),
            vec![
                ("12 000".to_string(), Some("number".to_string()), Some("12000".to_string())),
                ("7".to_string(), Some("number".to_string()), None),
            ]
        );
    }

    #[test]
    fn priority_breaks_ties_between_rules() {
        let tagger = RegexTagger::new(
            "hints",
            vec![
                PatternRule::new("initial", r"[A-ZÕÄÖÜ]\.").with_priority(2),
                PatternRule::new("abbreviation", r"[A-ZÕÄÖÜ]\.").with_priority(1),
            ],
        )
        .unwrap();
        assert_eq!(
            matches(&tagger, "Ü. Mets"),
            vec![("Ü.".to_string(), Some("abbreviation".to_string()), None)]
        );
    }

    #[test]
    fn capture_group_and_replacement() {
        let tagger = RegexTagger::new(
            "hints",
            vec![PatternRule::new("case_ending", r"\d+(-(?:ni|st|ga))\b")
                .with_group(1)
                .with_normalized(Normalization::Replace {
                    pattern: "-".into(),
                    replacement: "".into(),
                })],
        )
        .unwrap();
        let text = Text::new("aastani 1990-st");
        let layer = tagger.match_patterns(&text).unwrap();
        assert_eq!(layer.intervals(), vec![Span::new(12, 15)]);
        let hit = PatternMatch::from_layer_span(&layer.spans()[0]);
        assert_eq!(hit.normalized.as_deref(), Some("st"));
        assert_eq!(hit.end(), 15);
    }

    #[test]
    fn invalid_rules_are_rejected() {
        assert!(matches!(
            RegexTagger::new("hints", vec![PatternRule::new("x", r"(")]),
            Err(ConfigError::Pattern { .. })
        ));
        assert!(matches!(
            RegexTagger::new("hints", vec![PatternRule::new("x", r"a").with_group(1)]),
            Err(ConfigError::MissingGroup { group: 1, .. })
        ));
    }
}

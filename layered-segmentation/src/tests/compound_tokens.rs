use layered_text::{tokenize_words, Layer, LayerDisplay, Span, Spanned, Text};

use crate::compound_tokens::{NON_ENDING_ABBREVIATION, TYPE};
use crate::{
    CompoundTokenConfig, CompoundTokenTagger, Normalization, PatternMatch, PatternMatcher,
    PatternRule, SegmentationError, SegmentationResult, MATCH_ATTRIBUTES,
};

fn tokenized(input: &str) -> Text {
    let mut text = Text::new(input);
    text.set_layer(tokenize_words(text.as_str())).unwrap();
    text
}

fn tagger(config: CompoundTokenConfig) -> CompoundTokenTagger {
    CompoundTokenTagger::from_config(config).unwrap()
}

fn test_compounds(input: &str, tagger: &CompoundTokenTagger) -> String {
    let mut text = tokenized(input);
    tagger.tag_into(&mut text).unwrap();

    let display = LayerDisplay::new(&text).with(text.layer("compound_tokens").unwrap());
    format!("{}", display)
}

fn intervals(input: &str, tagger: &CompoundTokenTagger) -> Vec<(usize, usize)> {
    let layer = tagger.tag(&tokenized(input)).unwrap();
    layer.iter().map(|span| (span.start(), span.end())).collect()
}

fn number_config() -> CompoundTokenConfig {
    CompoundTokenConfig {
        hint_patterns: vec![PatternRule::new("number", r"\d+ \d{3}")
            .with_normalized(Normalization::RemoveWhitespace)],
        boundary_patterns: vec![
            PatternRule::new("case_ending", r"-(?:ni|st|ga)\b").with_boundaries(false, true)
        ],
        ..Default::default()
    }
}

#[test]
fn stretched_word_is_joined() {
    let tagger = tagger(CompoundTokenConfig::default());
    insta::assert_snapshot!(test_compounds("Ta oli vää-ää-ääga väsinud, 15-17 tundi.", &tagger), @r###"
    Ta oli vää-ää-ääga väsinud, 15-17 tundi.
           ╰─────────╯compound_tokens(normalized="väga", type=("hyphenation"))
    "###);
}

#[test]
fn dangling_hyphen() {
    let tagger = tagger(CompoundTokenConfig::default());
    insta::assert_snapshot!(test_compounds("kesk- ja lõpposa", &tagger), @r###"
    kesk- ja lõpposa
    ╰───╯compound_tokens(normalized=None, type=("hyphenation"))
    "###);
}

#[test]
fn run_at_end_of_input_is_flushed() {
    let tagger = tagger(CompoundTokenConfig::default());
    insta::assert_snapshot!(test_compounds("ka-su-lik", &tagger), @r###"
    ka-su-lik
    ╰───────╯compound_tokens(normalized="kasulik", type=("hyphenation"))
    "###);
}

#[test]
fn hyphenation_can_be_switched_off() {
    let tagger = tagger(CompoundTokenConfig {
        tag_hyphenations: false,
        ..Default::default()
    });
    assert!(intervals("ka-su-lik", &tagger).is_empty());
}

#[test]
fn ignored_and_custom_normalization() {
    let ignoring = tagger(CompoundTokenConfig {
        ignored_words: vec!["ka-su-lik".to_string()],
        ..Default::default()
    });
    let layer = ignoring.tag(&tokenized("ka-su-lik")).unwrap();
    assert_eq!(layer.spans()[0].attribute("normalized").unwrap().as_str(), None);

    let joining = tagger(CompoundTokenConfig::default())
        .with_normalizer(|word: &str| word.replace('-', ""));
    let text = tokenized("Vana-Hiina");
    let layer = joining.tag(&text).unwrap();
    assert_eq!(
        layer.spans()[0].attribute("normalized").unwrap().as_str(),
        Some("VanaHiina")
    );
}

#[test]
fn number_with_case_ending() {
    let tagger = tagger(number_config());
    insta::assert_snapshot!(test_compounds("12 000-ni", &tagger), @r###"
    12 000-ni
    ╰───────╯compound_tokens(normalized="12000-ni", type=("number", "hyphenation", "case_ending"))
    "###);
}

#[test]
fn boundary_hint_must_end_on_a_token() {
    let tagger = tagger(CompoundTokenConfig {
        boundary_patterns: vec![PatternRule::new("case_ending", "-n")],
        ..number_config()
    });
    // the hint and the hyphenation are equally long; the first one wins
    assert_eq!(intervals("12 000-ni", &tagger), vec![(0, 6)]);
}

#[test]
fn custom_abbreviations() {
    let tagger = tagger(CompoundTokenConfig {
        custom_abbreviations: vec!["Dr".to_string()],
        ..Default::default()
    });
    insta::assert_snapshot!(test_compounds("Dr. Mets tuli ja Dr.", &tagger), @r###"
    Dr. Mets tuli ja Dr.
    ╰─╯compound_tokens(normalized="Dr.", type=("non_ending_abbreviation"))
                     ╰╯compound_tokens(normalized=None, type=("non_ending_abbreviation"))
    "###);
}

#[test]
fn custom_abbreviation_precedence() {
    let config = |regex: &str| CompoundTokenConfig {
        custom_abbreviations: vec!["Dr".to_string()],
        hint_patterns: vec![PatternRule::new("title", regex)],
        ..Default::default()
    };

    // same end: the custom abbreviation replaces the hint
    let replacing = tagger(config(r"prof Dr"));
    let layer = replacing.tag(&tokenized("prof Dr ja")).unwrap();
    assert_eq!(layer.intervals(), vec![Span::new(5, 7)]);
    assert_eq!(
        layer.spans()[0].attribute(TYPE).unwrap().str_items().collect::<Vec<_>>(),
        vec![NON_ENDING_ABBREVIATION]
    );

    // strictly inside: the hint stays
    let inside = tagger(config(r"prof Dr ja"));
    assert_eq!(intervals("prof Dr ja", &inside), vec![(0, 10)]);

    // a hint starting inside a custom abbreviation is dropped
    let overlapping = tagger(config(r"Dr\. Mets"));
    let layer = overlapping.tag(&tokenized("Dr. Mets tuli.")).unwrap();
    assert_eq!(layer.intervals(), vec![Span::new(0, 3)]);
}

#[test]
fn abbreviations_must_be_enabled() {
    let result = CompoundTokenTagger::from_config(CompoundTokenConfig {
        tag_abbreviations: false,
        custom_abbreviations: vec!["Dr".to_string()],
        ..Default::default()
    });
    assert!(matches!(result, Err(crate::ConfigError::AbbreviationsDisabled)));
}

#[test]
fn separators_block_hints() {
    let tagger = tagger(CompoundTokenConfig {
        hint_patterns: vec![PatternRule::new("number", r"\d+\s+\d{3}")],
        ..Default::default()
    });
    assert_eq!(intervals("Need 12\n\n000 ja 5 000.", &tagger), vec![(16, 21)]);
}

#[test]
fn separators_block_boundary_merges() {
    let boundary = || vec![PatternRule::new("joined", "a\n\nb").with_boundaries(false, true)];
    let blocked = tagger(CompoundTokenConfig {
        boundary_patterns: boundary(),
        ..Default::default()
    });
    assert!(intervals("xa\n\nb y", &blocked).is_empty());

    let joining = tagger(CompoundTokenConfig {
        boundary_patterns: boundary(),
        do_not_join_on_strings: Vec::new(),
        ..Default::default()
    });
    assert_eq!(intervals("xa\n\nb y", &joining), vec![(0, 5)]);
}

#[test]
fn separators_block_custom_abbreviations() {
    let config = |separators: Vec<String>| CompoundTokenConfig {
        custom_abbreviations: vec!["Dr".to_string()],
        do_not_join_on_strings: separators,
        ..Default::default()
    };
    let blocked = tagger(config(vec![".".to_string()]));
    let mut text = tokenized("Dr. Mets tuli.");
    blocked.tag_into(&mut text).unwrap();
    assert!(text.layer("compound_tokens").unwrap().is_empty());

    let joining = tagger(config(Vec::new()));
    assert_eq!(intervals("Dr. Mets tuli.", &joining), vec![(0, 3)]);
}

#[test]
fn negative_hints_block_other_patterns() {
    let tagger = tagger(CompoundTokenConfig {
        hint_patterns: vec![
            PatternRule::new("number", r"\d+ \d{3}"),
            PatternRule::new("negative:phone", r"\d+ \d{3} \d{3}"),
        ],
        ..Default::default()
    });
    assert!(intervals("tel 5 555 555", &tagger).is_empty());
    assert_eq!(intervals("maksis 5 555", &tagger), vec![(7, 12)]);
}

struct FixedMatches(Vec<PatternMatch>);

impl PatternMatcher for FixedMatches {
    fn match_patterns(&self, _text: &Text) -> SegmentationResult<Layer> {
        let mut layer = Layer::new("tokenization_hints", MATCH_ATTRIBUTES).ambiguous();
        for hit in &self.0 {
            layer.add_span(hit.span, hit.to_annotation())?;
        }
        Ok(layer)
    }
}

#[test]
fn unresolved_hints_are_fatal() {
    let tagger = tagger(CompoundTokenConfig::default()).with_hint_matcher(FixedMatches(vec![
        PatternMatch::new(Span::new(0, 1)),
        PatternMatch::new(Span::new(0, 5)),
    ]));
    let result = tagger.tag(&tokenized("5 000 eurot"));
    match result {
        Err(SegmentationError::OverlappingHints { start, hints }) => {
            assert_eq!(start, 0);
            assert_eq!(hints, vec!["5", "5 000"]);
        }
        other => panic!("expected overlapping hints, got {:?}", other),
    }
}

#[test]
fn loose_boundary_hint_is_rejected() {
    let mut loose = PatternMatch::new(Span::new(0, 5));
    loose.left_strict = false;
    loose.right_strict = false;
    let tagger = tagger(CompoundTokenConfig::default()).with_boundary_matcher(FixedMatches(vec![loose]));
    assert!(matches!(
        tagger.tag(&tokenized("5 000 eurot")),
        Err(SegmentationError::LooseBoundaries { start: 0, end: 5 })
    ));
}

#[test]
fn hints_without_type() {
    let tagger = tagger(CompoundTokenConfig::default())
        .with_hint_matcher(FixedMatches(vec![PatternMatch::new(Span::new(0, 5))]));
    insta::assert_snapshot!(test_compounds("5 000 eurot", &tagger), @r###"
    5 000 eurot
    ╰───╯compound_tokens(normalized=None, type=("tokenization_hint"))
    "###);
}

#[test]
fn tokens_layer_is_required() {
    let tagger = tagger(CompoundTokenConfig::default());
    assert!(matches!(
        tagger.tag(&Text::new("tere")),
        Err(SegmentationError::MissingLayer(name)) if name == "tokens"
    ));
}

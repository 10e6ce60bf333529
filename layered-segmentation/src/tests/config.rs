use std::fs;
use std::io::Write;
use std::path::Path;

use layered_text::{tokenize_words, Text};
use tempfile::NamedTempFile;

use crate::{
    CompoundTokenConfig, CompoundTokenTagger, ConfigError, Normalization, PatternRule,
    ABBREVIATION_CATEGORY,
};

fn compounds(tagger: &CompoundTokenTagger, input: &str) -> Vec<(String, Option<String>)> {
    let mut text = Text::new(input);
    text.set_layer(tokenize_words(text.as_str())).unwrap();
    let layer = tagger.tag(&text).unwrap();
    layer
        .iter()
        .map(|span| {
            let normalized = span
                .attribute("normalized")
                .and_then(|value| value.as_str())
                .map(String::from);
            (text.span_text(span).to_string(), normalized)
        })
        .collect()
}

#[test]
fn load_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ignore.txt"), "ka-su-lik\n\n  Vana-Hiina  \n").unwrap();
    let path = dir.path().join("compound_tokens.toml");
    fs::write(
        &path,
        r#"
ignore_list = "ignore.txt"

[[hint_patterns]]
pattern_type = "number"
regex = '\d+ \d{3}'
normalized = { kind = "remove_whitespace" }

[[boundary_patterns]]
pattern_type = "case_ending"
regex = '-(?:ni|st|ga)\b'
left_strict = false
"#,
    )
    .unwrap();

    let config = CompoundTokenConfig::load(&path).unwrap();
    assert_eq!(config.ignore_list.as_deref(), Some(dir.path().join("ignore.txt").as_path()));
    assert_eq!(config.do_not_join_on_strings, vec!["\n\n"]);
    assert_eq!(
        config.hint_patterns,
        vec![PatternRule::new("number", r"\d+ \d{3}").with_normalized(Normalization::RemoveWhitespace)]
    );
    assert!(!config.boundary_patterns[0].left_strict);
    assert!(config.boundary_patterns[0].right_strict);

    let words = config.ignored_words().unwrap();
    assert!(words.contains("ka-su-lik") && words.contains("Vana-Hiina"));
    assert_eq!(words.len(), 2);

    let tagger = CompoundTokenTagger::from_config(config).unwrap();
    assert_eq!(
        compounds(&tagger, "12 000-ni ja ka-su-lik"),
        vec![
            ("12 000-ni".to_string(), Some("12000-ni".to_string())),
            ("ka-su-lik".to_string(), None),
        ]
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "tag_hyphenation = false").unwrap();

    let result = CompoundTokenConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn missing_files() {
    let result = CompoundTokenConfig::load(Path::new("/nonexistent/compound_tokens.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));

    let config = CompoundTokenConfig {
        ignore_list: Some("/nonexistent/ignore.txt".into()),
        ..Default::default()
    };
    assert!(matches!(
        CompoundTokenTagger::from_config(config),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn boundary_rules_need_a_strict_side() {
    let config = CompoundTokenConfig::from_toml_str(
        r#"
[[boundary_patterns]]
regex = "-"
left_strict = false
right_strict = false
"#,
    )
    .unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::LooseBoundaries { pattern }) if pattern == "-"
    ));
}

#[test]
fn abbreviation_rules_follow_the_switch() {
    let config = CompoundTokenConfig {
        tag_abbreviations: false,
        hint_patterns: vec![
            PatternRule::new("number", r"\d+ \d{3}"),
            PatternRule::new("abbreviation", r"\bnt\.").in_category(ABBREVIATION_CATEGORY),
        ],
        ..Default::default()
    };
    let active = config.active_hint_patterns();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].pattern_type.as_deref(), Some("number"));

    let tagger = CompoundTokenTagger::from_config(config).unwrap();
    assert!(compounds(&tagger, "nt. kell 12").is_empty());
}

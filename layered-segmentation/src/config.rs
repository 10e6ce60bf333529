//! Compound token tagger configuration, loadable from TOML.
//!
//! ```toml
//! custom_abbreviations = ["Dr"]
//! ignore_list = "ignore.txt"
//!
//! [[hint_patterns]]
//! pattern_type = "number"
//! regex = '\d+ \d{3}'
//! normalized = { kind = "remove_whitespace" }
//!
//! [[boundary_patterns]]
//! pattern_type = "case_ending"
//! regex = '-(?:ni|st|ga)\b'
//! left_strict = false
//! ```

use crate::regex_tagger::PatternRule;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Rules with this category are switched off by `tag_abbreviations = false`.
pub const ABBREVIATION_CATEGORY: &str = "abbreviation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompoundTokenConfig {
    pub output_layer: String,
    pub input_tokens_layer: String,
    pub tag_abbreviations: bool,
    pub tag_hyphenations: bool,
    /// Tokens joined with a following period, e.g. `Dr`.
    pub custom_abbreviations: Vec<String>,
    /// No compound may contain one of these strings.
    pub do_not_join_on_strings: Vec<String>,
    /// Hyphenated words that are never normalized.
    pub ignored_words: Vec<String>,
    /// File with more ignored words, one per line.
    pub ignore_list: Option<PathBuf>,
    /// Vocabulary of the first pass.
    pub hint_patterns: Vec<PatternRule>,
    /// Vocabulary of the second pass; the pass is skipped when empty.
    pub boundary_patterns: Vec<PatternRule>,
}

impl Default for CompoundTokenConfig {
    fn default() -> Self {
        CompoundTokenConfig {
            output_layer: "compound_tokens".to_string(),
            input_tokens_layer: "tokens".to_string(),
            tag_abbreviations: true,
            tag_hyphenations: true,
            custom_abbreviations: Vec::new(),
            do_not_join_on_strings: vec!["\n\n".to_string()],
            ignored_words: Vec::new(),
            ignore_list: None,
            hint_patterns: Vec::new(),
            boundary_patterns: Vec::new(),
        }
    }
}

impl CompoundTokenConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file. A relative `ignore_list` is resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        let resolved = match (&config.ignore_list, path.parent()) {
            (Some(list), Some(dir)) if list.is_relative() => Some(dir.join(list)),
            _ => None,
        };
        if resolved.is_some() {
            config.ignore_list = resolved;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.custom_abbreviations.is_empty() && !self.tag_abbreviations {
            return Err(ConfigError::AbbreviationsDisabled);
        }
        if let Some(rule) = self
            .boundary_patterns
            .iter()
            .find(|rule| !rule.left_strict && !rule.right_strict)
        {
            return Err(ConfigError::LooseBoundaries {
                pattern: rule.regex.clone(),
            });
        }
        Ok(())
    }

    /// Hint rules left after applying the `tag_*` switches.
    pub fn active_hint_patterns(&self) -> Vec<PatternRule> {
        self.hint_patterns
            .iter()
            .filter(|rule| {
                self.tag_abbreviations || rule.category.as_deref() != Some(ABBREVIATION_CATEGORY)
            })
            .cloned()
            .collect()
    }

    /// `ignored_words` together with the contents of `ignore_list`.
    pub fn ignored_words(&self) -> Result<HashSet<String>, ConfigError> {
        let mut words: HashSet<String> = self.ignored_words.iter().cloned().collect();
        if let Some(path) = &self.ignore_list {
            words.extend(load_ignore_list(path)?);
        }
        Ok(words)
    }
}

/// Read a word list with one word per line; blank lines are skipped.
pub fn load_ignore_list(path: &Path) -> Result<HashSet<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

//! The token-normalization seam used for hyphenated compounds.

/// Maps the text of a token run to its canonical form.
///
/// Returning the input unchanged means "no normalization".
pub trait TokenNormalizer {
    fn normalize(&self, word: &str) -> String;
}

impl<F> TokenNormalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, word: &str) -> String {
        self(word)
    }
}

/// Undoes syllable hyphenation and drawn-out spelling.
///
/// `ka-su-lik` becomes `kasulik` and `vää-ää-ääga` becomes `väga`. Words
/// that look like real hyphenated compounds are left alone: a capitalized
/// later part (`Vana-Hiina`), a one-letter prefix (`e-post`), digits
/// (`000-ni`) or a dangling hyphen (`kesk-`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HyphenNormalizer;

impl HyphenNormalizer {
    fn is_syllabified(parts: &[&str]) -> bool {
        if parts.len() < 2 {
            return false;
        }
        if parts
            .iter()
            .any(|part| part.is_empty() || !part.chars().all(char::is_alphabetic))
        {
            return false;
        }
        if parts[0].chars().count() == 1 {
            return false;
        }
        parts[1..]
            .iter()
            .all(|part| part.chars().next().map_or(false, char::is_lowercase))
    }
}

impl TokenNormalizer for HyphenNormalizer {
    fn normalize(&self, word: &str) -> String {
        let parts: Vec<&str> = word.split('-').collect();
        if !Self::is_syllabified(&parts) {
            return word.to_string();
        }
        collapse_repeats(&parts.concat())
    }
}

/// Runs of three or more identical letters shrink to a single letter.
fn collapse_repeats(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&other| other == c).count();
        if run >= 3 && c.is_alphabetic() {
            out.push(c);
        } else {
            out.extend(std::iter::repeat(c).take(run));
        }
        i += run;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syllables_are_joined() {
        let normalizer = HyphenNormalizer;
        assert_eq!(normalizer.normalize("ka-su-lik"), "kasulik");
        assert_eq!(normalizer.normalize("vää-ää-ääga"), "väga");
        assert_eq!(normalizer.normalize("jaa-a"), "ja");
    }

    #[test]
    fn compounds_are_left_alone() {
        let normalizer = HyphenNormalizer;
        for word in ["Vana-Hiina", "e-post", "000-ni", "kesk-", "-ga", "tere"] {
            assert_eq!(normalizer.normalize(word), word);
        }
    }

    #[test]
    fn closures_are_normalizers() {
        let upper = |word: &str| word.to_uppercase();
        assert_eq!(upper.normalize("ka-su"), "KA-SU");
    }
}

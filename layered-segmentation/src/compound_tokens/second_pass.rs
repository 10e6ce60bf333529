//! Boundary hints: joining already built compounds with their neighbouring
//! tokens, e.g. a number and a case ending separated by a hyphen.

use super::{
    crosses_separator, Candidate, CASE_ENDING, HYPHENATION, NON_ENDING_ABBREVIATION, SIGN,
    TOKENIZATION_HINT,
};
use crate::pattern::PatternMatch;
use crate::{SegmentationError, SegmentationResult};
use layered_text::layer_operations::{covered, insert_sorted, remove_fully_contained, Coverage};
use layered_text::{Layer, Span, Spanned, Text};
use std::collections::HashMap;
use tracing::trace;

/// Start position → (normalized text, end position).
type Normalizations = HashMap<usize, (String, usize)>;

pub(super) fn apply_boundary_hints(
    text: &Text,
    tokens: &[Span],
    matches: &Layer,
    separators: &[String],
    mut queue: Vec<Candidate>,
) -> SegmentationResult<Vec<Candidate>> {
    for span in matches {
        let hit = PatternMatch::from_layer_span(span);
        let coverage = Coverage::from_flags(hit.left_strict, hit.right_strict).ok_or(
            SegmentationError::LooseBoundaries {
                start: hit.start(),
                end: hit.end(),
            },
        )?;

        let covered_compounds = covered(hit.start(), hit.end(), coverage, &queue);
        let covered_tokens = remove_fully_contained(
            &covered_compounds,
            &covered(hit.start(), hit.end(), coverage, tokens),
        );
        if covered_compounds.is_empty() && covered_tokens.is_empty() {
            continue;
        }

        let leftmost = covered_compounds
            .iter()
            .map(Spanned::start)
            .chain(covered_tokens.iter().map(Spanned::start))
            .min();
        let rightmost = covered_compounds
            .iter()
            .map(Spanned::end)
            .chain(covered_tokens.iter().map(Spanned::end))
            .max();
        if (coverage.left_strict() && leftmost != Some(hit.start()))
            || (coverage.right_strict() && rightmost != Some(hit.end()))
        {
            trace!(span = %hit.span, "boundary hint does not line up with tokens");
            continue;
        }

        let merged = merge(text, &covered_compounds, &covered_tokens, &hit);
        if crosses_separator(text, &merged, separators) {
            trace!(span = %merged.interval(), "merged compound crosses a separator");
            continue;
        }

        queue = remove_fully_contained(&covered_compounds, &queue);
        insert_sorted(merged, &mut queue, false);
    }
    Ok(queue)
}

/// One candidate covering `compounds`, `tokens` and the type of `hit`.
pub(super) fn merge(
    text: &Text,
    compounds: &[Candidate],
    tokens: &[Span],
    hit: &PatternMatch,
) -> Candidate {
    let mut spans: Vec<Span> = Vec::new();
    for span in compounds.iter().flat_map(|c| c.spans.iter()).chain(tokens) {
        insert_sorted(*span, &mut spans, true);
    }

    let mut normalizations = Normalizations::new();
    let mut types: Vec<String> = Vec::new();
    for compound in compounds {
        if let Some(normalized) = compound.normalized.as_ref().filter(|n| !n.is_empty()) {
            normalizations.insert(compound.start(), (normalized.clone(), compound.end()));
        }
        types.extend(compound.types.iter().cloned());
    }
    types.extend(hit.pattern_type.clone());
    if let Some(normalized) = hit.normalized.as_ref().filter(|n| !n.is_empty()) {
        normalizations.insert(hit.start(), (normalized.clone(), hit.end()));
    }

    let start = spans.first().map_or(0, |s| s.start);
    let end = spans.last().map_or(0, |s| s.end);
    let normalized = if normalizations.is_empty() {
        None
    } else {
        Some(stitch(text, start, end, &normalizations))
    };

    let merged_text = text.slice(start, end);
    let has = |types: &[String], name: &str| types.iter().any(|t| t == name);
    if has(&types, NON_ENDING_ABBREVIATION) && has(&types, CASE_ENDING) && merged_text.ends_with("st") {
        remove_first(&mut types, NON_ENDING_ABBREVIATION);
    }
    if has(&types, SIGN)
        && has(&types, HYPHENATION)
        && merged_text.chars().next().map_or(false, char::is_alphabetic)
    {
        remove_first(&mut types, SIGN);
    }
    if types.is_empty() {
        types.push(TOKENIZATION_HINT.to_string());
    }

    Candidate::new(spans, types, normalized)
}

fn remove_first(types: &mut Vec<String>, name: &str) {
    if let Some(index) = types.iter().position(|t| t == name) {
        types.remove(index);
    }
}

/// Rebuild the text of `[start, end)` with every normalization spliced in at
/// its offset. When a normalization starts on the last character of the one
/// before it and both agree on that character, it is only written once.
fn stitch(text: &Text, start: usize, end: usize, normalizations: &Normalizations) -> String {
    let mut pieces: Vec<String> = Vec::new();
    let mut last_was_single = true;
    let mut i = start;

    while i < end {
        if i > 0 && !last_was_single {
            let joined = match normalizations.get(&(i - 1)) {
                Some((normalized, normalized_end)) if *normalized_end > i => {
                    let boundary = text.slice(i - 1, i);
                    let agree = pieces.last().map_or(false, |last| last.ends_with(boundary))
                        && normalized.starts_with(boundary);
                    agree.then(|| (normalized[boundary.len()..].to_string(), *normalized_end))
                }
                _ => None,
            };
            if let Some((rest, next)) = joined {
                pieces.push(rest);
                i = next;
                continue;
            }
        }

        match normalizations.get(&i) {
            Some((normalized, normalized_end)) => {
                pieces.push(normalized.clone());
                i = (*normalized_end).max(i + 1);
                last_was_single = false;
            }
            None => {
                pieces.push(text.slice(i, i + 1).to_string());
                last_was_single = true;
                i += 1;
            }
        }
    }

    pieces.concat()
}

//! Span algebra: ordering, boundary-aware coverage queries, and conflict
//! resolution over layers and span lists.

mod conflicts;
mod disambiguate;

pub use conflicts::{resolve_conflicts, ConflictResolver, ConflictStrategy};
pub use disambiguate::{disambiguate, first_annotation};

use crate::Spanned;

/// Insert `span` into `spans`, keeping ascending `(start, end)` order.
///
/// Equal keys keep insertion order (the new span goes after them). With
/// `discard_duplicate`, a span whose `(start, end)` is already present is not
/// inserted. Returns whether the span was inserted.
pub fn insert_sorted<S: Spanned>(span: S, spans: &mut Vec<S>, discard_duplicate: bool) -> bool {
    let key = (span.start(), span.end());
    let pos = spans.partition_point(|s| (s.start(), s.end()) <= key);
    if discard_duplicate && pos > 0 && (spans[pos - 1].start(), spans[pos - 1].end()) == key {
        return false;
    }
    spans.insert(pos, span);
    true
}

/// Which boundary of a candidate must fall inside the query window.
///
/// The fourth combination (neither boundary strict) has no defined meaning
/// and is deliberately not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coverage {
    /// Left boundary loose, right strict: the span's end lies in `[start, end]`.
    EndInside,
    /// Left boundary strict, right loose: the span's start lies in `[start, end]`.
    StartInside,
    /// Both strict: the span lies entirely in `[start, end]`.
    Inside,
}

impl Coverage {
    /// `None` for the undefined loose/loose combination.
    pub fn from_flags(left_strict: bool, right_strict: bool) -> Option<Self> {
        match (left_strict, right_strict) {
            (false, true) => Some(Coverage::EndInside),
            (true, false) => Some(Coverage::StartInside),
            (true, true) => Some(Coverage::Inside),
            (false, false) => None,
        }
    }

    pub fn left_strict(self) -> bool {
        !matches!(self, Coverage::EndInside)
    }

    pub fn right_strict(self) -> bool {
        !matches!(self, Coverage::StartInside)
    }

    fn admits<S: Spanned + ?Sized>(self, start: usize, end: usize, span: &S) -> bool {
        let within = |pos: usize| start <= pos && pos <= end;
        match self {
            Coverage::EndInside => within(span.end()),
            Coverage::StartInside => within(span.start()),
            Coverage::Inside => start <= span.start() && span.end() <= end,
        }
    }
}

/// The members of `spans` covered by the window `[start, end]` under `coverage`.
pub fn covered<S: Spanned + Clone>(
    start: usize,
    end: usize,
    coverage: Coverage,
    spans: &[S],
) -> Vec<S> {
    spans
        .iter()
        .filter(|span| coverage.admits(start, end, *span))
        .cloned()
        .collect()
}

/// `candidates` without those lying entirely inside some container.
pub fn remove_fully_contained<C: Spanned, S: Spanned + Clone>(
    containers: &[C],
    candidates: &[S],
) -> Vec<S> {
    candidates
        .iter()
        .filter(|candidate| !containers.iter().any(|c| c.contains(*candidate)))
        .cloned()
        .collect()
}

//! Interval primitives.
//!
//! All positions are character offsets into the base text of a [`Text`](crate::Text),
//! and every interval is half-open: `[start, end)`.

use serde::{Deserialize, Serialize};

/// Capability set shared by everything that can stand in for a span:
/// a start, an end, and the base intervals it is made of.
pub trait Spanned {
    fn start(&self) -> usize;

    fn end(&self) -> usize;

    /// The underlying intervals. A simple span yields itself, an enveloping
    /// span yields its components.
    fn base_spans(&self) -> Vec<Span>;

    /// Number of characters covered.
    fn len(&self) -> usize {
        self.end() - self.start()
    }

    fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// The outer interval as a plain [`Span`].
    fn interval(&self) -> Span {
        Span::new(self.start(), self.end())
    }

    /// True if the two intervals share at least one character.
    fn overlaps<S: Spanned + ?Sized>(&self, other: &S) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    /// True if `other` lies within this interval (boundaries included).
    fn contains<S: Spanned + ?Sized>(&self, other: &S) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }
}

/// Immutable half-open interval over the base text, ordered by `(start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Unchecked wire form of a [`Span`].
#[derive(Deserialize)]
struct RawSpan {
    start: usize,
    end: usize,
}

impl TryFrom<RawSpan> for Span {
    type Error = String;

    fn try_from(RawSpan { start, end }: RawSpan) -> Result<Self, Self::Error> {
        if start > end {
            return Err(format!("span start {} is after its end {}", start, end));
        }
        Ok(Span { start, end })
    }
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "span start {} is after its end {}", start, end);
        Self { start, end }
    }

    /// Shift both boundaries left by `offset`.
    pub fn shifted_back(self, offset: usize) -> Self {
        Self::new(self.start - offset, self.end - offset)
    }

    /// Clip to `[start, end)`; `None` when nothing is left.
    pub fn clipped(self, start: usize, end: usize) -> Option<Self> {
        let new_start = self.start.max(start);
        let new_end = self.end.min(end);
        if new_start >= new_end {
            None
        } else {
            Some(Self::new(new_start, new_end))
        }
    }
}

impl Spanned for Span {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }

    fn base_spans(&self) -> Vec<Span> {
        vec![*self]
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Span::new(start, end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// An ordered, non-empty group of component spans taken from another layer.
///
/// Components are stored as the intervals of the enveloped layer's spans;
/// the envelope starts where the first component starts and ends where the
/// last one ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Span>", into = "Vec<Span>")]
pub struct EnvelopingSpan {
    spans: Vec<Span>,
}

impl EnvelopingSpan {
    /// Build from component spans. Components are sorted; `None` if empty.
    pub fn new(mut spans: Vec<Span>) -> Option<Self> {
        if spans.is_empty() {
            return None;
        }
        spans.sort();
        Some(Self { spans })
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn component_count(&self) -> usize {
        self.spans.len()
    }
}

impl Spanned for EnvelopingSpan {
    fn start(&self) -> usize {
        self.spans[0].start
    }

    fn end(&self) -> usize {
        self.spans[self.spans.len() - 1].end
    }

    fn base_spans(&self) -> Vec<Span> {
        self.spans.clone()
    }
}

impl TryFrom<Vec<Span>> for EnvelopingSpan {
    type Error = &'static str;

    fn try_from(spans: Vec<Span>) -> Result<Self, Self::Error> {
        EnvelopingSpan::new(spans).ok_or("enveloping span needs at least one component")
    }
}

impl From<EnvelopingSpan> for Vec<Span> {
    fn from(span: EnvelopingSpan) -> Self {
        span.spans
    }
}

impl<'a> IntoIterator for &'a EnvelopingSpan {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

/// The shape of a span stored in a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extent {
    Simple(Span),
    Enveloping(EnvelopingSpan),
}

impl Extent {
    pub fn as_enveloping(&self) -> Option<&EnvelopingSpan> {
        match self {
            Extent::Enveloping(env) => Some(env),
            Extent::Simple(_) => None,
        }
    }

    /// Sort key shared by every ordered collection of extents.
    pub fn key(&self) -> (usize, usize) {
        (self.start(), self.end())
    }
}

impl Spanned for Extent {
    fn start(&self) -> usize {
        match self {
            Extent::Simple(span) => span.start,
            Extent::Enveloping(env) => env.start(),
        }
    }

    fn end(&self) -> usize {
        match self {
            Extent::Simple(span) => span.end,
            Extent::Enveloping(env) => env.end(),
        }
    }

    fn base_spans(&self) -> Vec<Span> {
        match self {
            Extent::Simple(span) => vec![*span],
            Extent::Enveloping(env) => env.base_spans(),
        }
    }
}

impl From<Span> for Extent {
    fn from(span: Span) -> Self {
        Extent::Simple(span)
    }
}

impl From<EnvelopingSpan> for Extent {
    fn from(span: EnvelopingSpan) -> Self {
        Extent::Enveloping(span)
    }
}

impl<T: Spanned + ?Sized> Spanned for &T {
    fn start(&self) -> usize {
        (**self).start()
    }

    fn end(&self) -> usize {
        (**self).end()
    }

    fn base_spans(&self) -> Vec<Span> {
        (**self).base_spans()
    }
}

use crate::{AttrValue, Layer, LayerError, Spanned};
use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;
use tracing::trace;

/// Which of two overlapping spans survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictStrategy {
    /// Prefer the longer span.
    Max,
    /// Prefer the shorter span.
    Min,
}

/// Selects a non-overlapping subset of a layer's spans.
///
/// Spans are ranked by length (per [`ConflictStrategy`]), then by the
/// priority attribute ascending when one is configured, then by position.
/// Walking that ranking, a span survives unless it overlaps one that
/// already survived. With `keep_equal`, overlapping a survivor of identical
/// length and priority does not count.
///
/// The result is a fixed point: resolving it again changes nothing.
#[derive(Debug, Clone)]
pub struct ConflictResolver {
    strategy: ConflictStrategy,
    priority_attribute: Option<String>,
    keep_equal: bool,
}

#[derive(Debug, Clone, Copy)]
struct Rank {
    len: usize,
    priority: Option<i64>,
    start: usize,
    end: usize,
}

impl ConflictResolver {
    pub fn new(strategy: ConflictStrategy) -> Self {
        ConflictResolver {
            strategy,
            priority_attribute: None,
            keep_equal: true,
        }
    }

    pub fn with_priority_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.priority_attribute = Some(attribute.into());
        self
    }

    pub fn keep_equal(mut self, keep_equal: bool) -> Self {
        self.keep_equal = keep_equal;
        self
    }

    /// A new layer holding only the surviving spans (with all their annotations).
    pub fn resolve(&self, layer: &Layer) -> Result<Layer, LayerError> {
        let ranks = layer
            .iter()
            .map(|span| {
                Ok(Rank {
                    len: span.len(),
                    priority: self.priority_of(layer, span.annotations())?,
                    start: span.start(),
                    end: span.end(),
                })
            })
            .collect::<Result<Vec<_>, LayerError>>()?;

        let mut order: Vec<usize> = (0..ranks.len()).collect();
        order.sort_by(|&a, &b| self.compare(&ranks[a], &ranks[b]));

        // survivors keyed by (start, end, index); no survivor is longer than
        // `longest`, so only those starting after `start - longest` can overlap
        let mut survivors: BTreeSet<(usize, usize, usize)> = BTreeSet::new();
        let mut longest = 0;
        for candidate in order {
            let rank = &ranks[candidate];
            let from = rank.start.saturating_sub(longest);
            let blocked = survivors
                .range((from, 0, 0)..(rank.end, 0, 0))
                .any(|&(start, end, kept)| {
                    let overlaps = rank.start < end && start < rank.end;
                    overlaps && !(self.keep_equal && self.is_tie(rank, &ranks[kept]))
                });
            if blocked {
                trace!(layer = layer.name(), start = rank.start, end = rank.end, "conflict loser");
            } else {
                survivors.insert((rank.start, rank.end, candidate));
                longest = longest.max(rank.len);
            }
        }

        let mut keep = vec![false; ranks.len()];
        for (_, _, index) in survivors {
            keep[index] = true;
        }
        let mut resolved = layer.clone();
        resolved.retain_by_index(|index| keep[index]);
        Ok(resolved)
    }

    fn priority_of(
        &self,
        layer: &Layer,
        annotations: &[crate::Annotation],
    ) -> Result<Option<i64>, LayerError> {
        let attribute = match &self.priority_attribute {
            Some(attribute) => attribute,
            None => return Ok(None),
        };
        if !layer.attributes().iter().any(|a| a == attribute) {
            return Err(LayerError::UnknownAttribute {
                layer: layer.name().to_string(),
                attribute: attribute.clone(),
            });
        }
        let mut best: Option<i64> = None;
        for annotation in annotations {
            let value = annotation.get(attribute).unwrap_or(&AttrValue::None);
            let priority = value
                .as_int()
                .ok_or_else(|| LayerError::InvalidAttributeValue {
                    layer: layer.name().to_string(),
                    attribute: attribute.clone(),
                    reason: format!("priority must be an integer, found {}", value),
                })?;
            best = Some(best.map_or(priority, |b| b.min(priority)));
        }
        Ok(best)
    }

    fn compare(&self, a: &Rank, b: &Rank) -> Ordering {
        let by_len = match self.strategy {
            ConflictStrategy::Max => Reverse(a.len).cmp(&Reverse(b.len)),
            ConflictStrategy::Min => a.len.cmp(&b.len),
        };
        by_len
            .then(a.priority.cmp(&b.priority))
            .then((a.start, a.end).cmp(&(b.start, b.end)))
    }

    fn is_tie(&self, a: &Rank, b: &Rank) -> bool {
        a.len == b.len && a.priority == b.priority
    }
}

/// Function form of [`ConflictResolver`].
pub fn resolve_conflicts(
    layer: &Layer,
    strategy: ConflictStrategy,
    priority_attribute: Option<&str>,
    keep_equal: bool,
) -> Result<Layer, LayerError> {
    let mut resolver = ConflictResolver::new(strategy).keep_equal(keep_equal);
    if let Some(attribute) = priority_attribute {
        resolver = resolver.with_priority_attribute(attribute);
    }
    resolver.resolve(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Annotation, Span};

    fn candidates(spans: &[(usize, usize, i64)]) -> Layer {
        let mut layer = Layer::new("hints", ["priority"]).ambiguous();
        for &(start, end, priority) in spans {
            layer
                .add_span(Span::new(start, end), Annotation::new().with("priority", priority))
                .unwrap();
        }
        layer
    }

    fn resolved(layer: &Layer, strategy: ConflictStrategy, priority: bool, keep_equal: bool) -> Vec<Span> {
        let attr = if priority { Some("priority") } else { None };
        resolve_conflicts(layer, strategy, attr, keep_equal)
            .unwrap()
            .intervals()
    }

    #[test]
    fn max_prefers_longer_spans() {
        let layer = candidates(&[(0, 3, 0), (2, 8, 0), (7, 9, 0), (9, 10, 0)]);
        assert_eq!(
            resolved(&layer, ConflictStrategy::Max, false, false),
            vec![Span::new(2, 8), Span::new(9, 10)]
        );
    }

    #[test]
    fn min_prefers_shorter_spans() {
        let layer = candidates(&[(0, 3, 0), (2, 8, 0), (7, 9, 0)]);
        assert_eq!(
            resolved(&layer, ConflictStrategy::Min, false, false),
            vec![Span::new(0, 3), Span::new(7, 9)]
        );
    }

    #[test]
    fn priority_breaks_length_ties() {
        let layer = candidates(&[(0, 4, 5), (2, 6, 1)]);
        assert_eq!(
            resolved(&layer, ConflictStrategy::Max, true, false),
            vec![Span::new(2, 6)]
        );
        // without a priority attribute the first one in text order wins
        assert_eq!(
            resolved(&layer, ConflictStrategy::Max, false, false),
            vec![Span::new(0, 4)]
        );
    }

    #[test]
    fn keep_equal_keeps_exact_ties() {
        let layer = candidates(&[(0, 4, 1), (2, 6, 1), (5, 7, 0)]);
        assert_eq!(
            resolved(&layer, ConflictStrategy::Max, true, true),
            vec![Span::new(0, 4), Span::new(2, 6)]
        );
        assert_eq!(
            resolved(&layer, ConflictStrategy::Max, true, false),
            vec![Span::new(0, 4), Span::new(5, 7)]
        );
    }

    #[test]
    fn resolution_is_a_fixed_point() {
        let layers = vec![
            candidates(&[(0, 3, 2), (1, 5, 1), (4, 9, 0), (6, 7, 3), (8, 12, 1), (10, 11, 0)]),
            candidates(&[(0, 4, 1), (2, 6, 1), (4, 8, 1), (6, 10, 1)]),
            candidates(&[(0, 10, 0), (0, 2, 0), (2, 4, 0), (9, 12, 0)]),
        ];
        for layer in &layers {
            for &strategy in &[ConflictStrategy::Max, ConflictStrategy::Min] {
                for &priority in &[false, true] {
                    for &keep_equal in &[false, true] {
                        let attr = if priority { Some("priority") } else { None };
                        let once = resolve_conflicts(layer, strategy, attr, keep_equal).unwrap();
                        let twice = resolve_conflicts(&once, strategy, attr, keep_equal).unwrap();
                        assert_eq!(once, twice);
                    }
                }
            }
        }
    }

    #[test]
    fn long_survivor_blocks_far_inside() {
        let layer = candidates(&[(0, 20, 0), (15, 16, 0), (18, 25, 0), (20, 21, 0)]);
        assert_eq!(
            resolved(&layer, ConflictStrategy::Max, false, false),
            vec![Span::new(0, 20), Span::new(20, 21)]
        );
    }

    #[test]
    fn many_candidates() {
        // words of three characters, each overlapped by a two-word span
        let mut spans = Vec::new();
        for i in 0..2000 {
            spans.push((i * 4, i * 4 + 3, 1));
            if i % 2 == 0 {
                spans.push((i * 4 + 1, i * 4 + 6, 0));
            }
        }
        let layer = candidates(&spans);
        let max = resolved(&layer, ConflictStrategy::Max, false, false);
        assert_eq!(max.len(), 1000);
        assert!(max.iter().all(|span| span.len() == 5));
        let min = resolved(&layer, ConflictStrategy::Min, false, false);
        assert_eq!(min.len(), 2000);
        assert!(min.iter().all(|span| span.len() == 3));
    }

    #[test]
    fn unknown_priority_attribute_is_an_error() {
        let layer = candidates(&[(0, 1, 0)]);
        assert!(matches!(
            resolve_conflicts(&layer, ConflictStrategy::Max, Some("rank"), false),
            Err(LayerError::UnknownAttribute { .. })
        ));
    }
}

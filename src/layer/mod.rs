//! Named, schema-typed collections of annotated spans.
//!
//! A [`Layer`] never holds its parent or enveloped layer: it records the
//! *name* of that layer and the owning [`Text`](crate::Text) resolves it.

mod attribute_list;
mod display;

pub use attribute_list::AttributeList;
pub use display::LayerDisplay;

use crate::{Annotation, AttrValue, Extent, LayerError, Span, Spanned};
use serde::{Deserialize, Serialize};

/// How a layer relates to the other layers of its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Free-standing spans over the base text.
    Plain,
    /// One span per span of the named parent layer, with identical extents.
    AttachedTo(String),
    /// Each span groups consecutive spans of the named layer.
    Enveloping(String),
}

impl Relation {
    /// Name of the layer this one depends on, if any.
    pub fn dependency(&self) -> Option<&str> {
        match self {
            Relation::Plain => None,
            Relation::AttachedTo(name) | Relation::Enveloping(name) => Some(name),
        }
    }
}

/// A span of a layer together with its annotation(s).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerSpan {
    extent: Extent,
    annotations: Vec<Annotation>,
}

impl LayerSpan {
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Every annotation, in insertion order. Exactly one unless the layer is ambiguous.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// The first annotation.
    pub fn annotation(&self) -> &Annotation {
        &self.annotations[0]
    }

    /// Value of `name` in the first annotation.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.annotation().get(name)
    }
}

impl Spanned for LayerSpan {
    fn start(&self) -> usize {
        self.extent.start()
    }

    fn end(&self) -> usize {
        self.extent.end()
    }

    fn base_spans(&self) -> Vec<Span> {
        self.extent.base_spans()
    }
}

/// An ordered collection of spans sharing one attribute schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    attributes: Vec<String>,
    relation: Relation,
    ambiguous: bool,
    spans: Vec<LayerSpan>,
}

impl Layer {
    /// A plain, unambiguous layer with the given attribute schema.
    pub fn new<I, S>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Layer {
            name: name.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            relation: Relation::Plain,
            ambiguous: false,
            spans: Vec::new(),
        }
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn attached_to(self, parent: impl Into<String>) -> Self {
        self.with_relation(Relation::AttachedTo(parent.into()))
    }

    pub fn enveloping(self, enveloped: impl Into<String>) -> Self {
        self.with_relation(Relation::Enveloping(enveloped.into()))
    }

    pub fn with_ambiguity(mut self, ambiguous: bool) -> Self {
        self.ambiguous = ambiguous;
        self
    }

    pub fn ambiguous(self) -> Self {
        self.with_ambiguity(true)
    }

    /// Same name, schema, and relation, with no spans.
    pub fn empty_like(&self) -> Self {
        Layer {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            relation: self.relation.clone(),
            ambiguous: self.ambiguous,
            spans: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn parent(&self) -> Option<&str> {
        match &self.relation {
            Relation::AttachedTo(parent) => Some(parent),
            _ => None,
        }
    }

    pub fn enveloped(&self) -> Option<&str> {
        match &self.relation {
            Relation::Enveloping(enveloped) => Some(enveloped),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    pub fn is_enveloping(&self) -> bool {
        matches!(self.relation, Relation::Enveloping(_))
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.relation, Relation::AttachedTo(_))
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[LayerSpan] {
        &self.spans
    }

    pub fn get(&self, index: usize) -> Option<&LayerSpan> {
        self.spans.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerSpan> {
        self.spans.iter()
    }

    /// Outer intervals of every span, in layer order.
    pub fn intervals(&self) -> Vec<Span> {
        self.spans.iter().map(Spanned::interval).collect()
    }

    /// Index of the span whose outer interval is exactly `span`.
    pub fn index_of(&self, span: Span) -> Option<usize> {
        let key = (span.start, span.end);
        self.spans
            .binary_search_by(|probe| probe.extent.key().cmp(&key))
            .ok()
    }

    /// Add one annotated span, keeping the layer sorted by `(start, end)`.
    pub fn add_span(
        &mut self,
        extent: impl Into<Extent>,
        annotation: Annotation,
    ) -> Result<(), LayerError> {
        self.add_annotations(extent, vec![annotation])
    }

    /// Add a span carrying several annotations (only valid for ambiguous layers
    /// when more than one is given).
    pub fn add_annotations(
        &mut self,
        extent: impl Into<Extent>,
        annotations: Vec<Annotation>,
    ) -> Result<(), LayerError> {
        let extent = extent.into();
        self.check_extent(&extent)?;
        let span = extent.interval();

        if annotations.is_empty() {
            return Err(LayerError::MissingAnnotation {
                layer: self.name.clone(),
                span,
            });
        }
        for annotation in &annotations {
            self.check_schema(annotation)?;
        }

        let key = extent.key();
        let pos = self.spans.partition_point(|s| s.extent.key() <= key);
        let existing = self.spans[..pos]
            .iter()
            .rposition(|s| s.extent.key() == key && s.extent == extent);

        if let Some(existing) = existing {
            if !self.ambiguous {
                return Err(LayerError::AmbiguousAnnotation {
                    layer: self.name.clone(),
                    span,
                });
            }
            let target = &mut self.spans[existing].annotations;
            for annotation in annotations {
                if !target.contains(&annotation) {
                    target.push(annotation);
                }
            }
            return Ok(());
        }

        if !self.ambiguous && annotations.len() > 1 {
            return Err(LayerError::AmbiguousAnnotation {
                layer: self.name.clone(),
                span,
            });
        }

        if !self.ambiguous && !self.is_attached() {
            let neighbours = pos
                .checked_sub(1)
                .and_then(|i| self.spans.get(i))
                .into_iter()
                .chain(self.spans.get(pos));
            for neighbour in neighbours {
                if neighbour.overlaps(&span) {
                    return Err(LayerError::Overlap {
                        layer: self.name.clone(),
                        span,
                        existing: neighbour.interval(),
                    });
                }
            }
        }

        let mut deduped: Vec<Annotation> = Vec::with_capacity(annotations.len());
        for annotation in annotations {
            if !deduped.contains(&annotation) {
                deduped.push(annotation);
            }
        }
        self.spans.insert(
            pos,
            LayerSpan {
                extent,
                annotations: deduped,
            },
        );
        Ok(())
    }

    /// Keep only the spans whose index satisfies `keep`.
    pub(crate) fn retain_by_index(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let spans = std::mem::take(&mut self.spans);
        self.spans = spans
            .into_iter()
            .enumerate()
            .filter(|(index, _)| keep(*index))
            .map(|(_, span)| span)
            .collect();
    }

    /// Read-only view of one attribute across all spans.
    pub fn attribute_values(&self, attribute: &str) -> Result<AttributeList<'_>, LayerError> {
        if self.ambiguous {
            return Err(LayerError::AmbiguousLayer(self.name.clone()));
        }
        if !self.attributes.iter().any(|a| a == attribute) {
            return Err(LayerError::UnknownAttribute {
                layer: self.name.clone(),
                attribute: attribute.to_string(),
            });
        }
        let values = self
            .spans
            .iter()
            .map(|span| span.attribute(attribute).unwrap_or(&AttrValue::None))
            .collect();
        Ok(AttributeList::new(values))
    }

    fn check_extent(&self, extent: &Extent) -> Result<(), LayerError> {
        let well_formed = extent.base_spans().iter().all(|s| s.start <= s.end)
            && extent.start() <= extent.end();
        if !well_formed {
            return Err(LayerError::InvalidSpan {
                layer: self.name.clone(),
                start: extent.start(),
                end: extent.end(),
            });
        }
        let shape_ok = match (&self.relation, extent) {
            (Relation::Enveloping(_), Extent::Enveloping(_)) => true,
            (Relation::Plain, Extent::Simple(_)) => true,
            (Relation::AttachedTo(_), _) => true,
            _ => false,
        };
        if !shape_ok {
            return Err(LayerError::ShapeMismatch {
                layer: self.name.clone(),
                span: extent.interval(),
            });
        }
        Ok(())
    }

    fn check_schema(&self, annotation: &Annotation) -> Result<(), LayerError> {
        let matches = annotation.len() == self.attributes.len()
            && self
                .attributes
                .iter()
                .all(|name| annotation.get(name).is_some());
        if matches {
            return Ok(());
        }
        let mut expected = self.attributes.clone();
        expected.sort();
        Err(LayerError::SchemaMismatch {
            layer: self.name.clone(),
            expected,
            found: annotation.names().map(String::from).collect(),
        })
    }
}

impl<'a> IntoIterator for &'a Layer {
    type Item = &'a LayerSpan;
    type IntoIter = std::slice::Iter<'a, LayerSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

//! Conversion between layers and plain, JSON-shaped records.
//!
//! A record is what crosses the persistence boundary. Converting a record
//! back into a [`Layer`] goes through [`Layer::add_annotations`], so every
//! layer invariant is re-checked on the way in.

use crate::{Annotation, EnvelopingSpan, Extent, Layer, RecordError, Relation, Span, Text};
use serde::{Deserialize, Serialize};

/// One span of a [`LayerRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpanRecord {
    Enveloping {
        spans: Vec<(usize, usize)>,
        annotations: Vec<Annotation>,
    },
    Simple {
        start: usize,
        end: usize,
        annotations: Vec<Annotation>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub name: String,
    pub attributes: Vec<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub enveloping: Option<String>,
    #[serde(default)]
    pub ambiguous: bool,
    pub spans: Vec<SpanRecord>,
}

/// A whole text: base string plus its layers in assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    pub text: String,
    pub layers: Vec<LayerRecord>,
}

pub fn layer_to_record(layer: &Layer) -> LayerRecord {
    let spans = layer
        .iter()
        .map(|span| {
            let annotations = span.annotations().to_vec();
            match span.extent() {
                Extent::Simple(simple) => SpanRecord::Simple {
                    start: simple.start,
                    end: simple.end,
                    annotations,
                },
                Extent::Enveloping(env) => SpanRecord::Enveloping {
                    spans: env.spans().iter().map(|s| (s.start, s.end)).collect(),
                    annotations,
                },
            }
        })
        .collect();

    LayerRecord {
        name: layer.name().to_string(),
        attributes: layer.attributes().to_vec(),
        parent: layer.parent().map(String::from),
        enveloping: layer.enveloped().map(String::from),
        ambiguous: layer.is_ambiguous(),
        spans,
    }
}

pub fn record_to_layer(record: &LayerRecord) -> Result<Layer, RecordError> {
    let relation = match (&record.parent, &record.enveloping) {
        (None, None) => Relation::Plain,
        (Some(parent), None) => Relation::AttachedTo(parent.clone()),
        (None, Some(enveloped)) => Relation::Enveloping(enveloped.clone()),
        (Some(_), Some(_)) => return Err(RecordError::ConflictingRelation(record.name.clone())),
    };
    let mut layer = Layer::new(record.name.clone(), record.attributes.iter().cloned())
        .with_relation(relation)
        .with_ambiguity(record.ambiguous);

    for span in &record.spans {
        match span {
            SpanRecord::Simple {
                start,
                end,
                annotations,
            } => {
                if start > end {
                    return Err(RecordError::InvalidSpan {
                        layer: record.name.clone(),
                        start: *start,
                        end: *end,
                    });
                }
                layer.add_annotations(Span::new(*start, *end), annotations.clone())?;
            }
            SpanRecord::Enveloping { spans, annotations } => {
                let mut components = Vec::with_capacity(spans.len());
                for &(start, end) in spans {
                    if start > end {
                        return Err(RecordError::InvalidSpan {
                            layer: record.name.clone(),
                            start,
                            end,
                        });
                    }
                    components.push(Span::new(start, end));
                }
                let envelope = EnvelopingSpan::new(components)
                    .ok_or_else(|| RecordError::EmptyEnvelope(record.name.clone()))?;
                layer.add_annotations(envelope, annotations.clone())?;
            }
        }
    }
    Ok(layer)
}

pub fn text_to_record(text: &Text) -> TextRecord {
    TextRecord {
        text: text.as_str().to_string(),
        layers: text.layers().map(layer_to_record).collect(),
    }
}

/// Rebuild a text, assigning layers in record order.
pub fn record_to_text(record: &TextRecord) -> Result<Text, RecordError> {
    let mut text = Text::new(record.text.clone());
    for layer in &record.layers {
        text.set_layer(record_to_layer(layer)?)?;
    }
    Ok(text)
}

pub fn layer_to_json(layer: &Layer) -> Result<String, RecordError> {
    Ok(serde_json::to_string(&layer_to_record(layer))?)
}

pub fn layer_from_json(json: &str) -> Result<Layer, RecordError> {
    let record: LayerRecord = serde_json::from_str(json)?;
    record_to_layer(&record)
}

pub fn text_to_json(text: &Text) -> Result<String, RecordError> {
    Ok(serde_json::to_string(&text_to_record(text))?)
}

pub fn text_from_json(json: &str) -> Result<Text, RecordError> {
    let record: TextRecord = serde_json::from_str(json)?;
    record_to_text(&record)
}

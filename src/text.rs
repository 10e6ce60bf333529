//! A base text plus its named layers.

use crate::{Layer, Relation, Spanned, TextError};
use tracing::debug;

/// Owns the base text and the layers annotating it.
///
/// Layers are looked up by name and iterated in assignment order. The only
/// way to change a text after construction is [`Text::set_layer`].
#[derive(Clone, PartialEq, Eq)]
pub struct Text {
    text: String,
    /// Byte offset of every character, plus the total byte length.
    char_to_byte: Vec<usize>,
    layers: Vec<Layer>,
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Text")
            .field("text", &self.text)
            .field(
                "layers",
                &self.layers.iter().map(Layer::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_to_byte = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Text {
            text,
            char_to_byte,
            layers: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Characters `[start, end)`, clamped to the text.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.text[self.char_to_byte[start]..self.char_to_byte[end]]
    }

    /// The covered text of anything span-like.
    pub fn span_text<S: Spanned + ?Sized>(&self, span: &S) -> &str {
        self.slice(span.start(), span.end())
    }

    /// Character offset of a byte offset (which must fall on a char boundary).
    pub fn char_offset(&self, byte: usize) -> usize {
        self.char_to_byte.partition_point(|&b| b < byte)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    /// Like [`Text::layer`] but reports the missing name.
    pub fn require_layer(&self, name: &str) -> Result<&Layer, TextError> {
        self.layer(name)
            .ok_or_else(|| TextError::UnknownLayer(name.to_string()))
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layer(name).is_some()
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(Layer::name)
    }

    /// Parent of an attached layer, resolved through this text.
    pub fn parent_of(&self, layer: &Layer) -> Option<&Layer> {
        layer.parent().and_then(|name| self.layer(name))
    }

    /// Enveloped layer of an enveloping layer, resolved through this text.
    pub fn enveloped_by(&self, layer: &Layer) -> Option<&Layer> {
        layer.enveloped().and_then(|name| self.layer(name))
    }

    /// Bind `layer` under its name, replacing (in place) any layer of that name.
    ///
    /// The layer is validated against the text and the layers it depends on
    /// before anything changes. Returns the replaced layer, if any.
    pub fn set_layer(&mut self, layer: Layer) -> Result<Option<Layer>, TextError> {
        self.validate(&layer)?;
        match self.layers.iter().position(|l| l.name() == layer.name()) {
            Some(index) => {
                debug!(layer = layer.name(), spans = layer.len(), "replacing layer");
                Ok(Some(std::mem::replace(&mut self.layers[index], layer)))
            }
            None => {
                debug!(layer = layer.name(), spans = layer.len(), "adding layer");
                self.layers.push(layer);
                Ok(None)
            }
        }
    }

    fn validate(&self, layer: &Layer) -> Result<(), TextError> {
        let len = self.len();
        for span in layer {
            if span.end() > len {
                return Err(TextError::OutOfBounds {
                    layer: layer.name().to_string(),
                    span: span.interval(),
                    len,
                });
            }
        }

        let dependency = match layer.relation().dependency() {
            Some(dependency) => dependency,
            None => return Ok(()),
        };
        if dependency == layer.name() {
            return Err(TextError::SelfReference {
                layer: layer.name().to_string(),
            });
        }
        let target = self
            .layer(dependency)
            .ok_or_else(|| TextError::MissingDependency {
                layer: layer.name().to_string(),
                dependency: dependency.to_string(),
            })?;

        match layer.relation() {
            Relation::AttachedTo(_) => validate_attached(layer, target),
            Relation::Enveloping(_) => validate_enveloping(layer, target),
            Relation::Plain => Ok(()),
        }
    }
}

fn validate_attached(layer: &Layer, parent: &Layer) -> Result<(), TextError> {
    if layer.len() != parent.len() {
        return Err(TextError::AttachedCountMismatch {
            layer: layer.name().to_string(),
            parent: parent.name().to_string(),
            expected: parent.len(),
            found: layer.len(),
        });
    }
    for (span, parent_span) in layer.iter().zip(parent.iter()) {
        if span.extent() != parent_span.extent() {
            return Err(TextError::AttachedExtentMismatch {
                layer: layer.name().to_string(),
                span: span.interval(),
                parent_span: parent_span.interval(),
            });
        }
    }
    Ok(())
}

fn validate_enveloping(layer: &Layer, enveloped: &Layer) -> Result<(), TextError> {
    for span in layer {
        let mut previous: Option<usize> = None;
        for component in span.base_spans() {
            let index = enveloped
                .index_of(component)
                .ok_or_else(|| TextError::UnknownComponent {
                    layer: layer.name().to_string(),
                    enveloped: enveloped.name().to_string(),
                    component,
                })?;
            if let Some(previous) = previous {
                if index != previous + 1 {
                    return Err(TextError::NonContiguousComponents {
                        layer: layer.name().to_string(),
                        enveloped: enveloped.name().to_string(),
                        span: span.interval(),
                    });
                }
            }
            previous = Some(index);
        }
    }
    Ok(())
}

//! Excerpting a window of a text, and splitting a text by one of its layers.

use crate::dependencies::{dependency_order, layers_to_keep_default};
use crate::{SplitError, SplitResult};
use layered_text::{EnvelopingSpan, Extent, Layer, Relation, Span, Spanned, Text};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Name of the layer [`split_by_sentences`] splits on.
pub const SENTENCES_LAYER: &str = "sentences";

/// Old outer interval → new extent, for one excerpted layer.
type Remapping = HashMap<Span, Extent>;

#[derive(Debug, Clone, Copy)]
struct Window {
    start: usize,
    end: usize,
    trim_overlapping: bool,
}

impl Window {
    /// Where `span` lands in the excerpt, if it survives.
    fn place<S: Spanned>(&self, span: &S) -> Option<Span> {
        if self.trim_overlapping {
            span.interval()
                .clipped(self.start, self.end)
                .map(|clipped| clipped.shifted_back(self.start))
        } else if span.start() < self.start || self.end < span.end() {
            None
        } else {
            Some(span.interval().shifted_back(self.start))
        }
    }
}

/// A new text holding `text[start..end]` and the kept layers re-expressed
/// relative to `start`.
///
/// `layers_to_keep` defaults to every layer and must be closed under
/// dependency. Spans crossing the window are dropped, or clipped to it when
/// `trim_overlapping` is set. Ambiguous attached and ambiguous enveloping
/// layers are rejected with [`SplitError::UnsupportedLayerShape`].
pub fn excerpt(
    text: &Text,
    start: usize,
    end: usize,
    layers_to_keep: Option<&[String]>,
    trim_overlapping: bool,
) -> SplitResult<Text> {
    if start > end || end > text.len() {
        return Err(SplitError::InvalidRange {
            start,
            end,
            len: text.len(),
        });
    }
    let kept: Vec<String> = match layers_to_keep {
        Some(names) => names.to_vec(),
        None => text.layer_names().map(String::from).collect(),
    };
    let window = Window {
        start,
        end,
        trim_overlapping,
    };

    let mut excerpted = Text::new(text.slice(start, end));
    let mut remappings: HashMap<&str, Remapping> = HashMap::new();
    for layer in dependency_order(text, &kept)? {
        let (new_layer, remapping) = match layer.relation() {
            Relation::Plain => excerpt_plain(layer, &window)?,
            Relation::AttachedTo(parent) => {
                excerpt_attached(layer, remapping_of(&remappings, layer, parent)?)?
            }
            Relation::Enveloping(enveloped) => excerpt_enveloping(
                layer,
                &window,
                remapping_of(&remappings, layer, enveloped)?,
            )?,
        };
        debug!(
            layer = layer.name(),
            kept = new_layer.len(),
            dropped = layer.len() - new_layer.len(),
            "excerpted layer"
        );
        excerpted.set_layer(new_layer)?;
        remappings.insert(layer.name(), remapping);
    }
    Ok(excerpted)
}

fn remapping_of<'r>(
    remappings: &'r HashMap<&str, Remapping>,
    layer: &Layer,
    dependency: &str,
) -> SplitResult<&'r Remapping> {
    remappings
        .get(dependency)
        .ok_or_else(|| SplitError::MissingDependency {
            layer: layer.name().to_string(),
            dependency: dependency.to_string(),
        })
}

fn excerpt_plain(layer: &Layer, window: &Window) -> SplitResult<(Layer, Remapping)> {
    let mut new_layer = layer.empty_like();
    let mut remapping = Remapping::new();
    for span in layer {
        if let Some(placed) = window.place(span) {
            new_layer.add_annotations(placed, span.annotations().to_vec())?;
            remapping.insert(span.interval(), placed.into());
        }
    }
    Ok((new_layer, remapping))
}

fn excerpt_attached(layer: &Layer, parent: &Remapping) -> SplitResult<(Layer, Remapping)> {
    if layer.is_ambiguous() {
        return Err(SplitError::UnsupportedLayerShape {
            layer: layer.name().to_string(),
            kind: "attached",
        });
    }
    let mut new_layer = layer.empty_like();
    let mut remapping = Remapping::new();
    for span in layer {
        if let Some(extent) = parent.get(&span.interval()) {
            new_layer.add_span(extent.clone(), span.annotation().clone())?;
            remapping.insert(span.interval(), extent.clone());
        }
    }
    Ok((new_layer, remapping))
}

fn excerpt_enveloping(
    layer: &Layer,
    window: &Window,
    enveloped: &Remapping,
) -> SplitResult<(Layer, Remapping)> {
    if layer.is_ambiguous() {
        return Err(SplitError::UnsupportedLayerShape {
            layer: layer.name().to_string(),
            kind: "enveloping",
        });
    }
    let mut new_layer = layer.empty_like();
    let mut remapping = Remapping::new();
    for span in layer {
        if window.place(span).is_none() {
            continue;
        }
        let components: Vec<Span> = span
            .base_spans()
            .iter()
            .filter_map(|component| enveloped.get(component).map(Spanned::interval))
            .collect();
        let envelope = match EnvelopingSpan::new(components) {
            Some(envelope) => envelope,
            None => {
                trace!(layer = layer.name(), span = %span.interval(), "no components left");
                continue;
            }
        };
        let extent = Extent::from(envelope);
        new_layer.add_span(extent.clone(), span.annotation().clone())?;
        remapping.insert(span.interval(), extent);
    }
    Ok((new_layer, remapping))
}

/// One excerpt per span of `layer_name`, without trimming.
///
/// `layers_to_keep` defaults to [`layers_to_keep_default`] for `layer_name`.
pub fn split_by(
    text: &Text,
    layer_name: &str,
    layers_to_keep: Option<&[String]>,
) -> SplitResult<Vec<Text>> {
    let layer = text
        .layer(layer_name)
        .ok_or_else(|| SplitError::UnknownLayer(layer_name.to_string()))?;
    let kept = match layers_to_keep {
        Some(names) => names.to_vec(),
        None => layers_to_keep_default(text, layer_name)?,
    };
    layer
        .iter()
        .map(|span| excerpt(text, span.start(), span.end(), Some(&kept), false))
        .collect()
}

pub fn split_by_sentences(text: &Text) -> SplitResult<Vec<Text>> {
    split_by(text, SENTENCES_LAYER, None)
}

//! The layer dependency graph of a text.
//!
//! Enveloping layers point at the layer they envelope. Attached layers and
//! their parents point at each other, so keeping a parent also keeps what
//! is attached to it.

use crate::{SplitError, SplitResult};
use layered_text::{Layer, Text};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Every layer reachable from `layer` in the dependency graph, `layer`
/// included, in the text's layer order.
pub fn layers_to_keep_default(text: &Text, layer: &str) -> SplitResult<Vec<String>> {
    if !text.has_layer(layer) {
        return Err(SplitError::UnknownLayer(layer.to_string()));
    }
    let reached: HashSet<String> =
        bfs_reach(layer.to_string(), |name| neighbours(text, name)).collect();
    Ok(text
        .layer_names()
        .filter(|name| reached.contains(*name))
        .map(String::from)
        .collect())
}

fn neighbours(text: &Text, name: &str) -> Vec<String> {
    let mut next: Vec<String> = text
        .layer(name)
        .and_then(|layer| layer.relation().dependency())
        .map(String::from)
        .into_iter()
        .collect();
    next.extend(
        text.layers()
            .filter(|layer| layer.parent() == Some(name))
            .map(|layer| layer.name().to_string()),
    );
    next
}

/// The kept layers ordered so that every layer comes after its dependency.
///
/// Text order is preserved wherever it already satisfies that. Fails if a
/// kept layer depends on a layer that is not kept.
pub(crate) fn dependency_order<'t>(text: &'t Text, kept: &[String]) -> SplitResult<Vec<&'t Layer>> {
    let kept_names: HashSet<&str> = kept.iter().map(String::as_str).collect();
    for name in &kept_names {
        if !text.has_layer(name) {
            return Err(SplitError::UnknownLayer(name.to_string()));
        }
    }

    let mut pending: Vec<&Layer> = text
        .layers()
        .filter(|layer| kept_names.contains(layer.name()))
        .collect();
    for layer in &pending {
        if let Some(dependency) = layer.relation().dependency() {
            if !kept_names.contains(dependency) {
                return Err(SplitError::MissingDependency {
                    layer: layer.name().to_string(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }

    let mut placed: HashSet<&str> = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());
    while let Some(first) = pending.first() {
        let stuck = first.name().to_string();
        let before = pending.len();
        pending.retain(|&layer| match layer.relation().dependency() {
            Some(dependency) if !placed.contains(dependency) => true,
            _ => {
                placed.insert(layer.name());
                ordered.push(layer);
                false
            }
        });
        if pending.len() == before {
            return Err(SplitError::DependencyCycle(stuck));
        }
    }
    Ok(ordered)
}

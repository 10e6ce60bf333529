use crate::{Annotation, Layer, LayerError};

/// Collapse an ambiguous layer into an unambiguous one.
///
/// Name, relation, and schema are kept; every span receives the single
/// annotation `decorator` builds from its alternatives. The decorated
/// annotation must still match the schema.
pub fn disambiguate<F>(layer: &Layer, decorator: F) -> Result<Layer, LayerError>
where
    F: Fn(&[Annotation]) -> Annotation,
{
    let mut resolved = layer.empty_like().with_ambiguity(false);
    for span in layer {
        resolved.add_span(span.extent().clone(), decorator(span.annotations()))?;
    }
    Ok(resolved)
}

/// Pass-through decorator: keeps the first alternative.
pub fn first_annotation(annotations: &[Annotation]) -> Annotation {
    annotations.first().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttrValue, Span};

    #[test]
    fn keeps_first_alternative() {
        let mut layer = Layer::new("compounds", ["type"]).ambiguous();
        layer
            .add_span(Span::new(0, 3), Annotation::new().with("type", "a"))
            .unwrap();
        layer
            .add_span(Span::new(0, 3), Annotation::new().with("type", "b"))
            .unwrap();
        layer
            .add_span(Span::new(4, 6), Annotation::new().with("type", "c"))
            .unwrap();

        let resolved = disambiguate(&layer, first_annotation).unwrap();
        assert!(!resolved.is_ambiguous());
        assert_eq!(resolved.name(), "compounds");
        let types = resolved.attribute_values("type").unwrap();
        assert_eq!(types[0], AttrValue::from("a"));
        assert_eq!(types[1], AttrValue::from("c"));
    }

    #[test]
    fn overlapping_spans_cannot_be_disambiguated() {
        let mut layer = Layer::new("compounds", Vec::<String>::new()).ambiguous();
        layer.add_span(Span::new(0, 3), Annotation::new()).unwrap();
        layer.add_span(Span::new(2, 5), Annotation::new()).unwrap();
        assert!(matches!(
            disambiguate(&layer, first_annotation),
            Err(LayerError::Overlap { .. })
        ));
    }
}

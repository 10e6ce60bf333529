//! Attribute values and per-span annotations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single attribute value.
///
/// Serialized untagged, so records read as plain JSON scalars and arrays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    pub fn is_none(&self) -> bool {
        matches!(self, AttrValue::None)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// String members of a list value; anything else yields nothing.
    pub fn str_items(&self) -> impl Iterator<Item = &str> {
        self.as_list()
            .unwrap_or(&[])
            .iter()
            .filter_map(AttrValue::as_str)
    }

    /// A list of strings.
    pub fn str_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::List(items.into_iter().map(|s| AttrValue::Str(s.into())).collect())
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::None => f.write_str("None"),
            AttrValue::Bool(value) => write!(f, "{}", value),
            AttrValue::Int(value) => write!(f, "{}", value),
            AttrValue::Str(value) => write!(f, "{:?}", value),
            AttrValue::List(values) => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        AttrValue::Int(value as i64)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::None, Into::into)
    }
}

/// Attribute name → value mapping attached to one span.
///
/// Whether the keys match a layer's schema is checked when the annotation
/// is added to a layer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(BTreeMap<String, AttrValue>);

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Annotation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Annotation(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_sorted_by_attribute_name() {
        let annotation = Annotation::new()
            .with("type", AttrValue::str_list(["hyphenation"]))
            .with("normalized", Option::<String>::None);
        assert_eq!(annotation.to_string(), r#"normalized=None, type=("hyphenation")"#);
    }

    #[test]
    fn untagged_json_shape() {
        let annotation = Annotation::new()
            .with("gap_length", 3usize)
            .with("normalized", "väga")
            .with("missing", AttrValue::None);
        let json = serde_json::to_string(&annotation).unwrap();
        assert_eq!(json, r#"{"gap_length":3,"missing":null,"normalized":"väga"}"#);
        let back: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, annotation);
    }

    #[test]
    fn str_items_skips_non_strings() {
        let value = AttrValue::List(vec![AttrValue::from("sign"), AttrValue::Int(1)]);
        assert_eq!(value.str_items().collect::<Vec<_>>(), vec!["sign"]);
        assert_eq!(AttrValue::Int(3).str_items().count(), 0);
    }
}

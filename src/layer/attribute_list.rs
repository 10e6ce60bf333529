use crate::AttrValue;

/// Immutable projection of a single attribute over an unambiguous layer.
///
/// Supports indexing and iteration only.
#[derive(Clone, PartialEq, Eq)]
pub struct AttributeList<'a> {
    values: Vec<&'a AttrValue>,
}

impl<'a> AttributeList<'a> {
    pub(crate) fn new(values: Vec<&'a AttrValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a AttrValue> {
        self.values.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a AttrValue> + '_ {
        self.values.iter().copied()
    }
}

impl<'a> std::ops::Index<usize> for AttributeList<'a> {
    type Output = AttrValue;

    fn index(&self, index: usize) -> &AttrValue {
        self.values[index]
    }
}

impl std::fmt::Debug for AttributeList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl std::fmt::Display for AttributeList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_like_a_list() {
        let values = [AttrValue::Int(3), AttrValue::None, AttrValue::from("x")];
        let list = AttributeList::new(values.iter().collect());
        assert_eq!(list.to_string(), r#"[3, None, "x"]"#);
        assert_eq!(list.get(2), Some(&AttrValue::from("x")));
        assert_eq!(list.iter().count(), 3);
    }
}

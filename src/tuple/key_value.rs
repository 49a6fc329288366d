use crate::node::DataStructureNode;

/// One tuple entry: an optional name and the child it labels.
///
/// Only used to feed a [`super::TupleBuilder`] or to inspect a tuple; trees
/// never hold a `KeyValue` directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyValue {
    key: Option<String>,
    value: DataStructureNode,
}

impl KeyValue {
    pub fn new(key: Option<String>, value: DataStructureNode) -> Self {
        Self { key, value }
    }
    pub fn named(key: impl Into<String>, value: impl Into<DataStructureNode>) -> Self {
        Self::new(Some(key.into()), value.into())
    }
    pub fn unnamed(value: impl Into<DataStructureNode>) -> Self {
        Self::new(None, value.into())
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
    pub fn value(&self) -> &DataStructureNode {
        &self.value
    }
    pub fn into_parts(self) -> (Option<String>, DataStructureNode) {
        (self.key, self.value)
    }
}

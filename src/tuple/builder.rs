use crate::node::DataStructureNode;

use super::{KeyValue, TupleNode};

/// Ordered accumulator for a single tuple.
///
/// [`TupleBuilder::build`] consumes the builder, so a finished builder cannot
/// be appended to or built twice.
#[derive(Debug, Clone, Default)]
pub struct TupleBuilder {
    entries: Vec<KeyValue>,
}

impl TupleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional entry.
    pub fn add(self, node: impl Into<DataStructureNode>) -> Self {
        self.add_entry(None, node)
    }

    pub fn add_named(self, name: impl Into<String>, node: impl Into<DataStructureNode>) -> Self {
        self.add_entry(Some(name.into()), node)
    }

    /// Entry whose name may be absent.
    pub fn add_entry(mut self, name: Option<String>, node: impl Into<DataStructureNode>) -> Self {
        self.push(KeyValue::new(name, node.into()));
        self
    }

    pub fn push(&mut self, entry: KeyValue) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A single named entry promotes the whole tuple to the named
    /// realization; positional entries then occupy absent name slots.
    /// Without any name the tuple is unnamed.
    pub fn build(self) -> TupleNode {
        let has_names = self.entries.iter().any(|entry| entry.key().is_some());
        let (names, nodes): (Vec<Option<String>>, Vec<DataStructureNode>) =
            self.entries.into_iter().map(KeyValue::into_parts).unzip();
        if has_names {
            debug_assert_eq!(names.len(), nodes.len());
            TupleNode::of_named_raw(names, nodes)
        } else {
            TupleNode::of(nodes)
        }
    }
}

impl Extend<KeyValue> for TupleBuilder {
    fn extend<I: IntoIterator<Item = KeyValue>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<KeyValue> for TupleBuilder {
    fn from_iter<I: IntoIterator<Item = KeyValue>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::Realization;

    fn a() -> DataStructureNode {
        DataStructureNode::text("a")
    }
    fn b() -> DataStructureNode {
        DataStructureNode::text("b")
    }

    #[test]
    fn positional_adds_build_unnamed() {
        let tuple = TupleNode::builder().add(a()).add(b()).build();
        assert_eq!(tuple.realization(), Realization::Unnamed);
        assert_eq!(tuple, TupleNode::of(vec![a(), b()]));
    }

    #[test]
    fn one_name_promotes_to_named() {
        let tuple = TupleNode::builder().add_named("x", a()).add(b()).build();
        assert_eq!(tuple.realization(), Realization::Named);
        assert_eq!(tuple.names(), vec![Some("x".to_string()), None]);
        assert_eq!(tuple.nodes(), &[a(), b()]);
    }

    #[test]
    fn mixed_entries_match_the_checked_constructor() {
        let tuple = TupleNode::builder().add(a()).add_named("y", b()).add(a()).build();
        let checked = TupleNode::of_named(
            vec![None, Some("y".to_string()), None],
            vec![a(), b(), a()],
        )
        .unwrap();
        assert_eq!(tuple, checked);
    }

    #[test]
    fn name_on_last_entry_still_promotes() {
        let tuple = TupleNode::builder().add(a()).add_named("y", b()).build();
        assert!(tuple.is_named());
        assert_eq!(tuple.name_at(0), None);
        assert_eq!(tuple.name_at(1), Some("y"));
    }

    #[test]
    fn absent_names_alone_stay_unnamed() {
        let tuple = TupleNode::builder()
            .add_entry(None, a())
            .add_entry(None, b())
            .build();
        assert_eq!(tuple.realization(), Realization::Unnamed);
    }

    #[test]
    fn empty_builder_builds_empty_unnamed() {
        let builder = TupleNode::builder();
        assert!(builder.is_empty());
        let tuple = builder.build();
        assert!(tuple.is_empty());
        assert!(!tuple.is_named());
    }

    #[test]
    fn collects_and_extends_in_order() {
        let mut builder: TupleBuilder = vec![KeyValue::named("k", 1)].into_iter().collect();
        builder.extend([KeyValue::unnamed(2), KeyValue::named("k", 3)]);
        builder.push(KeyValue::unnamed(4));
        assert_eq!(builder.len(), 4);

        let tuple = builder.build();
        assert_eq!(
            tuple.names(),
            vec![Some("k".to_string()), None, Some("k".to_string()), None]
        );
        assert_eq!(tuple.get(3), Some(&DataStructureNode::integer(4)));
    }
}

//! Record-shaped nodes.
//!
//! A [`TupleNode`] is an ordered, fixed-length sequence of child nodes, each
//! optionally carrying a name. It comes in two realizations:
//!
//! - **unnamed**: entries are addressed by position only;
//! - **named**: one name slot per entry, addressed by position and by name.
//!   Names are not required to be unique, and a slot may be absent when the
//!   tuple was built from a mix of named and positional entries.
//!
//! Construction is split along two axes:
//! - `of*` stores the supplied sequences by reference (a moved `Vec` or a
//!   shared `Arc`), `copy_of*` takes an independent copy first;
//! - `of_named` checks that names and nodes line up, `of_named_raw` does not.
pub mod builder;
pub mod key_value;

use std::sync::Arc;

use crate::error::{NodeError, Result};
use crate::node::{render_block, DataStructureNode};

pub use builder::TupleBuilder;
pub use key_value::KeyValue;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleNode {
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Unnamed {
        nodes: Arc<Vec<DataStructureNode>>,
    },
    Named {
        names: Arc<Vec<Option<String>>>,
        nodes: Arc<Vec<DataStructureNode>>,
    },
}

/// Which concrete shape a tuple was built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Realization {
    Unnamed,
    Named,
}

impl Realization {
    /// Header used by the debug rendering.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Unnamed => "UnnamedTupleNode",
            Self::Named => "NamedTupleNode",
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTION
// ————————————————————————————————————————————————————————————————————————————

impl TupleNode {
    pub fn builder() -> TupleBuilder {
        TupleBuilder::new()
    }

    /// Unnamed tuple over `nodes`, stored by reference without copying.
    ///
    /// Passing an `Arc` shares the sequence with the caller. The caller can
    /// then only change its handle through `Arc::make_mut`, which detaches a
    /// private copy and leaves this tuple untouched.
    pub fn of(nodes: impl Into<Arc<Vec<DataStructureNode>>>) -> Self {
        Self { repr: Repr::Unnamed { nodes: nodes.into() } }
    }

    /// Unnamed tuple over an independent copy of `nodes`.
    pub fn copy_of(nodes: &[DataStructureNode]) -> Self {
        Self::of(nodes.to_vec())
    }

    /// Named tuple; `names[i]` labels `nodes[i]`.
    ///
    /// Fails with [`NodeError::LengthMismatch`] when the sequences differ in
    /// length. Duplicate names are accepted.
    pub fn of_named(
        names: impl Into<Arc<Vec<Option<String>>>>,
        nodes: impl Into<Arc<Vec<DataStructureNode>>>,
    ) -> Result<Self> {
        let names = names.into();
        let nodes = nodes.into();
        if names.len() != nodes.len() {
            return Err(NodeError::LengthMismatch {
                names: names.len(),
                nodes: nodes.len(),
            });
        }
        Ok(Self::of_named_raw(names, nodes))
    }

    /// Named tuple without the length check.
    ///
    /// With fewer names than nodes the trailing entries read as unnamed;
    /// surplus names are never observed.
    pub fn of_named_raw(
        names: impl Into<Arc<Vec<Option<String>>>>,
        nodes: impl Into<Arc<Vec<DataStructureNode>>>,
    ) -> Self {
        Self {
            repr: Repr::Named {
                names: names.into(),
                nodes: nodes.into(),
            },
        }
    }

    /// [`TupleNode::of_named`] over independent copies of both sequences.
    pub fn copy_of_named(names: &[Option<String>], nodes: &[DataStructureNode]) -> Result<Self> {
        Self::of_named(names.to_vec(), nodes.to_vec())
    }

    /// Rebuilds a tuple from entries, e.g. the output of
    /// [`TupleNode::key_value_pairs`].
    pub fn from_key_value_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = KeyValue>,
    {
        pairs.into_iter().collect::<TupleBuilder>().build()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ACCESSORS
// ————————————————————————————————————————————————————————————————————————————

impl TupleNode {
    pub fn is_tuple(&self) -> bool {
        true
    }

    pub fn realization(&self) -> Realization {
        match self.repr {
            Repr::Unnamed { .. } => Realization::Unnamed,
            Repr::Named { .. } => Realization::Named,
        }
    }

    pub fn is_named(&self) -> bool {
        self.realization() == Realization::Named
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    pub fn nodes(&self) -> &[DataStructureNode] {
        self.node_storage()
    }

    pub fn get(&self, index: usize) -> Option<&DataStructureNode> {
        self.nodes().get(index)
    }

    /// Name of the entry at `index`, `None` when the entry has no name.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        let len = self.len();
        assert!(index < len, "index {index} out of range for tuple of length {len}");
        match &self.repr {
            Repr::Unnamed { .. } => None,
            Repr::Named { names, .. } => names.get(index).and_then(|name| name.as_deref()),
        }
    }

    /// One slot per entry, `None` for unnamed entries.
    pub fn names(&self) -> Vec<Option<String>> {
        self.entries()
            .map(|(name, _)| name.map(str::to_owned))
            .collect()
    }

    pub fn key_value_pairs(&self) -> Vec<KeyValue> {
        self.entries()
            .map(|(name, node)| KeyValue::new(name.map(str::to_owned), node.clone()))
            .collect()
    }

    /// Borrowing view of `(name, node)` in entry order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = (Option<&str>, &DataStructureNode)> + '_ {
        self.nodes()
            .iter()
            .enumerate()
            .map(move |(index, node)| (self.name_at(index), node))
    }

    /// First entry carrying `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&DataStructureNode> {
        self.position_of(name).map(|index| &self.nodes()[index])
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries().position(|(entry_name, _)| entry_name == Some(name))
    }

    pub fn render(&self, indent: usize) -> String {
        render_block(self.realization().type_name(), indent, self.entries())
    }

    pub(crate) fn node_storage(&self) -> &Arc<Vec<DataStructureNode>> {
        match &self.repr {
            Repr::Unnamed { nodes } | Repr::Named { nodes, .. } => nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves() -> Vec<DataStructureNode> {
        vec![
            DataStructureNode::text("A"),
            DataStructureNode::integer(2),
            DataStructureNode::Null,
        ]
    }

    fn names(xs: &[Option<&str>]) -> Vec<Option<String>> {
        xs.iter().map(|x| x.map(str::to_owned)).collect()
    }

    #[test]
    fn unnamed_keeps_order_and_length() {
        let nodes = leaves();
        let tuple = TupleNode::of(nodes.clone());
        assert!(tuple.is_tuple());
        assert_eq!(tuple.realization(), Realization::Unnamed);
        assert_eq!(tuple.nodes(), nodes.as_slice());
        assert_eq!(tuple.len(), 3);
        assert_eq!(tuple.names(), vec![None, None, None]);
        assert_eq!(tuple.name_at(1), None);
    }

    #[test]
    fn named_exposes_names_by_position() {
        let labels = names(&[Some("a"), Some("b"), Some("c")]);
        let tuple = TupleNode::of_named(labels.clone(), leaves()).unwrap();
        assert!(tuple.is_named());
        assert_eq!(tuple.names(), labels);
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(tuple.name_at(i), label.as_deref());
        }
        assert_eq!(tuple.get_by_name("b"), Some(&DataStructureNode::integer(2)));
        assert_eq!(tuple.get_by_name("z"), None);
    }

    #[test]
    fn named_rejects_length_mismatch() {
        let err = TupleNode::of_named(names(&[Some("a")]), leaves()).unwrap_err();
        assert_eq!(err, NodeError::LengthMismatch { names: 1, nodes: 3 });

        let err = TupleNode::copy_of_named(&names(&[Some("a")]), &leaves()).unwrap_err();
        assert!(matches!(err, NodeError::LengthMismatch { .. }));
    }

    #[test]
    fn raw_skips_length_check() {
        let tuple = TupleNode::of_named_raw(names(&[Some("a")]), leaves());
        assert_eq!(tuple.len(), 3);
        assert_eq!(tuple.name_at(0), Some("a"));
        assert_eq!(tuple.name_at(2), None);
        assert_eq!(tuple.names(), names(&[Some("a"), None, None]));

        let tuple = TupleNode::of_named_raw(names(&[Some("a"), Some("b")]), vec![DataStructureNode::Null]);
        assert_eq!(tuple.names(), names(&[Some("a")]));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn name_at_past_the_end_panics() {
        TupleNode::of(leaves()).name_at(3);
    }

    #[test]
    fn duplicate_names_are_kept() {
        let tuple = TupleNode::of_named(
            names(&[Some("k"), Some("k")]),
            vec![DataStructureNode::integer(1), DataStructureNode::integer(2)],
        )
        .unwrap();
        assert_eq!(tuple.len(), 2);
        assert_eq!(tuple.position_of("k"), Some(0));
        assert_eq!(tuple.get_by_name("k"), Some(&DataStructureNode::integer(1)));
    }

    #[test]
    fn copy_of_is_isolated_from_later_changes() {
        let mut nodes = leaves();
        let tuple = TupleNode::copy_of(&nodes);
        nodes.push(DataStructureNode::text("late"));
        nodes[0] = DataStructureNode::Null;
        assert_eq!(tuple.nodes(), leaves().as_slice());
    }

    #[test]
    fn of_shares_the_callers_sequence() {
        let mut shared = Arc::new(leaves());
        let tuple = TupleNode::of(Arc::clone(&shared));
        assert!(Arc::ptr_eq(tuple.node_storage(), &shared));

        // a write through the caller's handle detaches instead of leaking in
        Arc::make_mut(&mut shared).push(DataStructureNode::Null);
        assert_eq!(shared.len(), 4);
        assert_eq!(tuple.len(), 3);
    }

    #[test]
    fn copy_of_named_detaches_both_sequences() {
        let mut labels = names(&[Some("a"), None, Some("c")]);
        let mut nodes = leaves();
        let tuple = TupleNode::copy_of_named(&labels, &nodes).unwrap();

        labels[0] = Some("renamed".to_string());
        labels[1] = Some("b".to_string());
        nodes[2] = DataStructureNode::text("late");

        assert_eq!(tuple.names(), names(&[Some("a"), None, Some("c")]));
        assert_eq!(tuple.name_at(1), None);
        assert_eq!(tuple.nodes(), leaves().as_slice());
    }

    #[test]
    fn key_value_pairs_round_trip() {
        let named = TupleNode::of_named(names(&[Some("a"), None, Some("c")]), leaves()).unwrap();
        assert_eq!(TupleNode::from_key_value_pairs(named.key_value_pairs()), named);

        let unnamed = TupleNode::of(leaves());
        assert_eq!(TupleNode::from_key_value_pairs(unnamed.key_value_pairs()), unnamed);

        let pairs = named.key_value_pairs();
        let (keys, values): (Vec<_>, Vec<_>) = pairs.into_iter().map(KeyValue::into_parts).unzip();
        assert_eq!(TupleNode::of_named(keys, values).unwrap(), named);
    }

    #[test]
    fn accessors_are_idempotent() {
        let tuple = TupleNode::of_named(names(&[Some("a"), Some("b"), Some("c")]), leaves()).unwrap();
        assert_eq!(tuple.nodes(), tuple.nodes());
        assert_eq!(tuple.names(), tuple.names());
        assert_eq!(tuple.key_value_pairs(), tuple.key_value_pairs());
        assert_eq!(tuple.name_at(2), tuple.name_at(2));
    }

    #[test]
    fn realizations_are_distinct_values() {
        let unnamed = TupleNode::of(leaves());
        let named = TupleNode::of_named(vec![None::<String>, None, None], leaves()).unwrap();
        assert_eq!(unnamed.names(), named.names());
        assert_ne!(unnamed, named);
    }

    #[test]
    fn renders_unnamed_block() {
        let tuple = TupleNode::of(vec![DataStructureNode::text("A"), DataStructureNode::text("B")]);
        let rendered = tuple.render(0);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["UnnamedTupleNode {", " ValueNode(A)", " ValueNode(B)", "}"]);
    }

    #[test]
    fn renders_names_and_nested_indent() {
        let inner = TupleNode::builder().add_named("x", 1).build();
        let outer = TupleNode::builder()
            .add_named("inner", inner)
            .add(DataStructureNode::text("tail"))
            .build();
        let expected = [
            "  NamedTupleNode {",
            "   inner=NamedTupleNode {",
            "    x=ValueNode(1)",
            "   }",
            "   ValueNode(tail)",
            "  }",
        ]
        .join("\n");
        assert_eq!(format!("  {}", outer.render(2)), expected);
    }
}

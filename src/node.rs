//! Format-independent tree model.
//!
//! Every producer builds a [`DataStructureNode`] tree and every consumer walks
//! one. The variant set is closed: records are [`TupleNode`]s, positional
//! sequences are [`ArrayNode`]s, leaves are [`ValueNode`]s, and `Null` marks
//! an absent value.
//!
//! Cloning a node is shallow. Composite variants keep their children behind
//! an `Arc`, so a clone shares the child storage instead of copying it.
use std::fmt;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::tuple::TupleNode;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataStructureNode {
    Tuple(TupleNode),
    Array(ArrayNode),
    Value(ValueNode),
    Null,
}

/// Ordered children addressed by position only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayNode {
    nodes: Arc<Vec<DataStructureNode>>,
}

/// Scalar leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueNode {
    scalar: Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Number(#[serde(with = "crate::wire::number_repr")] OrderedFloat<f64>),
    Text(String),
    Bytes(Vec<u8>),
}

/// One step from a parent to a child during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Name(String),
}

/// Location of a node relative to the root it was walked from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

// ————————————————————————————————————————————————————————————————————————————
// NODE
// ————————————————————————————————————————————————————————————————————————————

impl DataStructureNode {
    pub fn null() -> Self {
        Self::Null
    }
    pub fn boolean(value: bool) -> Self {
        Self::Value(ValueNode::new(Scalar::Bool(value)))
    }
    pub fn integer(value: i64) -> Self {
        Self::Value(ValueNode::new(Scalar::Integer(value)))
    }
    pub fn number(value: f64) -> Self {
        Self::Value(ValueNode::new(Scalar::Number(OrderedFloat(value))))
    }
    pub fn text(value: impl Into<String>) -> Self {
        Self::Value(ValueNode::new(Scalar::Text(value.into())))
    }
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Value(ValueNode::new(Scalar::Bytes(value.into())))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_tuple(&self) -> Option<&TupleNode> {
        match self {
            Self::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }
    pub fn as_value(&self) -> Option<&ValueNode> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Direct children of a composite node; empty for leaves.
    pub fn children(&self) -> &[DataStructureNode] {
        match self {
            Self::Tuple(tuple) => tuple.nodes(),
            Self::Array(array) => array.nodes(),
            Self::Value(_) | Self::Null => &[],
        }
    }

    /// Direct child count.
    pub fn size(&self) -> usize {
        self.children().len()
    }

    /// Indented, multi-line debug rendering. Nested composites render one
    /// level deeper than their parent. Not a serialization format.
    pub fn render(&self, indent: usize) -> String {
        match self {
            Self::Tuple(tuple) => tuple.render(indent),
            Self::Array(array) => array.render(indent),
            Self::Value(value) => value.render(),
            Self::Null => "NullNode".to_string(),
        }
    }

    /// Depth-first, pre-order visit of this node and all descendants.
    ///
    /// Named tuple entries contribute a [`PathSegment::Name`], everything
    /// else a [`PathSegment::Index`].
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&NodePath, &DataStructureNode),
    {
        let mut path = NodePath::default();
        self.walk_at(&mut path, visit);
    }

    fn walk_at<F>(&self, path: &mut NodePath, visit: &mut F)
    where
        F: FnMut(&NodePath, &DataStructureNode),
    {
        visit(path, self);
        match self {
            Self::Tuple(tuple) => {
                for (index, (name, child)) in tuple.entries().enumerate() {
                    let segment = match name {
                        Some(name) => PathSegment::Name(name.to_string()),
                        None => PathSegment::Index(index),
                    };
                    path.segments.push(segment);
                    child.walk_at(path, visit);
                    path.segments.pop();
                }
            }
            Self::Array(array) => {
                for (index, child) in array.nodes().iter().enumerate() {
                    path.segments.push(PathSegment::Index(index));
                    child.walk_at(path, visit);
                    path.segments.pop();
                }
            }
            Self::Value(_) | Self::Null => {}
        }
    }
}

impl fmt::Display for DataStructureNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

impl From<TupleNode> for DataStructureNode {
    fn from(value: TupleNode) -> Self {
        Self::Tuple(value)
    }
}
impl From<ArrayNode> for DataStructureNode {
    fn from(value: ArrayNode) -> Self {
        Self::Array(value)
    }
}
impl From<ValueNode> for DataStructureNode {
    fn from(value: ValueNode) -> Self {
        Self::Value(value)
    }
}
impl From<Scalar> for DataStructureNode {
    fn from(value: Scalar) -> Self {
        Self::Value(ValueNode::new(value))
    }
}
impl From<bool> for DataStructureNode {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}
impl From<i64> for DataStructureNode {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}
impl From<i32> for DataStructureNode {
    fn from(value: i32) -> Self {
        Self::integer(value.into())
    }
}
impl From<f64> for DataStructureNode {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}
impl From<&str> for DataStructureNode {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}
impl From<String> for DataStructureNode {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ARRAY
// ————————————————————————————————————————————————————————————————————————————

impl ArrayNode {
    /// Stores `nodes` by reference: a `Vec` is moved in without copying and an
    /// `Arc` is shared with the caller.
    pub fn of(nodes: impl Into<Arc<Vec<DataStructureNode>>>) -> Self {
        Self { nodes: nodes.into() }
    }

    /// Independent copy of `nodes`; the children themselves stay shared.
    pub fn copy_of(nodes: &[DataStructureNode]) -> Self {
        Self::of(nodes.to_vec())
    }

    pub fn nodes(&self) -> &[DataStructureNode] {
        &self.nodes
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&DataStructureNode> {
        self.nodes.get(index)
    }

    pub fn render(&self, indent: usize) -> String {
        render_block("ArrayNode", indent, self.nodes.iter().map(|node| (None, node)))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// VALUE
// ————————————————————————————————————————————————————————————————————————————

impl ValueNode {
    pub fn new(scalar: Scalar) -> Self {
        Self { scalar }
    }
    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }
    pub fn into_scalar(self) -> Scalar {
        self.scalar
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.scalar {
            Scalar::Bool(x) => Some(x),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self.scalar {
            Scalar::Integer(x) => Some(x),
            _ => None,
        }
    }
    /// Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self.scalar {
            Scalar::Integer(x) => Some(x as f64),
            Scalar::Number(x) => Some(x.0),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match &self.scalar {
            Scalar::Text(x) => Some(x),
            _ => None,
        }
    }
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.scalar {
            Scalar::Bytes(x) => Some(x),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        format!("ValueNode({})", self.scalar)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(x) => write!(f, "{x}"),
            Self::Integer(x) => write!(f, "{x}"),
            Self::Number(x) => write!(f, "{}", x.0),
            Self::Text(x) => f.write_str(x),
            Self::Bytes(xs) => {
                for byte in xs {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

impl NodePath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Pointer-style: `""` for the root, `/0/name` below it.
impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                PathSegment::Index(index) => write!(f, "/{index}")?,
                PathSegment::Name(name) => write!(f, "/{name}")?,
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Shared block layout for composite nodes: header line, one line per entry
/// one level deeper, closing brace back at `indent`.
pub(crate) fn render_block<'a, I>(header: &str, indent: usize, entries: I) -> String
where
    I: IntoIterator<Item = (Option<&'a str>, &'a DataStructureNode)>,
{
    let pad = " ".repeat(indent);
    let mut out = format!("{header} {{\n");
    for (name, node) in entries {
        out.push_str(&pad);
        out.push(' ');
        if let Some(name) = name {
            out.push_str(name);
            out.push('=');
        }
        out.push_str(&node.render(indent + 1));
        out.push('\n');
    }
    out.push_str(&pad);
    out.push('}');
    out
}

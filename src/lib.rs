//! Format-independent hierarchical data model.
//!
//! Producers turn their source (a file, a query result, a parsed document)
//! into a [`DataStructureNode`] tree; consumers walk the tree through the
//! capability checks and tuple accessors without knowing who produced it.
pub mod error;
pub mod json;
pub mod node;
pub mod tuple;
pub mod wire;

pub use error::NodeError;
pub use node::{ArrayNode, DataStructureNode, NodePath, PathSegment, Scalar, ValueNode};
pub use tuple::{KeyValue, Realization, TupleBuilder, TupleNode};

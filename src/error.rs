//! Invalid-argument conditions raised while constructing trees.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// `names` and `nodes` must line up one-to-one in a named tuple.
    #[error("names and nodes must have the same length (names: {names}, nodes: {nodes})")]
    LengthMismatch { names: usize, nodes: usize },

    /// A tuple record arrived without its `names` member.
    #[error("names must be present")]
    MissingNames,

    /// A tuple or array record arrived without its `nodes` member.
    #[error("nodes must be present")]
    MissingNodes,

    /// Wire-form decoding failed somewhere below the root.
    #[error("at path {path} → {message}")]
    Decode { path: String, message: String },
}

pub type Result<T, E = NodeError> = std::result::Result<T, E>;

//! Construction and lowering errors.
//!
//! Every error in this module is raised at the point of detection and
//! propagates unwound to the caller of `compile`/`reify`; there is no
//! partial-result recovery. A failure here means the tree was assembled
//! incorrectly upstream, not that the operation should be retried.
//!
//! Runtime failures during evaluation of a compiled lambda are a separate
//! taxonomy (`compile::EvalError`): those belong to the callable, not to
//! lowering.

use crate::String;
use crate::tree::NodeKind;

/// Error raised while constructing, traversing, or lowering a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A factory or `update` received children that do not fit the node
    /// kind's declared shape (wrong operand count, duplicate lambda
    /// parameter, non-parameter in a parameter list).
    #[error("invalid arity: {0}")]
    InvalidArity(String),

    /// An extension node with this secondary tag reached a visitor that has
    /// no handler for it. Extensions are never silently dropped or passed
    /// through.
    #[error("unsupported extension node `{0}`")]
    UnsupportedExtension(&'static str),

    /// A `Folder` implementation omitted the handler for this node kind.
    #[error("no `{0}` handler implemented by this visitor")]
    NotImplemented(NodeKind),

    /// The operation is not defined for the given tree, such as reifying a
    /// bare lambda or compiling a non-lambda root.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The script compiler's operand stack did not hold exactly one
    /// fragment when code generation completed.
    #[error("code generation left {0} fragment(s) on the operand stack")]
    CodeGeneration(usize),

    /// The tree exceeds the caller-imposed size ceiling.
    #[error("tree has {nodes} nodes, exceeding the configured ceiling of {limit}")]
    TreeTooLarge { nodes: usize, limit: usize },
}

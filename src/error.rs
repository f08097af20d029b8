use std::result;

/// Errors returned by the tree API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A node handle that does not belong to a live node of this tree.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A missing parent/left/right link, or the root of an empty tree.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not permitted on this kind of tree.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// A structural invariant does not hold.
    #[error("fatal: {0}")]
    Fatal(String),
}

pub type Result<T> = result::Result<T, Error>;

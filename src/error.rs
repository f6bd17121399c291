use thiserror::Error;

/// Failure of a lookup on one of the search trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("empty tree")]
    EmptyTree,

    #[error("not found")]
    NotFound,
}

/// Failure of a graph query or of a spanning-forest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex not found in graph")]
    UnknownVertex,

    #[error("no path found between the given vertices")]
    NoPath,

    #[error("no input graph set")]
    NoInputGraph,
}

use locus_common::{DocumentError, NodeId};
use thiserror::Error;

/// A locator fragment that cannot be turned into a [`crate::search::SearchPattern`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern '{pattern}' has {count} wildcards, at most {limit} are allowed")]
    TooManyWildcards {
        pattern: String,
        count: usize,
        limit: usize,
    },
}

/// Failure of a whole lookup. Not finding anything is not an error; it is an
/// empty result list.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Invalid locator '{locator}': {reason}")]
    InvalidPath { locator: String, reason: String },

    #[error("Evaluation failed at node {node}: {reason}")]
    Evaluation { node: NodeId, reason: String },

    #[error("Lookup was cancelled")]
    Cancelled,

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl LocatorError {
    pub(crate) fn invalid_path(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        LocatorError::InvalidPath {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn stale(node: NodeId, err: DocumentError) -> Self {
        LocatorError::Evaluation {
            node,
            reason: err.to_string(),
        }
    }
}

// Errors raised by the similarity metrics and the window search.
//
// Every variant is an invalid-argument condition: the core is a pure
// computation, so the only way it fails is being handed inputs it can't score.
// I/O-facing code (model loading, download, CLI) uses anyhow instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The needle has more tokens than the haystack, so no window exists.
    #[error("target length ({target} tokens) must not exceed text length ({text} tokens)")]
    TargetTooLong { target: usize, text: usize },

    /// The embedding metric needs at least one token per side to average.
    #[error("cannot compute an embedding similarity for an empty token collection")]
    EmptyTokens,

    #[error("embedding dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl Error {
    /// True for errors caused by the caller's arguments rather than by the
    /// environment. Currently that is all of them.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::TargetTooLong { .. } | Error::EmptyTokens | Error::DimensionMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// QueryError
// ---------------------------------------------------------------------------

/// A query that cannot be evaluated as declared.
///
/// Raised by a simulation pass, never at construction: option values may
/// still be arriving when the list is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Query Error: Cannot use startAt or endAt with equalTo.")]
    EqualToWithRange,

    #[error("Query Error: Cannot use limitToFirst with limitToLast.")]
    LimitFirstWithLast,

    #[error("Query Error: {option} must be a non-negative integer, received {value}")]
    InvalidLimit {
        option: &'static str,
        value: serde_json::Value,
    },
}

// ---------------------------------------------------------------------------
// RemoteWriteError
// ---------------------------------------------------------------------------

/// Classification of remote write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The remote store refused the write.
    Rejected,
    /// The acknowledgement was dropped before it settled.
    Dropped,
    /// Network or transport failure.
    Transport,
}

/// Failure of a remote write, carried unchanged inside a `WriteAck`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteWriteError {
    pub message: String,
    pub kind: RemoteErrorKind,
}

impl RemoteWriteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: RemoteErrorKind::Rejected,
        }
    }

    pub fn with_kind(message: impl Into<String>, kind: RemoteErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub(crate) fn dropped() -> Self {
        Self::with_kind(
            "write acknowledgement dropped before settling",
            RemoteErrorKind::Dropped,
        )
    }
}

impl fmt::Display for RemoteWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RemoteWriteError {}

// ---------------------------------------------------------------------------
// OptimisticListError — top-level rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum OptimisticListError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Remote(#[from] RemoteWriteError),
}

pub type Result<T, E = OptimisticListError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use thiserror::Error;

/// Result type for generator construction and stage derivation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when a call violates a construction or derivation contract.
///
/// All of these are reported by the offending call itself, never deferred to
/// iteration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("pool element {element} does not fit in a byte")]
    InvalidPool { element: String },

    #[error("invalid length range: start={start}, stop={stop:?}")]
    InvalidRange { start: i64, stop: Option<i64> },

    #[error("invalid scan: {reason}")]
    InvalidScan { reason: String },

    #[error("an inverted filter needs a predicate")]
    InvalidFilter,

    #[error("invalid offset: {reason}")]
    InvalidOffset { reason: String },
}

impl Error {
    pub(crate) fn invalid_scan(reason: impl Into<String>) -> Self {
        Self::InvalidScan {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_offset(reason: impl Into<String>) -> Self {
        Self::InvalidOffset {
            reason: reason.into(),
        }
    }
}

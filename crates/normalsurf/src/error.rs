//! Error kinds shared by every engine in the crate.
//!
//! `Cancelled` is not a failure in the usual sense: the list builders turn it
//! into a partial list with [`crate::list::EnumerationStatus::Cancelled`].
//! `IntegerOverflow` is caught by the tree dispatcher, which retries the
//! traversal with [`crate::int::ExactInt`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Ill-formed vector, impossible coordinate system, or out-of-range index.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The input lacks a property the operation needs.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// A known-possible case that is not handled.
    #[error("unsolved case: {0}")]
    UnsolvedCase(String),

    /// An arithmetic step left the range of the chosen integer type.
    #[error("integer overflow in {0}")]
    IntegerOverflow(&'static str),

    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Error::FailedPrecondition(msg.into())
    }

    pub(crate) fn unsolved(msg: impl Into<String>) -> Self {
        Error::UnsolvedCase(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

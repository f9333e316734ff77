//! Error types for Boden.

use thiserror::Error;

/// The main error type for Boden operations.
///
/// The variants follow the error taxonomy of the layout protocol:
///
/// - [`BodenError::Programming`] marks a broken contract (wrong thread,
///   non-finite layout input, a backend returning a non-finite size). It is never
///   recovered from silently; it always propagates to the caller.
/// - [`BodenError::InvalidArgument`] carries a description of a bad value,
///   for example an unrecognized length unit.
/// - [`BodenError::Reported`] wraps an error the problem handler has
///   already seen. The dispatcher passes it on without reporting it again.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodenError {
    /// A violated precondition or contract.
    #[error("programming error: {0}")]
    Programming(String),
    /// An argument had a value the operation cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Work was posted to a dispatcher whose receiving side is gone.
    #[error("the UI dispatcher has been shut down")]
    DispatcherClosed,
    /// The configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
    /// An error that already went through the problem handler.
    #[error("{0}")]
    Reported(Box<BodenError>),
}

impl BodenError {
    /// Create a programming error from anything printable.
    pub fn programming(msg: impl Into<String>) -> Self {
        Self::Programming(msg.into())
    }

    /// Create an invalid argument error from anything printable.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Mark this error as seen by the problem handler.
    pub fn reported(self) -> Self {
        match self {
            Self::Reported(_) => self,
            other => Self::Reported(Box::new(other)),
        }
    }

    /// Whether the problem handler has already seen this error.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }

    /// The error itself, without the reported marker.
    pub fn into_unreported(self) -> Self {
        match self {
            Self::Reported(inner) => *inner,
            other => other,
        }
    }

    /// Whether this error reports a broken contract.
    pub fn is_programming_error(&self) -> bool {
        match self {
            Self::Programming(_) => true,
            Self::Reported(inner) => inner.is_programming_error(),
            _ => false,
        }
    }
}

/// A specialized Result type for Boden operations.
pub type Result<T> = std::result::Result<T, BodenError>;

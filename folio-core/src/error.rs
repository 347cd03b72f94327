use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns a stable error code for this error variant.
    /// These codes are stable and can be used by clients for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::AlreadyExists(_) => "ALREADY_EXISTS",
            Error::Corruption(_) => "CORRUPTION",
            Error::ChecksumMismatch => "CHECKSUM_MISMATCH",
            Error::ResourceExhausted(_) => "RESOURCE_EXHAUSTED",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if this error is potentially retryable.
    ///
    /// Transient storage errors are retryable; rejected input and
    /// integrity failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::ResourceExhausted(_) => true,

            Error::InvalidUrl(_) => false,
            Error::InvalidArgument(_) => false,
            Error::NotFound(_) => false,
            Error::AlreadyExists(_) => false,
            Error::Corruption(_) => false,
            Error::ChecksumMismatch => false,
            Error::Internal(_) => false,
        }
    }

    /// Returns true if the caller supplied input that can never succeed
    /// as given (the HTTP layer maps these to 400).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::InvalidArgument(_))
    }

    /// Adds context to an error by wrapping it in an Internal error.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_core::Error;
    ///
    /// let err = Error::ChecksumMismatch.with_context("failed to open link log");
    /// assert_eq!(err.to_string(), "Internal error: failed to open link log: Checksum mismatch");
    /// ```
    pub fn with_context(self, context: &str) -> Error {
        Error::Internal(format!("{}: {}", context, self))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

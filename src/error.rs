//! Unified error types for the soil dashboard.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the dispatcher's error handling uniform.  None of these are fatal to a
//! session: the worst case is a disconnected or degraded dashboard that
//! waits for the user to retry.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No pairing capability, or the user cancelled the pairing prompt.
    DeviceUnavailable,
    /// The text-generation service could not produce advice.
    Service(ServiceError),
    /// The preference store failed.
    Storage(StorageError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceUnavailable => write!(f, "device unavailable"),
            Self::Service(e) => write!(f, "advice service: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Advice service errors
// ---------------------------------------------------------------------------

/// Failures of the remote text-generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// No API credential was configured.
    MissingCredential,
    /// The request never completed (DNS, TLS, timeout, reset).
    Transport,
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The response body did not have the expected shape.
    MalformedResponse,
    /// The response parsed but carried no text.
    EmptyResponse,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "API credential not set"),
            Self::Transport => write!(f, "transport failure"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::EmptyResponse => write!(f, "empty response"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<ServiceError> for Error {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The
//! `Display` text of the user-facing variants is exactly what ends up after the
//! `Error: ` prefix in a tool result, so those messages carry no extra prefix.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failure, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownOperation,
    InvalidArguments,
    RemoteRejection,
    TransportFailure,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::InvalidArguments => "invalid_arguments",
            ErrorKind::RemoteRejection => "remote_rejection",
            ErrorKind::TransportFailure => "transport_failure",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Main error enum for the gateway.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested tool name is not in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Argument bag failed validation against the tool's parameters.
    #[error("{}", errors.join("; "))]
    InvalidArguments { tool: String, errors: Vec<String> },

    /// Remote service answered with an `error` field. Passed through verbatim.
    #[error("{0}")]
    Remote(String),

    /// Connection-level failure talking to the remote service.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Remote body could not be parsed as JSON.
    #[error("invalid JSON response from remote service (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },

    /// Outbound call exceeded the configured timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownTool(_) => ErrorKind::UnknownOperation,
            Error::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Error::Remote(_) => ErrorKind::RemoteRejection,
            Error::Transport(_) | Error::Decode { .. } | Error::Timeout(_) => {
                ErrorKind::TransportFailure
            }
            Error::Config(_) | Error::Serialization(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn invalid_arguments(tool: impl Into<String>, errors: Vec<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            errors,
        }
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

//! Error taxonomy for a single fetch.
//!
//! Every failure maps onto one of three kinds (invocation, network, filesystem),
//! which the CLI turns into a process exit code.

use std::io;
use std::path::PathBuf;

/// Coarse error category, used for exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad inputs: URL, filename, token, or argument count.
    Invocation,
    /// Connection, TLS, timeout, or a non-success HTTP response.
    Network,
    /// The destination could not be created or written.
    Filesystem,
}

impl ErrorKind {
    /// Process exit code for this kind. Invocation matches clap's usage-error code.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Invocation => 2,
            ErrorKind::Network => 3,
            ErrorKind::Filesystem => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Invocation => "invocation",
            ErrorKind::Network => "network",
            ErrorKind::Filesystem => "filesystem",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid filename {filename:?}: {reason}")]
    InvalidFilename { filename: String, reason: &'static str },

    #[error("authorization token must not be empty")]
    EmptyToken,

    /// libcurl reported a failure (DNS, connect, TLS, timeout, aborted write).
    #[error("GET {url} failed: {source}")]
    Transfer {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// Body length disagrees with the advertised `Content-Length`.
    #[error("partial transfer from {url}: expected {expected} bytes, got {received}")]
    PartialTransfer {
        url: String,
        expected: u64,
        received: u64,
    },

    #[error("response body from {url} exceeds limit of {limit} bytes")]
    BodyTooLarge { url: String, limit: u64 },

    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::InvalidUrl { .. }
            | FetchError::InvalidFilename { .. }
            | FetchError::EmptyToken => ErrorKind::Invocation,
            FetchError::Transfer { .. }
            | FetchError::HttpStatus { .. }
            | FetchError::PartialTransfer { .. }
            | FetchError::BodyTooLarge { .. } => ErrorKind::Network,
            FetchError::Filesystem { .. } => ErrorKind::Filesystem,
        }
    }

    pub(crate) fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        FetchError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

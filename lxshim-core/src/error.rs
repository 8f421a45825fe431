//! Error types for lxshim

use std::path::PathBuf;

use thiserror::Error;

use crate::namespace::NamespaceKind;

/// Boxed error returned by a [`ConfigSink`](crate::ConfigSink) implementation
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// lxshim error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Requested namespace kind has no backend mapping
    #[error("namespace {kind} is not supported")]
    UnsupportedNamespace {
        /// Offending namespace kind
        kind: NamespaceKind,
    },

    /// Same namespace kind requested twice
    #[error("duplicate namespace {kind}")]
    DuplicateNamespace {
        /// Repeated namespace kind
        kind: NamespaceKind,
    },

    /// The configuration sink rejected an item
    #[error("failed to set config item {key}: {source}")]
    ConfigSink {
        /// Key that was being written
        key: String,
        /// Error reported by the sink
        #[source]
        source: SinkError,
    },

    /// Device table destination already present
    #[error("device table {} already exists", path.display())]
    DeviceTableExists {
        /// Destination path
        path: PathBuf,
    },

    /// I/O failure while writing the device table
    #[error("failed to write device table {}: {source}", path.display())]
    DeviceTableWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed line in a persisted device table
    #[error("invalid device table {} line {line}: {message}", path.display())]
    DeviceTableParse {
        /// Table path
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// A namespace handle could not be opened
    #[error("failed to open namespace {}: {source}", path.display())]
    NamespaceOpen {
        /// Namespace handle path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// setns(2) into a namespace failed
    #[error("failed to switch to namespace {}: {source}", path.display())]
    NamespaceSwitch {
        /// Namespace handle path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: nix::Error,
    },

    /// sethostname(2) failed inside the target namespace
    #[error("failed to set hostname {hostname:?}: {source}")]
    HostnameSet {
        /// Hostname that was rejected
        hostname: String,
        /// Underlying error
        #[source]
        source: nix::Error,
    },

    /// Namespace operation failed
    #[error("Namespace error: {message}")]
    Namespace {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed container spec document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for lxshim operations
pub type Result<T> = std::result::Result<T, Error>;

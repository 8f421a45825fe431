//! Namespace kinds and requests as they appear in a container spec

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{Error, Result};

/// Kernel namespace category, named after the OCI runtime-spec types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamespaceKind {
    /// Cgroup namespace
    Cgroup,
    /// IPC namespace
    Ipc,
    /// Mount namespace
    Mount,
    /// Network namespace
    Network,
    /// PID namespace
    Pid,
    /// Time namespace
    Time,
    /// User namespace
    User,
    /// UTS namespace (hostname)
    Uts,
}

impl NamespaceKind {
    /// Every kind the OCI runtime-spec defines
    pub const ALL: [Self; 8] = [
        Self::Cgroup,
        Self::Ipc,
        Self::Mount,
        Self::Network,
        Self::Pid,
        Self::Time,
        Self::User,
        Self::Uts,
    ];

    /// OCI type name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cgroup => "cgroup",
            Self::Ipc => "ipc",
            Self::Mount => "mount",
            Self::Network => "network",
            Self::Pid => "pid",
            Self::Time => "time",
            Self::User => "user",
            Self::Uts => "uts",
        }
    }

    /// Entry name under `/proc/<pid>/ns/`
    #[must_use]
    pub const fn proc_name(self) -> &'static str {
        match self {
            Self::Cgroup => "cgroup",
            Self::Ipc => "ipc",
            Self::Mount => "mnt",
            Self::Network => "net",
            Self::Pid => "pid",
            Self::Time => "time",
            Self::User => "user",
            Self::Uts => "uts",
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamespaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::InvalidConfig {
                message: format!("unknown namespace type {s:?}"),
            })
    }
}

impl TryFrom<String> for NamespaceKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<NamespaceKind> for String {
    fn from(kind: NamespaceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A namespace the container should create or join
///
/// Without a path the namespace is created (cloned) for the container.
/// With a path the container joins the existing namespace behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRequest {
    /// Namespace kind
    #[serde(rename = "type")]
    pub kind: NamespaceKind,

    /// Namespace handle to join
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl NamespaceRequest {
    /// Request a new namespace of the given kind
    #[must_use]
    pub const fn clone_new(kind: NamespaceKind) -> Self {
        Self { kind, path: None }
    }

    /// Request to join the namespace at `path`
    #[must_use]
    pub fn join(kind: NamespaceKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: Some(path.into()),
        }
    }

    /// Path of the namespace to join, if any
    ///
    /// An empty path counts as "create", matching the OCI convention.
    #[must_use]
    pub fn foreign_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

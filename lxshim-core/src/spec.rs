//! Container specification aggregate
//!
//! A subset of the OCI `config.json` document: the parts needed to resolve
//! namespaces and provision devices. Everything else in the document is ignored.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::device::{Device, DeviceCgroupRule};
use crate::namespace::{NamespaceKind, NamespaceRequest};
use crate::Result;

/// Container specification
///
/// Mutated in place while the container is configured; callers hold the
/// only `&mut` for the duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Container process
    #[serde(default)]
    pub process: Process,

    /// Linux-specific configuration
    #[serde(default)]
    pub linux: Linux,
}

/// Container process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// User the process runs as
    #[serde(default)]
    pub user: User,
}

/// Process credentials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    #[serde(default)]
    pub uid: u32,

    /// Group ID
    #[serde(default)]
    pub gid: u32,
}

/// Linux section of the spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linux {
    /// Namespaces to create or join
    #[serde(default)]
    pub namespaces: Vec<NamespaceRequest>,

    /// Device nodes
    #[serde(default)]
    pub devices: Vec<Device>,

    /// Resource limits
    #[serde(default)]
    pub resources: Resources,
}

/// Resource section, only the device allow-list is modelled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Device-cgroup rules
    #[serde(default)]
    pub devices: Vec<DeviceCgroupRule>,
}

impl ContainerSpec {
    /// Parse a spec from JSON
    ///
    /// # Errors
    /// Returns error if the document is malformed
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a spec from a `config.json` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading container spec");

        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Default owner uid for devices
    #[must_use]
    pub const fn uid(&self) -> u32 {
        self.process.user.uid
    }

    /// Default owner gid for devices
    #[must_use]
    pub const fn gid(&self) -> u32 {
        self.process.user.gid
    }

    /// Requested namespaces
    #[must_use]
    pub fn namespaces(&self) -> &[NamespaceRequest] {
        &self.linux.namespaces
    }

    /// Device nodes
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.linux.devices
    }

    /// Device-cgroup rules
    #[must_use]
    pub fn device_rules(&self) -> &[DeviceCgroupRule] {
        &self.linux.resources.devices
    }

    /// Check whether a namespace of `kind` is requested
    #[must_use]
    pub fn is_namespace_enabled(&self, kind: NamespaceKind) -> bool {
        self.namespace(kind).is_some()
    }

    /// First request for a namespace of `kind`
    #[must_use]
    pub fn namespace(&self, kind: NamespaceKind) -> Option<&NamespaceRequest> {
        self.linux.namespaces.iter().find(|ns| ns.kind == kind)
    }
}

//! Namespace identity probes
//!
//! A namespace handle under `/proc/<pid>/ns/` is a magic symlink whose target
//! (`uts:[4026531838]`) identifies the namespace instance.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use lxshim_core::{Error, NamespaceKind, Result};

/// Identity of the namespace behind a handle path
///
/// # Errors
/// Returns error if the handle cannot be read
pub fn namespace_identity(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_link(path)
        .map(|target| target.to_string_lossy().into_owned())
        .map_err(|e| Error::Namespace {
            message: format!("Failed to read namespace {}: {e}", path.display()),
        })
}

/// Identity of the calling thread's namespace of `kind`
///
/// # Errors
/// Returns error if the handle cannot be read
pub fn thread_namespace_identity(kind: NamespaceKind) -> Result<String> {
    namespace_identity(format!("/proc/thread-self/ns/{}", kind.proc_name()))
}

/// Namespace identities of one process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceInfo {
    identities: BTreeMap<NamespaceKind, String>,
}

impl NamespaceInfo {
    /// Namespaces of the current process
    ///
    /// # Errors
    /// Returns error if `/proc/<pid>/ns` cannot be read
    pub fn current() -> Result<Self> {
        Self::for_pid(std::process::id())
    }

    /// Namespaces of process `pid`
    ///
    /// Kinds the kernel does not expose are left out.
    ///
    /// # Errors
    /// Returns error if `/proc/<pid>/ns` does not exist
    pub fn for_pid(pid: u32) -> Result<Self> {
        let base_path = format!("/proc/{pid}/ns");

        if !Path::new(&base_path).is_dir() {
            return Err(Error::Namespace {
                message: format!("No namespace directory for PID {pid}"),
            });
        }

        let identities = NamespaceKind::ALL
            .into_iter()
            .filter_map(|kind| {
                namespace_identity(format!("{base_path}/{}", kind.proc_name()))
                    .ok()
                    .map(|id| (kind, id))
            })
            .collect();

        Ok(Self { identities })
    }

    /// Identity of the namespace of `kind`
    #[must_use]
    pub fn get(&self, kind: NamespaceKind) -> Option<&str> {
        self.identities.get(&kind).map(String::as_str)
    }

    /// Check if in different namespace than init (PID 1)
    ///
    /// # Errors
    /// Returns error if cannot read namespaces
    pub fn is_isolated(&self) -> Result<bool> {
        let init_ns = Self::for_pid(1)?;
        if init_ns.identities.is_empty() {
            return Err(Error::Namespace {
                message: "Cannot read namespaces of PID 1".to_string(),
            });
        }

        Ok([NamespaceKind::Pid, NamespaceKind::Network, NamespaceKind::Mount]
            .into_iter()
            .any(|kind| self.get(kind) != init_ns.get(kind)))
    }
}

impl fmt::Display for NamespaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Namespace Info:")?;
        for (kind, id) in &self.identities {
            let label = format!("{}:", kind.proc_name().to_uppercase());
            writeln!(f, "  {label:<8}{id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_namespaces() {
        let info = NamespaceInfo::current().unwrap();

        assert!(info.get(NamespaceKind::Pid).is_some());
        assert!(info.get(NamespaceKind::Uts).unwrap().starts_with("uts:["));
    }

    #[test]
    fn test_thread_identity_matches_process() {
        let thread_uts = thread_namespace_identity(NamespaceKind::Uts).unwrap();
        let info = NamespaceInfo::current().unwrap();

        assert_eq!(info.get(NamespaceKind::Uts), Some(thread_uts.as_str()));
    }

    #[test]
    fn test_missing_pid() {
        assert!(NamespaceInfo::for_pid(u32::MAX).is_err());
    }

    #[test]
    fn test_namespace_info_display() {
        let info = NamespaceInfo {
            identities: BTreeMap::from([
                (NamespaceKind::Pid, "pid:[4026531836]".to_string()),
                (NamespaceKind::Network, "net:[4026531905]".to_string()),
            ]),
        };

        let display = format!("{info}");
        assert!(display.contains("PID:"));
        assert!(display.contains("NET:"));
    }
}

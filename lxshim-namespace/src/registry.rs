//! Namespace kind to backend name and clone flag mapping

use std::collections::HashMap;

use lxshim_core::NamespaceKind;
use nix::sched::CloneFlags;

/// Backend name and clone flag for one namespace kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceEntry {
    /// Name the LXC backend uses for the namespace
    pub name: &'static str,
    /// Flag passed to clone(2) to create the namespace
    pub clone_flag: CloneFlags,
}

/// Immutable table of namespace kinds the backend supports
///
/// Build it once and pass it by reference; it is never mutated after
/// construction and can be shared between threads.
///
/// The time namespace is absent: the backend has no support for cloning or
/// sharing it yet, so requests for it fail as unsupported.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    entries: HashMap<NamespaceKind, NamespaceEntry>,
}

impl NamespaceRegistry {
    /// Create the registry for the LXC backend
    #[must_use]
    pub fn new() -> Self {
        let entries = [
            (NamespaceKind::Cgroup, "cgroup", CloneFlags::CLONE_NEWCGROUP),
            (NamespaceKind::Ipc, "ipc", CloneFlags::CLONE_NEWIPC),
            (NamespaceKind::Mount, "mnt", CloneFlags::CLONE_NEWNS),
            (NamespaceKind::Network, "net", CloneFlags::CLONE_NEWNET),
            (NamespaceKind::Pid, "pid", CloneFlags::CLONE_NEWPID),
            (NamespaceKind::User, "user", CloneFlags::CLONE_NEWUSER),
            (NamespaceKind::Uts, "uts", CloneFlags::CLONE_NEWUTS),
        ]
        .into_iter()
        .map(|(kind, name, clone_flag)| (kind, NamespaceEntry { name, clone_flag }))
        .collect();

        Self { entries }
    }

    /// Look up the entry for `kind`, `None` if the backend does not support it
    #[must_use]
    pub fn lookup(&self, kind: NamespaceKind) -> Option<&NamespaceEntry> {
        self.entries.get(&kind)
    }

    /// Check if `kind` has a backend mapping
    #[must_use]
    pub fn is_supported(&self, kind: NamespaceKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Supported kinds in declaration order
    pub fn supported_kinds(&self) -> impl Iterator<Item = NamespaceKind> + '_ {
        NamespaceKind::ALL
            .into_iter()
            .filter(|kind| self.is_supported(*kind))
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_but_time_supported() {
        let registry = NamespaceRegistry::new();

        for kind in NamespaceKind::ALL {
            assert_eq!(registry.is_supported(kind), kind != NamespaceKind::Time);
        }
        assert_eq!(registry.supported_kinds().count(), 7);
    }

    #[test]
    fn test_lookup() {
        let registry = NamespaceRegistry::new();

        let mount = registry.lookup(NamespaceKind::Mount).unwrap();
        assert_eq!(mount.name, "mnt");
        assert_eq!(mount.clone_flag, CloneFlags::CLONE_NEWNS);

        let net = registry.lookup(NamespaceKind::Network).unwrap();
        assert_eq!(net.name, "net");

        assert!(registry.lookup(NamespaceKind::Time).is_none());
    }

    #[test]
    fn test_flags_distinct() {
        let registry = NamespaceRegistry::new();
        let mut seen = CloneFlags::empty();

        for kind in registry.supported_kinds() {
            let flag = registry.lookup(kind).unwrap().clone_flag;
            assert!(!seen.intersects(flag), "{kind} shares a clone flag");
            seen |= flag;
        }
    }
}

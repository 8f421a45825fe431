//! Translation of namespace requests into clone flags and backend config

use std::collections::HashSet;

use lxshim_core::{ConfigSink, Error, NamespaceRequest, Result};
use nix::sched::CloneFlags;
use tracing::{debug, info};

use crate::registry::NamespaceRegistry;

/// Config key listing the namespaces to clone, space separated
pub const CLONE_KEY: &str = "lxc.namespace.clone";

/// Prefix of the per-namespace sharing key, followed by the backend name
pub const SHARE_KEY_PREFIX: &str = "lxc.namespace.share.";

/// Sharing key for a backend namespace name
#[must_use]
pub fn share_key(name: &str) -> String {
    format!("{SHARE_KEY_PREFIX}{name}")
}

/// Resolves namespace requests against a [`NamespaceRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct NamespaceTranslator<'a> {
    registry: &'a NamespaceRegistry,
}

impl<'a> NamespaceTranslator<'a> {
    /// Create a translator over `registry`
    #[must_use]
    pub const fn new(registry: &'a NamespaceRegistry) -> Self {
        Self { registry }
    }

    /// OR together the clone flags of every request
    ///
    /// Duplicates are not rejected here, callers may pass partial lists.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedNamespace`] for a kind without a registry entry
    pub fn clone_flags(&self, requests: &[NamespaceRequest]) -> Result<CloneFlags> {
        requests.iter().try_fold(CloneFlags::empty(), |flags, ns| {
            let entry = self
                .registry
                .lookup(ns.kind)
                .ok_or(Error::UnsupportedNamespace { kind: ns.kind })?;
            Ok(flags | entry.clone_flag)
        })
    }

    /// Write namespace sharing and clone directives to `sink`
    ///
    /// Requests with a path are written immediately as sharing items. The
    /// clone list is written last, even when empty. On error, sharing items
    /// already written stay in the sink and the clone list is not written.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateNamespace`] on the first repeated kind,
    /// [`Error::UnsupportedNamespace`] for a kind without a registry entry and
    /// [`Error::ConfigSink`] if the sink rejects an item
    pub fn configure<S>(&self, requests: &[NamespaceRequest], sink: &mut S) -> Result<()>
    where
        S: ConfigSink + ?Sized,
    {
        let mut seen = HashSet::with_capacity(requests.len());
        let mut clone = Vec::with_capacity(requests.len());
        let mut shared = 0usize;

        for ns in requests {
            if !seen.insert(ns.kind) {
                return Err(Error::DuplicateNamespace { kind: ns.kind });
            }

            let entry = self
                .registry
                .lookup(ns.kind)
                .ok_or(Error::UnsupportedNamespace { kind: ns.kind })?;

            match ns.foreign_path() {
                None => clone.push(entry.name),
                Some(path) => {
                    debug!(kind = %ns.kind, path = %path.display(), "Sharing namespace");
                    set_item(sink, &share_key(entry.name), &path.to_string_lossy())?;
                    shared += 1;
                }
            }
        }

        let clone = clone.join(" ");
        set_item(sink, CLONE_KEY, &clone)?;

        info!(clone = %clone, shared, "Namespaces configured");
        Ok(())
    }
}

fn set_item<S>(sink: &mut S, key: &str, value: &str) -> Result<()>
where
    S: ConfigSink + ?Sized,
{
    sink.set_config_item(key, value)
        .map_err(|e| Error::ConfigSink {
            key: key.to_string(),
            source: Box::new(e),
        })
}

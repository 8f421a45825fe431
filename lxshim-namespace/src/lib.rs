//! Namespace resolution for the LXC backend
//!
//! This crate turns the namespace list of a container spec into backend
//! configuration:
//! - [`NamespaceRegistry`] - namespace kind to backend name and clone flag
//! - [`NamespaceTranslator`] - clone flags and `lxc.namespace.*` config items
//! - [`set_hostname`] - hostname for a UTS namespace the container joins
//! - [`NamespaceInfo`] - namespace identity probes

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod hostname;
pub mod identity;
pub mod registry;
pub mod translator;

pub use hostname::{set_hostname, set_hostname_async, set_hostname_in_current_thread};
pub use identity::{namespace_identity, thread_namespace_identity, NamespaceInfo};
pub use registry::{NamespaceEntry, NamespaceRegistry};
pub use translator::{share_key, NamespaceTranslator, CLONE_KEY, SHARE_KEY_PREFIX};

pub use nix::sched::CloneFlags;

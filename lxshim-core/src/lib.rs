//! lxshim core - container spec model and shared error types
//!
//! This crate provides the types the namespace and device crates operate on.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod device;
pub mod error;
pub mod namespace;
pub mod sink;
pub mod spec;

pub use device::{Device, DeviceAccess, DeviceCgroupRule, DeviceType};
pub use error::{Error, Result, SinkError};
pub use namespace::{NamespaceKind, NamespaceRequest};
pub use sink::{ConfigMap, ConfigSink};
pub use spec::ContainerSpec;

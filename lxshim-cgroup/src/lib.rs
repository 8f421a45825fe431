//! Device cgroup allow-list and device table management
//!
//! This crate fills in the device section of a container spec and persists
//! the resulting device nodes for the process that creates them inside the
//! container's mount namespace.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod devices;
pub mod table;

pub use devices::{
    add_device, add_device_perms, default_devices, ensure_default_devices, is_device_enabled,
};
pub use table::{read_devices, write_devices, DeviceTableEntry};

// Re-export commonly used types
pub use lxshim_core::{ContainerSpec, Device, DeviceAccess, DeviceCgroupRule, DeviceType};

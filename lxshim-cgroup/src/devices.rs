//! Device allow-list provisioning
//!
//! Every device node added to a spec is paired with a device-cgroup allow
//! rule for its major/minor. The OCI runtime-spec default devices are added
//! when the caller has not declared them, together with the rules needed
//! for pseudo-terminal allocation.

use lxshim_core::{ContainerSpec, Device, DeviceAccess, DeviceCgroupRule, DeviceType, Result};
use tracing::{debug, info};

/// Mode of default device nodes
pub const DEFAULT_DEVICE_MODE: u32 = 0o666;

/// Major of `/dev/tty`, `/dev/console` and the pty multiplexer
pub const PTY_MASTER_MAJOR: i64 = 5;

/// Major granted for `/dev/pts/[0-9]`
pub const PTY_SLAVE_MAJOR: i64 = 88;

/// Devices every container gets, see the OCI runtime-spec "Default Devices"
///
/// `/dev/ptmx` is not listed: it has to be a symlink to the devpts
/// instance's `ptmx`, which is set up by bind mount outside of this crate.
/// Only its cgroup permission is granted here.
#[must_use]
pub fn default_devices() -> [Device; 6] {
    [
        Device::char("/dev/null", 1, 3),
        Device::char("/dev/zero", 1, 5),
        Device::char("/dev/full", 1, 7),
        Device::char("/dev/random", 1, 8),
        Device::char("/dev/urandom", 1, 9),
        Device::char("/dev/tty", 5, 0),
    ]
}

/// Check if the spec already has a device node at `device.path`
///
/// Only the path is compared.
#[must_use]
pub fn is_device_enabled(spec: &ContainerSpec, device: &Device) -> bool {
    spec.devices().iter().any(|d| d.path == device.path)
}

/// Append `device` with the given mode and ownership, and an allow rule for it
///
/// The rule is appended even if an identical one already exists.
pub fn add_device(
    spec: &mut ContainerSpec,
    mut device: Device,
    mode: u32,
    uid: u32,
    gid: u32,
    access: DeviceAccess,
) {
    device.file_mode = Some(mode);
    device.uid = Some(uid);
    device.gid = Some(gid);

    let (typ, major, minor) = (device.typ, device.major, device.minor);

    debug!(path = %device.path, typ = %typ, major, minor, "Adding device");
    spec.linux.devices.push(device);

    add_device_perms(spec, typ, Some(major), Some(minor), access);
}

/// Append an allow rule for a device class without adding a device node
///
/// `None` for `major` or `minor` is a wildcard.
pub fn add_device_perms(
    spec: &mut ContainerSpec,
    typ: DeviceType,
    major: Option<i64>,
    minor: Option<i64>,
    access: DeviceAccess,
) {
    let rule = DeviceCgroupRule::allow(typ, major, minor, access);
    debug!(rule = %rule, "Allowing device access");
    spec.linux.resources.devices.push(rule);
}

/// Add the default devices and pty permissions to `spec`
///
/// Default devices already declared by path are left untouched. The pty
/// rules are appended unconditionally. New device nodes get mode `0666`
/// and the container process' uid/gid.
///
/// # Errors
/// Currently infallible
pub fn ensure_default_devices(spec: &mut ContainerSpec) -> Result<()> {
    let (uid, gid) = (spec.uid(), spec.gid());

    // /dev/ptmx, /dev/pts/ptmx
    add_device_perms(
        spec,
        DeviceType::Char,
        Some(PTY_MASTER_MAJOR),
        None,
        DeviceAccess::ALL,
    );
    // /dev/pts/[0-9]
    add_device_perms(
        spec,
        DeviceType::Char,
        Some(PTY_SLAVE_MAJOR),
        None,
        DeviceAccess::ALL,
    );

    let mut added = 0usize;
    for device in default_devices() {
        if is_device_enabled(spec, &device) {
            debug!(path = %device.path, "Default device already declared");
            continue;
        }
        add_device(spec, device, DEFAULT_DEVICE_MODE, uid, gid, DeviceAccess::ALL);
        added += 1;
    }

    info!(
        added,
        devices = spec.devices().len(),
        rules = spec.device_rules().len(),
        "Default devices ensured"
    );
    Ok(())
}

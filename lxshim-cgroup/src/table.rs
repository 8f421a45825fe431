//! Persisted device table
//!
//! The table lists the device nodes to create inside the container, one per
//! line:
//!
//! ```text
//! /dev/zero c 1 5 0666 0:0
//! ```
//!
//! Fields are path, type, major, minor, octal mode and `uid:gid`, separated
//! by whitespace, so device paths must not contain any. The file is
//! written once when the container is created; a missing file means the
//! container has no device table.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use lxshim_core::{ContainerSpec, Device, DeviceType, Error, Result};
use tracing::{debug, info};

/// Mode used for devices that do not set one
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// Permission bits of the table file itself
const TABLE_FILE_MODE: u32 = 0o600;

/// One resolved line of the device table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTableEntry {
    /// Path inside the container
    pub path: String,
    /// Node type
    pub typ: DeviceType,
    /// Major number
    pub major: i64,
    /// Minor number
    pub minor: i64,
    /// Permission bits
    pub mode: u32,
    /// Owner
    pub uid: u32,
    /// Group
    pub gid: u32,
}

impl DeviceTableEntry {
    /// Resolve `device`, filling unset ownership from the spec's process user
    /// and an unset mode with [`DEFAULT_FILE_MODE`]
    #[must_use]
    pub fn resolve(device: &Device, spec: &ContainerSpec) -> Self {
        Self {
            path: device.path.clone(),
            typ: device.typ,
            major: device.major,
            minor: device.minor,
            mode: device.file_mode.unwrap_or(DEFAULT_FILE_MODE),
            uid: device.uid.unwrap_or_else(|| spec.uid()),
            gid: device.gid.unwrap_or_else(|| spec.gid()),
        }
    }

    fn parse(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [path, typ, major, minor, mode, owner] = fields.as_slice() else {
            return Err(format!("expected 6 fields, found {}", fields.len()));
        };

        let (uid, gid) = owner
            .split_once(':')
            .ok_or_else(|| format!("invalid owner {owner:?}"))?;

        Ok(Self {
            path: (*path).to_string(),
            typ: typ.parse::<DeviceType>().map_err(|e| e.to_string())?,
            major: major.parse().map_err(|_| format!("invalid major {major:?}"))?,
            minor: minor.parse().map_err(|_| format!("invalid minor {minor:?}"))?,
            mode: u32::from_str_radix(mode, 8).map_err(|_| format!("invalid mode {mode:?}"))?,
            uid: uid.parse().map_err(|_| format!("invalid uid {uid:?}"))?,
            gid: gid.parse().map_err(|_| format!("invalid gid {gid:?}"))?,
        })
    }
}

impl fmt::Display for DeviceTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} 0{:o} {}:{}",
            self.path, self.typ, self.major, self.minor, self.mode, self.uid, self.gid
        )
    }
}

/// Write the device table of `spec` to `dst`
///
/// Does nothing if the spec has no devices. The file is created exclusively
/// with mode `0600`. If writing fails the file may be left incomplete.
///
/// # Errors
/// Returns [`Error::InvalidConfig`] if a device path contains whitespace,
/// [`Error::DeviceTableExists`] if `dst` already exists and
/// [`Error::DeviceTableWrite`] on any other I/O failure
pub fn write_devices(dst: impl AsRef<Path>, spec: &ContainerSpec) -> Result<()> {
    let dst = dst.as_ref();

    if spec.devices().is_empty() {
        debug!(path = %dst.display(), "No devices, skipping device table");
        return Ok(());
    }

    if let Some(device) = spec
        .devices()
        .iter()
        .find(|d| d.path.is_empty() || d.path.contains(char::is_whitespace))
    {
        return Err(Error::InvalidConfig {
            message: format!(
                "device path {:?} cannot be stored in a device table",
                device.path
            ),
        });
    }

    let write_err = |source| Error::DeviceTableWrite {
        path: dst.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(TABLE_FILE_MODE)
        .open(dst)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::DeviceTableExists {
                path: dst.to_path_buf(),
            },
            _ => write_err(e),
        })?;

    let mut writer = BufWriter::new(file);
    for device in spec.devices() {
        writeln!(writer, "{}", DeviceTableEntry::resolve(device, spec)).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    info!(
        path = %dst.display(),
        devices = spec.devices().len(),
        "Device table written"
    );
    Ok(())
}

/// Read a device table written by [`write_devices`]
///
/// A missing file yields an empty table.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read and
/// [`Error::DeviceTableParse`] for a malformed line
pub fn read_devices(path: impl AsRef<Path>) -> Result<Vec<DeviceTableEntry>> {
    let path = path.as_ref();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No device table");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            DeviceTableEntry::parse(line).map_err(|message| Error::DeviceTableParse {
                path: path.to_path_buf(),
                line: idx + 1,
                message,
            })
        })
        .collect()
}

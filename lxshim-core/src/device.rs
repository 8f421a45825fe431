//! Device nodes and device-cgroup rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Kind of device node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Character device
    #[serde(rename = "c")]
    Char,
    /// Block device
    #[serde(rename = "b")]
    Block,
}

impl DeviceType {
    /// Single-letter form used by mknod and the device cgroup
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Char => "c",
            Self::Block => "b",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "c" => Ok(Self::Char),
            "b" => Ok(Self::Block),
            other => Err(Error::InvalidConfig {
                message: format!("unknown device type {other:?}"),
            }),
        }
    }
}

/// Access granted by a device-cgroup rule: any subset of read, write, mknod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceAccess {
    /// `r`
    pub read: bool,
    /// `w`
    pub write: bool,
    /// `m`
    pub mknod: bool,
}

impl DeviceAccess {
    /// Read, write and mknod
    pub const ALL: Self = Self {
        read: true,
        write: true,
        mknod: true,
    };

    /// No access
    pub const NONE: Self = Self {
        read: false,
        write: false,
        mknod: false,
    };
}

impl fmt::Display for DeviceAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.read {
            f.write_str("r")?;
        }
        if self.write {
            f.write_str("w")?;
        }
        if self.mknod {
            f.write_str("m")?;
        }
        Ok(())
    }
}

impl FromStr for DeviceAccess {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut access = Self::NONE;
        for c in s.chars() {
            match c {
                'r' => access.read = true,
                'w' => access.write = true,
                'm' => access.mknod = true,
                other => {
                    return Err(Error::InvalidConfig {
                        message: format!("invalid device access {other:?} in {s:?}"),
                    });
                }
            }
        }
        Ok(access)
    }
}

impl TryFrom<String> for DeviceAccess {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DeviceAccess> for String {
    fn from(access: DeviceAccess) -> Self {
        access.to_string()
    }
}

/// Device node to materialize inside the container
///
/// Mode and ownership are optional; unset values fall back to the
/// container process' uid/gid and mode `0600` when the device table is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Path inside the container
    pub path: String,

    /// Node type
    #[serde(rename = "type")]
    pub typ: DeviceType,

    /// Major number
    pub major: i64,

    /// Minor number
    pub minor: i64,

    /// Permission bits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_mode: Option<u32>,

    /// Owning uid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,

    /// Owning gid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
}

impl Device {
    /// Character device without mode or ownership
    #[must_use]
    pub fn char(path: impl Into<String>, major: i64, minor: i64) -> Self {
        Self {
            path: path.into(),
            typ: DeviceType::Char,
            major,
            minor,
            file_mode: None,
            uid: None,
            gid: None,
        }
    }
}

/// Device-cgroup allow/deny entry
///
/// `None` in `typ`, `major` or `minor` is a wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCgroupRule {
    /// Allow or deny
    pub allow: bool,

    /// Device type, all types when unset
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<DeviceType>,

    /// Major number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<i64>,

    /// Minor number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor: Option<i64>,

    /// Granted access
    #[serde(default)]
    pub access: DeviceAccess,
}

impl DeviceCgroupRule {
    /// Allow rule for a device class
    #[must_use]
    pub const fn allow(
        typ: DeviceType,
        major: Option<i64>,
        minor: Option<i64>,
        access: DeviceAccess,
    ) -> Self {
        Self {
            allow: true,
            typ: Some(typ),
            major,
            minor,
            access,
        }
    }
}

/// Rendered in `devices.allow` syntax, e.g. `c 5:* rwm`
impl fmt::Display for DeviceCgroupRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let typ = self.typ.map_or("a", DeviceType::as_str);
        write!(f, "{typ} ")?;
        match self.major {
            Some(major) => write!(f, "{major}")?,
            None => f.write_str("*")?,
        }
        f.write_str(":")?;
        match self.minor {
            Some(minor) => write!(f, "{minor}")?,
            None => f.write_str("*")?,
        }
        write!(f, " {}", self.access)
    }
}

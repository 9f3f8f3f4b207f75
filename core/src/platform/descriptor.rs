//! Host platform description used for capability gating
//!
//! Read synchronously at controller construction; the values never change for
//! the lifetime of a process, so no refresh path exists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system family of the host device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OsFamily {
    Android,
    Ios,
    /// Anything else (desktop test hosts, emulator oddities)
    Other,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Android => write!(f, "Android"),
            OsFamily::Ios => write!(f, "iOS"),
            OsFamily::Other => write!(f, "Other"),
        }
    }
}

/// OS family plus integer platform version (Android API level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    pub os_family: OsFamily,
    pub os_version: u32,
}

impl PlatformDescriptor {
    /// Describe an Android device at the given API level
    pub fn android(os_version: u32) -> Self {
        Self {
            os_family: OsFamily::Android,
            os_version,
        }
    }

    /// Describe an iOS device at the given major version
    pub fn ios(os_version: u32) -> Self {
        Self {
            os_family: OsFamily::Ios,
            os_version,
        }
    }

    pub fn is_android(&self) -> bool {
        self.os_family == OsFamily::Android
    }

    /// Version-gating check: true when the platform meets the minimum
    /// version a capability needs to exist as a runtime permission
    pub fn supports(&self, min_version: u32) -> bool {
        self.os_version >= min_version
    }
}

//! Sensor-hub resolution via `/sys/class/hwmon`.
//!
//! hwmon device numbering is assigned at driver load time and is not stable
//! across boots, so a chip can only be found by the `name` attribute its
//! driver registers ("coretemp", "thinkpad", "k10temp", ...). This locator
//! scans `hwmon<N>` directories and matches that attribute exactly.

use crate::sysfs;
use log::debug;
use std::path::PathBuf;

/// Default sysfs root for hwmon devices.
pub const HWMON_ROOT: &str = "/sys/class/hwmon";

/// Upper bound on the `hwmon<N>` index scan.
pub const MAX_HWMON: u32 = 100;

/// Resolves a sensor-hub name to its `hwmon<N>` device directory.
#[derive(Debug, Clone)]
pub struct SensorDeviceLocator {
    hwmon_root: PathBuf,
}

impl SensorDeviceLocator {
    /// Create a locator over the standard sysfs hwmon root.
    pub fn new() -> Self {
        Self::with_root(HWMON_ROOT)
    }

    /// Create a locator over an alternate root (tests, chroots).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            hwmon_root: root.into(),
        }
    }

    /// Find the device directory whose `name` attribute equals `name`.
    ///
    /// Scans `hwmon1` through `hwmon99` in order and returns the first
    /// match. The comparison is exact and case-sensitive, with only the
    /// line terminator removed. Returns `None` once the bound is exhausted.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        for i in 1..MAX_HWMON {
            let dir = self.hwmon_root.join(format!("hwmon{}", i));
            if sysfs::read_line(&dir.join("name")) == name {
                debug!("sensor hub '{}' resolved to {}", name, dir.display());
                return Some(dir);
            }
        }
        None
    }
}

impl Default for SensorDeviceLocator {
    fn default() -> Self {
        Self::new()
    }
}

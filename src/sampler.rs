//! Point-in-time CPU health snapshots.
//!
//! The sampler stitches the locators together into one best-effort reading:
//! current core clock from whichever core the recognized scaling driver
//! manages, package temperature from the "coretemp" hwmon chip, and fan RPM
//! from the "thinkpad" embedded controller when present. Failures never
//! surface as errors on the snapshot path; they collapse into zero fields,
//! stub substitutions, or an all-zero snapshot, which is the contract the
//! owning monitor polls against.
//!
//! # Example
//!
//! ```no_run
//! use corehealth::HealthSampler;
//!
//! let mut sampler = HealthSampler::new();
//! if sampler.init() {
//!     let health = sampler.sample();
//!     println!("{}", health);
//! }
//! ```

use crate::error::{Error, Result};
use crate::hwmon::SensorDeviceLocator;
use crate::lifecycle::LifecycleGuard;
use crate::sysfs;
use crate::topology::{self, CoreTopologyLocator};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stub core clock (MHz) reported until a real reading resolves.
///
/// This and the three constants below are placeholders pending real sensor
/// wiring, not measurements; they are reported verbatim whenever the
/// corresponding device never resolves.
pub const STUB_CLOCK_MHZ: u32 = 2200;
/// Stub memory clock (MHz); no memory-clock sensor is wired up yet.
pub const STUB_MEM_CLOCK_MHZ: u32 = 1600;
/// Stub package power draw (W); no power sensor is wired up yet.
pub const STUB_POWER_W: u32 = 75;
/// Stub fan speed (RPM) reported when no fan controller resolves.
pub const STUB_FAN_RPM: u32 = 3249;

/// Substituted when the converted temperature reads zero. A zero reading
/// is indistinguishable from a failed read, so zero is never reported.
pub const TEMP_SENTINEL_C: u32 = 69;

/// hwmon chip name of the mandatory thermal sensor.
const THERMAL_SENSOR: &str = "coretemp";
/// hwmon chip name of the optional fan controller.
const FAN_SENSOR: &str = "thinkpad";

/// In-kernel frequency scaling driver, as reported by
/// `cpufreq/scaling_driver`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingDriver {
    /// Intel P-state driver (active mode)
    IntelPstate,
    /// Intel P-state driver in passive/cpufreq mode
    IntelCpufreq,
    /// AMD P-state driver
    AmdPstate,
    /// Generic ACPI cpufreq driver
    AcpiCpufreq,
    /// Any other driver string
    Unknown(String),
}

impl std::fmt::Display for ScalingDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingDriver::IntelPstate => write!(f, "intel_pstate"),
            ScalingDriver::IntelCpufreq => write!(f, "intel_cpufreq"),
            ScalingDriver::AmdPstate => write!(f, "amd-pstate"),
            ScalingDriver::AcpiCpufreq => write!(f, "acpi-cpufreq"),
            ScalingDriver::Unknown(s) => write!(f, "{}", s),
        }
    }
}

impl std::str::FromStr for ScalingDriver {
    type Err = Error;

    // Matching is exact: driver strings come straight from the kernel and
    // are never decorated.
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "intel_pstate" => ScalingDriver::IntelPstate,
            "intel_cpufreq" => ScalingDriver::IntelCpufreq,
            "amd-pstate" | "amd-pstate-epp" => ScalingDriver::AmdPstate,
            "acpi-cpufreq" => ScalingDriver::AcpiCpufreq,
            other => ScalingDriver::Unknown(other.to_string()),
        })
    }
}

/// One best-effort CPU health reading.
///
/// A plain value: produced fresh on every sample, never mutated after
/// return. All-zero means the sampler was not ready or the mandatory
/// thermal sensor could not be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Current core clock (MHz)
    pub clock: u32,
    /// Memory clock (MHz); stub value, see [`STUB_MEM_CLOCK_MHZ`]
    pub mem_clock: u32,
    /// Package power draw (W); stub value, see [`STUB_POWER_W`]
    pub power: u32,
    /// Fan speed (RPM)
    pub rpm: u32,
    /// Package temperature (°C); never zero, see [`TEMP_SENTINEL_C`]
    pub temperature: u32,
}

impl std::fmt::Display for HealthSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} MHz core, {} MHz mem, {} W, {} RPM, {}\u{b0}C",
            self.clock, self.mem_clock, self.power, self.rpm, self.temperature
        )
    }
}

/// Device paths resolved by one discovery pass, reused across samples.
#[derive(Debug)]
struct ResolvedDevices {
    /// cpufreq directory of the last scanned core managed by the
    /// recognized scaling driver, if any.
    cpufreq: Option<PathBuf>,
    /// Mandatory thermal chip directory.
    thermal: PathBuf,
    /// Optional fan controller directory.
    fan: Option<PathBuf>,
    /// Logical cores seen during the scan.
    cores: u32,
}

/// Best-effort CPU health sampler.
///
/// Discovery (the bounded sysfs scans) runs on the first successful sample
/// after [`init`](HealthSampler::init) and its results are cached; later
/// samples only re-read the attribute files of the already-resolved
/// devices. Call [`invalidate_cache`](HealthSampler::invalidate_cache)
/// after a hot-plug event to force re-discovery.
///
/// Fully synchronous and blocking; a discovery pass can cost thousands of
/// file probes, so keep it off latency-critical paths and rate-limit
/// sampling from the polling loop.
#[derive(Debug)]
pub struct HealthSampler {
    topology: CoreTopologyLocator,
    sensors: SensorDeviceLocator,
    guard: LifecycleGuard,
    devices: Option<ResolvedDevices>,
}

impl HealthSampler {
    /// Sampler over the standard sysfs roots.
    pub fn new() -> Self {
        Self {
            topology: CoreTopologyLocator::new(),
            sensors: SensorDeviceLocator::new(),
            guard: LifecycleGuard::new(),
            devices: None,
        }
    }

    /// Sampler over alternate roots (tests, chroots).
    pub fn with_roots(cpu_root: impl Into<PathBuf>, hwmon_root: impl Into<PathBuf>) -> Self {
        let cpu_root = cpu_root.into();
        Self {
            topology: CoreTopologyLocator::with_root(cpu_root.clone()),
            sensors: SensorDeviceLocator::with_root(hwmon_root),
            guard: LifecycleGuard::with_root(cpu_root),
            devices: None,
        }
    }

    /// Run the one-time readiness probe. Idempotent; see [`LifecycleGuard`].
    pub fn init(&self) -> bool {
        self.guard.init()
    }

    /// Cached readiness outcome.
    pub fn is_ready(&self) -> bool {
        self.guard.is_ready()
    }

    /// Release resources; no-op, kept for interface symmetry.
    pub fn close(&self) {
        self.guard.close()
    }

    /// Last probe failure; always `None`, see [`LifecycleGuard::last_error`].
    pub fn last_error(&self) -> Option<&str> {
        self.guard.last_error()
    }

    /// Logical cores seen by the last discovery pass; 0 before discovery.
    pub fn core_count(&self) -> u32 {
        self.devices.as_ref().map(|d| d.cores).unwrap_or(0)
    }

    /// Drop cached device paths so the next sample re-runs discovery.
    pub fn invalidate_cache(&mut self) {
        if self.devices.take().is_some() {
            debug!("resolved device paths invalidated");
        }
    }

    /// Take one health snapshot.
    ///
    /// Returns an all-zero snapshot when the sampler is not ready or the
    /// mandatory thermal sensor cannot be resolved, discarding any clock
    /// value already computed. Individual field failures collapse to zero
    /// or to the documented stub constants.
    pub fn sample(&mut self) -> HealthSnapshot {
        self.try_sample().unwrap_or_default()
    }

    /// Take one health snapshot, reporting why it failed instead of
    /// collapsing to the all-zero snapshot. Field-level fallbacks still
    /// apply to a successful snapshot.
    pub fn try_sample(&mut self) -> Result<HealthSnapshot> {
        if !self.guard.is_ready() {
            return Err(Error::NotReady);
        }

        let devices = match self.devices.take() {
            Some(devices) => devices,
            None => self.discover()?,
        };
        let snapshot = self.read_snapshot(&devices);
        self.devices = Some(devices);

        Ok(snapshot)
    }

    /// One full discovery pass over both sysfs trees.
    fn discover(&self) -> Result<ResolvedDevices> {
        let mut cpufreq = None;
        let mut cores = 0;

        // Walk logical core ordinals until the locator comes up empty,
        // which means no more candidate cores exist. Among scanned cores
        // the last one managed by the recognized driver wins.
        for ordinal in 0..topology::MAX_CPUS {
            let Some(dir) = self.topology.locate(ordinal) else {
                break;
            };
            let freq_dir = dir.join("cpufreq");
            let driver = sysfs::read_line(&freq_dir.join("scaling_driver"));
            if matches!(driver.parse(), Ok(ScalingDriver::IntelPstate)) {
                cpufreq = Some(freq_dir);
            }
            cores += 1;
        }

        let Some(thermal) = self.sensors.locate(THERMAL_SENSOR) else {
            warn!("mandatory sensor hub '{}' not found", THERMAL_SENSOR);
            return Err(Error::DeviceNotFound(THERMAL_SENSOR.to_string()));
        };
        let fan = self.sensors.locate(FAN_SENSOR);

        debug!(
            "discovery: {} cores, cpufreq {:?}, fan {}",
            cores,
            cpufreq,
            if fan.is_some() { "present" } else { "absent" }
        );

        Ok(ResolvedDevices {
            cpufreq,
            thermal,
            fan,
            cores,
        })
    }

    /// Read current attribute values from already-resolved devices.
    fn read_snapshot(&self, devices: &ResolvedDevices) -> HealthSnapshot {
        let mut health = HealthSnapshot {
            clock: STUB_CLOCK_MHZ,
            mem_clock: STUB_MEM_CLOCK_MHZ,
            power: STUB_POWER_W,
            rpm: STUB_FAN_RPM,
            temperature: 0,
        };

        if let Some(freq_dir) = &devices.cpufreq {
            // scaling_cur_freq is in kHz
            health.clock = sysfs::read_u32(&freq_dir.join("scaling_cur_freq")) / 1000;
        }

        // temp1_input is in millidegrees
        health.temperature = sysfs::read_u32(&devices.thermal.join("temp1_input")) / 1000;

        if let Some(fan_dir) = &devices.fan {
            health.rpm = sysfs::read_u32(&fan_dir.join("fan1_input"));
        }

        if health.temperature == 0 {
            health.temperature = TEMP_SENTINEL_C;
        }

        health
    }
}

impl Default for HealthSampler {
    fn default() -> Self {
        Self::new()
    }
}

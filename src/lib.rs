//! # corehealth
//!
//! Best-effort CPU health sampling via Linux sysfs. The crate discovers the
//! kernel-exposed cpufreq and hwmon device directories for the host CPU,
//! reads their attributes, and assembles a single point-in-time
//! [`HealthSnapshot`] (core clock, memory clock, power draw, fan RPM,
//! package temperature).
//!
//! The crate is the sampling core of a larger hardware monitor: the owning
//! monitor decides polling cadence, formatting, and export. Readings are
//! cosmetic telemetry, so every failure collapses into a zero field, a
//! documented stub constant, or an all-zero snapshot rather than an error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use corehealth::HealthSampler;
//!
//! let mut sampler = HealthSampler::new();
//! if sampler.init() {
//!     let health = sampler.sample();
//!     println!(
//!         "clock {} MHz, temp {}°C, fan {} RPM",
//!         health.clock, health.temperature, health.rpm
//!     );
//! }
//! ```
//!
//! ## Scope
//!
//! Read-only and Linux-only: no attribute is ever written, no fan curve or
//! governor is touched, and this is not a general sysfs client. Sampling is
//! synchronous and blocking; see [`HealthSampler`] for the cost model.

pub mod error;
pub mod hwmon; // Sensor-hub (hwmon chip) resolution by name
pub mod lifecycle; // One-shot readiness probe
pub mod sampler; // Snapshot assembly and fallback policy
pub mod sysfs; // Raw attribute reads
pub mod topology; // Logical-core to device directory resolution

pub use error::{Error, Result};
pub use hwmon::SensorDeviceLocator;
pub use lifecycle::LifecycleGuard;
pub use sampler::{
    HealthSampler, HealthSnapshot, ScalingDriver, STUB_CLOCK_MHZ, STUB_FAN_RPM,
    STUB_MEM_CLOCK_MHZ, STUB_POWER_W, TEMP_SENTINEL_C,
};
pub use topology::CoreTopologyLocator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

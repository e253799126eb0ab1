//! One-shot readiness probe for the sampler.
//!
//! The probe checks that the sysfs CPU root exists and is a directory. It
//! runs at most once per guard; the outcome is cached for the guard's
//! lifetime and every later `init` call returns the cache without touching
//! the filesystem again. The cache is write-once behind a `OnceLock`, so
//! concurrent first calls race safely.

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::topology::CPU_ROOT;

/// Probe-once readiness gate.
#[derive(Debug)]
pub struct LifecycleGuard {
    cpu_root: PathBuf,
    ready: OnceLock<bool>,
}

impl LifecycleGuard {
    /// Guard over the standard sysfs CPU root.
    pub fn new() -> Self {
        Self::with_root(CPU_ROOT)
    }

    /// Guard over an alternate root (tests, chroots).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            cpu_root: root.into(),
            ready: OnceLock::new(),
        }
    }

    /// Probe the CPU root and cache the outcome.
    ///
    /// The first call performs the probe; every later call returns the
    /// cached result without re-probing, whatever the filesystem looks
    /// like by then. Idempotent by contract.
    pub fn init(&self) -> bool {
        *self.ready.get_or_init(|| {
            let ready = std::fs::metadata(&self.cpu_root)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if ready {
                debug!("cpu topology root {} present", self.cpu_root.display());
            } else {
                warn!(
                    "cpu topology root {} missing, sampler disabled",
                    self.cpu_root.display()
                );
            }
            ready
        })
    }

    /// Cached probe outcome; `false` if `init` was never called.
    pub fn is_ready(&self) -> bool {
        self.ready.get().copied().unwrap_or(false)
    }

    /// Release resources. The guard holds no handles, so this is a no-op;
    /// it exists for interface symmetry with `init`.
    pub fn close(&self) {}

    /// Last probe failure, if any.
    ///
    /// Always `None`: the probe records no diagnostics. Known limitation
    /// carried in the interface for the owning monitor's benefit.
    pub fn last_error(&self) -> Option<&str> {
        None
    }
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join("corehealth_lifecycle_tests")
            .join(format!("{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_init_present_root() {
        let root = fixture("present");
        std::fs::create_dir_all(&root).unwrap();

        let guard = LifecycleGuard::with_root(&root);
        assert!(!guard.is_ready());
        assert!(guard.init());
        assert!(guard.is_ready());
    }

    #[test]
    fn test_init_missing_root() {
        let guard = LifecycleGuard::with_root(fixture("missing"));
        assert!(!guard.init());
        assert!(!guard.is_ready());
    }

    #[test]
    fn test_init_probes_exactly_once() {
        let root = fixture("probe_once");
        let _ = std::fs::remove_dir_all(&root);

        let guard = LifecycleGuard::with_root(&root);
        assert!(!guard.init());

        // The root appearing after the first probe must not change the
        // cached outcome.
        std::fs::create_dir_all(&root).unwrap();
        assert!(!guard.init());
        assert!(!guard.is_ready());
    }

    #[test]
    fn test_close_keeps_readiness() {
        let root = fixture("close");
        std::fs::create_dir_all(&root).unwrap();

        let guard = LifecycleGuard::with_root(&root);
        assert!(guard.init());
        guard.close();
        assert!(guard.is_ready());
    }

    #[test]
    fn test_last_error_reports_nothing() {
        let guard = LifecycleGuard::with_root(fixture("last_error"));
        guard.init();
        assert_eq!(guard.last_error(), None);
    }
}

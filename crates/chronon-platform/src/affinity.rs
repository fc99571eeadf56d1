//! Pinning the calling thread to one CPU while a timer is read.
//!
//! Some platforms expose high-resolution counters that are not synchronized
//! across cores. Pinning for the duration of the read and restoring the
//! previous mask afterwards keeps every reading on the same counter.

use chronon_core::error::{TimeError, TimeResult};
#[allow(unused_imports)] // Platform-specific code may not use all imports
use tracing::{debug, warn};

/// Restores the thread's previous affinity mask when dropped.
#[derive(Debug)]
#[must_use = "the thread is unpinned as soon as the guard is dropped"]
pub struct PinGuard {
    #[cfg(target_os = "linux")]
    previous: nix::sched::CpuSet,
}

/// Pin the current thread to `cpu` until the returned guard is dropped.
///
/// # Errors
///
/// Returns [`TimeError::Platform`] if the current mask cannot be read, the
/// index is invalid, or the new mask is rejected.
#[cfg(target_os = "linux")]
pub fn pin_current_thread(cpu: usize) -> TimeResult<PinGuard> {
    use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
    use nix::unistd::Pid;

    let previous = sched_getaffinity(Pid::from_raw(0))
        .map_err(|e| TimeError::Platform(format!("sched_getaffinity failed: {e}")))?;

    let mut pinned = CpuSet::new();
    pinned
        .set(cpu)
        .map_err(|e| TimeError::Platform(format!("Invalid CPU index {cpu}: {e}")))?;

    sched_setaffinity(Pid::from_raw(0), &pinned)
        .map_err(|e| TimeError::Platform(format!("sched_setaffinity failed: {e}")))?;

    Ok(PinGuard { previous })
}

#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_cpu: usize) -> TimeResult<PinGuard> {
    Ok(PinGuard {})
}

#[cfg(target_os = "linux")]
impl Drop for PinGuard {
    fn drop(&mut self) {
        use nix::sched::sched_setaffinity;
        use nix::unistd::Pid;

        if let Err(e) = sched_setaffinity(Pid::from_raw(0), &self.previous) {
            warn!("Failed to restore CPU affinity after timer read: {e}");
        }
    }
}

/// Check that `cpu` exists and is in the current thread's affinity mask.
///
/// # Errors
///
/// Returns [`TimeError::Platform`] if the thread could never be pinned to `cpu`.
#[cfg(target_os = "linux")]
pub fn validate_cpu(cpu: usize) -> TimeResult<()> {
    use nix::sched::{sched_getaffinity, CpuSet};
    use nix::unistd::Pid;

    if cpu >= CpuSet::count() {
        return Err(TimeError::Platform(format!(
            "CPU index {cpu} exceeds the maximum of {}",
            CpuSet::count()
        )));
    }

    let allowed = sched_getaffinity(Pid::from_raw(0))
        .map_err(|e| TimeError::Platform(format!("sched_getaffinity failed: {e}")))?;

    match allowed.is_set(cpu) {
        Ok(true) => {
            debug!(cpu, "Timer reads will be pinned");
            Ok(())
        }
        Ok(false) => Err(TimeError::Platform(format!(
            "CPU {cpu} is not in this thread's affinity mask"
        ))),
        Err(e) => Err(TimeError::Platform(format!("Invalid CPU index {cpu}: {e}"))),
    }
}

#[cfg(not(target_os = "linux"))]
pub fn validate_cpu(cpu: usize) -> TimeResult<()> {
    warn!(cpu, "CPU pinning not available on this platform; reads will not be pinned");
    Ok(())
}

/// CPUs the current thread may run on.
#[cfg(target_os = "linux")]
#[must_use]
pub fn allowed_cpus() -> Vec<usize> {
    use nix::sched::{sched_getaffinity, CpuSet};
    use nix::unistd::Pid;

    sched_getaffinity(Pid::from_raw(0))
        .map(|set| {
            (0..CpuSet::count())
                .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
#[must_use]
pub fn allowed_cpus() -> Vec<usize> {
    Vec::new()
}

//! Thread suspension.

use chronon_core::duration::Duration;
#[allow(unused_imports)] // Platform-specific code may not use all imports
use tracing::{trace, warn};

/// Suspend the calling thread for at least `duration`.
///
/// Returns immediately for zero and negative durations.
pub fn sleep(duration: Duration) {
    if !duration.is_positive() {
        return;
    }
    trace!(us = duration.as_microseconds_i64(), "Sleeping");
    sleep_for(duration);
}

/// Relative `clock_nanosleep` on `CLOCK_MONOTONIC`, resumed with the
/// remaining time when a signal interrupts it.
#[cfg(target_os = "linux")]
fn sleep_for(duration: Duration) {
    let mut request = match to_libc_timespec(duration) {
        Some(ts) => ts,
        None => {
            warn!(?duration, "Sleep length not representable as timespec");
            fallback_sleep(duration);
            return;
        }
    };

    loop {
        let mut remaining = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };

        // SAFETY: both pointers refer to live timespecs on this stack frame
        let rc = unsafe {
            libc::clock_nanosleep(libc::CLOCK_MONOTONIC, 0, &request, &mut remaining)
        };

        match rc {
            0 => return,
            libc::EINTR => request = remaining,
            err => {
                warn!(err, "clock_nanosleep failed, falling back to thread::sleep");
                fallback_sleep(duration);
                return;
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn sleep_for(duration: Duration) {
    fallback_sleep(duration);
}

fn fallback_sleep(duration: Duration) {
    if let Some(std) = duration.to_std() {
        std::thread::sleep(std);
    }
}

#[cfg(target_os = "linux")]
fn to_libc_timespec(duration: Duration) -> Option<libc::timespec> {
    let ts = duration.to_os_timespec().ok()?;
    Some(libc::timespec {
        tv_sec: libc::time_t::try_from(ts.seconds).ok()?,
        tv_nsec: libc::c_long::try_from(ts.nanoseconds).ok()?,
    })
}

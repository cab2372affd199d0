//! # Realtime scheduling control
//!
//! Pulse capture measures bus phases in busy-wait iterations, so a preemption
//! in the middle of a phase shows up as a wildly inflated count. Entering the
//! `SCHED_FIFO` class at the highest priority for the capture window keeps
//! the thread on the CPU for its duration.
//!
//! Elevation is best-effort: without the privilege to change scheduling
//! class, capture simply proceeds under the default policy with best-effort
//! timing. The failure is still surfaced as a debug-level event rather than
//! discarded.

/// Holds the calling thread in the realtime FIFO scheduling class.
///
/// Dropping the guard restores the default time-shared policy at neutral
/// priority. Guards bracket only the timing-critical capture phase, not the
/// coarse protocol sleeps around it.
#[must_use = "the realtime window lasts only while the guard is alive"]
#[derive(Debug)]
pub struct RealtimeGuard(());

impl RealtimeGuard {
    /// Raises the calling thread to `SCHED_FIFO` at the highest priority,
    /// best-effort.
    pub fn acquire() -> Self {
        imp::raise();
        Self(())
    }
}

impl Drop for RealtimeGuard {
    fn drop(&mut self) {
        imp::lower();
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use std::io;

    use tracing::debug;

    fn set_policy(policy: libc::c_int, priority: libc::c_int) -> io::Result<()> {
        let param = libc::sched_param {
            sched_priority: priority,
        };
        // SAFETY: `param` is a valid sched_param for the calling thread.
        if unsafe { libc::sched_setscheduler(0, policy, &param) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub(super) fn raise() {
        // SAFETY: pure query.
        let top = unsafe { libc::sched_get_priority_max(libc::SCHED_FIFO) };
        if let Err(error) = set_policy(libc::SCHED_FIFO, top) {
            debug!("realtime scheduling unavailable, capturing under the default policy: {error}");
        }
    }

    pub(super) fn lower() {
        if let Err(error) = set_policy(libc::SCHED_OTHER, 0) {
            debug!("could not restore the default scheduling policy: {error}");
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod imp {
    pub(super) fn raise() {}

    pub(super) fn lower() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_is_best_effort() {
        // Must not panic or fail even without the privilege to enter
        // SCHED_FIFO.
        let guard = RealtimeGuard::acquire();
        drop(guard);
    }
}

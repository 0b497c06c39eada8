// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use thread_priority::{set_current_thread_priority, ThreadPriority, ThreadPriorityValue};
use tracing::{info, warn};

/// Default priority for the transport thread when PIEZODRUM_THREAD_PRIORITY is unset.
const DEFAULT_TRANSPORT_THREAD_PRIORITY: u8 = 70;

/// Reads PIEZODRUM_THREAD_PRIORITY (0-99), falling back to the default for missing or
/// out of range values.
pub fn transport_thread_priority() -> u8 {
    std::env::var("PIEZODRUM_THREAD_PRIORITY")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .filter(|n| *n < 100)
        .unwrap_or(DEFAULT_TRANSPORT_THREAD_PRIORITY)
}

/// Returns whether to attempt RT (SCHED_FIFO) scheduling for the transport thread.
/// Enabled unless PIEZODRUM_DISABLE_RT is set to a true value.
pub fn rt_enabled() -> bool {
    !std::env::var("PIEZODRUM_DISABLE_RT")
        .ok()
        .map(|v| {
            v == "1"
                || v.eq_ignore_ascii_case("true")
                || v.eq_ignore_ascii_case("yes")
                || v.eq_ignore_ascii_case("on")
        })
        .unwrap_or(false)
}

/// Raises the calling thread's priority. Failures are logged and otherwise ignored.
pub fn configure_transport_thread_priority(priority: u8, rt: bool) {
    let tp = match ThreadPriorityValue::try_from(priority) {
        Ok(value) => ThreadPriority::Crossplatform(value),
        Err(e) => {
            warn!(priority, error = %e, "Invalid transport thread priority");
            return;
        }
    };
    if let Err(e) = set_current_thread_priority(tp) {
        warn!(error = ?e, "Failed to raise transport thread priority");
    }

    #[cfg(unix)]
    if rt {
        use thread_priority::unix::{
            set_thread_priority_and_policy, thread_native_id, RealtimeThreadSchedulePolicy,
            ThreadSchedulePolicy,
        };
        match set_thread_priority_and_policy(
            thread_native_id(),
            tp,
            ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo),
        ) {
            Ok(()) => info!("Enabled RT SCHED_FIFO for transport thread"),
            Err(e) => warn!(error = %e, "Failed to set RT SCHED_FIFO for transport thread"),
        }
    }
    #[cfg(not(unix))]
    let _ = rt;
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_priority_from_env() {
        std::env::set_var("PIEZODRUM_THREAD_PRIORITY", "42");
        assert_eq!(transport_thread_priority(), 42);

        std::env::set_var("PIEZODRUM_THREAD_PRIORITY", "150");
        assert_eq!(
            transport_thread_priority(),
            DEFAULT_TRANSPORT_THREAD_PRIORITY
        );

        std::env::remove_var("PIEZODRUM_THREAD_PRIORITY");
        assert_eq!(
            transport_thread_priority(),
            DEFAULT_TRANSPORT_THREAD_PRIORITY
        );
    }

    #[test]
    #[serial]
    fn test_rt_flag() {
        std::env::remove_var("PIEZODRUM_DISABLE_RT");
        assert!(rt_enabled());
        std::env::set_var("PIEZODRUM_DISABLE_RT", "yes");
        assert!(!rt_enabled());
        std::env::set_var("PIEZODRUM_DISABLE_RT", "0");
        assert!(rt_enabled());
        std::env::remove_var("PIEZODRUM_DISABLE_RT");
    }
}

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

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, AtomicUsize, Ordering};

use crate::looper::LoopState;

/// Engine state published after every buffer fill for the foreground to read.
/// Fields are updated individually, so a snapshot may mix values from two adjacent fills.
#[derive(Debug, Default)]
pub struct Status {
    clock: AtomicU32,
    loop_state: AtomicU8,
    loop_length: AtomicU32,
    loop_events: AtomicUsize,
    overdub: AtomicBool,
    active_voices: AtomicUsize,
    fills: AtomicU64,
}

/// A point-in-time copy of [`Status`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// The sample clock at the end of the last fill.
    pub clock: u32,
    pub loop_state: LoopState,
    /// Loop length in samples, zero when nothing is recorded.
    pub loop_length: u32,
    pub loop_events: usize,
    pub overdub: bool,
    pub active_voices: usize,
    /// The number of buffers filled since startup.
    pub fills: u64,
}

impl Status {
    pub(crate) fn publish(&self, snapshot: &StatusSnapshot) {
        self.clock.store(snapshot.clock, Ordering::Relaxed);
        self.loop_state
            .store(snapshot.loop_state.into(), Ordering::Relaxed);
        self.loop_length
            .store(snapshot.loop_length, Ordering::Relaxed);
        self.loop_events
            .store(snapshot.loop_events, Ordering::Relaxed);
        self.overdub.store(snapshot.overdub, Ordering::Relaxed);
        self.active_voices
            .store(snapshot.active_voices, Ordering::Relaxed);
        self.fills.store(snapshot.fills, Ordering::Release);
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let fills = self.fills.load(Ordering::Acquire);
        StatusSnapshot {
            clock: self.clock.load(Ordering::Relaxed),
            loop_state: LoopState::from(self.loop_state.load(Ordering::Relaxed)),
            loop_length: self.loop_length.load(Ordering::Relaxed),
            loop_events: self.loop_events.load(Ordering::Relaxed),
            overdub: self.overdub.load(Ordering::Relaxed),
            active_voices: self.active_voices.load(Ordering::Relaxed),
            fills,
        }
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loop: {} ({} events, {} samples), overdub: {}, voices: {}, clock: {}",
            self.loop_state,
            self.loop_events,
            self.loop_length,
            if self.overdub { "on" } else { "off" },
            self.active_voices,
            self.clock,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_snapshot() {
        let status = Status::default();
        assert_eq!(status.snapshot(), StatusSnapshot::default());

        let published = StatusSnapshot {
            clock: 512,
            loop_state: LoopState::Playing,
            loop_length: 44100,
            loop_events: 3,
            overdub: true,
            active_voices: 2,
            fills: 2,
        };
        status.publish(&published);
        assert_eq!(status.snapshot(), published);
    }

    #[test]
    fn test_display() {
        let snapshot = StatusSnapshot {
            clock: 256,
            loop_state: LoopState::Recording,
            loop_length: 0,
            loop_events: 1,
            overdub: false,
            active_voices: 1,
            fills: 1,
        };
        assert_eq!(
            snapshot.to_string(),
            "loop: recording (1 events, 0 samples), overdub: off, voices: 1, clock: 256"
        );
    }
}

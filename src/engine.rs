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

//! The polyphonic sound engine: voice allocation, fixed-point mixing and code word encoding.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::debug;

use crate::looper::LoopTrack;
use crate::stream::BufferFiller;

mod codec;
mod command;
mod mixer;
mod pool;
mod status;
mod velocity;

pub use codec::{DacChannel, DacControl, DacGain, MAX_SAMPLE, MIN_SAMPLE};
pub use command::{command_queue, Command, CommandSender};
pub use mixer::Mixer;
pub use pool::{Voice, VoicePool};
pub use status::{Status, StatusSnapshot};
pub use velocity::{VelocityCurve, MAX_VELOCITY};

/// Anything that can start a drum sound.
pub trait TriggerSink {
    fn trigger(&mut self, drum_id: u8, raw_velocity: u16);
}

/// Owns the voices and the loop track and produces one buffer at a time.
pub struct AudioEngine {
    pool: VoicePool,
    mixer: Mixer,
    looper: LoopTrack,
    commands: Receiver<Command>,
    status: Arc<Status>,
    /// Absolute sample count, wrapping.
    clock: u32,
    fills: u64,
}

impl AudioEngine {
    pub fn new(
        pool: VoicePool,
        mixer: Mixer,
        looper: LoopTrack,
        commands: Receiver<Command>,
        status: Arc<Status>,
    ) -> Self {
        AudioEngine {
            pool,
            mixer,
            looper,
            commands,
            status,
            clock: 0,
            fills: 0,
        }
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn looper(&self) -> &LoopTrack {
        &self.looper
    }

    /// The sample time the next fill begins at.
    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            clock: self.clock,
            loop_state: self.looper.state(),
            loop_length: self.looper.loop_length(),
            loop_events: self.looper.len(),
            overdub: self.looper.overdub(),
            active_voices: self.pool.active_voices(),
            fills: self.fills,
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Hit {
                drum_id,
                raw_velocity,
            } => {
                if !self.pool.plays(drum_id) {
                    debug!(drum_id, "Ignoring hit for unknown drum");
                    return;
                }
                let capture = self.looper.add_event(drum_id, raw_velocity, self.clock);
                if capture.sounds_live() {
                    self.pool.trigger(drum_id, raw_velocity);
                }
            }
            Command::ToggleRecord => self.looper.toggle_record(self.clock),
            Command::Clear => self.looper.clear(),
            Command::ToggleOverdub => {
                self.looper.toggle_overdub();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_clock(&mut self, clock: u32) {
        self.clock = clock;
    }
}

impl BufferFiller for AudioEngine {
    fn fill_buffer(&mut self, buffer: &mut [u16]) {
        while let Ok(command) = self.commands.try_recv() {
            self.apply(command);
        }

        for slot in buffer.iter_mut() {
            self.looper.tick(self.clock, &mut self.pool);
            *slot = self.mixer.advance_one_sample(&mut self.pool);
            self.clock = self.clock.wrapping_add(1);
        }

        self.fills += 1;
        self.status.publish(&self.snapshot());
    }
}

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

//! The instrument as two owned halves: a cloneable foreground handle that reports hits
//! and button presses, and the audio core that the transport drives.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{self, ConfigError};
use crate::engine::{
    command_queue, AudioEngine, Command, CommandSender, DacControl, Mixer, Status,
    StatusSnapshot, VoicePool,
};
use crate::looper::LoopTrack;
use crate::samples::SampleRepository;
use crate::stream::{
    BufferPair, CancelHandle, ClockedTransport, CodeSink, StreamState, Transport, TransportStats,
};

/// A fully wired instrument.
pub struct Instrument {
    handle: InstrumentHandle,
    core: AudioCore,
}

impl Instrument {
    /// Wires the engine, loop track and stream buffers described by the configuration.
    pub fn build(
        config: &config::Instrument,
        repository: Arc<SampleRepository>,
    ) -> Result<Instrument, ConfigError> {
        let audio = config.audio();
        let curve = config.velocity().curve()?;
        let (commands, receiver) = command_queue(audio.command_queue());
        let status = Arc::new(Status::default());

        info!(
            sample_rate = audio.sample_rate(),
            buffer_size = audio.buffer_size(),
            voices = audio.voices(),
            drums = repository.len(),
            base_threshold = curve.base_threshold(),
            hardest_hit = curve.hardest_hit(),
            "Building instrument"
        );

        let engine = AudioEngine::new(
            VoicePool::new(audio.voices(), repository, curve),
            Mixer::new(audio.dac()),
            LoopTrack::new(config.looper().overdub()),
            receiver,
            status.clone(),
        );

        Ok(Instrument {
            handle: InstrumentHandle { commands, status },
            core: AudioCore {
                engine,
                buffers: BufferPair::new(audio.buffer_size(), audio.sample_rate()),
                control: audio.dac(),
            },
        })
    }

    pub fn handle(&self) -> InstrumentHandle {
        self.handle.clone()
    }

    /// Separates the foreground handle from the audio core.
    pub fn split(self) -> (InstrumentHandle, AudioCore) {
        (self.handle, self.core)
    }
}

/// The foreground side of the instrument. All requests are queued and take effect at
/// the start of the next buffer fill.
#[derive(Clone, Debug)]
pub struct InstrumentHandle {
    commands: CommandSender,
    status: Arc<Status>,
}

impl InstrumentHandle {
    /// Reports a pad hit. Returns false if the request was dropped.
    pub fn report_hit(&self, drum_id: u8, raw_velocity: u16) -> bool {
        self.commands.send(Command::Hit {
            drum_id,
            raw_velocity,
        })
    }

    pub fn toggle_record(&self) -> bool {
        self.commands.send(Command::ToggleRecord)
    }

    pub fn clear(&self) -> bool {
        self.commands.send(Command::Clear)
    }

    pub fn toggle_overdub(&self) -> bool {
        self.commands.send(Command::ToggleOverdub)
    }

    /// The engine state as of the last buffer fill.
    pub fn status(&self) -> StatusSnapshot {
        self.status.snapshot()
    }
}

/// The transport side of the instrument: everything the buffer-exhausted signal touches.
pub struct AudioCore {
    engine: AudioEngine,
    buffers: BufferPair,
    control: DacControl,
}

impl AudioCore {
    /// Fills both buffers and starts the transport on the first.
    pub fn start<T: Transport + ?Sized>(&mut self, transport: &mut T) {
        self.buffers.prime(&mut self.engine, transport);
    }

    /// Swaps buffers and refills the one the transport just finished.
    pub fn on_buffer_exhausted<T: Transport + ?Sized>(&mut self, transport: &mut T) {
        self.buffers.on_buffer_exhausted(&mut self.engine, transport);
    }

    /// Runs the host transport on the calling thread until cancelled.
    pub fn run_clocked(
        &mut self,
        transport: &mut ClockedTransport,
        sink: &mut dyn CodeSink,
        cancel: &CancelHandle,
    ) -> TransportStats {
        transport.run(&mut self.buffers, &mut self.engine, sink, cancel)
    }

    /// The buffer the transport is playing.
    pub fn live(&self) -> &[u16] {
        self.buffers.live()
    }

    pub fn state(&self) -> StreamState {
        self.buffers.state()
    }

    pub fn deadline(&self) -> Duration {
        self.buffers.deadline()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffers.capacity()
    }

    /// The sample time the next fill begins at.
    pub fn clock(&self) -> u32 {
        self.engine.clock()
    }

    pub fn control(&self) -> DacControl {
        self.control
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }
}

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

use std::time::Duration;

use super::{BufferFiller, BufferId, Transport};

/// Which buffer is live and which is being filled. There is no third state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    PlayingAFillingB,
    PlayingBFillingA,
}

impl StreamState {
    pub fn live(&self) -> BufferId {
        match self {
            StreamState::PlayingAFillingB => BufferId::A,
            StreamState::PlayingBFillingA => BufferId::B,
        }
    }

    pub fn fill_target(&self) -> BufferId {
        match self {
            StreamState::PlayingAFillingB => BufferId::B,
            StreamState::PlayingBFillingA => BufferId::A,
        }
    }

    fn flipped(&self) -> StreamState {
        match self {
            StreamState::PlayingAFillingB => StreamState::PlayingBFillingA,
            StreamState::PlayingBFillingA => StreamState::PlayingAFillingB,
        }
    }
}

/// The two fixed-size stream buffers and their swap state machine.
pub struct BufferPair {
    a: Box<[u16]>,
    b: Box<[u16]>,
    state: StreamState,
    sample_rate: u32,
}

impl BufferPair {
    /// Creates two zeroed buffers of `capacity` code words.
    pub fn new(capacity: usize, sample_rate: u32) -> Self {
        BufferPair {
            a: vec![0; capacity].into_boxed_slice(),
            b: vec![0; capacity].into_boxed_slice(),
            state: StreamState::PlayingAFillingB,
            sample_rate,
        }
    }

    pub fn capacity(&self) -> usize {
        self.a.len()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn buffer(&self, id: BufferId) -> &[u16] {
        match id {
            BufferId::A => &self.a,
            BufferId::B => &self.b,
        }
    }

    /// The buffer the transport is playing.
    pub fn live(&self) -> &[u16] {
        self.buffer(self.state.live())
    }

    /// How long the transport takes to play one buffer, and so the refill budget.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.capacity() as u64) / self.sample_rate.max(1)
    }

    /// Silences both buffers, fills A then B, and starts the transport on A.
    pub fn prime<F, T>(&mut self, filler: &mut F, transport: &mut T)
    where
        F: BufferFiller + ?Sized,
        T: Transport + ?Sized,
    {
        self.a.fill(0);
        self.b.fill(0);
        filler.fill_buffer(&mut self.a);
        filler.fill_buffer(&mut self.b);

        self.state = StreamState::PlayingAFillingB;
        transport.repoint(BufferId::A, &self.a);
    }

    /// Handles the transport finishing the live buffer: the transport moves to the
    /// buffer filled last, then the buffer it just finished is refilled.
    pub fn on_buffer_exhausted<F, T>(&mut self, filler: &mut F, transport: &mut T)
    where
        F: BufferFiller + ?Sized,
        T: Transport + ?Sized,
    {
        let (next_live, refill) = match self.state {
            StreamState::PlayingAFillingB => (&self.b, &mut self.a),
            StreamState::PlayingBFillingA => (&self.a, &mut self.b),
        };

        transport.repoint(self.state.fill_target(), next_live);
        filler.fill_buffer(refill);
        self.state = self.state.flipped();
    }
}

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

//! Double-buffered streaming to a buffer-at-a-time transport.
//!
//! One buffer is live, owned by the transport, while the other is filled. The
//! transport reports when it has exhausted the live buffer; the pair then points
//! it at the buffer that was just filled and refills the old one.

mod buffer_pair;
mod clocked;
mod sink;
mod thread_priority;

pub use buffer_pair::{BufferPair, StreamState};
pub use clocked::{CancelHandle, ClockedTransport, TransportStats};
pub use sink::{CaptureSink, CodeSink, NullSink};
pub use thread_priority::{
    configure_transport_thread_priority, rt_enabled, transport_thread_priority,
};

/// One of the two stream buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferId {
    A,
    B,
}

/// The hardware side of the stream: something that plays one buffer of code words
/// at the sample rate and can be told which buffer to play next.
pub trait Transport {
    /// Points the transport at the given buffer. Only called between buffer periods.
    fn repoint(&mut self, buffer: BufferId, live: &[u16]);
}

/// Produces code words for the buffer being filled.
pub trait BufferFiller {
    fn fill_buffer(&mut self, buffer: &mut [u16]);
}

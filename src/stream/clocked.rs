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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, span, warn, Level};

use super::buffer_pair::BufferPair;
use super::sink::CodeSink;
use super::thread_priority::{
    configure_transport_thread_priority, rt_enabled, transport_thread_priority,
};
use super::{BufferFiller, BufferId, Transport};

/// Asks a running transport to stop at the end of the current buffer period.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> CancelHandle {
        CancelHandle::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

/// What a clocked transport observed while running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Buffer periods played after priming.
    pub periods: u64,
    /// Refills that took longer than one buffer period.
    pub overruns: u64,
    pub worst_refill: Duration,
}

/// A host stand-in for the converter's periodic transfer: plays the live buffer into a
/// sink once per buffer period on the wall clock, then raises the exhausted signal.
#[derive(Default)]
pub struct ClockedTransport {
    live: Option<BufferId>,
    max_periods: Option<u64>,
}

impl Transport for ClockedTransport {
    fn repoint(&mut self, buffer: BufferId, _live: &[u16]) {
        self.live = Some(buffer);
    }
}

impl ClockedTransport {
    pub fn new() -> ClockedTransport {
        ClockedTransport::default()
    }

    /// Stops after the given number of buffer periods even if never cancelled.
    pub fn with_max_periods(mut self, periods: u64) -> ClockedTransport {
        self.max_periods = Some(periods);
        self
    }

    /// The buffer the transport is currently playing.
    pub fn live(&self) -> Option<BufferId> {
        self.live
    }

    fn finished(&self, periods: u64) -> bool {
        self.max_periods.is_some_and(|max| periods >= max)
    }

    /// Primes the pair and plays it until cancelled. Blocks the calling thread, whose
    /// priority is raised for the duration.
    pub fn run<F>(
        &mut self,
        buffers: &mut BufferPair,
        filler: &mut F,
        sink: &mut dyn CodeSink,
        cancel: &CancelHandle,
    ) -> TransportStats
    where
        F: BufferFiller + ?Sized,
    {
        let span = span!(Level::INFO, "transport");
        let _enter = span.enter();

        configure_transport_thread_priority(transport_thread_priority(), rt_enabled());

        let period = buffers.deadline();
        let mut stats = TransportStats::default();

        buffers.prime(filler, self);
        info!(
            capacity = buffers.capacity(),
            period_us = period.as_micros() as u64,
            "Transport started"
        );

        let mut next_period = Instant::now();
        while !cancel.is_cancelled() && !self.finished(stats.periods) {
            next_period += period;
            spin_sleep::sleep(next_period.saturating_duration_since(Instant::now()));

            sink.consume(buffers.live());

            let refill_started = Instant::now();
            buffers.on_buffer_exhausted(filler, self);
            let refill = refill_started.elapsed();

            stats.periods += 1;
            stats.worst_refill = stats.worst_refill.max(refill);
            if refill > period {
                stats.overruns += 1;
                warn!(
                    refill_us = refill.as_micros() as u64,
                    period_us = period.as_micros() as u64,
                    "Buffer refill overran its period"
                );
            }
        }

        debug!(?stats, "Transport stopped");
        stats
    }
}

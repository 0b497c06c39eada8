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

use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use tracing::{debug, info, span, Level};

use crate::instrument::InstrumentHandle;

pub mod keyboard;

/// Controller events that drive the instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A pad was struck with the given raw strength.
    Hit { pad: u8, velocity: u16 },

    /// Starts a recording when idle, stops it when recording, clears a playing loop.
    Record,

    /// Discards the loop.
    Clear,

    /// Toggles merging live hits into the playing loop.
    Overdub,

    /// Reports the instrument status.
    Status,

    /// Stops the controller.
    Quit,
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Forwards driver events to the instrument.
pub struct Controller {
    instrument: InstrumentHandle,
    driver: Arc<dyn Driver>,
}

impl Controller {
    pub fn new(instrument: InstrumentHandle, driver: Arc<dyn Driver>) -> Controller {
        Controller { instrument, driver }
    }

    /// Dispatches events until the driver sends quit or stops. Blocks the calling thread.
    pub fn run(&self) -> Result<(), io::Error> {
        let span = span!(Level::INFO, "controller");
        let _enter = span.enter();

        let (events_tx, events_rx) = crossbeam_channel::bounded(16);
        let join_handle = self.driver.monitor_events(events_tx);

        info!("Controller started.");
        for event in events_rx.iter() {
            if !self.dispatch(event) {
                break;
            }
        }
        drop(events_rx);

        info!("Controller closing.");
        join_handle
            .join()
            .map_err(|_| io::Error::other("controller driver panicked"))?
    }

    /// Applies one event. Returns false when the controller should stop.
    pub fn dispatch(&self, event: Event) -> bool {
        debug!(?event, "Received event.");
        match event {
            Event::Hit { pad, velocity } => {
                self.instrument.report_hit(pad, velocity);
            }
            Event::Record => {
                self.instrument.toggle_record();
            }
            Event::Clear => {
                self.instrument.clear();
            }
            Event::Overdub => {
                self.instrument.toggle_overdub();
            }
            Event::Status => {
                info!(status = %self.instrument.status(), "Instrument status");
            }
            Event::Quit => return false,
        }
        true
    }
}

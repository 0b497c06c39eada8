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
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{info, span, warn, Level};

use super::Event;

const RECORD: &str = "record";
const CLEAR: &str = "clear";
const OVERDUB: &str = "overdub";
const STATUS: &str = "status";
const QUIT: &str = "quit";

/// Raw strength used when a pad is named without one; saturates any velocity curve.
const FULL_STRENGTH: u16 = u16::MAX;

/// A controller that plays the instrument from the keyboard, one command per line.
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    /// Prompts for and handles one line. Returns false once the driver should stop.
    fn monitor_io<R, W>(
        events_tx: &Sender<Event>,
        mut reader: R,
        mut writer: W,
    ) -> Result<bool, io::Error>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(
            writer,
            "Command (<pad> [velocity], {}, {}, {}, {}, {}): ",
            RECORD, CLEAR, OVERDUB, STATUS, QUIT,
        )?;
        writer.flush()?;
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            // End of input.
            Self::send(events_tx, Event::Quit)?;
            return Ok(false);
        }

        match parse_line(&input) {
            Some(event) => {
                Self::send(events_tx, event)?;
                Ok(event != Event::Quit)
            }
            None => {
                warn!(input = input.trim(), "Unrecognized input");
                Ok(true)
            }
        }
    }

    fn send(events_tx: &Sender<Event>, event: Event) -> Result<(), io::Error> {
        events_tx.send(event).map_err(io::Error::other)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a line of keyboard input. Commands may be abbreviated to their first letter.
pub fn parse_line(line: &str) -> Option<Event> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let first = words.next()?;

    if let Ok(pad) = first.parse::<u8>() {
        let velocity = match words.next() {
            Some(velocity) => velocity.parse::<u16>().ok()?,
            None => FULL_STRENGTH,
        };
        return words.next().is_none().then_some(Event::Hit { pad, velocity });
    }
    if words.next().is_some() {
        return None;
    }

    [
        (RECORD, Event::Record),
        (CLEAR, Event::Clear),
        (OVERDUB, Event::Overdub),
        (STATUS, Event::Status),
        (QUIT, Event::Quit),
    ]
    .into_iter()
    .find(|(name, _)| *name == first || (first.len() == 1 && name.starts_with(first)))
    .map(|(_, event)| event)
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        thread::spawn(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            while Self::monitor_io(&events_tx, io::stdin().lock(), io::stdout())? {}
            Ok(())
        })
    }
}

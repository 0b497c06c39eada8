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

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::warn;

/// A foreground request, applied by the engine at the start of a buffer fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// A pad was struck with the given raw strength.
    Hit { drum_id: u8, raw_velocity: u16 },
    /// The record button was pressed.
    ToggleRecord,
    /// The clear button was pressed.
    Clear,
    /// The overdub button was pressed.
    ToggleOverdub,
}

/// Creates the bounded queue between the foreground and the audio engine.
pub fn command_queue(capacity: usize) -> (CommandSender, Receiver<Command>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (CommandSender { tx }, rx)
}

/// The foreground end of the command queue. Sending never blocks.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    /// Queues a command, returning false if it was dropped.
    pub fn send(&self, command: Command) -> bool {
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                warn!(?command, "Command queue full, dropping command");
                false
            }
            Err(TrySendError::Disconnected(command)) => {
                warn!(?command, "Audio engine is gone, dropping command");
                false
            }
        }
    }
}

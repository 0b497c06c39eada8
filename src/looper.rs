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

//! Loop recording and playback on the engine's wrapping sample clock.

use std::fmt;

mod event;
mod track;

pub use event::{Capture, LoopEvent};
pub use track::{LoopTrack, DEFAULT_CAPACITY};

/// Where a loop track is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Idle,
    Recording,
    Playing,
}

impl From<LoopState> for u8 {
    fn from(state: LoopState) -> u8 {
        match state {
            LoopState::Idle => 0,
            LoopState::Recording => 1,
            LoopState::Playing => 2,
        }
    }
}

impl From<u8> for LoopState {
    fn from(value: u8) -> LoopState {
        match value {
            1 => LoopState::Recording,
            2 => LoopState::Playing,
            _ => LoopState::Idle,
        }
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoopState::Idle => "idle",
            LoopState::Recording => "recording",
            LoopState::Playing => "playing",
        })
    }
}

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

//! The sound core of a piezo-triggered electronic drum.
//!
//! Pad hits from sensors and from a recorded loop are mixed by a polyphonic voice
//! engine into 12-bit converter code words, streamed through a pair of buffers that
//! swap on every transport completion signal.

pub mod config;
pub mod controller;
pub mod engine;
pub mod instrument;
pub mod looper;
pub mod render;
pub mod samples;
pub mod stream;
#[cfg(test)]
mod testutil;

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

/// One recorded hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopEvent {
    /// Samples since the recording started.
    pub timestamp: u32,
    pub drum_id: u8,
    /// The raw strength, normalized again on replay like a live hit.
    pub velocity: u16,
}

/// What the loop track did with a live hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    /// Not recorded.
    Live,
    /// Appended to the recording.
    Recorded,
    /// The track was full, so recording stopped at this hit.
    RecordingStopped,
    /// Merged into the playing loop, which voices it on the same sample.
    Overdubbed,
}

impl Capture {
    /// Whether the caller still has to trigger the hit itself.
    pub fn sounds_live(&self) -> bool {
        !matches!(self, Capture::Overdubbed)
    }
}

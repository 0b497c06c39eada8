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

use serde::Deserialize;

use crate::engine::{DacChannel, DacControl, DacGain};

const DEFAULT_SAMPLE_RATE: u32 = 44100;
const DEFAULT_BUFFER_SIZE: usize = 256;
const DEFAULT_VOICES: usize = 50;
const DEFAULT_COMMAND_QUEUE: usize = 256;

/// A YAML representation of the audio configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Audio {
    /// Output sample rate in Hz (default: 44100). Samples must already be at this rate.
    sample_rate: Option<u32>,

    /// Code words per stream buffer (default: 256).
    buffer_size: Option<usize>,

    /// Maximum simultaneously sounding voices (default: 50).
    voices: Option<usize>,

    /// Foreground commands that may be pending between two fills (default: 256).
    command_queue: Option<usize>,

    /// Converter control bits.
    dac: Option<Dac>,
}

/// Converter control bits.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Dac {
    channel: Option<DacChannel>,
    buffered: Option<bool>,
    gain: Option<DacGain>,
}

impl Audio {
    /// Returns the sample rate (default: 44100)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Returns the stream buffer size (default: 256)
    pub fn buffer_size(&self) -> usize {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    /// Returns the voice count (default: 50)
    pub fn voices(&self) -> usize {
        self.voices.unwrap_or(DEFAULT_VOICES)
    }

    /// Returns the command queue capacity (default: 256)
    pub fn command_queue(&self) -> usize {
        self.command_queue.unwrap_or(DEFAULT_COMMAND_QUEUE)
    }

    /// Returns the converter control bits; unset fields take the default control word.
    pub fn dac(&self) -> DacControl {
        let defaults = DacControl::default();
        match &self.dac {
            Some(dac) => DacControl {
                channel: dac.channel.unwrap_or(defaults.channel),
                buffered: dac.buffered.unwrap_or(defaults.buffered),
                gain: dac.gain.unwrap_or(defaults.gain),
                active: true,
            },
            None => defaults,
        }
    }
}

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

//! Code words for a 12-bit SPI converter with four high control bits.

use serde::Deserialize;

/// The smallest signed sample the converter can represent.
pub const MIN_SAMPLE: i32 = -2048;
/// The largest signed sample the converter can represent.
pub const MAX_SAMPLE: i32 = 2047;

const DATA_MASK: u16 = 0x0FFF;
const MIDSCALE: i32 = 2048;

const CHANNEL_B_BIT: u16 = 1 << 15;
const BUFFERED_BIT: u16 = 1 << 14;
const UNITY_GAIN_BIT: u16 = 1 << 13;
const ACTIVE_BIT: u16 = 1 << 12;

/// The converter output a code word targets.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DacChannel {
    #[default]
    A,
    B,
}

/// Output gain stage.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DacGain {
    #[default]
    Unity,
    Double,
}

/// The fixed control bits OR-ed into every code word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DacControl {
    pub channel: DacChannel,
    pub buffered: bool,
    pub gain: DacGain,
    pub active: bool,
}

impl Default for DacControl {
    /// Channel A, unbuffered reference, unity gain, output enabled (0x3000).
    fn default() -> Self {
        DacControl {
            channel: DacChannel::A,
            buffered: false,
            gain: DacGain::Unity,
            active: true,
        }
    }
}

impl DacControl {
    /// Returns the high nibble of the code word.
    pub fn bits(&self) -> u16 {
        let mut bits = 0;
        if self.channel == DacChannel::B {
            bits |= CHANNEL_B_BIT;
        }
        if self.buffered {
            bits |= BUFFERED_BIT;
        }
        if self.gain == DacGain::Unity {
            bits |= UNITY_GAIN_BIT;
        }
        if self.active {
            bits |= ACTIVE_BIT;
        }
        bits
    }

    /// Reads the control bits back out of a code word.
    pub fn from_bits(code: u16) -> DacControl {
        DacControl {
            channel: if code & CHANNEL_B_BIT != 0 {
                DacChannel::B
            } else {
                DacChannel::A
            },
            buffered: code & BUFFERED_BIT != 0,
            gain: if code & UNITY_GAIN_BIT != 0 {
                DacGain::Unity
            } else {
                DacGain::Double
            },
            active: code & ACTIVE_BIT != 0,
        }
    }

    /// Clamps a mixed sample to the signed 12-bit range and packs it into a code word.
    pub fn encode(&self, sample: i32) -> u16 {
        let clamped = sample.clamp(MIN_SAMPLE, MAX_SAMPLE);
        (((clamped + MIDSCALE) as u16) & DATA_MASK) | self.bits()
    }

    /// Returns the signed 12-bit sample carried by a code word.
    pub fn decode(code: u16) -> i16 {
        (i32::from(code & DATA_MASK) - MIDSCALE) as i16
    }
}

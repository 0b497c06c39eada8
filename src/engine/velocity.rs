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

/// The largest normalized velocity, a 12-bit fixed-point gain of just under 1.0.
pub const MAX_VELOCITY: u16 = 4095;

/// Maps raw sensor strength onto the normalized velocity range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VelocityCurve {
    base_threshold: u16,
    hardest_hit: u16,
}

impl VelocityCurve {
    /// Creates a new curve. Returns None unless `hardest_hit > base_threshold`.
    pub fn new(base_threshold: u16, hardest_hit: u16) -> Option<VelocityCurve> {
        if hardest_hit <= base_threshold {
            return None;
        }
        Some(VelocityCurve {
            base_threshold,
            hardest_hit,
        })
    }

    pub fn base_threshold(&self) -> u16 {
        self.base_threshold
    }

    pub fn hardest_hit(&self) -> u16 {
        self.hardest_hit
    }

    /// Normalizes a raw velocity: at or below the base threshold maps to 0, at or above
    /// the hardest hit maps to [`MAX_VELOCITY`], linear in between.
    pub fn normalize(&self, raw_velocity: u16) -> u16 {
        if raw_velocity <= self.base_threshold {
            return 0;
        }
        if raw_velocity >= self.hardest_hit {
            return MAX_VELOCITY;
        }

        let span = u32::from(self.hardest_hit - self.base_threshold);
        let offset = u32::from(raw_velocity - self.base_threshold);
        (offset * u32::from(MAX_VELOCITY) / span) as u16
    }
}

impl Default for VelocityCurve {
    fn default() -> Self {
        VelocityCurve {
            base_threshold: 150,
            hardest_hit: 800,
        }
    }
}

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

use crate::engine::VelocityCurve;

use super::error::ConfigError;

/// Raw sensor strengths bounding the velocity curve.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Velocity {
    /// Raw strength that maps to silence (default: 150).
    base_threshold: Option<u16>,

    /// Raw strength that maps to full volume (default: 800).
    hardest_hit: Option<u16>,
}

impl Velocity {
    pub fn curve(&self) -> Result<VelocityCurve, ConfigError> {
        let defaults = VelocityCurve::default();
        let base_threshold = self.base_threshold.unwrap_or(defaults.base_threshold());
        let hardest_hit = self.hardest_hit.unwrap_or(defaults.hardest_hit());

        VelocityCurve::new(base_threshold, hardest_hit).ok_or(ConfigError::InvalidVelocity {
            base_threshold,
            hardest_hit,
        })
    }
}

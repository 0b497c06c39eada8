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

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from parse errors without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("hardest_hit ({hardest_hit}) must be greater than base_threshold ({base_threshold})")]
    InvalidVelocity {
        base_threshold: u16,
        hardest_hit: u16,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("attenuation_shift {0} is out of range (0-15)")]
    InvalidAttenuation(u8),

    #[error("kit has no samples")]
    EmptyKit,

    #[error("kit has {0} samples, at most 256 drums are addressable")]
    TooManySamples(usize),
}

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

//! Drum sample storage for the sound core.
//!
//! This module provides:
//! - The read-only waveform type shared by every voice
//! - A repository indexed by drum identifier
//! - WAV loading into the repository at startup

mod loader;
mod repository;

pub use loader::{LoadError, SampleLoader};
pub use repository::{DrumSample, SampleRepository};

/// Loads the kit named by the configuration.
pub fn load_kit(config: &crate::config::Instrument) -> Result<SampleRepository, LoadError> {
    SampleLoader::new(config.audio().sample_rate(), config.kit().attenuation_shift())
        .load_repository(&config.sample_paths())
}

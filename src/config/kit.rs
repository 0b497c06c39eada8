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

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::ConfigError;

const DEFAULT_ATTENUATION_SHIFT: u8 = 4;
const MAX_ATTENUATION_SHIFT: u8 = 15;
const MAX_SAMPLES: usize = u8::MAX as usize + 1;

/// The drum kit: one WAV file per drum, the drum identifier being its position.
#[derive(Deserialize, Clone, Debug)]
pub struct Kit {
    /// Right shift applied to 16-bit sample data when loading (default: 4).
    attenuation_shift: Option<u8>,

    /// Sample files, relative to the configuration file.
    samples: Vec<String>,
}

impl Kit {
    /// Returns the attenuation shift (default: 4)
    pub fn attenuation_shift(&self) -> u8 {
        self.attenuation_shift.unwrap_or(DEFAULT_ATTENUATION_SHIFT)
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Resolves the sample files against the given directory.
    pub fn sample_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.samples
            .iter()
            .map(|sample| base_dir.join(sample))
            .collect()
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.attenuation_shift() > MAX_ATTENUATION_SHIFT {
            return Err(ConfigError::InvalidAttenuation(self.attenuation_shift()));
        }
        if self.samples.is_empty() {
            return Err(ConfigError::EmptyKit);
        }
        if self.samples.len() > MAX_SAMPLES {
            return Err(ConfigError::TooManySamples(self.samples.len()));
        }
        Ok(())
    }
}

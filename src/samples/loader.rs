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

//! Sample loading for the drum kit.
//!
//! Waveforms are loaded entirely into memory at startup; the sound core never
//! touches the filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::repository::{DrumSample, SampleRepository};

/// The bit depth every loaded waveform is normalized to before attenuation.
const NORMALIZED_BITS: u16 = 16;

/// Error types for sample loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("WAV error in {}: {source}", path.display())]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("{} is {found}Hz but the instrument runs at {expected}Hz", path.display())]
    SampleRateMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("{} has {channels} channels, only mono samples are supported", path.display())]
    NotMono { path: PathBuf, channels: u16 },

    #[error("{} uses an unsupported sample format ({format:?}, {bits} bits)", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        format: hound::SampleFormat,
        bits: u16,
    },

    #[error("{} contains no audio", .0.display())]
    Empty(PathBuf),

    #[error("kit has {0} samples, at most 256 drum identifiers are addressable")]
    TooManySamples(usize),
}

/// Loads WAV files into drum samples, caching by path.
pub struct SampleLoader {
    /// Cache of loaded samples by file path.
    cache: HashMap<PathBuf, DrumSample>,
    /// The sample rate the instrument plays at.
    sample_rate: u32,
    /// Right shift applied to normalized 16-bit data.
    attenuation_shift: u8,
}

impl SampleLoader {
    /// Creates a new sample loader.
    pub fn new(sample_rate: u32, attenuation_shift: u8) -> Self {
        Self {
            cache: HashMap::new(),
            sample_rate,
            attenuation_shift: attenuation_shift.min(15),
        }
    }

    /// Loads a sample from a file into memory.
    /// Returns a cached version if already loaded.
    pub fn load(&mut self, path: &Path) -> Result<DrumSample, LoadError> {
        if let Some(sample) = self.cache.get(path) {
            debug!(path = ?path, "Using cached sample");
            return Ok(sample.clone());
        }

        let wav_error = |source| LoadError::Wav {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = hound::WavReader::open(path).map_err(wav_error)?;
        let spec = reader.spec();

        if spec.sample_rate != self.sample_rate {
            return Err(LoadError::SampleRateMismatch {
                path: path.to_path_buf(),
                found: spec.sample_rate,
                expected: self.sample_rate,
            });
        }
        if spec.channels != 1 {
            return Err(LoadError::NotMono {
                path: path.to_path_buf(),
                channels: spec.channels,
            });
        }
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample > 32 {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: spec.sample_format,
                bits: spec.bits_per_sample,
            });
        }

        let bits = spec.bits_per_sample;
        let shift = self.attenuation_shift;
        let data = reader
            .samples::<i32>()
            .map(|s| s.map(|raw| (normalize(raw, bits) >> shift) as i16))
            .collect::<Result<Vec<i16>, _>>()
            .map_err(wav_error)?;

        if data.is_empty() {
            return Err(LoadError::Empty(path.to_path_buf()));
        }

        let sample = DrumSample::new(data);
        info!(
            path = ?path,
            length = sample.len(),
            duration_ms = sample.len() as u64 * 1000 / self.sample_rate as u64,
            "Loaded drum sample"
        );

        self.cache.insert(path.to_path_buf(), sample.clone());
        Ok(sample)
    }

    /// Loads every path in order; the position in `paths` becomes the drum identifier.
    pub fn load_repository(&mut self, paths: &[PathBuf]) -> Result<SampleRepository, LoadError> {
        if paths.len() > u8::MAX as usize + 1 {
            return Err(LoadError::TooManySamples(paths.len()));
        }

        let samples = paths
            .iter()
            .map(|path| self.load(path))
            .collect::<Result<Vec<DrumSample>, LoadError>>()?;
        let repository = SampleRepository::new(samples);

        info!(
            samples = repository.len(),
            memory_kb = repository.memory_size() / 1024,
            "Drum kit loaded"
        );
        Ok(repository)
    }
}

/// Scales an integer sample of the given bit depth to 16 bits.
fn normalize(raw: i32, bits: u16) -> i32 {
    if bits < NORMALIZED_BITS {
        raw << (NORMALIZED_BITS - bits)
    } else {
        raw >> (bits - NORMALIZED_BITS)
    }
}

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

use std::{
    error::Error,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::engine::TriggerSink;
use crate::samples::{DrumSample, SampleRepository};

/// Writes interleaved 16-bit samples to a WAV file in the given directory.
pub fn write_wav(
    dir: &Path,
    name: &str,
    sample_rate: u32,
    channels: u16,
    samples: &[i16],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut writer = WavWriter::create(
        &path,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;

    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    Ok(path)
}

/// Builds a repository of constant-amplitude samples, one per (length, amplitude) pair.
pub fn constant_repository(samples: &[(usize, i16)]) -> SampleRepository {
    SampleRepository::new(
        samples
            .iter()
            .map(|(length, amplitude)| DrumSample::new(vec![*amplitude; *length]))
            .collect(),
    )
}

/// A trigger sink that records every trigger it receives.
#[derive(Default)]
pub struct RecordingSink {
    pub hits: Vec<(u8, u16)>,
}

impl TriggerSink for RecordingSink {
    fn trigger(&mut self, drum_id: u8, raw_velocity: u16) {
        self.hits.push((drum_id, raw_velocity));
    }
}

/// Polls the predicate until it holds, panicking with the message after three seconds.
pub fn eventually<F>(predicate: F, error_msg: &str)
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(3);
    while !predicate() {
        if Instant::now() > deadline {
            panic!("{}", error_msg);
        }
        thread::sleep(Duration::from_millis(10));
    }
}

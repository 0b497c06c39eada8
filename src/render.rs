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

//! Offline rendering of a scripted performance.
//!
//! A script lists timed pad hits and button presses. It is played through the same
//! engine and buffer pair as the live instrument, with the transport simulated: the
//! output holds exactly the code words the converter would have received. Events land
//! on the first buffer boundary at or after their time, as they would on the device.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::{Config, File, FileFormat};
use duration_string::DurationString;
use hound::{SampleFormat, WavSpec, WavWriter};
use serde::Deserialize;
use tracing::info;

use crate::config::{self as instrument_config, ConfigError};
use crate::engine::DacControl;
use crate::instrument::{Instrument, InstrumentHandle};
use crate::samples::SampleRepository;
use crate::stream::{BufferId, Transport};

/// Silence rendered after the last event when the script sets no length.
const DEFAULT_TAIL: Duration = Duration::from_secs(1);

/// Raw strength for a hit with no velocity.
const FULL_STRENGTH: u16 = u16::MAX;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid duration {value:?}: {reason}")]
    Duration { value: String, reason: String },

    #[error("event {index}: {reason}")]
    InvalidEvent { index: usize, reason: &'static str },

    #[error("event {index} was dropped, too many events share one buffer")]
    Dropped { index: usize },

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// A button press in a script.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Record,
    Clear,
    Overdub,
}

/// One scripted event: either a hit or an action.
#[derive(Deserialize, Clone, Debug)]
pub struct ScriptEvent {
    /// When the event happens, e.g. "250ms".
    at: String,

    /// The drum to hit.
    hit: Option<u8>,

    /// The raw strength of the hit (default: full strength).
    velocity: Option<u16>,

    action: Option<Action>,
}

/// What a script event does once its time comes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Hit { drum_id: u8, raw_velocity: u16 },
    Action(Action),
}

/// A script event resolved to a sample time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimedCue {
    pub index: usize,
    pub at: u64,
    pub cue: Cue,
}

/// A performance to render.
#[derive(Deserialize, Clone, Debug)]
pub struct Script {
    /// Total render length (default: one second after the last event).
    length: Option<String>,

    #[serde(default)]
    events: Vec<ScriptEvent>,
}

impl Script {
    /// Parses a script from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Script, RenderError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(ConfigError::from)?
            .try_deserialize::<Script>()
            .map_err(ConfigError::from)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Script, RenderError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .map_err(ConfigError::from)?
            .try_deserialize::<Script>()
            .map_err(ConfigError::from)?)
    }

    /// Resolves every event to a sample time, ordered by time. Events at the same
    /// time keep their script order.
    pub fn timeline(&self, sample_rate: u32) -> Result<Vec<TimedCue>, RenderError> {
        let mut cues = self
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                Ok(TimedCue {
                    index,
                    at: to_samples(parse_duration(&event.at)?, sample_rate),
                    cue: event.cue(index)?,
                })
            })
            .collect::<Result<Vec<TimedCue>, RenderError>>()?;

        cues.sort_by_key(|cue| cue.at);
        Ok(cues)
    }

    /// The render length in samples.
    pub fn length(&self, sample_rate: u32) -> Result<u64, RenderError> {
        match &self.length {
            Some(length) => Ok(to_samples(parse_duration(length)?, sample_rate)),
            None => {
                let last = self
                    .timeline(sample_rate)?
                    .last()
                    .map(|cue| cue.at + 1)
                    .unwrap_or(0);
                Ok(last + to_samples(DEFAULT_TAIL, sample_rate))
            }
        }
    }
}

impl ScriptEvent {
    fn cue(&self, index: usize) -> Result<Cue, RenderError> {
        match (self.hit, self.action) {
            (Some(drum_id), None) => Ok(Cue::Hit {
                drum_id,
                raw_velocity: self.velocity.unwrap_or(FULL_STRENGTH),
            }),
            (None, Some(action)) => {
                if self.velocity.is_some() {
                    return Err(RenderError::InvalidEvent {
                        index,
                        reason: "velocity is only valid for hits",
                    });
                }
                Ok(Cue::Action(action))
            }
            (Some(_), Some(_)) => Err(RenderError::InvalidEvent {
                index,
                reason: "an event is either a hit or an action",
            }),
            (None, None) => Err(RenderError::InvalidEvent {
                index,
                reason: "an event needs a hit or an action",
            }),
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, RenderError> {
    DurationString::from_string(value.to_string())
        .map(Duration::from)
        .map_err(|e| RenderError::Duration {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn to_samples(duration: Duration, sample_rate: u32) -> u64 {
    (duration.as_nanos() * u128::from(sample_rate) / 1_000_000_000) as u64
}

/// The simulated transport only has to know which buffer to play.
struct OfflineTransport;

impl Transport for OfflineTransport {
    fn repoint(&mut self, _buffer: BufferId, _live: &[u16]) {}
}

/// Renders the script and returns the code words played, one per sample.
pub fn render(
    config: &instrument_config::Instrument,
    repository: Arc<SampleRepository>,
    script: &Script,
) -> Result<Vec<u16>, RenderError> {
    let sample_rate = config.audio().sample_rate();
    let cues = script.timeline(sample_rate)?;
    let length = script.length(sample_rate)? as usize;

    let (handle, mut core) = Instrument::build(config, repository)?.split();
    let buffer_size = core.buffer_size() as u64;
    let mut transport = OfflineTransport;
    let mut pending = cues.iter().peekable();
    let mut output = Vec::with_capacity(length);

    info!(
        events = cues.len(),
        samples = length,
        "Rendering script"
    );

    core.start(&mut transport);
    // Both buffers were filled while priming.
    let mut next_fill = 2 * buffer_size;
    while output.len() < length {
        output.extend_from_slice(core.live());

        while let Some(cue) = pending.next_if(|cue| cue.at <= next_fill) {
            if !send(&handle, cue.cue) {
                return Err(RenderError::Dropped { index: cue.index });
            }
        }
        core.on_buffer_exhausted(&mut transport);
        next_fill += buffer_size;
    }

    output.truncate(length);
    Ok(output)
}

fn send(handle: &InstrumentHandle, cue: Cue) -> bool {
    match cue {
        Cue::Hit {
            drum_id,
            raw_velocity,
        } => handle.report_hit(drum_id, raw_velocity),
        Cue::Action(Action::Record) => handle.toggle_record(),
        Cue::Action(Action::Clear) => handle.clear(),
        Cue::Action(Action::Overdub) => handle.toggle_overdub(),
    }
}

/// Writes code words as a mono 16-bit WAV, scaling the 12-bit samples up.
pub fn write_wav(path: &Path, codes: &[u16], sample_rate: u32) -> Result<(), RenderError> {
    let mut writer = WavWriter::create(
        path,
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;

    for code in codes {
        writer.write_sample((i32::from(DacControl::decode(*code)) << 4) as i16)?;
    }
    writer.finalize()?;

    info!(path = ?path, samples = codes.len(), "Wrote WAV file");
    Ok(())
}

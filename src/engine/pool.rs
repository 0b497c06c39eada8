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

use std::sync::Arc;

use tracing::debug;

use crate::samples::{DrumSample, SampleRepository};

use super::velocity::VelocityCurve;
use super::TriggerSink;

/// One polyphonic playback slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Voice {
    active: bool,
    drum_id: u8,
    position: u32,
    velocity: u16,
}

impl Voice {
    fn started(drum_id: u8, velocity: u16) -> Voice {
        Voice {
            active: true,
            drum_id,
            position: 0,
            velocity,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn drum_id(&self) -> u8 {
        self.drum_id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn velocity(&self) -> u16 {
        self.velocity
    }

    /// Plays one sample of the waveform and returns its scaled contribution. The voice
    /// deactivates once its position reaches the end of the waveform.
    fn advance(&mut self, sample: &DrumSample) -> i32 {
        let Some(amplitude) = sample.amplitude(self.position) else {
            self.active = false;
            return 0;
        };

        self.position += 1;
        if self.position >= sample.len() {
            self.active = false;
        }
        (i32::from(amplitude) * i32::from(self.velocity)) >> 12
    }
}

/// A fixed set of voices sharing one sample repository.
pub struct VoicePool {
    voices: Box<[Voice]>,
    repository: Arc<SampleRepository>,
    curve: VelocityCurve,
}

impl VoicePool {
    /// Creates a pool with `capacity` silent voices.
    pub fn new(capacity: usize, repository: Arc<SampleRepository>, curve: VelocityCurve) -> Self {
        VoicePool {
            voices: vec![Voice::default(); capacity].into_boxed_slice(),
            repository,
            curve,
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|voice| voice.active).count()
    }

    /// Returns true if the repository holds a playable sample for the drum.
    pub fn plays(&self, drum_id: u8) -> bool {
        self.repository.sample_for(drum_id).is_some()
    }

    pub fn curve(&self) -> VelocityCurve {
        self.curve
    }

    /// Starts a drum sample. Unknown drums are ignored. When every voice is sounding,
    /// the one furthest into its sample is restarted for the new hit.
    pub fn trigger(&mut self, drum_id: u8, raw_velocity: u16) {
        if !self.plays(drum_id) {
            debug!(drum_id, "Ignoring trigger for unknown drum");
            return;
        }
        let Some(slot) = self.free_slot().or_else(|| self.steal_slot()) else {
            return;
        };

        self.voices[slot] = Voice::started(drum_id, self.curve.normalize(raw_velocity));
    }

    fn free_slot(&self) -> Option<usize> {
        self.voices.iter().position(|voice| !voice.active)
    }

    /// The voice with the largest position, the lowest index among ties.
    fn steal_slot(&self) -> Option<usize> {
        let slot = self
            .voices
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, voice)| voice.position)
            .map(|(slot, _)| slot)?;

        debug!(
            slot,
            drum_id = self.voices[slot].drum_id,
            position = self.voices[slot].position,
            "Stealing voice"
        );
        Some(slot)
    }

    /// Advances every active voice by one sample and returns the unclamped sum.
    pub fn mix_sample(&mut self) -> i32 {
        let mut accumulator = 0i32;
        for voice in self.voices.iter_mut().filter(|voice| voice.active) {
            match self.repository.sample_for(voice.drum_id) {
                Some(sample) => accumulator += voice.advance(sample),
                None => voice.active = false,
            }
        }
        accumulator
    }
}

impl TriggerSink for VoicePool {
    fn trigger(&mut self, drum_id: u8, raw_velocity: u16) {
        VoicePool::trigger(self, drum_id, raw_velocity);
    }
}

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

use super::codec::DacControl;
use super::pool::VoicePool;

/// Reduces the active voices into converter code words.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mixer {
    control: DacControl,
}

impl Mixer {
    pub fn new(control: DacControl) -> Self {
        Mixer { control }
    }

    pub fn control(&self) -> DacControl {
        self.control
    }

    /// Mixes one sample of every active voice into a code word.
    #[inline]
    pub fn advance_one_sample(&self, pool: &mut VoicePool) -> u16 {
        self.control.encode(pool.mix_sample())
    }

    /// Fills every slot of the buffer in order.
    pub fn fill_buffer(&self, pool: &mut VoicePool, buffer: &mut [u16]) {
        for slot in buffer.iter_mut() {
            *slot = self.advance_one_sample(pool);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::codec::{MAX_SAMPLE, MIN_SAMPLE};
    use crate::engine::velocity::VelocityCurve;
    use crate::testutil::constant_repository;

    fn pool(capacity: usize, samples: &[(usize, i16)]) -> VoicePool {
        VoicePool::new(
            capacity,
            Arc::new(constant_repository(samples)),
            VelocityCurve::default(),
        )
    }

    #[test]
    fn test_silence_is_midscale() {
        let mixer = Mixer::default();
        let mut pool = pool(4, &[(8, 1000)]);
        let mut buffer = [0u16; 8];
        mixer.fill_buffer(&mut pool, &mut buffer);
        assert!(buffer.iter().all(|code| *code == 0x3800));
    }

    #[test]
    fn test_mix_clamps_to_12_bits() {
        let mixer = Mixer::default();
        let mut loud = pool(8, &[(4, i16::MAX), (4, i16::MIN)]);
        for _ in 0..8 {
            loud.trigger(0, 800);
        }
        assert_eq!(
            DacControl::decode(mixer.advance_one_sample(&mut loud)),
            MAX_SAMPLE as i16
        );

        let mut quiet = pool(8, &[(4, i16::MAX), (4, i16::MIN)]);
        for _ in 0..8 {
            quiet.trigger(1, 800);
        }
        assert_eq!(
            DacControl::decode(mixer.advance_one_sample(&mut quiet)),
            MIN_SAMPLE as i16
        );
    }

    #[test]
    fn test_every_code_word_carries_control_bits() {
        let mixer = Mixer::default();
        let mut pool = pool(4, &[(64, 30000), (32, -30000)]);
        pool.trigger(0, 800);
        pool.trigger(1, 300);
        pool.trigger(0, 500);
        let mut buffer = [0u16; 64];
        mixer.fill_buffer(&mut pool, &mut buffer);
        assert!(buffer.iter().all(|code| code & 0xF000 == 0x3000));
    }

    #[test]
    fn test_two_drums_offset_by_four_samples() {
        let mixer = Mixer::default();
        let mut pool = VoicePool::new(
            4,
            Arc::new(constant_repository(&[(16, 400), (8, 200)])),
            VelocityCurve::default(),
        );
        let mut buffer = [0u16; 256];

        pool.trigger(0, 800);
        mixer.fill_buffer(&mut pool, &mut buffer[..4]);
        pool.trigger(1, 800);
        mixer.fill_buffer(&mut pool, &mut buffer[4..]);

        let decoded: Vec<i16> = buffer.iter().map(|code| DacControl::decode(*code)).collect();
        // (400 * 4095) >> 12 = 399, (200 * 4095) >> 12 = 199
        assert_eq!(&decoded[0..4], &[399; 4]);
        assert_eq!(&decoded[4..12], &[598; 8]);
        assert_eq!(&decoded[12..16], &[399; 4]);
        assert!(decoded[16..].iter().all(|sample| *sample == 0));

        let voices = pool.voices();
        assert!(!voices[0].is_active());
        assert_eq!(voices[0].position(), 16);
        assert!(!voices[1].is_active());
        assert_eq!(voices[1].position(), 8);
    }
}

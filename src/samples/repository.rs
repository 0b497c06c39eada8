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

/// A read-only drum waveform.
/// The data is stored in an Arc so every voice playing it shares one copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrumSample {
    data: Arc<[i16]>,
}

impl DrumSample {
    /// Creates a new drum sample from signed amplitudes.
    pub fn new(data: impl Into<Arc<[i16]>>) -> Self {
        Self { data: data.into() }
    }

    /// Returns the amplitude at the given position, if it is inside the waveform.
    #[inline]
    pub fn amplitude(&self, position: u32) -> Option<i16> {
        self.data.get(position as usize).copied()
    }

    /// Returns the number of amplitudes in the waveform.
    #[inline]
    pub fn len(&self) -> u32 {
        self.data.len() as u32
    }

    /// Returns true if the waveform holds no amplitudes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw amplitudes.
    pub fn data(&self) -> &[i16] {
        &self.data
    }

    /// Returns the memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<i16>()
    }
}

/// The immutable collection of drum samples, one per drum identifier.
#[derive(Clone, Debug, Default)]
pub struct SampleRepository {
    samples: Vec<DrumSample>,
}

impl SampleRepository {
    /// Creates a repository where each sample's index is its drum identifier.
    pub fn new(samples: Vec<DrumSample>) -> Self {
        Self { samples }
    }

    /// Creates a repository directly from raw waveforms.
    pub fn from_waveforms<I, W>(waveforms: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<Arc<[i16]>>,
    {
        Self::new(waveforms.into_iter().map(DrumSample::new).collect())
    }

    /// Looks up the sample for a drum identifier.
    /// Unknown identifiers and empty waveforms both yield no sample.
    #[inline]
    pub fn sample_for(&self, drum_id: u8) -> Option<&DrumSample> {
        self.samples
            .get(drum_id as usize)
            .filter(|sample| !sample.is_empty())
    }

    /// Returns the number of drum identifiers in the repository.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the repository holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterates over all samples in drum identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &DrumSample> {
        self.samples.iter()
    }

    /// Returns the total memory used by all waveforms in bytes.
    pub fn memory_size(&self) -> usize {
        self.samples.iter().map(DrumSample::memory_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_for_known_and_unknown_ids() {
        let repository = SampleRepository::from_waveforms([vec![1i16, 2, 3], vec![4i16]]);

        assert_eq!(repository.len(), 2);
        assert_eq!(repository.sample_for(0).map(DrumSample::len), Some(3));
        assert_eq!(repository.sample_for(1).map(DrumSample::len), Some(1));
        assert!(repository.sample_for(2).is_none());
        assert!(repository.sample_for(255).is_none());
    }

    #[test]
    fn test_empty_waveform_is_no_sample() {
        let repository = SampleRepository::from_waveforms([Vec::<i16>::new()]);
        assert!(repository.sample_for(0).is_none());
    }

    #[test]
    fn test_samples_are_shared() {
        let sample = DrumSample::new(vec![10i16, -10]);
        let clone = sample.clone();
        assert!(std::ptr::eq(sample.data().as_ptr(), clone.data().as_ptr()));
        assert_eq!(sample.amplitude(1), Some(-10));
        assert_eq!(sample.amplitude(2), None);
        assert_eq!(sample.memory_size(), 4);
    }
}

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

use parking_lot::Mutex;

/// Receives each buffer of code words as the transport finishes playing it.
pub trait CodeSink: Send {
    fn consume(&mut self, codes: &[u16]);
}

/// Discards everything.
#[derive(Default)]
pub struct NullSink;

impl CodeSink for NullSink {
    fn consume(&mut self, _codes: &[u16]) {}
}

/// Keeps every code word played, readable from another thread.
#[derive(Clone, Default)]
pub struct CaptureSink {
    codes: Arc<Mutex<Vec<u16>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.codes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.lock().is_empty()
    }

    /// Takes the captured code words, leaving the capture empty.
    pub fn take(&self) -> Vec<u16> {
        std::mem::take(&mut *self.codes.lock())
    }
}

impl CodeSink for CaptureSink {
    fn consume(&mut self, codes: &[u16]) {
        self.codes.lock().extend_from_slice(codes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_shared() {
        let capture = CaptureSink::new();
        let mut sink = capture.clone();
        sink.consume(&[1, 2]);
        sink.consume(&[3]);

        assert_eq!(capture.len(), 3);
        assert_eq!(capture.take(), vec![1, 2, 3]);
        assert!(capture.is_empty());
    }
}

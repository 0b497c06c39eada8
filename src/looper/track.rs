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

use tracing::debug;

use crate::engine::TriggerSink;

use super::event::{Capture, LoopEvent};
use super::LoopState;

/// The number of events a loop track holds by default.
pub const DEFAULT_CAPACITY: usize = 1000;

/// A bounded, single-layer loop of drum hits.
///
/// Timestamps are relative to the first hit of the recording. Playback maps the
/// absolute sample clock onto a position within the loop and fires the events that
/// fall between the previous tick's position (exclusive) and the current one
/// (inclusive). Ticks are expected once per sample; see [`LoopTrack::tick`].
#[derive(Debug)]
pub struct LoopTrack<const N: usize = DEFAULT_CAPACITY> {
    events: heapless::Vec<LoopEvent, N>,
    state: LoopState,
    /// Absolute sample time of the first hit of the recording.
    record_start: Option<u32>,
    loop_length: u32,
    last_position: u32,
    overdub: bool,
}

impl<const N: usize> LoopTrack<N> {
    /// Creates an empty track with the given initial overdub mode.
    pub fn new(overdub: bool) -> Self {
        LoopTrack {
            events: heapless::Vec::new(),
            state: LoopState::Idle,
            record_start: None,
            loop_length: 0,
            last_position: 0,
            overdub,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == LoopState::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.state == LoopState::Playing
    }

    /// The loop length in samples, zero unless playing.
    pub fn loop_length(&self) -> u32 {
        self.loop_length
    }

    pub fn events(&self) -> &[LoopEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn overdub(&self) -> bool {
        self.overdub
    }

    pub fn set_overdub(&mut self, overdub: bool) {
        self.overdub = overdub;
    }

    /// Flips overdub mode and returns the new value.
    pub fn toggle_overdub(&mut self) -> bool {
        self.overdub = !self.overdub;
        debug!(overdub = self.overdub, "Toggled overdub");
        self.overdub
    }

    /// Discards any loop and starts a new recording. The loop's start is latched by
    /// the first hit.
    pub fn start_recording(&mut self) {
        self.reset();
        self.state = LoopState::Recording;
        debug!("Loop recording started");
    }

    /// Ends the recording at the given absolute sample time and starts playback.
    /// A recording without hits, or one stopped on the sample of its only hit,
    /// returns to idle instead.
    pub fn stop_recording(&mut self, now: u32) {
        if self.state != LoopState::Recording {
            return;
        }

        let loop_length = match self.record_start {
            Some(start) if !self.events.is_empty() => now.wrapping_sub(start),
            _ => 0,
        };
        if loop_length == 0 {
            debug!("Loop recording stopped without a loop");
            self.reset();
            return;
        }

        self.loop_length = loop_length;
        self.last_position = 0;
        self.state = LoopState::Playing;
        debug!(
            loop_length,
            events = self.events.len(),
            "Loop recording stopped, playing"
        );
    }

    /// Returns the track to idle, discarding all events. Overdub mode is kept.
    pub fn clear(&mut self) {
        self.reset();
        debug!("Loop cleared");
    }

    /// Handles a record button press: idle starts a recording, recording stops it,
    /// and playing clears the loop.
    pub fn toggle_record(&mut self, now: u32) {
        match self.state {
            LoopState::Idle => self.start_recording(),
            LoopState::Recording => self.stop_recording(now),
            LoopState::Playing => self.clear(),
        }
    }

    /// Offers a live hit at the given absolute sample time to the track.
    pub fn add_event(&mut self, drum_id: u8, velocity: u16, now: u32) -> Capture {
        match self.state {
            LoopState::Recording => self.record(drum_id, velocity, now),
            LoopState::Playing if self.overdub => self.merge(drum_id, velocity, now),
            _ => Capture::Live,
        }
    }

    fn record(&mut self, drum_id: u8, velocity: u16, now: u32) -> Capture {
        let start = *self.record_start.get_or_insert(now);
        let event = LoopEvent {
            timestamp: now.wrapping_sub(start),
            drum_id,
            velocity,
        };

        if self.events.push(event).is_err() {
            debug!(capacity = N, "Loop track full, stopping recording");
            self.stop_recording(now);
            return Capture::RecordingStopped;
        }
        Capture::Recorded
    }

    /// Inserts the hit at its current loop position, after any events already there.
    fn merge(&mut self, drum_id: u8, velocity: u16, now: u32) -> Capture {
        let (Some(start), true) = (self.record_start, self.loop_length > 0) else {
            return Capture::Live;
        };

        let timestamp = now.wrapping_sub(start) % self.loop_length;
        let index = self
            .events
            .iter()
            .position(|event| event.timestamp > timestamp)
            .unwrap_or(self.events.len());
        let event = LoopEvent {
            timestamp,
            drum_id,
            velocity,
        };

        if self.events.insert(index, event).is_err() {
            debug!(capacity = N, "Loop track full, hit not overdubbed");
            return Capture::Live;
        }
        Capture::Overdubbed
    }

    /// Advances playback to the given absolute sample time, triggering every event
    /// passed since the previous tick.
    ///
    /// When the position has not moved since the previous tick, only an event exactly
    /// at that position fires. Ticking less often than once per sample is safe as long
    /// as the clock never advances by a whole number of loops between ticks.
    pub fn tick<S: TriggerSink + ?Sized>(&mut self, now: u32, sink: &mut S) {
        if self.state != LoopState::Playing || self.loop_length == 0 || self.events.is_empty() {
            return;
        }
        let Some(start) = self.record_start else {
            return;
        };

        let current = now.wrapping_sub(start) % self.loop_length;
        let last = self.last_position;

        for event in &self.events {
            let fires = if last < current {
                event.timestamp > last && event.timestamp <= current
            } else if current < last {
                event.timestamp > last || event.timestamp <= current
            } else {
                event.timestamp == current
            };

            if fires {
                sink.trigger(event.drum_id, event.velocity);
            }
        }

        self.last_position = current;
    }

    fn reset(&mut self) {
        self.events.clear();
        self.state = LoopState::Idle;
        self.record_start = None;
        self.loop_length = 0;
        self.last_position = 0;
    }
}

impl<const N: usize> Default for LoopTrack<N> {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::RecordingSink;

    /// Records hits at relative times 0, 3 and 9 starting at sample 1000 and stops at 1010.
    fn ten_sample_loop() -> LoopTrack {
        let mut track = LoopTrack::new(false);
        track.start_recording();
        assert_eq!(track.add_event(0, 100, 1000), Capture::Recorded);
        assert_eq!(track.add_event(1, 200, 1003), Capture::Recorded);
        assert_eq!(track.add_event(2, 300, 1009), Capture::Recorded);
        track.stop_recording(1010);
        track
    }

    fn tick_range<const N: usize>(
        track: &mut LoopTrack<N>,
        range: std::ops::Range<u32>,
    ) -> Vec<(u8, u16)> {
        let mut sink = RecordingSink::default();
        for now in range {
            track.tick(now, &mut sink);
        }
        sink.hits
    }

    #[test]
    fn test_recording_round_trip() {
        let mut track = ten_sample_loop();
        assert_eq!(track.state(), LoopState::Playing);
        assert_eq!(track.loop_length(), 10);
        assert_eq!(
            track.events().iter().map(|e| e.timestamp).collect::<Vec<_>>(),
            vec![0, 3, 9]
        );

        let hits = tick_range(&mut track, 1010..1020);
        assert_eq!(hits, vec![(0, 100), (1, 200), (2, 300)]);
    }

    #[test]
    fn test_events_fire_once_across_loop_boundary() {
        let mut track = ten_sample_loop();
        tick_range(&mut track, 1010..1015);

        let hits = tick_range(&mut track, 1015..1025);
        assert_eq!(hits, vec![(2, 300), (0, 100), (1, 200)]);

        let hits = tick_range(&mut track, 1025..1125);
        assert_eq!(hits.len(), 30);
    }

    #[test]
    fn test_coarse_ticks_within_a_lap() {
        let mut track = ten_sample_loop();
        let mut sink = RecordingSink::default();

        track.tick(1010, &mut sink);
        track.tick(1015, &mut sink);
        assert_eq!(sink.hits, vec![(0, 100), (1, 200)]);

        track.tick(1022, &mut sink);
        assert_eq!(sink.hits, vec![(0, 100), (1, 200), (0, 100), (2, 300)]);
    }

    #[test]
    fn test_whole_lap_between_ticks_only_fires_coincident_event() {
        let mut track = ten_sample_loop();
        let mut sink = RecordingSink::default();

        track.tick(1010, &mut sink);
        track.tick(1020, &mut sink);
        assert_eq!(sink.hits, vec![(0, 100), (0, 100)]);

        // From position 3 back to position 3: the events at 9 and 0 are skipped.
        track.tick(1023, &mut sink);
        track.tick(1033, &mut sink);
        assert_eq!(&sink.hits[2..], &[(1, 200), (1, 200)]);
    }

    #[test]
    fn test_stop_without_events_is_idle() {
        let mut track: LoopTrack = LoopTrack::new(false);
        track.start_recording();
        track.stop_recording(5000);
        assert_eq!(track.state(), LoopState::Idle);
        assert_eq!(track.loop_length(), 0);

        let hits = tick_range(&mut track, 5000..5100);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_stop_on_first_hit_sample_is_idle() {
        let mut track: LoopTrack = LoopTrack::new(false);
        track.start_recording();
        track.add_event(0, 100, 42);
        track.stop_recording(42);
        assert_eq!(track.state(), LoopState::Idle);
        assert!(track.is_empty());
    }

    #[test]
    fn test_loop_starts_at_first_hit() {
        let mut track: LoopTrack = LoopTrack::new(false);
        track.start_recording();
        track.add_event(4, 100, 500);
        track.add_event(5, 100, 600);
        track.stop_recording(700);
        assert_eq!(track.loop_length(), 200);
        assert_eq!(track.events()[0].timestamp, 0);
        assert_eq!(track.events()[1].timestamp, 100);
    }

    #[test]
    fn test_hits_outside_recording_are_live() {
        let mut track: LoopTrack = LoopTrack::new(false);
        assert_eq!(track.add_event(0, 100, 10), Capture::Live);
        assert!(track.is_empty());

        let mut track = ten_sample_loop();
        assert_eq!(track.add_event(0, 100, 2000), Capture::Live);
        assert_eq!(track.len(), 3);
    }

    #[test]
    fn test_start_recording_discards_playing_loop() {
        let mut track = ten_sample_loop();
        track.start_recording();
        assert_eq!(track.state(), LoopState::Recording);
        assert!(track.is_empty());
        assert_eq!(track.loop_length(), 0);
    }

    #[test]
    fn test_full_track_stops_recording() {
        let mut track: LoopTrack<4> = LoopTrack::new(false);
        track.start_recording();
        for i in 0..4 {
            assert_eq!(track.add_event(0, 100, 100 + i * 10), Capture::Recorded);
        }
        assert_eq!(track.add_event(1, 100, 150), Capture::RecordingStopped);

        assert_eq!(track.state(), LoopState::Playing);
        assert_eq!(track.len(), 4);
        assert_eq!(track.loop_length(), 50);
        assert_eq!(track.add_event(1, 100, 160), Capture::Live);
    }

    #[test]
    fn test_record_start_near_clock_wrap() {
        let mut track: LoopTrack = LoopTrack::new(false);
        let start = u32::MAX - 5;
        track.start_recording();
        track.add_event(0, 100, start);
        track.add_event(1, 100, start.wrapping_add(8));
        track.stop_recording(start.wrapping_add(10));
        assert_eq!(track.loop_length(), 10);
        assert_eq!(track.events()[1].timestamp, 8);

        let mut sink = RecordingSink::default();
        let mut now = start.wrapping_add(10);
        for _ in 0..30 {
            track.tick(now, &mut sink);
            now = now.wrapping_add(1);
        }
        assert_eq!(
            sink.hits.iter().map(|(drum, _)| *drum).collect::<Vec<_>>(),
            vec![0, 1, 0, 1, 0, 1]
        );
    }

    #[test]
    fn test_toggle_record_cycle() {
        let mut track: LoopTrack = LoopTrack::new(false);
        track.toggle_record(0);
        assert_eq!(track.state(), LoopState::Recording);
        track.add_event(0, 100, 10);
        track.toggle_record(30);
        assert_eq!(track.state(), LoopState::Playing);
        track.toggle_record(40);
        assert_eq!(track.state(), LoopState::Idle);
        assert!(track.is_empty());
    }

    #[test]
    fn test_overdub_merges_in_order() {
        let mut track = ten_sample_loop();
        assert!(track.toggle_overdub());
        tick_range(&mut track, 1010..1015);

        // 1015 is position 5 in the loop.
        assert_eq!(track.add_event(7, 50, 1015), Capture::Overdubbed);
        // 1023 is position 3, after the event already there.
        assert_eq!(track.add_event(8, 60, 1023), Capture::Overdubbed);

        let timeline: Vec<(u32, u8)> = track
            .events()
            .iter()
            .map(|e| (e.timestamp, e.drum_id))
            .collect();
        assert_eq!(timeline, vec![(0, 0), (3, 1), (3, 8), (5, 7), (9, 2)]);
    }

    #[test]
    fn test_overdub_hit_fires_on_its_own_sample() {
        let mut track = ten_sample_loop();
        track.set_overdub(true);
        tick_range(&mut track, 1010..1015);

        track.add_event(7, 50, 1015);
        let mut sink = RecordingSink::default();
        track.tick(1015, &mut sink);
        assert_eq!(sink.hits, vec![(7, 50)]);
    }

    #[test]
    fn test_overdub_on_full_track_is_live() {
        let mut track: LoopTrack<2> = LoopTrack::new(true);
        track.start_recording();
        track.add_event(0, 100, 0);
        track.add_event(0, 100, 5);
        track.stop_recording(10);
        assert_eq!(track.add_event(1, 100, 12), Capture::Live);
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn test_clear_keeps_overdub_mode() {
        let mut track = ten_sample_loop();
        track.set_overdub(true);
        track.clear();
        assert_eq!(track.state(), LoopState::Idle);
        assert!(track.overdub());
        assert!(tick_range(&mut track, 0..100).is_empty());
    }
}

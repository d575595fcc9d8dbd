//! History window keyed by absolute stream offsets.
//!
//! The window models the tail of an ever-growing decoded byte stream. It is
//! always full: it starts as `capacity` empty slots, and every `push_beat`
//! appends exactly `beat_width` slots while evicting the oldest `beat_width`.
//!
//! # Invariants
//! - `capacity == tail + beat_width` where `tail` is the longest pattern
//!   length minus one.
//! - Logical index 0 is the oldest slot, `capacity - 1` the newest; the slot
//!   at logical index `i` lives at `(head + i) % capacity`.
//! - `bytes_seen` counts every lane pushed so far (valid or not), so the
//!   logical index `i` maps to stream offset `bytes_seen + i - capacity`.
//!
//! # Layout
//! Slots live in a circular `Vec<DecodedByte>`. Since the window is always
//! full, appending a beat overwrites the `beat_width` oldest physical slots in
//! place and advances `head`: O(beat_width) per beat instead of shifting all
//! `capacity` entries down.

use super::decode::DecodedByte;

/// Fixed-capacity sliding window over decoded bytes.
#[derive(Clone, Debug)]
pub(crate) struct HistoryWindow {
    slots: Vec<DecodedByte>,
    head: usize,
    beat_width: usize,
    bytes_seen: u64,
}

impl HistoryWindow {
    /// Creates an all-empty window holding `tail` bytes of history plus one
    /// beat.
    ///
    /// # Panics
    /// Panics if `beat_width == 0`.
    pub(crate) fn new(tail: usize, beat_width: usize) -> Self {
        assert!(beat_width > 0, "HistoryWindow beat_width must be > 0");
        Self {
            slots: vec![DecodedByte::EMPTY; tail + beat_width],
            head: 0,
            beat_width,
            bytes_seen: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Logical index of the first slot of the newest beat.
    #[inline]
    pub(crate) fn tail(&self) -> usize {
        self.slots.len() - self.beat_width
    }

    #[inline]
    pub(crate) fn bytes_seen(&self) -> u64 {
        self.bytes_seen
    }

    /// Slot at logical index `idx` (0 = oldest).
    #[inline(always)]
    pub(crate) fn get(&self, idx: usize) -> DecodedByte {
        debug_assert!(idx < self.slots.len());
        let mut phys = self.head + idx;
        if phys >= self.slots.len() {
            phys -= self.slots.len();
        }
        self.slots[phys]
    }

    /// Absolute stream offset of logical index `idx`, or `None` for slots
    /// that predate the stream.
    pub(crate) fn stream_offset_of(&self, idx: usize) -> Option<u64> {
        (self.bytes_seen + idx as u64).checked_sub(self.slots.len() as u64)
    }

    /// Appends one decoded beat, evicting the oldest `beat_width` slots.
    pub(crate) fn push_beat(&mut self, beat: &[DecodedByte]) {
        debug_assert_eq!(beat.len(), self.beat_width);
        let cap = self.slots.len();
        // The oldest `beat_width` slots start at `head`; they become the newest.
        let first = (cap - self.head).min(beat.len());
        self.slots[self.head..self.head + first].copy_from_slice(&beat[..first]);
        if beat.len() > first {
            self.slots[..beat.len() - first].copy_from_slice(&beat[first..]);
        }
        self.head = (self.head + beat.len()) % cap;
        self.bytes_seen = self.bytes_seen.saturating_add(beat.len() as u64);
    }

    /// Returns the window to its stream-start state.
    pub(crate) fn reset(&mut self) {
        self.slots.fill(DecodedByte::EMPTY);
        self.head = 0;
        self.bytes_seen = 0;
    }
}

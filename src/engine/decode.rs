//! Byte decoding for the history window.
//!
//! A decoded byte is either a concrete value or *empty*. Empty slots come from
//! the zero-filled window at stream start and from lanes whose validity bit
//! is clear; they never equal any literal, so masked or pre-stream bytes
//! cannot take part in a match.

use crate::api::Beat;

/// A byte that is either a concrete value or empty.
///
/// Stored as `value + 1`, so the all-zero representation is empty and a
/// zero-filled window needs no special initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecodedByte(u16);

impl DecodedByte {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn new(value: u8) -> Self {
        Self(value as u16 + 1)
    }

    /// True iff this slot holds exactly `literal`.
    #[inline(always)]
    pub const fn matches(self, literal: u8) -> bool {
        self.0 == literal as u16 + 1
    }

    #[inline]
    pub const fn value(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some((self.0 - 1) as u8)
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Decodes every lane of `beat` into `out`, returning the number of valid
/// lanes.
///
/// `out.len()` is the engine's beat width. Lanes past `beat.data`, or with a
/// clear keep bit, decode as empty; data past `out.len()` is ignored.
pub(crate) fn decode_beat(beat: &Beat<'_>, out: &mut [DecodedByte]) -> usize {
    debug_assert!(
        beat.data.len() <= out.len(),
        "beat carries {} bytes but the engine is {} wide",
        beat.data.len(),
        out.len()
    );
    let mut valid = 0;
    for (lane, slot) in out.iter_mut().enumerate() {
        *slot = if beat.lane_valid(lane) {
            valid += 1;
            DecodedByte::new(beat.data[lane])
        } else {
            DecodedByte::EMPTY
        };
    }
    valid
}

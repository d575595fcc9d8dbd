//! Small arithmetic helpers for per-beat counters.
//!
//! Counters saturate at `MAX` instead of wrapping; a long-running stream
//! should pin its totals, not reset them to small numbers.

/// Saturating add for a `u64` counter.
#[inline(always)]
pub fn sat_add_u64(counter: &mut u64, delta: u64) {
    *counter = counter.saturating_add(delta);
}

/// Saturating increment for a `u64` counter.
#[inline(always)]
pub fn sat_inc_u64(counter: &mut u64) {
    sat_add_u64(counter, 1);
}

/// High-water-mark update for a `u64` counter.
#[inline(always)]
pub fn max_u64(counter: &mut u64, value: u64) {
    *counter = (*counter).max(value);
}

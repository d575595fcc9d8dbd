//! Stream harness: framing byte buffers into beats, driving an engine, and a
//! slow reference matcher for differential checks.
//!
//! Framing mirrors the transport the engine sits behind:
//! - Beats are `beat_width` lanes; the final beat may be short, and its
//!   missing lanes have clear keep bits.
//! - `last` is set on the final beat of the buffer only.
//! - Every beat carries the same destination tag.
//!
//! The reference matcher recomputes each beat's payload straight from the
//! whole buffer (no window, no decoding) using the same overwrite policy, so
//! any disagreement with the engine points at window or alignment bugs.

use crate::api::{Beat, OutputRecord, PatternId};
use crate::catalog::PatternCatalog;
use crate::engine::Engine;

/// Splits `bytes` into beats of `beat_width` lanes.
///
/// Empty input yields no beats.
///
/// # Panics
/// Panics if `beat_width == 0`.
pub fn frame_beats(bytes: &[u8], beat_width: usize, dest: u16) -> Vec<Beat<'_>> {
    assert!(beat_width > 0, "beat_width must be > 0");
    let count = bytes.len().div_ceil(beat_width);
    bytes
        .chunks(beat_width)
        .enumerate()
        .map(|(i, chunk)| Beat::full(chunk, dest).with_last(i + 1 == count))
        .collect()
}

/// Feeds `beats` through `engine` in order, one record per beat.
pub fn scan_stream(engine: &mut Engine, beats: &[Beat<'_>]) -> Vec<OutputRecord> {
    beats.iter().map(|b| engine.process_beat(b)).collect()
}

/// Non-zero payloads with their beat index, in stream order.
pub fn matched_ids(records: &[OutputRecord]) -> impl Iterator<Item = (usize, PatternId)> + '_ {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.match_id().map(|id| (i, id)))
}

/// Per-beat payloads computed directly from the full buffer.
///
/// Equivalent to framing `bytes` with [`frame_beats`] and running a fresh
/// engine, but without a history window.
pub fn reference_payloads(catalog: &PatternCatalog, bytes: &[u8], beat_width: usize) -> Vec<u32> {
    reference_partition_ids(catalog, bytes, beat_width)
        .into_iter()
        .map(|per_part| per_part.into_iter().flatten().last().unwrap_or(0))
        .collect()
}

/// Per-beat, per-partition winning ids computed from the full buffer.
pub fn reference_partition_ids(
    catalog: &PatternCatalog,
    bytes: &[u8],
    beat_width: usize,
) -> Vec<Vec<Option<u32>>> {
    assert!(beat_width > 0, "beat_width must be > 0");
    let beats = bytes.len().div_ceil(beat_width);
    let literals: Vec<Vec<Vec<u8>>> = catalog
        .partitions()
        .iter()
        .map(|p| (1..=p.pattern_count()).filter_map(|o| p.literal(o)).collect())
        .collect();

    (0..beats)
        .map(|b| {
            let lo = b * beat_width;
            let hi = (lo + beat_width).min(bytes.len());
            catalog
                .partitions()
                .iter()
                .zip(&literals)
                .map(|(part, lits)| {
                    let mut winner = None;
                    for (idx, lit) in lits.iter().enumerate() {
                        if ends_in(bytes, lit, lo, hi) {
                            winner = Some(part.base_offset() + idx as u32 + 1);
                        }
                    }
                    winner
                })
                .collect()
        })
        .collect()
}

/// True if non-empty `lit` ends at some offset in `[lo, hi)` of `bytes`.
fn ends_in(bytes: &[u8], lit: &[u8], lo: usize, hi: usize) -> bool {
    !lit.is_empty()
        && (lo..hi).any(|end| end + 1 >= lit.len() && &bytes[end + 1 - lit.len()..=end] == lit)
}

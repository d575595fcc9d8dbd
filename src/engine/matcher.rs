//! Per-partition brute-force literal matching against the history window.
//!
//! For every pattern and every lane `s` of the newest beat, the pattern ends
//! at lane `s` iff walking it back-to-front from window index `tail + s`
//! finds each required byte. A pattern's flag for the beat is the OR over all
//! lanes. Work per beat is O(patterns x max_len x beat_width) with no
//! dependency between partitions, patterns, or lanes.

use crate::catalog::Partition;
use crate::stdx::FlagSet;

use super::window::HistoryWindow;

/// Per-partition scratch reused across beats.
#[derive(Clone, Debug)]
pub(crate) struct PartitionScratch {
    /// Bit `i` set when pattern slot `i` (ordinal `i + 1`) matched this beat.
    pub(crate) flags: FlagSet,
    /// Earliest lane at which each pattern matched; meaningful only where the
    /// flag is set.
    pub(crate) first_lane: Vec<u8>,
}

impl PartitionScratch {
    pub(crate) fn new(part: &Partition) -> Self {
        Self {
            flags: FlagSet::empty(part.pattern_count()),
            first_lane: vec![0; part.pattern_count()],
        }
    }
}

/// Evaluates every pattern of `part` against `window` for the newest beat.
///
/// Clears `scratch` first, so flags never leak across beats. Empty patterns
/// never match.
pub(crate) fn match_partition(
    part: &Partition,
    window: &HistoryWindow,
    beat_width: usize,
    scratch: &mut PartitionScratch,
) {
    scratch.flags.clear();
    let tail = window.tail();

    for idx in 0..part.patterns.len() {
        let rev = part.patterns.reversed(idx);
        if rev.is_empty() {
            continue;
        }
        debug_assert!(rev.len() <= tail + 1, "pattern longer than window history");

        for lane in 0..beat_width {
            let end = tail + lane;
            let hit = rev
                .iter()
                .enumerate()
                .all(|(k, &required)| window.get(end - k).matches(required));
            if hit {
                scratch.flags.set(idx);
                scratch.first_lane[idx] = lane as u8;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Limits, PatternCatalog};
    use crate::engine::decode::DecodedByte;

    fn window_after(tail: usize, width: usize, beats: &[&[u8]]) -> HistoryWindow {
        let mut w = HistoryWindow::new(tail, width);
        for b in beats {
            let decoded: Vec<DecodedByte> = b.iter().map(|&x| DecodedByte::new(x)).collect();
            w.push_beat(&decoded);
        }
        w
    }

    fn catalog(pats: &[&[u8]]) -> PatternCatalog {
        PatternCatalog::from_partitions(
            vec![pats.iter().map(|p| p.to_vec()).collect()],
            &Limits::default(),
        )
        .unwrap()
    }

    #[test]
    fn flags_every_pattern_ending_in_the_beat() {
        let cat = catalog(&[b"ab", b"cd", b"zz", b"bcd"]);
        let part = &cat.partitions()[0];
        let w = window_after(cat.max_pattern_len() - 1, 4, &[b"abcd"]);
        let mut scratch = PartitionScratch::new(part);
        match_partition(part, &w, 4, &mut scratch);
        assert_eq!(scratch.flags.iter().collect::<Vec<_>>(), vec![0, 1, 3]);
        assert_eq!(scratch.first_lane[0], 1);
        assert_eq!(scratch.first_lane[1], 3);
        assert_eq!(scratch.first_lane[3], 3);
    }

    #[test]
    fn matches_across_the_beat_boundary() {
        let cat = catalog(&[b"cdef"]);
        let part = &cat.partitions()[0];
        let w = window_after(3, 4, &[b"abcd", b"efgh"]);
        let mut scratch = PartitionScratch::new(part);
        match_partition(part, &w, 4, &mut scratch);
        assert!(scratch.flags.is_set(0));
        assert_eq!(scratch.first_lane[0], 1);
    }

    #[test]
    fn pattern_ending_in_an_earlier_beat_is_not_flagged() {
        let cat = catalog(&[b"ab"]);
        let part = &cat.partitions()[0];
        let w = window_after(1, 4, &[b"xxab", b"yyyy"]);
        let mut scratch = PartitionScratch::new(part);
        match_partition(part, &w, 4, &mut scratch);
        assert!(scratch.flags.is_empty());
    }

    #[test]
    fn empty_pattern_never_matches() {
        let cat = catalog(&[b"", b"a"]);
        let part = &cat.partitions()[0];
        let w = window_after(0, 2, &[b"aa"]);
        let mut scratch = PartitionScratch::new(part);
        match_partition(part, &w, 2, &mut scratch);
        assert_eq!(scratch.flags.iter().collect::<Vec<_>>(), vec![1]);
    }
}

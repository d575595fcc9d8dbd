//! Match resolution: per-partition flags to one id, partitions to one slot.
//!
//! Both reductions are scan-order overwrites. Within a partition, flags are
//! scanned in ascending ordinal order and each set flag replaces the previous
//! finding, so the highest matching ordinal wins. Across partitions, the
//! payload slot is overwritten in ascending partition order, so the highest
//! partition with a finding wins. Only one id per beat reaches the payload;
//! the per-partition results stay available in the beat report.

use crate::api::PartitionHit;
use crate::catalog::Partition;

use super::matcher::PartitionScratch;
use super::window::HistoryWindow;

/// Reduces one partition's flags to its winning hit.
///
/// `window` must already hold the beat the flags were computed for; the end
/// offset is read from the slot of the winner's earliest matching lane.
pub(crate) fn resolve_partition(
    part: &Partition,
    scratch: &PartitionScratch,
    window: &HistoryWindow,
) -> Option<PartitionHit> {
    // The last flag an ascending scan would see is the highest set bit.
    let idx = scratch.flags.highest_set()?;
    let end = window.tail() + scratch.first_lane[idx] as usize;
    Some(PartitionHit {
        id: part.id_of_index(idx)?,
        end_offset: window.stream_offset_of(end)?,
    })
}

/// Outcome of merging every partition into the single payload slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Merged {
    /// Winning id, or 0 when no partition matched.
    pub(crate) payload: u32,
    /// Partitions that matched this beat.
    pub(crate) hits: u32,
}

impl Merged {
    /// Findings that were overwritten and are invisible in the payload.
    pub(crate) fn hidden(&self) -> u32 {
        self.hits.saturating_sub(1)
    }
}

/// Writes each partition's finding into the slot in ascending order.
pub(crate) fn merge_partitions(hits: &[Option<PartitionHit>]) -> Merged {
    let mut merged = Merged::default();
    for hit in hits.iter().flatten() {
        merged.payload = hit.id.get();
        merged.hits += 1;
    }
    merged
}

//! Static pattern catalog: partitions of literal byte patterns with global ids.
//!
//! The catalog is built once and never mutated. Each partition stores its
//! patterns back-to-back in a packed byte arena, **reversed**, so the matcher
//! can walk a pattern from its last byte while stepping backwards through the
//! history window from a candidate end position.
//!
//! # Numbering
//! - Partition `n` has a base offset equal to the total pattern count of
//!   partitions `0..n`.
//! - Ordinals within a partition are 1-based, so the global id of ordinal `o`
//!   is `base + o`. Id 0 never names a pattern; it is the "no match" payload.
//!
//! # Invariants
//! - Base offsets are non-decreasing and `base[n + 1] == base[n] + count[n]`.
//! - Every pattern length is `<= Limits::max_pattern_len`.
//! - Every partition respects the count and byte limits in [`Limits`].

use crate::api::PatternId;

mod errors;
pub mod id_map;
pub mod loader;
pub mod packing;

pub use errors::{ConfigError, LoadError, PackError};

/// Upper bounds enforced when building a catalog.
///
/// Defaults follow the reference hardware sizing: 8191 literal bytes per
/// partition and patterns short enough to keep the history window small.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Longest accepted pattern, in bytes.
    pub max_pattern_len: usize,
    /// Most patterns a single partition may hold.
    pub max_patterns_per_partition: usize,
    /// Most partitions a catalog may hold.
    pub max_partitions: usize,
    /// Most literal bytes a single partition may hold.
    pub max_partition_bytes: usize,
    /// Most patterns across all partitions. Capped at [`MAX_TOTAL_PATTERNS`]
    /// regardless of the value set here.
    pub max_total_patterns: usize,
}

/// Ids run `1..=total` and must fit in a `u32` payload.
pub const MAX_TOTAL_PATTERNS: usize = (u32::MAX - 1) as usize;

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_pattern_len: 1024,
            max_patterns_per_partition: 4096,
            max_partitions: 64,
            max_partition_bytes: packing::DEFAULT_PARTITION_BYTE_LIMIT,
            max_total_patterns: MAX_TOTAL_PATTERNS,
        }
    }
}

/// Input description of one partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSpec {
    pub name: String,
    /// Literals in ordinal order (first entry gets ordinal 1).
    pub patterns: Vec<Vec<u8>>,
}

impl PartitionSpec {
    pub fn new(name: impl Into<String>, patterns: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            patterns,
        }
    }
}

/// Packed byte patterns with an offset table.
///
/// `bytes` stores all (reversed) patterns back-to-back and `offsets` is a
/// prefix-sum table with length `patterns + 1`. This avoids a `Vec<Vec<u8>>`
/// and keeps a partition's literals contiguous for the matcher's inner loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PackedPatterns {
    bytes: Vec<u8>,
    offsets: Vec<u32>,
}

impl PackedPatterns {
    fn with_capacity(patterns: usize, bytes: usize) -> Self {
        let mut offsets = Vec::with_capacity(patterns.saturating_add(1));
        offsets.push(0);
        Self {
            bytes: Vec::with_capacity(bytes),
            offsets,
        }
    }

    fn push_reversed(&mut self, pat: &[u8]) {
        self.bytes.extend(pat.iter().rev());
        debug_assert!(self.bytes.len() <= u32::MAX as usize);
        self.offsets.push(self.bytes.len() as u32);
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Pattern `idx` (0-based) read back-to-front.
    #[inline]
    pub(crate) fn reversed(&self, idx: usize) -> &[u8] {
        let lo = self.offsets[idx] as usize;
        let hi = self.offsets[idx + 1] as usize;
        &self.bytes[lo..hi]
    }

    #[inline]
    fn total_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// One compiled partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    name: String,
    base_offset: u32,
    max_len: usize,
    pub(crate) patterns: PackedPatterns,
}

impl Partition {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of pattern counts of every earlier partition.
    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Longest pattern in this partition (0 when empty).
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Total literal bytes held by this partition.
    pub fn literal_bytes(&self) -> usize {
        self.patterns.total_bytes()
    }

    /// Length of the pattern at 1-based `ordinal`.
    pub fn pattern_len(&self, ordinal: usize) -> Option<usize> {
        let idx = ordinal.checked_sub(1)?;
        (idx < self.patterns.len()).then(|| self.patterns.reversed(idx).len())
    }

    /// Forward literal of the pattern at 1-based `ordinal`.
    pub fn literal(&self, ordinal: usize) -> Option<Vec<u8>> {
        let idx = ordinal.checked_sub(1)?;
        (idx < self.patterns.len())
            .then(|| self.patterns.reversed(idx).iter().rev().copied().collect())
    }

    /// Global id of 1-based `ordinal`.
    pub fn pattern_id(&self, ordinal: usize) -> Option<PatternId> {
        if ordinal == 0 || ordinal > self.patterns.len() {
            return None;
        }
        PatternId::new(self.base_offset + ordinal as u32)
    }

    /// Global id of the 0-based pattern slot `idx`; caller guarantees range.
    #[inline]
    pub(crate) fn id_of_index(&self, idx: usize) -> Option<PatternId> {
        debug_assert!(idx < self.patterns.len());
        PatternId::new(self.base_offset + idx as u32 + 1)
    }
}

/// Immutable, validated set of partitions.
///
/// Build once and share across engines (`Arc<PatternCatalog>`); each engine
/// owns its own history window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternCatalog {
    partitions: Vec<Partition>,
    total_patterns: u32,
    max_pattern_len: usize,
}

impl PatternCatalog {
    /// Validates `specs` against `limits` and compiles the catalog.
    ///
    /// Partition order is significant: it fixes base offsets and the
    /// cross-partition overwrite order of the output payload.
    pub fn build(specs: Vec<PartitionSpec>, limits: &Limits) -> Result<Self, ConfigError> {
        if specs.len() > limits.max_partitions {
            return Err(ConfigError::TooManyPartitions {
                count: specs.len(),
                max: limits.max_partitions,
            });
        }

        let total: usize = specs.iter().map(|s| s.patterns.len()).sum();
        let max_total = limits.max_total_patterns.min(MAX_TOTAL_PATTERNS);
        if total > max_total {
            return Err(ConfigError::TooManyTotalPatterns {
                count: total,
                max: max_total,
            });
        }

        let mut partitions = Vec::with_capacity(specs.len());
        let mut base_offset = 0u32;
        let mut max_pattern_len = 0usize;

        for (n, spec) in specs.into_iter().enumerate() {
            if spec.patterns.len() > limits.max_patterns_per_partition {
                return Err(ConfigError::TooManyPatterns {
                    partition: n,
                    count: spec.patterns.len(),
                    max: limits.max_patterns_per_partition,
                });
            }

            let bytes: usize = spec.patterns.iter().map(Vec::len).sum();
            if bytes > limits.max_partition_bytes {
                return Err(ConfigError::PartitionTooLarge {
                    partition: n,
                    bytes,
                    max: limits.max_partition_bytes,
                });
            }

            let mut packed = PackedPatterns::with_capacity(spec.patterns.len(), bytes);
            let mut max_len = 0usize;
            for (idx, pat) in spec.patterns.iter().enumerate() {
                if pat.len() > limits.max_pattern_len {
                    return Err(ConfigError::PatternTooLong {
                        partition: n,
                        ordinal: idx + 1,
                        len: pat.len(),
                        max: limits.max_pattern_len,
                    });
                }
                max_len = max_len.max(pat.len());
                packed.push_reversed(pat);
            }

            max_pattern_len = max_pattern_len.max(max_len);
            let count = packed.len() as u32;
            partitions.push(Partition {
                name: spec.name,
                base_offset,
                max_len,
                patterns: packed,
            });
            base_offset += count;
        }

        Ok(Self {
            partitions,
            total_patterns: base_offset,
            max_pattern_len,
        })
    }

    /// Builds a catalog from unnamed partitions, naming them `part-<n>`.
    pub fn from_partitions(
        partitions: Vec<Vec<Vec<u8>>>,
        limits: &Limits,
    ) -> Result<Self, ConfigError> {
        let specs = partitions
            .into_iter()
            .enumerate()
            .map(|(n, patterns)| PartitionSpec::new(format!("part-{n}"), patterns))
            .collect();
        Self::build(specs, limits)
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn total_patterns(&self) -> u32 {
        self.total_patterns
    }

    /// Longest pattern across every partition; sizes the history window.
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// Bits needed to encode any id or the 0 "no match" value.
    pub fn match_id_width(&self) -> u32 {
        clog2(self.total_patterns as u64 + 1)
    }

    /// Maps a global id back to `(partition index, 1-based ordinal)`.
    pub fn locate(&self, id: PatternId) -> Option<(usize, usize)> {
        let raw = id.get();
        if raw > self.total_patterns {
            return None;
        }
        // First partition whose range ends at or after `raw`; empty
        // partitions share a base with their successor and are skipped.
        let n = self
            .partitions
            .partition_point(|p| p.base_offset + (p.pattern_count() as u32) < raw);
        let part = self.partitions.get(n)?;
        Some((n, (raw - part.base_offset) as usize))
    }

    /// Forward literal for a global id.
    pub fn literal(&self, id: PatternId) -> Option<Vec<u8>> {
        let (n, ordinal) = self.locate(id)?;
        self.partitions[n].literal(ordinal)
    }

    /// Iterates `(id, forward literal)` in ascending id order.
    pub fn iter_literals(&self) -> impl Iterator<Item = (PatternId, Vec<u8>)> + '_ {
        self.partitions.iter().flat_map(|part| {
            (1..=part.pattern_count()).filter_map(move |ordinal| {
                Some((part.pattern_id(ordinal)?, part.literal(ordinal)?))
            })
        })
    }
}

/// Ceiling log2 with a floor of one bit, matching the hardware width helper:
/// `clog2(x) = 1` for `x <= 1`, else `1 + clog2((x + 1) / 2)`.
pub const fn clog2(mut x: u64) -> u32 {
    let mut bits = 1;
    while x > 1 {
        x = (x + 1) >> 1;
        bits += 1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pats(list: &[&[u8]]) -> Vec<Vec<u8>> {
        list.iter().map(|p| p.to_vec()).collect()
    }

    fn two_partitions() -> PatternCatalog {
        PatternCatalog::build(
            vec![
                PartitionSpec::new("short", pats(&[b"cat", b"dog"])),
                PartitionSpec::new("long", pats(&[b"giraffe", b"elephant", b"hippo"])),
            ],
            &Limits::default(),
        )
        .unwrap()
    }

    #[test]
    fn base_offsets_are_prefix_sums() {
        let cat = two_partitions();
        assert_eq!(cat.partitions()[0].base_offset(), 0);
        assert_eq!(cat.partitions()[1].base_offset(), 2);
        assert_eq!(cat.total_patterns(), 5);
        assert_eq!(cat.max_pattern_len(), 8);
    }

    #[test]
    fn ids_are_base_plus_one_based_ordinal() {
        let cat = two_partitions();
        assert_eq!(cat.partitions()[0].pattern_id(1).map(PatternId::get), Some(1));
        assert_eq!(cat.partitions()[0].pattern_id(2).map(PatternId::get), Some(2));
        assert_eq!(cat.partitions()[1].pattern_id(1).map(PatternId::get), Some(3));
        assert_eq!(cat.partitions()[1].pattern_id(3).map(PatternId::get), Some(5));
        assert_eq!(cat.partitions()[1].pattern_id(0), None);
        assert_eq!(cat.partitions()[1].pattern_id(4), None);
    }

    #[test]
    fn patterns_are_stored_reversed() {
        let cat = two_partitions();
        assert_eq!(cat.partitions()[0].patterns.reversed(0), b"tac");
        assert_eq!(cat.partitions()[1].literal(2).unwrap(), b"elephant");
    }

    #[test]
    fn locate_round_trips_through_empty_partitions() {
        let cat = PatternCatalog::from_partitions(
            vec![pats(&[b"a"]), vec![], vec![], pats(&[b"b", b"c"])],
            &Limits::default(),
        )
        .unwrap();
        for (id, lit) in cat.iter_literals() {
            let (n, ordinal) = cat.locate(id).unwrap();
            assert_eq!(cat.partitions()[n].literal(ordinal).unwrap(), lit);
        }
        assert_eq!(cat.locate(PatternId::new(2).unwrap()), Some((3, 1)));
        assert_eq!(cat.locate(PatternId::new(4).unwrap()), None);
    }

    #[test]
    fn rejects_pattern_over_length_limit() {
        let limits = Limits {
            max_pattern_len: 4,
            ..Limits::default()
        };
        let err = PatternCatalog::from_partitions(vec![pats(&[b"ok", b"too long"])], &limits)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::PatternTooLong {
                partition: 0,
                ordinal: 2,
                len: 8,
                max: 4
            }
        );
    }

    #[test]
    fn rejects_count_partition_and_byte_limits() {
        let limits = Limits {
            max_patterns_per_partition: 1,
            max_partitions: 2,
            max_partition_bytes: 5,
            ..Limits::default()
        };
        assert!(matches!(
            PatternCatalog::from_partitions(vec![pats(&[b"a", b"b"])], &limits),
            Err(ConfigError::TooManyPatterns { count: 2, max: 1, .. })
        ));
        assert!(matches!(
            PatternCatalog::from_partitions(vec![vec![], vec![], vec![]], &limits),
            Err(ConfigError::TooManyPartitions { count: 3, max: 2 })
        ));
        assert!(matches!(
            PatternCatalog::from_partitions(vec![pats(&[b"sixsix"])], &limits),
            Err(ConfigError::PartitionTooLarge { bytes: 6, max: 5, .. })
        ));
    }

    #[test]
    fn rejects_too_many_patterns_overall() {
        let limits = Limits {
            max_total_patterns: 3,
            ..Limits::default()
        };
        assert!(PatternCatalog::from_partitions(
            vec![pats(&[b"a", b"b"]), pats(&[b"c"])],
            &limits
        )
        .is_ok());
        assert_eq!(
            PatternCatalog::from_partitions(
                vec![pats(&[b"a", b"b"]), pats(&[b"c", b"d"])],
                &limits
            ),
            Err(ConfigError::TooManyTotalPatterns { count: 4, max: 3 })
        );
    }

    #[test]
    fn total_pattern_cap_keeps_ids_in_u32() {
        let limits = Limits {
            max_total_patterns: usize::MAX,
            ..Limits::default()
        };
        // The largest id plus the 0 "no match" value still fit in a u32.
        assert_eq!(MAX_TOTAL_PATTERNS as u64 + 1, u32::MAX as u64);
        assert!(PatternCatalog::from_partitions(vec![pats(&[b"a"])], &limits).is_ok());
    }

    #[test]
    fn locate_finds_first_and_last_id_of_every_partition() {
        let cat = PatternCatalog::from_partitions(
            vec![pats(&[b"a", b"b"]), vec![], pats(&[b"c", b"d", b"e"])],
            &Limits::default(),
        )
        .unwrap();
        let expect = [(1, (0, 1)), (2, (0, 2)), (3, (2, 1)), (5, (2, 3))];
        for (raw, loc) in expect {
            assert_eq!(cat.locate(PatternId::new(raw).unwrap()), Some(loc), "id {raw}");
        }
        assert_eq!(cat.locate(PatternId::new(6).unwrap()), None);
        assert_eq!(cat.literal(PatternId::new(5).unwrap()).unwrap(), b"e");
    }

    #[test]
    fn empty_patterns_take_an_id() {
        let cat = PatternCatalog::from_partitions(vec![pats(&[b"", b"x"])], &Limits::default())
            .unwrap();
        assert_eq!(cat.total_patterns(), 2);
        assert_eq!(cat.partitions()[0].pattern_len(1), Some(0));
        assert_eq!(cat.partitions()[0].pattern_id(2).map(PatternId::get), Some(2));
    }

    #[test]
    fn clog2_matches_hardware_widths() {
        assert_eq!(clog2(0), 1);
        assert_eq!(clog2(1), 1);
        assert_eq!(clog2(2), 2);
        assert_eq!(clog2(3), 3);
        assert_eq!(clog2(4), 3);
        assert_eq!(clog2(5), 4);
        assert_eq!(clog2(8), 4);
        assert_eq!(clog2(9), 5);
    }
}

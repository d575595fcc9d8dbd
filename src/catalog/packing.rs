//! Balanced partition packing.
//!
//! Patterns are sorted shortest-first and bucketed into three length classes
//! (short, medium, long). Each non-empty class gets at least one partition;
//! the rest are handed out in proportion to each class's share of literal
//! bytes, and any leftover partitions go to the heaviest class. Inside a
//! class, patterns are laid into partitions greedily until a partition
//! reaches the class's per-partition byte target, never exceeding the hard
//! byte limit.
//!
//! Grouping by length keeps long patterns together, so partitions of short
//! patterns have short inner loops. The output order of partitions is short
//! class first, then medium, then long, then empty padding partitions.

use ahash::AHashSet;
use std::fmt;

use super::PackError;

/// Per-partition literal byte limit of the reference hardware layout.
pub const DEFAULT_PARTITION_BYTE_LIMIT: usize = 8191;

const CLASS_COUNT: usize = 3;
const CLASS_NAMES: [&str; CLASS_COUNT] = ["short", "medium", "long"];

/// Packing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackConfig {
    /// Number of partitions to produce (padding with empty ones).
    pub partitions: usize,
    /// Hard limit on literal bytes per partition.
    pub partition_byte_limit: usize,
    /// Patterns up to this length are in the short class.
    pub short_len: usize,
    /// Patterns up to this length (and above `short_len`) are medium.
    pub medium_len: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            partitions: 4,
            partition_byte_limit: DEFAULT_PARTITION_BYTE_LIMIT,
            short_len: 32,
            medium_len: 64,
        }
    }
}

impl PackConfig {
    pub fn validate(&self) -> Result<(), PackError> {
        if self.partitions == 0 {
            return Err(PackError::NoPartitions);
        }
        if self.short_len > self.medium_len {
            return Err(PackError::InvalidClassLimits {
                short_len: self.short_len,
                medium_len: self.medium_len,
            });
        }
        Ok(())
    }

    fn class_of(&self, len: usize) -> usize {
        if len <= self.short_len {
            0
        } else if len <= self.medium_len {
            1
        } else {
            2
        }
    }
}

/// Result of [`pack_balanced`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedPartitions {
    /// Exactly `PackConfig::partitions` entries, in catalog order.
    pub partitions: Vec<Vec<Vec<u8>>>,
    /// Literal bytes per length class.
    pub class_bytes: [usize; CLASS_COUNT],
    /// Partitions allocated per length class.
    pub allocations: [usize; CLASS_COUNT],
}

impl PackedPartitions {
    pub fn stats(&self) -> Vec<PartitionStats> {
        self.partitions.iter().map(|p| PartitionStats::of(p)).collect()
    }

    /// Human-readable allocation summary, one line per length class.
    pub fn allocation_summary(&self) -> String {
        let mut out = String::new();
        for class in 0..CLASS_COUNT {
            out.push_str(&format!(
                "{:<6} class: {} bytes -> {} partitions\n",
                CLASS_NAMES[class], self.class_bytes[class], self.allocations[class]
            ));
        }
        out
    }
}

/// Per-partition size summary.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartitionStats {
    pub count: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub avg_len: f64,
    pub bytes: usize,
}

impl PartitionStats {
    pub fn of(patterns: &[Vec<u8>]) -> Self {
        if patterns.is_empty() {
            return Self::default();
        }
        let bytes: usize = patterns.iter().map(Vec::len).sum();
        Self {
            count: patterns.len(),
            min_len: patterns.iter().map(Vec::len).min().unwrap_or(0),
            max_len: patterns.iter().map(Vec::len).max().unwrap_or(0),
            avg_len: bytes as f64 / patterns.len() as f64,
            bytes,
        }
    }
}

/// Renders a partition table in the packer's report format.
pub struct StatsTable<'a>(pub &'a [PartitionStats]);

impl fmt::Display for StatsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<8} | {:<10} | {:<6} | {:<8} | {:<8} | {:<12}",
            "Part #", "Range", "Count", "Avg Len", "Max Len", "Bytes"
        )?;
        writeln!(f, "{}", "-".repeat(70))?;
        for (i, s) in self.0.iter().enumerate() {
            if s.count == 0 {
                writeln!(
                    f,
                    "{:<8} | {:<10} | {:<6} | {:<8} | {:<8} | {:<12}",
                    i, "EMPTY", 0, 0, 0, 0
                )?;
                continue;
            }
            let range = format!("{}-{}", s.min_len, s.max_len);
            writeln!(
                f,
                "{:<8} | {:<10} | {:<6} | {:<8.1} | {:<8} | {:<12}",
                i, range, s.count, s.avg_len, s.max_len, s.bytes
            )?;
        }
        write!(f, "{}", "-".repeat(70))
    }
}

/// Dedups, sorts shortest-first, and packs `patterns` into balanced partitions.
pub fn pack_balanced(
    mut patterns: Vec<Vec<u8>>,
    config: &PackConfig,
) -> Result<PackedPartitions, PackError> {
    config.validate()?;

    let mut seen = AHashSet::with_capacity(patterns.len());
    patterns.retain(|p| seen.insert(p.clone()));
    // Stable: equal lengths keep input order.
    patterns.sort_by_key(Vec::len);

    if let Some(p) = patterns
        .iter()
        .find(|p| p.len() > config.partition_byte_limit)
    {
        return Err(PackError::PatternExceedsLimit {
            len: p.len(),
            limit: config.partition_byte_limit,
        });
    }

    let mut buckets: [Vec<Vec<u8>>; CLASS_COUNT] = Default::default();
    let mut class_bytes = [0usize; CLASS_COUNT];
    for p in patterns {
        let class = config.class_of(p.len());
        class_bytes[class] += p.len();
        buckets[class].push(p);
    }

    let total_bytes: usize = class_bytes.iter().sum();
    if total_bytes == 0 {
        return Ok(PackedPartitions {
            partitions: vec![Vec::new(); config.partitions],
            class_bytes,
            allocations: [0; CLASS_COUNT],
        });
    }

    let allocations = allocate(&class_bytes, total_bytes, config.partitions)?;

    let mut partitions = Vec::with_capacity(config.partitions);
    for (class, bucket) in buckets.into_iter().enumerate() {
        if allocations[class] > 0 {
            partitions.extend(distribute(
                bucket,
                allocations[class],
                config.partition_byte_limit,
            ));
        }
    }

    if partitions.len() > config.partitions {
        return Err(PackError::PartitionOverflow {
            needed: partitions.len(),
            available: config.partitions,
        });
    }
    partitions.resize_with(config.partitions, Vec::new);

    Ok(PackedPartitions {
        partitions,
        class_bytes,
        allocations,
    })
}

/// Splits `total` partitions across the length classes by byte weight.
fn allocate(
    class_bytes: &[usize; CLASS_COUNT],
    total_bytes: usize,
    total: usize,
) -> Result<[usize; CLASS_COUNT], PackError> {
    let mut allocations = [0usize; CLASS_COUNT];
    let classes = class_bytes.iter().filter(|&&b| b > 0).count();
    if classes > total {
        return Err(PackError::NotEnoughPartitions {
            classes,
            partitions: total,
        });
    }

    let mut remaining = total;
    for class in 0..CLASS_COUNT {
        if class_bytes[class] > 0 {
            allocations[class] = 1;
            remaining -= 1;
        }
    }

    if remaining > 0 {
        for class in 0..CLASS_COUNT {
            if class_bytes[class] == 0 {
                continue;
            }
            let share = (class_bytes[class] as f64 / total_bytes as f64) * total as f64;
            let extra = share.round_ties_even() as usize;
            let extra = extra.saturating_sub(1);
            if extra > 0 {
                let take = extra.min(remaining);
                allocations[class] += take;
                remaining -= take;
            }
        }
    }

    // Leftovers go to the heaviest class (first one on ties).
    if remaining > 0 {
        let mut heaviest = 0;
        for class in 1..CLASS_COUNT {
            if class_bytes[class] > class_bytes[heaviest] {
                heaviest = class;
            }
        }
        allocations[heaviest] += remaining;
    }

    Ok(allocations)
}

/// Greedy byte-balanced split of one length class into `parts` partitions.
///
/// May return more than `parts` partitions when the byte limit forces extra
/// splits; the caller reports that as an overflow.
fn distribute(patterns: Vec<Vec<u8>>, parts: usize, byte_limit: usize) -> Vec<Vec<Vec<u8>>> {
    debug_assert!(parts > 0);
    if patterns.is_empty() {
        return vec![Vec::new(); parts];
    }

    let total: usize = patterns.iter().map(Vec::len).sum();
    let target = total as f64 / parts as f64;

    let mut out: Vec<Vec<Vec<u8>>> = Vec::with_capacity(parts);
    let mut current: Vec<Vec<u8>> = Vec::new();
    let mut current_bytes = 0usize;

    for p in patterns {
        let len = p.len();
        let over_limit = current_bytes + len > byte_limit;
        let reached_target = current_bytes as f64 >= target && out.len() < parts - 1;
        if over_limit || reached_target {
            out.push(std::mem::take(&mut current));
            current_bytes = 0;
        }
        current.push(p);
        current_bytes += len;
    }
    out.push(current);
    out
}

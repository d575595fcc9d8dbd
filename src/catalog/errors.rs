//! Error types for catalog construction, pattern loading, and packing.
//!
//! Every error here is raised before the first beat is processed. The engine
//! has no degraded mode: a configuration that fails validation is rejected
//! outright. All enums are `#[non_exhaustive]`; consumers should include a
//! fallback match arm.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Catalog or engine configuration rejected at build time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A pattern is longer than `Limits::max_pattern_len`.
    PatternTooLong {
        partition: usize,
        ordinal: usize,
        len: usize,
        max: usize,
    },
    /// A partition holds more patterns than `Limits::max_patterns_per_partition`.
    TooManyPatterns {
        partition: usize,
        count: usize,
        max: usize,
    },
    /// More partitions than `Limits::max_partitions`.
    TooManyPartitions { count: usize, max: usize },
    /// Literal bytes in one partition exceed `Limits::max_partition_bytes`.
    PartitionTooLarge {
        partition: usize,
        bytes: usize,
        max: usize,
    },
    /// Total pattern count does not fit the id space.
    TooManyTotalPatterns { count: usize, max: usize },
    /// Beat width outside `1..=MAX_BEAT_WIDTH`.
    InvalidBeatWidth { width: usize, max: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternTooLong {
                partition,
                ordinal,
                len,
                max,
            } => write!(
                f,
                "pattern {ordinal} in partition {partition} too long: {len} bytes (max: {max})"
            ),
            Self::TooManyPatterns {
                partition,
                count,
                max,
            } => write!(
                f,
                "partition {partition} has too many patterns: {count} (max: {max})"
            ),
            Self::TooManyPartitions { count, max } => {
                write!(f, "too many partitions: {count} (max: {max})")
            }
            Self::PartitionTooLarge {
                partition,
                bytes,
                max,
            } => write!(
                f,
                "partition {partition} too large: {bytes} literal bytes (max: {max})"
            ),
            Self::TooManyTotalPatterns { count, max } => {
                write!(f, "too many patterns in catalog: {count} (max: {max})")
            }
            Self::InvalidBeatWidth { width, max } => {
                write!(f, "invalid beat width: {width} (expected 1..={max})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from reading a pattern list.
#[derive(Debug)]
#[non_exhaustive]
pub enum LoadError {
    /// I/O error while reading the pattern file.
    Io { path: PathBuf, err: io::Error },
    /// The file contained no non-blank lines.
    Empty { path: PathBuf },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, err } => {
                write!(f, "failed to read patterns from {}: {err}", path.display())
            }
            Self::Empty { path } => write!(f, "no patterns found in {}", path.display()),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Errors from balanced partition packing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackError {
    /// `PackConfig::partitions` was zero.
    NoPartitions,
    /// Fewer partitions than non-empty length classes.
    NotEnoughPartitions { classes: usize, partitions: usize },
    /// A single pattern is larger than the per-partition byte limit.
    PatternExceedsLimit { len: usize, limit: usize },
    /// The byte limit forced more partitions than were configured.
    PartitionOverflow { needed: usize, available: usize },
    /// Class limits are not ordered `short_len <= medium_len`.
    InvalidClassLimits { short_len: usize, medium_len: usize },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPartitions => write!(f, "partition count must be >= 1"),
            Self::NotEnoughPartitions {
                classes,
                partitions,
            } => write!(
                f,
                "not enough partitions: {classes} non-empty length classes need at least {classes}, got {partitions}"
            ),
            Self::PatternExceedsLimit { len, limit } => write!(
                f,
                "pattern of {len} bytes exceeds the per-partition byte limit ({limit})"
            ),
            Self::PartitionOverflow { needed, available } => write!(
                f,
                "packing needs {needed} partitions but only {available} are configured"
            ),
            Self::InvalidClassLimits {
                short_len,
                medium_len,
            } => write!(
                f,
                "invalid length classes: short_len {short_len} > medium_len {medium_len}"
            ),
        }
    }
}

impl std::error::Error for PackError {}

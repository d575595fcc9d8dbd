//! Fixed-width, beat-at-a-time multi-pattern literal matcher.
//!
//! ## Scope
//! This crate checks every byte position of a stream against a partitioned
//! set of literal byte patterns. The stream arrives in fixed-width beats; each
//! beat produces exactly one output record naming (at most) one pattern that
//! ended inside that beat. Work per beat is bounded and independent of the
//! input: no automaton, no backtracking.
//!
//! ## Key invariants
//! - The history window always holds the last `(max_pattern_len - 1) +
//!   beat_width` lanes, so patterns spanning beat boundaries are found on the
//!   beat holding their last byte.
//! - The window starts empty: nothing matches using bytes from before the
//!   stream began, and lanes with a clear keep bit never match.
//! - Within a partition the highest matching ordinal wins; across partitions
//!   the highest partition wins the single payload slot.
//!
//! ## Engine flow (single beat)
//! 1) Decode lanes (invalid lanes become empty).
//! 2) Append to the history window, evicting the oldest beat.
//! 3) Compare every pattern of every partition at every lane.
//! 4) Resolve per partition, merge into the payload slot.
//!
//! ## Build flow (catalog)
//! `pattern file -> loader -> packer -> PatternCatalog -> Engine`
//!
//! ## Notable entry points
//! - `PatternCatalog` / `Limits`: validated, immutable pattern set.
//! - `Engine`: per-stream matcher (`process_beat`, `process_beat_report`).
//! - `Beat`, `OutputRecord`, `BeatReport`: per-beat input and output.
//! - `catalog::packing::pack_balanced`: length-class partition packing.
//! - `harness`: beat framing, stream driving, and a slow reference matcher.

pub mod catalog;
pub mod harness;
pub mod perf_stats;
pub mod stdx;
#[cfg(test)]
pub mod test_utils;

mod api;
mod demo;
mod engine;

pub use api::{
    lane_mask, Beat, BeatReport, OutputRecord, PartitionHit, PatternId, DEFAULT_BEAT_WIDTH,
    MAX_BEAT_WIDTH,
};
pub use catalog::{ConfigError, Limits, LoadError, PackError, PartitionSpec, PatternCatalog};
pub use demo::{demo_catalog, demo_patterns};
pub use engine::{DecodedByte, Engine, EngineStats};

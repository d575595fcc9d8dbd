//! Beat-at-a-time matching engine.
//!
//! Purpose: own one stream's history window and per-beat scratch, and turn
//! each input beat into exactly one output record.
//!
//! Invariants / safety rules:
//! - The catalog is immutable and shared; the window is owned exclusively by
//!   one engine. Independent streams need independent engines.
//! - All scratch is sized at construction; `process_beat` does not allocate.
//!
//! Per-beat algorithm:
//! 1. Decode lanes (invalid lanes become empty slots).
//! 2. Append the decoded beat to the window, evicting the oldest beat.
//! 3. Match every partition against the window.
//! 4. Resolve each partition, then merge into the payload slot.

use std::sync::Arc;

use crate::api::{Beat, BeatReport, OutputRecord, PartitionHit, MAX_BEAT_WIDTH};
use crate::catalog::{ConfigError, PatternCatalog};
use crate::perf_stats::{max_u64, sat_add_u64, sat_inc_u64};

use super::decode::{decode_beat, DecodedByte};
use super::matcher::{match_partition, PartitionScratch};
use super::resolve::{merge_partitions, resolve_partition};
use super::window::HistoryWindow;

/// Running counters for one engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Beats processed.
    pub beats: u64,
    /// Lanes pushed into the window (`beats * beat_width`).
    pub lanes: u64,
    /// Lanes that carried a valid byte.
    pub valid_bytes: u64,
    /// Beats whose payload was non-zero.
    pub match_beats: u64,
    /// Partition findings across all beats.
    pub partition_hits: u64,
    /// Partition findings hidden by the single-slot payload.
    pub hidden_hits: u64,
    /// Most partitions that matched in a single beat.
    pub max_partitions_per_beat: u64,
    /// Beats carrying the end-of-message flag.
    pub messages: u64,
}

/// Compiled matcher bound to one stream.
///
/// Build with [`Engine::new`], then call [`Engine::process_beat`] once per
/// beat in stream order. `reset` starts a new stream on the same engine.
#[derive(Clone, Debug)]
pub struct Engine {
    catalog: Arc<PatternCatalog>,
    beat_width: usize,
    window: HistoryWindow,
    decoded: Vec<DecodedByte>,
    scratch: Vec<PartitionScratch>,
    hits: Vec<Option<PartitionHit>>,
    stats: EngineStats,
}

impl Engine {
    /// Creates an engine over `catalog` consuming `beat_width`-byte beats.
    pub fn new(catalog: Arc<PatternCatalog>, beat_width: usize) -> Result<Self, ConfigError> {
        if beat_width == 0 || beat_width > MAX_BEAT_WIDTH {
            return Err(ConfigError::InvalidBeatWidth {
                width: beat_width,
                max: MAX_BEAT_WIDTH,
            });
        }
        let tail = catalog.max_pattern_len().saturating_sub(1);
        let scratch = catalog
            .partitions()
            .iter()
            .map(PartitionScratch::new)
            .collect();
        let hits = vec![None; catalog.partition_count()];
        Ok(Self {
            window: HistoryWindow::new(tail, beat_width),
            decoded: vec![DecodedByte::EMPTY; beat_width],
            scratch,
            hits,
            beat_width,
            catalog,
            stats: EngineStats::default(),
        })
    }

    pub fn catalog(&self) -> &Arc<PatternCatalog> {
        &self.catalog
    }

    pub fn beat_width(&self) -> usize {
        self.beat_width
    }

    /// History window length: `(max_pattern_len - 1) + beat_width`.
    pub fn window_len(&self) -> usize {
        self.window.capacity()
    }

    /// Absolute stream offset of the next beat's lane 0.
    pub fn stream_offset(&self) -> u64 {
        self.window.bytes_seen()
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Processes one beat and returns its output record.
    pub fn process_beat(&mut self, beat: &Beat<'_>) -> OutputRecord {
        self.step(beat)
    }

    /// Processes one beat and returns the record plus every partition's hit.
    pub fn process_beat_report(&mut self, beat: &Beat<'_>) -> BeatReport<'_> {
        let record = self.step(beat);
        BeatReport {
            record,
            partitions: &self.hits,
        }
    }

    /// Forgets all history, as if the stream had just started. Counters are
    /// kept.
    pub fn reset(&mut self) {
        self.window.reset();
        self.hits.fill(None);
    }

    fn step(&mut self, beat: &Beat<'_>) -> OutputRecord {
        let valid = decode_beat(beat, &mut self.decoded);
        self.window.push_beat(&self.decoded);

        for ((part, scratch), hit) in self
            .catalog
            .partitions()
            .iter()
            .zip(self.scratch.iter_mut())
            .zip(self.hits.iter_mut())
        {
            match_partition(part, &self.window, self.beat_width, scratch);
            *hit = resolve_partition(part, scratch, &self.window);
        }

        let merged = merge_partitions(&self.hits);

        sat_inc_u64(&mut self.stats.beats);
        sat_add_u64(&mut self.stats.lanes, self.beat_width as u64);
        sat_add_u64(&mut self.stats.valid_bytes, valid as u64);
        if merged.payload != 0 {
            sat_inc_u64(&mut self.stats.match_beats);
        }
        sat_add_u64(&mut self.stats.partition_hits, merged.hits as u64);
        sat_add_u64(&mut self.stats.hidden_hits, merged.hidden() as u64);
        max_u64(&mut self.stats.max_partitions_per_beat, merged.hits as u64);
        if beat.last {
            sat_inc_u64(&mut self.stats.messages);
        }

        OutputRecord {
            payload: merged.payload,
            keep: beat.keep,
            dest: beat.dest,
            last: beat.last,
        }
    }
}

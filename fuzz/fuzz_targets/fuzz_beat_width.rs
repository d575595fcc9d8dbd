#![no_main]

use std::collections::BTreeSet;
use std::sync::Arc;

use beatscan::harness::frame_beats;
use beatscan::{Engine, Limits, PatternCatalog, MAX_BEAT_WIDTH};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // Header: pattern count, pattern length, beat width; then patterns, then
    // the stream. One pattern per partition, so no finding is ever hidden.
    let count = 1 + (data[0] as usize % 8);
    let len = 1 + (data[1] as usize % 12);
    let width = 1 + (data[2] as usize % MAX_BEAT_WIDTH);
    let body = &data[3..];
    let pattern_bytes = (count * len).min(body.len());
    let (pat_bytes, stream) = body.split_at(pattern_bytes);

    let parts: Vec<Vec<Vec<u8>>> = pat_bytes.chunks(len).map(|p| vec![p.to_vec()]).collect();
    let Ok(catalog) = PatternCatalog::from_partitions(parts, &Limits::default()) else {
        return;
    };
    let catalog = Arc::new(catalog);

    let found = |w: usize| {
        let mut engine = Engine::new(Arc::clone(&catalog), w).unwrap();
        let mut ids = BTreeSet::new();
        for beat in frame_beats(stream, w, 0) {
            ids.extend(engine.process_beat_report(&beat).hits().map(|h| h.id.get()));
        }
        ids
    };

    assert_eq!(found(1), found(width), "width {width}");
});

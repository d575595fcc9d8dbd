#![no_main]

use std::sync::Arc;

use beatscan::harness::{frame_beats, reference_payloads, scan_stream};
use beatscan::{Engine, Limits, PatternCatalog, MAX_BEAT_WIDTH};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // Header: beat width, partition count; then patterns split on 0xff (a
    // 0xfe byte starts a new partition), then the stream after "\xff\xff".
    let width = 1 + (data[0] as usize % MAX_BEAT_WIDTH);
    let body = &data[1..];
    let (layout, stream) = match body.windows(2).position(|w| w == [0xff, 0xff]) {
        Some(at) => (&body[..at], &body[at + 2..]),
        None => (body, &[][..]),
    };

    let parts: Vec<Vec<Vec<u8>>> = layout
        .split(|&b| b == 0xfe)
        .map(|part| {
            part.split(|&b| b == 0xff)
                .map(|p| p.iter().copied().take(32).collect())
                .collect()
        })
        .collect();
    let Ok(catalog) = PatternCatalog::from_partitions(parts, &Limits::default()) else {
        return;
    };
    let catalog = Arc::new(catalog);

    let mut engine = Engine::new(Arc::clone(&catalog), width).unwrap();
    let beats = frame_beats(stream, width, 0);
    let got: Vec<u32> = scan_stream(&mut engine, &beats)
        .iter()
        .map(|r| r.payload)
        .collect();
    assert_eq!(got, reference_payloads(&catalog, stream, width));
});

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;

use beatscan::catalog::id_map::write_id_map;
use beatscan::catalog::loader::load_patterns;
use beatscan::catalog::packing::{pack_balanced, PackConfig};
use beatscan::harness::{frame_beats, matched_ids, scan_stream};
use beatscan::{demo_catalog, Engine, Limits, PatternCatalog};

const REQUEST: &[u8] = b"GET /index.php?id=1 UNION SELECT pass FROM users HTTP/1.1\r\n\
User-Agent: sqlmap/1.7\r\n\r\n<script>alert(1)</script>";

fn found_literals(
    catalog: &Arc<PatternCatalog>,
    beat_width: usize,
    input: &[u8],
) -> BTreeSet<Vec<u8>> {
    let mut engine = Engine::new(Arc::clone(catalog), beat_width).expect("engine");
    let mut found = BTreeSet::new();
    for beat in frame_beats(input, beat_width, 0) {
        let report = engine.process_beat_report(&beat);
        for hit in report.hits() {
            found.insert(catalog.literal(hit.id).expect("known id"));
        }
    }
    found
}

#[test]
fn demo_catalog_flags_request_signatures() {
    let catalog = demo_catalog(4);
    let found = found_literals(&catalog, 1, REQUEST);
    let expected: BTreeSet<Vec<u8>> = [&b"UNION SELECT"[..], b"User-Agent: sqlmap", b"<script"]
        .iter()
        .map(|l| l.to_vec())
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn wide_beats_find_the_same_signatures() {
    let catalog = demo_catalog(4);
    let narrow = found_literals(&catalog, 1, REQUEST);
    for width in [3, 8, 16] {
        assert_eq!(found_literals(&catalog, width, REQUEST), narrow, "width {width}");
    }
}

#[test]
fn clean_traffic_produces_only_zero_payloads() {
    let catalog = demo_catalog(4);
    let mut engine = Engine::new(catalog, 8).expect("engine");
    let beats = frame_beats(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n", 8, 3);
    let records = scan_stream(&mut engine, &beats);
    assert_eq!(records.len(), beats.len());
    assert!(records.iter().all(|r| r.payload == 0 && r.dest == 3));
    assert!(records.last().expect("records").last);
}

#[test]
fn pattern_file_to_id_map_round_trip() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let patterns_path = dir.path().join("patterns.txt");
    fs::write(&patterns_path, b"cat\ndog\n\ncat\n  bird \n").expect("write patterns");

    let patterns = load_patterns(&patterns_path).expect("load");
    assert_eq!(patterns, vec![b"cat".to_vec(), b"dog".to_vec(), b"bird".to_vec()]);

    let cfg = PackConfig {
        partitions: 3,
        ..PackConfig::default()
    };
    let packed = pack_balanced(patterns, &cfg).expect("pack");
    let catalog = Arc::new(
        PatternCatalog::from_partitions(packed.partitions, &Limits::default()).expect("catalog"),
    );
    assert_eq!(catalog.partition_count(), 3);
    assert_eq!(catalog.total_patterns(), 3);

    let mut map = Vec::new();
    write_id_map(&catalog, &mut map).expect("write map");
    let map = String::from_utf8(map).expect("utf8 map");
    let by_id: Vec<(u32, String)> = map
        .lines()
        .map(|line| {
            let (lit, id) = line.rsplit_once(' ').expect("id column");
            (id.parse().expect("numeric id"), lit.to_string())
        })
        .collect();
    assert_eq!(by_id.len(), 3);

    let mut engine = Engine::new(Arc::clone(&catalog), 4).expect("engine");
    let beats = frame_beats(b"a cat saw a bird", 4, 0);
    let records = scan_stream(&mut engine, &beats);
    let seen: Vec<(usize, String)> = matched_ids(&records)
        .map(|(beat, id)| {
            let lit = by_id
                .iter()
                .find(|(mapped, _)| *mapped == id.get())
                .map(|(_, lit)| lit.clone())
                .expect("id in map");
            (beat, lit)
        })
        .collect();
    assert_eq!(seen, vec![(1, "cat".to_string()), (3, "bird".to_string())]);
}

//! beatscan CLI
//!
//! Packs a literal pattern file into balanced partitions and runs the
//! beat-at-a-time matcher over an input file.
//!
//! # Subcommands
//!
//! - `scan`: load and pack patterns, feed the input file beat by beat, print
//!   one `beat=<i> id=<id> pattern=<literal>` line per reported match.
//! - `pack`: load and pack patterns, write the `<literal> <id>` map, print the
//!   partition table to stderr.
//!
//! Statistics are written to stderr upon completion of `scan`:
//! `beats=N bytes=N matches=N patterns=N partitions=N elapsed_ms=N`
//!
//! # Exit Codes
//!
//! - `0`: Success (regardless of match count)
//! - `1`: I/O or configuration failure
//! - `2`: Invalid arguments

use beatscan::catalog::id_map::write_id_map;
use beatscan::catalog::loader::load_patterns;
use beatscan::catalog::packing::{pack_balanced, PackConfig, PackedPartitions, StatsTable};
use beatscan::harness::frame_beats;
use beatscan::{
    Beat, Engine, Limits, PatternCatalog, PatternId, DEFAULT_BEAT_WIDTH, MAX_BEAT_WIDTH,
};
use std::env;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

fn print_usage(exe: &OsStr) {
    eprintln!(
        "usage: {exe} scan --patterns=<file> [OPTIONS] <input>
       {exe} pack [--partitions=<N>] <patterns> <map-out>

SCAN OPTIONS:
    --partitions=<N>        Number of pattern partitions (default: 4)
    --beat-width=<N>        Bytes per beat, 1..={max} (default: {width})
    --dest=<N>              Destination tag copied to every record (default: 0)
    --all-partitions        Print every partition's hit, not just the payload
    --help, -h              Show this help message",
        exe = exe.to_string_lossy(),
        max = MAX_BEAT_WIDTH,
        width = DEFAULT_BEAT_WIDTH,
    );
}

fn usage_error(exe: &OsStr, msg: &str) -> ExitCode {
    eprintln!("{msg}");
    print_usage(exe);
    ExitCode::from(2)
}

fn parse_num<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid {flag} value: {value}"))
}

struct ScanArgs {
    patterns: PathBuf,
    input: PathBuf,
    partitions: usize,
    beat_width: usize,
    dest: u16,
    all_partitions: bool,
}

struct PackArgs {
    patterns: PathBuf,
    map_out: PathBuf,
    partitions: usize,
}

enum Command {
    Scan(ScanArgs),
    Pack(PackArgs),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = std::ffi::OsString>) -> Result<Command, String> {
    let Some(sub) = args.next() else {
        return Err("missing subcommand".to_string());
    };

    let mut patterns: Option<PathBuf> = None;
    let mut partitions = PackConfig::default().partitions;
    let mut beat_width = DEFAULT_BEAT_WIDTH;
    let mut dest: u16 = 0;
    let mut all_partitions = false;
    let mut positional: Vec<PathBuf> = Vec::new();

    let is_scan = match sub.to_str() {
        Some("scan") => true,
        Some("pack") => false,
        Some("--help") | Some("-h") => return Ok(Command::Help),
        _ => {
            return Err(format!("unknown subcommand: {}", sub.to_string_lossy()));
        }
    };

    for arg in args {
        if let Some(flag) = arg.to_str() {
            if let Some(value) = flag.strip_prefix("--patterns=") {
                patterns = Some(PathBuf::from(value));
                continue;
            }
            if let Some(value) = flag.strip_prefix("--partitions=") {
                partitions = parse_num("--partitions", value)?;
                if partitions == 0 {
                    return Err("--partitions must be >= 1".to_string());
                }
                continue;
            }
            if let Some(value) = flag.strip_prefix("--beat-width=") {
                beat_width = parse_num("--beat-width", value)?;
                if beat_width == 0 || beat_width > MAX_BEAT_WIDTH {
                    return Err(format!("--beat-width must be in 1..={MAX_BEAT_WIDTH}"));
                }
                continue;
            }
            if let Some(value) = flag.strip_prefix("--dest=") {
                dest = parse_num("--dest", value)?;
                continue;
            }
            match flag {
                "--all-partitions" => {
                    all_partitions = true;
                    continue;
                }
                "--help" | "-h" => return Ok(Command::Help),
                _ if flag.starts_with("--") => {
                    return Err(format!("unknown flag: {flag}"));
                }
                _ => {}
            }
        }
        positional.push(PathBuf::from(arg));
    }

    if is_scan {
        let Some(patterns) = patterns else {
            return Err("scan requires --patterns=<file>".to_string());
        };
        let [input] = <[PathBuf; 1]>::try_from(positional)
            .map_err(|_| "scan takes exactly one input path".to_string())?;
        Ok(Command::Scan(ScanArgs {
            patterns,
            input,
            partitions,
            beat_width,
            dest,
            all_partitions,
        }))
    } else {
        if patterns.is_some() {
            return Err("pack takes the pattern file as a positional argument".to_string());
        }
        let [patterns, map_out] = <[PathBuf; 2]>::try_from(positional)
            .map_err(|_| "pack takes <patterns> <map-out>".to_string())?;
        Ok(Command::Pack(PackArgs {
            patterns,
            map_out,
            partitions,
        }))
    }
}

/// Loads and packs `path`, printing the first failure to stderr.
fn load_and_pack(path: &Path, partitions: usize) -> Option<(PackedPartitions, PatternCatalog)> {
    let patterns = match load_patterns(path) {
        Ok(patterns) => patterns,
        Err(err) => {
            eprintln!("{err}");
            return None;
        }
    };
    let cfg = PackConfig {
        partitions,
        ..PackConfig::default()
    };
    let packed = match pack_balanced(patterns, &cfg) {
        Ok(packed) => packed,
        Err(err) => {
            eprintln!("packing failed: {err}");
            return None;
        }
    };
    match PatternCatalog::from_partitions(packed.partitions.clone(), &Limits::default()) {
        Ok(catalog) => Some((packed, catalog)),
        Err(err) => {
            eprintln!("invalid catalog: {err}");
            None
        }
    }
}

fn run_scan(args: ScanArgs) -> ExitCode {
    let Some((_, catalog)) = load_and_pack(&args.patterns, args.partitions) else {
        return ExitCode::from(1);
    };
    let catalog = Arc::new(catalog);
    let mut engine = match Engine::new(Arc::clone(&catalog), args.beat_width) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };
    let input = match fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("failed to read {}: {err}", args.input.display());
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let beats = frame_beats(&input, args.beat_width, args.dest);
    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let matches = match emit_matches(&mut engine, &catalog, &beats, args.all_partitions, out) {
        Ok(matches) => matches,
        Err(err) => {
            eprintln!("failed to write results: {err}");
            return ExitCode::from(1);
        }
    };

    let elapsed = start.elapsed();
    let stats = engine.stats();
    eprintln!(
        "beats={} bytes={} matches={} patterns={} partitions={} elapsed_ms={}",
        stats.beats,
        stats.valid_bytes,
        matches,
        catalog.total_patterns(),
        catalog.partition_count(),
        elapsed.as_millis(),
    );
    if args.all_partitions {
        eprintln!(
            "partition_hits={} hidden_hits={} max_partitions_per_beat={}",
            stats.partition_hits, stats.hidden_hits, stats.max_partitions_per_beat
        );
    }
    ExitCode::SUCCESS
}

/// Runs every beat and writes one line per reported match. Returns the number
/// of lines written.
fn emit_matches<W: Write>(
    engine: &mut Engine,
    catalog: &PatternCatalog,
    beats: &[Beat<'_>],
    all_partitions: bool,
    mut out: W,
) -> io::Result<u64> {
    let mut matches = 0u64;
    for (i, beat) in beats.iter().enumerate() {
        let report = engine.process_beat_report(beat);
        if all_partitions {
            for hit in report.hits() {
                matches += 1;
                write_hit(&mut out, catalog, i, hit.id, Some(hit.end_offset))?;
            }
        } else if let Some(id) = report.record.match_id() {
            matches += 1;
            write_hit(&mut out, catalog, i, id, None)?;
        }
    }
    out.flush()?;
    Ok(matches)
}

fn write_hit<W: Write>(
    out: &mut W,
    catalog: &PatternCatalog,
    beat: usize,
    id: PatternId,
    end_offset: Option<u64>,
) -> io::Result<()> {
    let literal = catalog.literal(id).unwrap_or_default();
    write!(out, "beat={beat} id={id}")?;
    if let Some(end) = end_offset {
        write!(out, " end={end}")?;
    }
    writeln!(out, " pattern={}", String::from_utf8_lossy(&literal))
}

fn run_pack(args: PackArgs) -> ExitCode {
    let Some((packed, catalog)) = load_and_pack(&args.patterns, args.partitions) else {
        return ExitCode::from(1);
    };
    let written = File::create(&args.map_out)
        .and_then(|file| write_id_map(&catalog, BufWriter::new(file)));
    if let Err(err) = written {
        eprintln!("failed to write {}: {err}", args.map_out.display());
        return ExitCode::from(1);
    }
    eprint!("{}", packed.allocation_summary());
    eprint!("{}", StatsTable(&packed.stats()));
    eprintln!(
        "patterns={} partitions={} match_id_bits={}",
        catalog.total_patterns(),
        catalog.partition_count(),
        catalog.match_id_width()
    );
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "beatscan".into());
    match parse_args(args) {
        Ok(Command::Scan(scan)) => run_scan(scan),
        Ok(Command::Pack(pack)) => run_pack(pack),
        Ok(Command::Help) => {
            print_usage(&exe);
            ExitCode::SUCCESS
        }
        Err(msg) => usage_error(&exe, &msg),
    }
}

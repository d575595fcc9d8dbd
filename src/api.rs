use std::num::NonZeroU32;

// --------------------------
// Public API types
// --------------------------

/// Widest beat the engine accepts, in bytes.
///
/// The validity mask is a `u64`, one bit per byte lane.
pub const MAX_BEAT_WIDTH: usize = 64;

/// Beat width of the 32-bit data path the catalog defaults were sized for.
pub const DEFAULT_BEAT_WIDTH: usize = 4;

/// Global pattern identifier.
///
/// Ids start at 1 so that an output payload of 0 can mean "no match". A
/// pattern's id is its partition's base offset plus its 1-based ordinal
/// within the partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(NonZeroU32);

impl PatternId {
    /// Returns `None` for the reserved "no match" value 0.
    #[inline]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One fixed-width chunk of the input stream plus its transport metadata.
///
/// `data` normally holds exactly `beat_width` bytes. Lanes past the end of
/// `data`, and lanes whose `keep` bit is clear, are treated as invalid and can
/// never take part in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Beat<'a> {
    /// Byte lanes, lane 0 first in stream order.
    pub data: &'a [u8],
    /// Validity mask; bit `i` set means lane `i` carries a real byte.
    pub keep: u64,
    /// Destination tag, passed through to the output record.
    pub dest: u16,
    /// End-of-message marker, passed through to the output record.
    pub last: bool,
}

impl<'a> Beat<'a> {
    /// Builds a beat whose every present lane is valid.
    pub fn full(data: &'a [u8], dest: u16) -> Self {
        Self {
            data,
            keep: lane_mask(data.len()),
            dest,
            last: false,
        }
    }

    /// Marks this beat as the final beat of a message.
    pub fn with_last(mut self, last: bool) -> Self {
        self.last = last;
        self
    }

    /// Returns true when lane `i` exists and its keep bit is set.
    #[inline]
    pub fn lane_valid(&self, i: usize) -> bool {
        i < self.data.len() && i < MAX_BEAT_WIDTH && (self.keep >> i) & 1 == 1
    }
}

/// Mask with the low `lanes` bits set (saturating at 64 lanes).
#[inline]
pub fn lane_mask(lanes: usize) -> u64 {
    if lanes >= MAX_BEAT_WIDTH {
        u64::MAX
    } else {
        (1u64 << lanes) - 1
    }
}

/// Output produced for every input beat.
///
/// `payload` is the single resolved match id for the beat (0 = none). The
/// remaining fields are copied verbatim from the input beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputRecord {
    pub payload: u32,
    pub keep: u64,
    pub dest: u16,
    pub last: bool,
}

impl OutputRecord {
    /// Decodes the payload slot into a pattern id.
    #[inline]
    pub fn match_id(&self) -> Option<PatternId> {
        PatternId::new(self.payload)
    }
}

/// The finding a single partition resolved to for one beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionHit {
    /// Winning pattern (highest matching ordinal in the partition).
    pub id: PatternId,
    /// Absolute stream offset of the winning pattern's last byte, taken from
    /// the earliest lane in the beat where it matched.
    pub end_offset: u64,
}

/// Full per-beat view: the compatibility record plus every partition's hit.
///
/// The record's payload keeps only the highest-indexed partition's finding;
/// `partitions` exposes all of them.
#[derive(Clone, Copy, Debug)]
pub struct BeatReport<'a> {
    pub record: OutputRecord,
    pub partitions: &'a [Option<PartitionHit>],
}

impl BeatReport<'_> {
    /// Iterates every partition hit in ascending partition order.
    pub fn hits(&self) -> impl Iterator<Item = PartitionHit> + '_ {
        self.partitions.iter().flatten().copied()
    }
}

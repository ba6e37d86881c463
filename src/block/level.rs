//! Level → search-parameter table and the per-call [`Block`] descriptor.
//!
//! Bands:
//!   - 1–3   fast: small window, few attempts, skip acceleration on misses
//!   - 4–6   default: 32 KB window, lazy matching, full chain insertion
//!   - 7–9   enhanced: 5-byte hashing, full 64 KB window, early exit at 64
//!   - 10–12 maximum: deepest chains, largest hash table, same early exit

use crate::block::types::{
    check_block_size, CompressOptions, CompressionLevel, MatchVariant, KB, MAX_DISTANCE,
    MAX_MATCH_LENGTH,
};
use crate::caps::ByteCompare;
use crate::error::Result;
use crate::matcher::SearchParams;

/// Match length beyond which lazy evaluation is not attempted.
pub const LAZY_CUTOFF: usize = 32;

// ─────────────────────────────────────────────────────────────────────────────
// Level table
//
// Row order: { max_attempts, window, hash_log, skip_strength, enhanced,
//              lazy, good_enough, insert_covered }
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct LevelRow {
    max_attempts: u32,
    window: usize,
    hash_log: u32,
    skip_strength: Option<u32>,
    enhanced: bool,
    lazy: bool,
    good_enough: usize,
    insert_covered: bool,
}

const fn fast(max_attempts: u32, window: usize, hash_log: u32, skip: u32) -> LevelRow {
    LevelRow {
        max_attempts,
        window,
        hash_log,
        skip_strength: Some(skip),
        enhanced: false,
        lazy: false,
        good_enough: MAX_MATCH_LENGTH,
        insert_covered: false,
    }
}

const fn chained(
    max_attempts: u32,
    window: usize,
    hash_log: u32,
    enhanced: bool,
    good_enough: usize,
) -> LevelRow {
    LevelRow {
        max_attempts,
        window,
        hash_log,
        skip_strength: None,
        enhanced,
        lazy: true,
        good_enough,
        insert_covered: true,
    }
}

/// Index is the compression level; entry 0 is unused.
static LEVEL_TABLE: [LevelRow; 13] = [
    fast(1, 16 * KB, 12, 4),                                /* 0, unused */
    fast(1, 16 * KB, 12, 4),                                /* 1 */
    fast(2, 32 * KB, 13, 5),                                /* 2 */
    fast(4, 32 * KB, 13, 6),                                /* 3 */
    chained(8, 32 * KB, 14, false, MAX_MATCH_LENGTH),       /* 4 */
    chained(16, 32 * KB, 15, false, MAX_MATCH_LENGTH),      /* 5 */
    chained(32, 32 * KB, 15, false, MAX_MATCH_LENGTH),      /* 6 */
    chained(64, MAX_DISTANCE, 16, true, 64),                /* 7 */
    chained(128, MAX_DISTANCE, 16, true, 64),               /* 8 */
    chained(256, MAX_DISTANCE, 16, true, 64),               /* 9 */
    chained(1024, MAX_DISTANCE, 17, true, 64),              /* 10 */
    chained(2048, MAX_DISTANCE, 17, true, 64),              /* 11 */
    chained(4096, MAX_DISTANCE, 17, true, 64),              /* 12 */
];

/// Search parameters for `level` under `variant`.
pub fn search_params(level: CompressionLevel, variant: MatchVariant) -> SearchParams {
    let row = LEVEL_TABLE[level.get() as usize];
    let improved = variant == MatchVariant::Improved;
    SearchParams {
        max_attempts: row.max_attempts,
        window_size: row.window,
        hash_log: row.hash_log,
        skip_strength: row.skip_strength,
        enhanced_hash: row.enhanced && improved,
        lazy: row.lazy && improved,
        lazy_margin: if row.enhanced { 0 } else { 1 },
        lazy_cutoff: LAZY_CUTOFF,
        good_enough: row.good_enough,
        insert_covered: row.insert_covered,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block
// ─────────────────────────────────────────────────────────────────────────────

/// One unit of compression work: the input range, its level, and the search
/// parameters derived from them.  Immutable once built.
#[derive(Clone, Copy)]
pub struct Block<'a> {
    data: &'a [u8],
    level: CompressionLevel,
    params: SearchParams,
    compare: &'static dyn ByteCompare,
}

impl<'a> Block<'a> {
    /// Describe a block-API input, rejecting sizes outside the block range.
    pub fn new(data: &'a [u8], options: &CompressOptions) -> Result<Self> {
        check_block_size(data.len())?;
        Ok(Self::chunk(data, options))
    }

    /// Describe a chunk or frame block without the size check; used where
    /// the caller has already validated the enclosing input.
    pub(crate) fn chunk(data: &'a [u8], options: &CompressOptions) -> Self {
        Block {
            data,
            level: options.level,
            params: search_params(options.level, options.variant),
            compare: options.caps.byte_compare(),
        }
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    #[inline]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    #[inline]
    pub(crate) fn compare(&self) -> &'static dyn ByteCompare {
        self.compare
    }
}

impl std::fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("len", &self.data.len())
            .field("level", &self.level)
            .field("params", &self.params)
            .field("compare", &self.compare.name())
            .finish()
    }
}

//! Block-format constants, compression levels and per-call options.
//!
//! Covers:
//!   - Token layout constants (`MINMATCH`, `ML_BITS`, `RUN_MASK`, …)
//!   - Block size limits accepted by the block API
//!   - [`CompressionLevel`] — validated level newtype (1–12)
//!   - [`MatchVariant`] — baseline vs. improved match finder
//!   - [`CompressOptions`] — level + variant + CPU capabilities

use crate::caps::Capabilities;
use crate::config::{CLEVEL_DEFAULT, CLEVEL_MAX, CLEVEL_MIN};
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Common constants
// ─────────────────────────────────────────────────────────────────────────────

pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

/// Minimum match length encoded in a block.
pub const MINMATCH: usize = 4;

pub const ML_BITS: u32 = 4;
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

/// Largest back-reference distance expressible in the 2-byte offset field.
pub const MAX_DISTANCE: usize = 65_535;

/// Longest single match the encoder emits.
pub const MAX_MATCH_LENGTH: usize = 65_535;

/// A match may not start within this many bytes of the end of a block.
pub const MFLIMIT: usize = 12;

/// The last bytes of a block are always literals.
pub const LAST_LITERALS: usize = 5;

/// Smallest input accepted by [`compress_block`](super::compress_block).
pub const MIN_BLOCK_SIZE: usize = 16;

/// Largest input accepted by [`compress_block`](super::compress_block).
pub const MAX_BLOCK_SIZE: usize = 4 * MB;

/// Reject block inputs outside `[MIN_BLOCK_SIZE, MAX_BLOCK_SIZE]`.
#[inline]
pub fn check_block_size(size: usize) -> Result<()> {
    if (MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(Error::InvalidBlockSize { size })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CompressionLevel
// ─────────────────────────────────────────────────────────────────────────────

/// A compression level known to be within `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const MIN: CompressionLevel = CompressionLevel(CLEVEL_MIN as u8);
    pub const MAX: CompressionLevel = CompressionLevel(CLEVEL_MAX as u8);

    /// Validate `level`.
    pub fn new(level: u32) -> Result<Self> {
        if (CLEVEL_MIN..=CLEVEL_MAX).contains(&level) {
            Ok(CompressionLevel(level as u8))
        } else {
            Err(Error::InvalidCompressionLevel(level))
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0 as u32
    }

    /// Levels 7–12 hash five bytes and use the strict lazy-match rule.
    #[inline]
    pub fn is_enhanced(self) -> bool {
        self.0 >= 7
    }

    /// Iterate over every valid level, lowest first.
    pub fn all() -> impl Iterator<Item = CompressionLevel> {
        (CLEVEL_MIN..=CLEVEL_MAX).map(|l| CompressionLevel(l as u8))
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel(CLEVEL_DEFAULT as u8)
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = Error;

    fn try_from(level: u32) -> Result<Self> {
        CompressionLevel::new(level)
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MatchVariant
// ─────────────────────────────────────────────────────────────────────────────

/// Which match-finder flavour the level table is applied with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchVariant {
    /// 4-byte hashing and greedy parsing at every level.
    Baseline,
    /// Level bands decide hashing width and lazy matching.
    #[default]
    Improved,
}

// ─────────────────────────────────────────────────────────────────────────────
// CompressOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Everything one compression call needs besides the input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    pub level: CompressionLevel,
    pub variant: MatchVariant,
    pub caps: Capabilities,
}

impl CompressOptions {
    /// Options for `level` with the improved variant and detected capabilities.
    pub fn new(level: u32) -> Result<Self> {
        Ok(CompressOptions {
            level: CompressionLevel::new(level)?,
            variant: MatchVariant::Improved,
            caps: Capabilities::detect(),
        })
    }

    pub fn with_variant(mut self, variant: MatchVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            level: CompressionLevel::default(),
            variant: MatchVariant::Improved,
            caps: Capabilities::detect(),
        }
    }
}

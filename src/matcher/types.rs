//! Match-finder parameters, candidates and hash functions.
//!
//!   - [`SearchParams`]   — tuning knobs derived from a compression level
//!   - [`MatchCandidate`] — `(offset, length)` pair returned by a search
//!   - [`LazyDecision`]   — outcome of a one-step lazy evaluation
//!   - [`hash4`], [`hash5`] — Knuth multiplicative hashes

use crate::block::types::{MAX_DISTANCE, MAX_MATCH_LENGTH};

// ─────────────────────────────────────────────────────────────────────────────
// Hash functions
// ─────────────────────────────────────────────────────────────────────────────

/// Knuth's multiplicative constant (2^32 / φ).
pub const PRIME32: u32 = 2_654_435_761;

/// Hash of the 4 bytes at `data[pos..pos + 4]`, truncated to `hash_log` bits.
///
/// `HASH(v) = (v * 2654435761) >> (32 - hash_log)`
#[inline(always)]
pub fn hash4(data: &[u8], pos: usize, hash_log: u32) -> usize {
    let v = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]);
    (v.wrapping_mul(PRIME32) >> (32 - hash_log)) as usize
}

/// Hash of the 5 bytes at `data[pos..pos + 5]`: the fifth byte is folded in
/// between two multiplications so it perturbs every output bit.
#[inline(always)]
pub fn hash5(data: &[u8], pos: usize, hash_log: u32) -> usize {
    let v = u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]);
    let mixed = v.wrapping_mul(PRIME32) ^ data[pos + 4] as u32;
    (mixed.wrapping_mul(PRIME32) >> (32 - hash_log)) as usize
}

// ─────────────────────────────────────────────────────────────────────────────
// SearchParams
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning for one match-finder session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Chain links visited per search.
    pub max_attempts: u32,
    /// Maximum offset a match may use (≤ 65535).
    pub window_size: usize,
    /// Bits kept from each hash; the table has `1 << hash_log` slots.
    pub hash_log: u32,
    /// After `1 << s` consecutive misses the encoder starts skipping
    /// positions.  `None` disables skipping.
    pub skip_strength: Option<u32>,
    /// Hash five bytes instead of four.
    pub enhanced_hash: bool,
    /// Whether the encoder should consult [`lazy_match`](super::MatchFinder::lazy_match).
    pub lazy: bool,
    /// A deferred match must beat the current one by more than this many bytes.
    pub lazy_margin: usize,
    /// Matches at least this long are taken without lazy evaluation.
    pub lazy_cutoff: usize,
    /// Stop walking the chain once a match this long is found.
    pub good_enough: usize,
    /// Insert every position covered by an emitted match.
    pub insert_covered: bool,
}

impl SearchParams {
    /// Bytes consumed by one hash computation.
    #[inline]
    pub fn hash_width(&self) -> usize {
        if self.enhanced_hash {
            5
        } else {
            4
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            max_attempts: 32,
            window_size: MAX_DISTANCE,
            hash_log: 15,
            skip_strength: None,
            enhanced_hash: false,
            lazy: true,
            lazy_margin: 1,
            lazy_cutoff: 32,
            good_enough: MAX_MATCH_LENGTH,
            insert_covered: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search results
// ─────────────────────────────────────────────────────────────────────────────

/// A back-reference: copy `length` bytes starting `offset` bytes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    pub offset: usize,
    pub length: usize,
}

/// What the encoder should do with the match found at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyDecision {
    /// Emit the current match at the cursor.
    Keep,
    /// Emit the byte at the cursor as a literal and use this match, found
    /// one position later, instead.
    Defer(MatchCandidate),
}

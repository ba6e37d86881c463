//! Hash-chain match finder.
//!
//! Two tables drive the search:
//!
//! * the **hash table** maps a truncated hash of the next 4 (or 5) bytes to
//!   the most recent position with that hash;
//! * the **chain table**, indexed by position, links each position to the
//!   previous one that shared its hash, giving a newest-first list per bucket.
//!
//! Position 0 doubles as the "no previous" sentinel, so it is never returned
//! as a match source.  Insertions happen in strictly increasing position order
//! (tracked by `next_to_update`), which keeps `chain[p] < p` for every
//! inserted `p` and guarantees each position is hashed at most once.

use super::types::{hash4, hash5, LazyDecision, MatchCandidate, SearchParams};
use crate::block::types::{MAX_MATCH_LENGTH, MINMATCH};
use crate::caps::ByteCompare;

/// Stateful search over one input buffer.
///
/// Lifecycle: [`new`](Self::new) (unreset) → [`reset`](Self::reset) (ready)
/// → repeated `find_best_match` / `lazy_match` / `advance` until
/// [`at_end`](Self::at_end).  One instance per concurrently compressed unit;
/// never shared across threads.
pub struct MatchFinder<'a> {
    input: &'a [u8],
    params: SearchParams,
    compare: &'static dyn ByteCompare,
    hash_table: Vec<u32>,
    chain_table: Vec<u32>,
    cursor: usize,
    next_to_update: usize,
    ready: bool,
}

impl<'a> MatchFinder<'a> {
    /// Allocate the hash table for `params`.  The finder reports no matches
    /// until [`reset`](Self::reset) hands it an input.
    pub fn new(params: SearchParams, compare: &'static dyn ByteCompare) -> Self {
        MatchFinder {
            input: &[],
            params,
            compare,
            hash_table: vec![0u32; 1usize << params.hash_log],
            chain_table: Vec::new(),
            cursor: 0,
            next_to_update: 0,
            ready: false,
        }
    }

    /// Start a new session over `input`, discarding all previous state.
    ///
    /// The chain table only grows; stale entries beyond the new session are
    /// unreachable because the zeroed hash table is the sole entry point.
    pub fn reset(&mut self, input: &'a [u8]) {
        debug_assert!(input.len() <= u32::MAX as usize);
        self.input = input;
        if self.chain_table.len() < input.len() {
            self.chain_table.resize(input.len(), 0);
        }
        self.hash_table.fill(0);
        self.cursor = 0;
        self.next_to_update = 0;
        self.ready = true;
    }

    #[inline]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    // ── Cursor bookkeeping ──────────────────────────────────────────────────

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left after `pos`.
    #[inline]
    fn remaining_at(&self, pos: usize) -> usize {
        self.input.len().saturating_sub(pos)
    }

    /// Move the cursor forward by `n`, clamped to the end of the input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.input.len());
    }

    /// True once fewer than `MINMATCH` bytes remain after the cursor.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.remaining_at(self.cursor) < MINMATCH
    }

    // ── Table maintenance ───────────────────────────────────────────────────

    #[inline(always)]
    fn hash_at(&self, pos: usize) -> Option<usize> {
        if self.remaining_at(pos) < self.params.hash_width() {
            return None;
        }
        Some(if self.params.enhanced_hash {
            hash5(self.input, pos, self.params.hash_log)
        } else {
            hash4(self.input, pos, self.params.hash_log)
        })
    }

    /// Link `pos` into its hash bucket.  Positions too close to the end to
    /// hash are left out of every bucket.
    #[inline]
    pub fn insert_hash(&mut self, pos: usize) {
        if let Some(h) = self.hash_at(pos) {
            self.chain_table[pos] = self.hash_table[h];
            self.hash_table[h] = pos as u32;
        }
    }

    /// Insert every position in `[next_to_update, target)`.
    #[inline]
    fn insert_up_to(&mut self, target: usize) {
        while self.next_to_update < target {
            let idx = self.next_to_update;
            self.insert_hash(idx);
            self.next_to_update = idx + 1;
        }
    }

    /// Bring the tables up to (but excluding) `pos`.  Fast levels skip the
    /// positions covered by earlier matches instead of inserting them.
    #[inline]
    fn catch_up(&mut self, pos: usize) {
        if self.params.insert_covered {
            self.insert_up_to(pos);
        } else if self.next_to_update < pos {
            self.next_to_update = pos;
        }
    }

    /// Previous position in `pos`'s chain, if any.
    pub fn previous(&self, pos: usize) -> Option<usize> {
        match self.chain_table.get(pos).copied() {
            Some(0) | None => None,
            Some(p) => Some(p as usize),
        }
    }

    /// Most recent position whose hash equals the hash at `pos`.
    pub fn bucket_head(&self, pos: usize) -> Option<usize> {
        let h = self.hash_at(pos)?;
        match self.hash_table[h] {
            0 => None,
            p => Some(p as usize),
        }
    }

    // ── Search ──────────────────────────────────────────────────────────────

    /// Longest earlier occurrence of the bytes at `pos` within the window.
    ///
    /// Always leaves `pos` inserted in the tables.  Ties go to the nearest
    /// candidate since the chain is walked newest-first.
    pub fn find_best_match(&mut self, pos: usize) -> Option<MatchCandidate> {
        if !self.ready || self.remaining_at(pos) < MINMATCH {
            return None;
        }
        self.catch_up(pos);

        let found = match self.hash_at(pos) {
            Some(h) => {
                let head = self.hash_table[h] as usize;
                let window_floor = pos.saturating_sub(self.params.window_size);
                if head == 0 || head < window_floor {
                    None
                } else {
                    self.walk_chain(pos, head, window_floor)
                }
            }
            None => None,
        };

        if self.next_to_update <= pos {
            self.insert_up_to(pos + 1);
        }
        found
    }

    fn walk_chain(&self, pos: usize, head: usize, window_floor: usize) -> Option<MatchCandidate> {
        let input = self.input;
        let limit = self.remaining_at(pos).min(MAX_MATCH_LENGTH);
        let good_enough = self.params.good_enough.min(limit);

        let mut best: Option<MatchCandidate> = None;
        let mut best_len = MINMATCH - 1;
        let mut attempts = self.params.max_attempts;
        let mut candidate = head;

        while candidate != 0 && candidate >= window_floor && attempts > 0 {
            attempts -= 1;
            // `pos` itself may already sit at the bucket head.
            if candidate < pos && input[candidate + best_len] == input[pos + best_len] {
                let len = self.compare.common_prefix(input, candidate, pos, limit);
                if len > best_len {
                    best_len = len;
                    best = Some(MatchCandidate {
                        offset: pos - candidate,
                        length: len,
                    });
                    if len >= good_enough {
                        break;
                    }
                }
            }
            candidate = self.chain_table[candidate] as usize;
        }
        best
    }

    /// Decide whether to emit `current` at the cursor or defer by one byte.
    ///
    /// Long matches (≥ `lazy_cutoff`) are kept without probing.  The match at
    /// `cursor + 1` wins only if it is longer than `current` by more than
    /// `lazy_margin` bytes.
    pub fn lazy_match(&mut self, current: MatchCandidate) -> LazyDecision {
        let pos = self.cursor;
        if current.length >= self.params.lazy_cutoff || self.remaining_at(pos) < 2 {
            return LazyDecision::Keep;
        }
        match self.find_best_match(pos + 1) {
            Some(next) if next.length > current.length + self.params.lazy_margin => {
                LazyDecision::Defer(next)
            }
            _ => LazyDecision::Keep,
        }
    }
}

//! CPU capability detection and the byte-compare seam used by the match finder.
//!
//! Capabilities are detected once by the caller and passed by value into the
//! codec configuration ([`crate::block::CompressOptions`]).  The match finder
//! only ever talks to a [`ByteCompare`] backend, so a vectorised comparator
//! can be slotted in without touching the search algorithm.  Today every
//! capability set resolves to the scalar word-at-a-time backend.

// ─────────────────────────────────────────────────────────────────────────────
// Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// SIMD features available on the running CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub sse2: bool,
    pub avx2: bool,
    pub neon: bool,
}

impl Capabilities {
    /// Probe the running CPU.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Capabilities {
                sse2: is_x86_feature_detected!("sse2"),
                avx2: is_x86_feature_detected!("avx2"),
                neon: false,
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            // NEON is mandatory on aarch64.
            Capabilities {
                sse2: false,
                avx2: false,
                neon: true,
            }
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        Capabilities::scalar()
    }

    /// A capability set with every feature disabled.
    pub const fn scalar() -> Self {
        Capabilities {
            sse2: false,
            avx2: false,
            neon: false,
        }
    }

    /// Backend used for match-length comparison under these capabilities.
    pub fn byte_compare(self) -> &'static dyn ByteCompare {
        // No vectorised comparator exists yet; all feature sets share the
        // word-at-a-time path.
        &WORD_COMPARE
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ByteCompare
// ─────────────────────────────────────────────────────────────────────────────

/// Length of the common prefix of two positions inside one buffer.
pub trait ByteCompare: Send + Sync {
    /// Number of equal bytes at `data[earlier..]` and `data[later..]`,
    /// capped at `limit`.
    ///
    /// Callers guarantee `earlier < later` and `later + limit <= data.len()`.
    fn common_prefix(&self, data: &[u8], earlier: usize, later: usize, limit: usize) -> usize;

    /// Backend name, for diagnostics.
    fn name(&self) -> &'static str;
}

/// Portable comparator: XORs 8-byte words and counts trailing zero bits of
/// the first difference, then finishes byte by byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCompare;

static WORD_COMPARE: WordCompare = WordCompare;

const WORD: usize = core::mem::size_of::<u64>();

#[inline(always)]
fn read_u64_le(data: &[u8], pos: usize) -> u64 {
    let mut bytes = [0u8; WORD];
    bytes.copy_from_slice(&data[pos..pos + WORD]);
    u64::from_le_bytes(bytes)
}

impl ByteCompare for WordCompare {
    #[inline]
    fn common_prefix(&self, data: &[u8], earlier: usize, later: usize, limit: usize) -> usize {
        debug_assert!(earlier < later);
        debug_assert!(later + limit <= data.len());

        let mut n = 0usize;
        while n + WORD <= limit {
            let diff = read_u64_le(data, earlier + n) ^ read_u64_le(data, later + n);
            if diff != 0 {
                return n + (diff.trailing_zeros() / 8) as usize;
            }
            n += WORD;
        }
        while n < limit && data[earlier + n] == data[later + n] {
            n += 1;
        }
        n
    }

    fn name(&self) -> &'static str {
        "word"
    }
}

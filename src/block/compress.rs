//! Block encoder: drives the match finder over one block and serialises the
//! resulting sequences as LZ4 tokens.
//!
//! Sequence layout (one per match, plus a final literal-only sequence):
//!
//! ```text
//! token            1 byte   high nibble = min(literals, 15)
//!                           low nibble  = min(match_len - 4, 15)
//! [literal ext]    n bytes  (literals - 15) as 255, 255, …, <255
//! literals         literals bytes
//! offset           2 bytes  little-endian, 1..=65535
//! [match ext]      n bytes  (match_len - 4 - 15) as 255, 255, …, <255
//! ```
//!
//! The last sequence of a block carries literals only (match nibble 0) and is
//! always emitted, so a decoder recognises the end of the block by running
//! out of input right after a literal run.
//!
//! Matches start at least [`MFLIMIT`] bytes before the end of the input and
//! stop [`LAST_LITERALS`] bytes short of it, so the final sequence holds at
//! least five literals as reference LZ4 decoders require.

use super::level::Block;
use super::types::{
    check_block_size, CompressOptions, MatchVariant, LAST_LITERALS, MFLIMIT, MINMATCH, ML_MASK,
    RUN_MASK,
};
use crate::error::{Error, Result};
use crate::matcher::{LazyDecision, MatchCandidate, MatchFinder};

// ─────────────────────────────────────────────────────────────────────────────
// Utility
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for `input_size` bytes of incompressible data.
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    input_size + input_size / 255 + 16
}

// ─────────────────────────────────────────────────────────────────────────────
// Token sinks
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for encoded bytes: a growable `Vec` or a caller-provided slice
/// already checked against [`compress_bound`].
pub(crate) trait TokenSink {
    fn put(&mut self, byte: u8);
    fn put_slice(&mut self, bytes: &[u8]);
}

impl TokenSink for Vec<u8> {
    #[inline(always)]
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline(always)]
    fn put_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

struct SliceSink<'d> {
    dst: &'d mut [u8],
    pos: usize,
}

impl TokenSink for SliceSink<'_> {
    #[inline(always)]
    fn put(&mut self, byte: u8) {
        self.dst[self.pos] = byte;
        self.pos += 1;
    }

    #[inline(always)]
    fn put_slice(&mut self, bytes: &[u8]) {
        self.dst[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }
}

/// Continuation bytes for a length that overflowed its nibble.
#[inline]
fn put_length<S: TokenSink>(sink: &mut S, mut len: usize) {
    while len >= 255 {
        sink.put(255);
        len -= 255;
    }
    sink.put(len as u8);
}

#[inline]
fn put_token<S: TokenSink>(sink: &mut S, literals: usize, match_code: u8) {
    let run = literals.min(RUN_MASK as usize) as u8;
    sink.put((run << 4) | match_code);
    if literals >= RUN_MASK as usize {
        put_length(sink, literals - RUN_MASK as usize);
    }
}

/// Emit one sequence: `literals` followed by an optional match.
fn put_sequence<S: TokenSink>(sink: &mut S, literals: &[u8], m: Option<MatchCandidate>) {
    let ml_code = m.map_or(0, |m| m.length - MINMATCH);
    put_token(sink, literals.len(), ml_code.min(ML_MASK as usize) as u8);
    sink.put_slice(literals);
    if let Some(m) = m {
        debug_assert!(m.offset > 0 && m.offset <= u16::MAX as usize);
        sink.put_slice(&(m.offset as u16).to_le_bytes());
        if ml_code >= ML_MASK as usize {
            put_length(sink, ml_code - ML_MASK as usize);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Core compression loop
// ─────────────────────────────────────────────────────────────────────────────

/// Encode `block` into `sink`.
///
/// With `terminate` set the trailing literals are written as the final
/// literal-only sequence and `0` is returned.  Otherwise the output stops
/// after the last match and the number of trailing bytes left unencoded is
/// returned; the caller owns getting them into the stream (see
/// [`splice_literals`]).
pub(crate) fn encode_block<S: TokenSink>(block: &Block<'_>, sink: &mut S, terminate: bool) -> usize {
    let src = block.data();
    let params = *block.params();
    let mut mf = MatchFinder::new(params, block.compare());
    mf.reset(src);

    let mut anchor = 0usize;
    let mut misses = 0u32;
    // Last position a match may start at, and the furthest it may reach.
    let search_end = src.len().saturating_sub(MFLIMIT);
    let match_end = src.len().saturating_sub(LAST_LITERALS);

    while !mf.at_end() && mf.position() <= search_end {
        let pos = mf.position();
        let Some(mut candidate) = mf.find_best_match(pos) else {
            misses = misses.saturating_add(1);
            let step = match params.skip_strength {
                Some(strength) => 1 + (misses >> strength) as usize,
                None => 1,
            };
            mf.advance(step);
            continue;
        };
        misses = 0;

        if params.lazy {
            while mf.position() < search_end {
                let LazyDecision::Defer(next) = mf.lazy_match(candidate) else {
                    break;
                };
                mf.advance(1);
                candidate = next;
            }
        }

        let start = mf.position();
        candidate.length = candidate.length.min(match_end - start);
        put_sequence(sink, &src[anchor..start], Some(candidate));
        mf.advance(candidate.length);
        anchor = mf.position();
    }

    if terminate {
        put_sequence(sink, &src[anchor..], None);
        0
    } else {
        src.len() - anchor
    }
}

/// Compress `block` into a fresh buffer sized by [`compress_bound`].
pub(crate) fn compress_to_vec(block: &Block<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(compress_bound(block.data().len()));
    encode_block(block, &mut out, true);
    out
}

/// Compress a chunk that is followed by more chunks in the same token stream.
///
/// Returns the encoded body (ending after its last match, possibly empty)
/// and the count of trailing input bytes still to be emitted as literals.
pub(crate) fn compress_open_chunk(block: &Block<'_>) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(compress_bound(block.data().len()));
    let pending = encode_block(block, &mut out, false);
    (out, pending)
}

/// Append `body` to `out`, prefixing its first sequence's literal run with
/// `carried`.
///
/// `body` must start with a sequence header (it is non-empty output of
/// [`compress_open_chunk`] or [`compress_to_vec`]).  Offsets inside `body`
/// are relative to the output position, so lengthening its first literal
/// run leaves every back-reference valid.
pub(crate) fn splice_literals(out: &mut Vec<u8>, carried: &[u8], body: &[u8]) -> Result<()> {
    if carried.is_empty() {
        out.extend_from_slice(body);
        return Ok(());
    }
    let token = *body
        .first()
        .ok_or(Error::MalformedBlock("empty chunk body"))?;
    let mut idx = 1usize;
    let mut literals = (token >> 4) as usize;
    if literals == RUN_MASK as usize {
        loop {
            let b = *body
                .get(idx)
                .ok_or(Error::MalformedBlock("truncated literal length"))?;
            idx += 1;
            literals += b as usize;
            if b != 255 {
                break;
            }
        }
    }
    put_token(out, carried.len() + literals, token & ML_MASK as u8);
    out.extend_from_slice(carried);
    out.extend_from_slice(&body[idx..]);
    Ok(())
}

/// Emit `literals` as the final literal-only sequence of a token stream.
pub(crate) fn finish_literals(out: &mut Vec<u8>, literals: &[u8]) {
    put_sequence(out, literals, None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` at `level` (1–12) into a new buffer.
///
/// `src` must be between 16 bytes and 4 MB; both arguments are validated
/// before any work is done.
pub fn compress_block(src: &[u8], level: u32) -> Result<Vec<u8>> {
    compress_block_with(src, &CompressOptions::new(level)?)
}

/// Compress `src` with explicit options (variant, capabilities).
pub fn compress_block_with(src: &[u8], options: &CompressOptions) -> Result<Vec<u8>> {
    let block = Block::new(src, options)?;
    Ok(compress_to_vec(&block))
}

/// Compress `src` with the baseline (greedy, 4-byte hash) match finder.
pub fn compress_block_baseline(src: &[u8], level: u32) -> Result<Vec<u8>> {
    compress_block_with(src, &CompressOptions::new(level)?.with_variant(MatchVariant::Baseline))
}

/// Compress `src` into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least [`compress_bound`]`(src.len())` bytes; this is
/// checked up front so a short buffer never receives partial output.
pub fn compress_block_into(src: &[u8], level: u32, dst: &mut [u8]) -> Result<usize> {
    let options = CompressOptions::new(level)?;
    check_block_size(src.len())?;
    let needed = compress_bound(src.len());
    if dst.len() < needed {
        return Err(Error::DestinationTooSmall {
            needed,
            available: dst.len(),
        });
    }
    let block = Block::chunk(src, &options);
    let mut sink = SliceSink { dst, pos: 0 };
    encode_block(&block, &mut sink, true);
    Ok(sink.pos)
}

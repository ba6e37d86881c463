//! Block decoder.
//!
//! Every length, offset and copy is bounds-checked; malformed input yields an
//! error and never reads or writes out of range.  On error the caller's
//! buffer is truncated back to its original length.

use super::types::{MINMATCH, ML_MASK, RUN_MASK};
use crate::error::{Error, Result};

/// First allocation when the caller supplies no capacity hint.
const INITIAL_CAPACITY: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Output capacity negotiation
// ─────────────────────────────────────────────────────────────────────────────

/// View of the caller's buffer for one block: `start` marks where this
/// block's output begins, and at most `limit` bytes may follow it.
struct OutputWindow<'v> {
    buf: &'v mut Vec<u8>,
    start: usize,
    limit: usize,
}

impl<'v> OutputWindow<'v> {
    fn new(buf: &'v mut Vec<u8>, limit: usize, hint: usize) -> Self {
        let start = buf.len();
        let mut window = OutputWindow { buf, start, limit };
        window.grow_to(hint.max(INITIAL_CAPACITY).min(limit));
        window
    }

    #[inline]
    fn produced(&self) -> usize {
        self.buf.len() - self.start
    }

    /// Make room for `additional` more bytes, doubling the reserved space
    /// (capped at `limit`) until it fits.
    fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .produced()
            .checked_add(additional)
            .filter(|&n| n <= self.limit)
            .ok_or(Error::CapacityExceeded { limit: self.limit })?;
        let reserved = self.buf.capacity() - self.start;
        if needed > reserved {
            let mut target = reserved.max(INITIAL_CAPACITY);
            while target < needed {
                target = target.saturating_mul(2);
            }
            self.grow_to(target.min(self.limit));
        }
        Ok(())
    }

    fn grow_to(&mut self, block_capacity: usize) {
        let total = self.start.saturating_add(block_capacity);
        if total > self.buf.capacity() {
            self.buf.reserve_exact(total - self.buf.len());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
fn read_length(src: &[u8], ip: &mut usize, mut len: usize, what: &'static str) -> Result<usize> {
    loop {
        let b = *src.get(*ip).ok_or(Error::MalformedBlock(what))?;
        *ip += 1;
        len = len
            .checked_add(b as usize)
            .ok_or(Error::MalformedBlock("length overflow"))?;
        if b != 255 {
            return Ok(len);
        }
    }
}

fn decode(src: &[u8], out: &mut OutputWindow<'_>) -> Result<()> {
    if src.is_empty() {
        return Err(Error::MalformedBlock("empty block"));
    }
    let mut ip = 0usize;

    loop {
        let token = *src
            .get(ip)
            .ok_or(Error::MalformedBlock("truncated token"))?;
        ip += 1;

        // literals
        let mut lit_len = (token >> 4) as usize;
        if lit_len == RUN_MASK as usize {
            lit_len = read_length(src, &mut ip, lit_len, "truncated literal length")?;
        }
        let lit_end = ip
            .checked_add(lit_len)
            .filter(|&end| end <= src.len())
            .ok_or(Error::MalformedBlock("literal run past end of block"))?;
        out.reserve(lit_len)?;
        out.buf.extend_from_slice(&src[ip..lit_end]);
        ip = lit_end;

        if ip == src.len() {
            return Ok(());
        }

        // match
        let offset_bytes = src
            .get(ip..ip + 2)
            .ok_or(Error::MalformedBlock("truncated match offset"))?;
        let offset = u16::from_le_bytes([offset_bytes[0], offset_bytes[1]]) as usize;
        ip += 2;
        if offset == 0 || offset > out.buf.len() {
            return Err(Error::InvalidMatchOffset {
                offset,
                position: out.produced(),
            });
        }

        let mut match_len = (token & ML_MASK as u8) as usize;
        if match_len == ML_MASK as usize {
            match_len = read_length(src, &mut ip, match_len, "truncated match length")?;
        }
        match_len += MINMATCH;
        out.reserve(match_len)?;

        // Byte at a time: the source range may overlap the bytes being written.
        let from = out.buf.len() - offset;
        for i in 0..match_len {
            let b = out.buf[from + i];
            out.buf.push(b);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Decode one block, producing at most `max_size` bytes.
pub fn decompress_block(src: &[u8], max_size: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress_block_into(src, &mut out, max_size)?;
    Ok(out)
}

/// Decode one block, appending at most `max_size` bytes to `out`.
///
/// Bytes already in `out` are history: matches may reach back into them.
/// Returns the number of bytes appended.
pub fn decompress_block_into(src: &[u8], out: &mut Vec<u8>, max_size: usize) -> Result<usize> {
    let hint = src.len().saturating_mul(2);
    let mut window = OutputWindow::new(out, max_size, hint);
    let start = window.start;
    match decode(src, &mut window) {
        Ok(()) => Ok(window.produced()),
        Err(e) => {
            out.truncate(start);
            Err(e)
        }
    }
}

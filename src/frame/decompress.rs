//! Streaming frame reader.
//!
//! [`FrameReader`] pulls one block at a time from any `R: Read` and serves
//! `read()` calls from the decoded block.  Linked-block frames are supported
//! by keeping up to 64 KB of earlier output as match history.

use std::io::{self, Read};

use crate::block::decompress::decompress_block_into;
use crate::error::{ChecksumKind, Error, Result};
use crate::frame::header::{decode_header, parse_prefix};
use crate::frame::types::{
    FrameInfo, BLOCK_UNCOMPRESSED_FLAG, BH_SIZE, CHECKSUM_SIZE, LINKED_HISTORY, MAX_FH_SIZE,
};
use crate::xxhash::{frame_checksum_state, xxh32_oneshot, Xxh32State, FRAME_CHECKSUM_SEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Idle,
    HeaderRead,
    Draining,
    Eof,
    /// A previous call failed; the stream position is unknown.
    Failed,
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameReader<R>
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming LZ4 frame decompressor backed by any `R: Read`.
///
/// `read()` returns 0 once the end marker has been consumed and the content
/// checksum (if any) verified.  Bytes after the frame are left unread.
pub struct FrameReader<R: Read> {
    inner: R,
    state: ReaderState,
    info: FrameInfo,
    /// Decoded output: history (linked frames only) followed by the current
    /// block.
    pending: Vec<u8>,
    /// Next byte of `pending` to hand out.
    pos: usize,
    block: Vec<u8>,
    content_hash: Option<Xxh32State>,
    produced: u64,
}

/// Map a premature end of the source to a frame error.
fn truncated(e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::InvalidFrameFormat("unexpected end of frame")
    } else {
        Error::Io(e)
    }
}

impl<R: Read> FrameReader<R> {
    /// Wrap `inner`; the header is read on first use.
    pub fn new(inner: R) -> Self {
        FrameReader {
            inner,
            state: ReaderState::Idle,
            info: FrameInfo::default(),
            pending: Vec::new(),
            pos: 0,
            block: Vec::new(),
            content_hash: None,
            produced: 0,
        }
    }

    /// Parsed frame header, reading it first if necessary.
    pub fn frame_info(&mut self) -> Result<&FrameInfo> {
        self.read_header()?;
        Ok(&self.info)
    }

    /// Decompressed bytes produced so far.
    pub fn bytes_produced(&self) -> u64 {
        self.produced
    }

    /// Return the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_header(&mut self) -> Result<()> {
        match self.state {
            ReaderState::Idle => {}
            ReaderState::Failed => {
                return Err(Error::InvalidFrameFormat("frame reader failed earlier"))
            }
            _ => return Ok(()),
        }
        let mut prefix = [0u8; 6];
        self.inner.read_exact(&mut prefix).map_err(truncated)?;
        let rest_len = parse_prefix(&prefix)?;
        let mut rest = [0u8; MAX_FH_SIZE - 6];
        self.inner
            .read_exact(&mut rest[..rest_len])
            .map_err(truncated)?;
        self.info = decode_header(&prefix, &rest[..rest_len])?;

        crate::displaylevel!(
            4,
            "frame header: block {} KB, {} blocks, content size {:?}\n",
            self.info.block_size_id.block_size() / 1024,
            if self.info.independent_blocks { "independent" } else { "linked" },
            self.info.content_size
        );
        self.content_hash = self.info.content_checksum.then(frame_checksum_state);
        self.block.reserve(self.info.block_size_id.block_size());
        self.state = ReaderState::HeaderRead;
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut word = [0u8; 4];
        self.inner.read_exact(&mut word).map_err(truncated)?;
        Ok(u32::from_le_bytes(word))
    }

    /// Read and decode the next block.  Returns `false` at the end marker.
    fn next_block(&mut self) -> Result<bool> {
        let raw = self.read_u32()?;
        if raw == 0 {
            self.finish_frame()?;
            return Ok(false);
        }

        let stored = raw & BLOCK_UNCOMPRESSED_FLAG != 0;
        let size = (raw & !BLOCK_UNCOMPRESSED_FLAG) as usize;
        let max = self.info.block_size_id.block_size();
        if size > max {
            return Err(Error::InvalidFrameFormat("block larger than frame maximum"));
        }

        self.block.resize(size, 0);
        self.inner.read_exact(&mut self.block).map_err(truncated)?;
        if self.info.block_checksum {
            let expected = self.read_u32()?;
            let actual = xxh32_oneshot(&self.block, FRAME_CHECKSUM_SEED);
            if expected != actual {
                return Err(Error::ChecksumMismatch {
                    kind: ChecksumKind::Block,
                    expected,
                    actual,
                });
            }
        }

        if self.info.independent_blocks {
            self.pending.clear();
        } else if self.pending.len() > LINKED_HISTORY {
            let excess = self.pending.len() - LINKED_HISTORY;
            self.pending.drain(..excess);
        }
        let start = self.pending.len();
        self.pos = start;
        if stored {
            self.pending.extend_from_slice(&self.block);
        } else {
            decompress_block_into(&self.block, &mut self.pending, max)?;
        }

        let fresh = &self.pending[start..];
        if let Some(hash) = self.content_hash.as_mut() {
            hash.update(fresh);
        }
        self.produced += fresh.len() as u64;
        crate::displaylevel!(
            5,
            "frame block: {} -> {} bytes{}\n",
            size + BH_SIZE,
            fresh.len(),
            if stored { " (stored)" } else { "" }
        );
        self.state = ReaderState::Draining;
        Ok(true)
    }

    fn finish_frame(&mut self) -> Result<()> {
        if let Some(hash) = self.content_hash.take() {
            let mut word = [0u8; CHECKSUM_SIZE];
            self.inner.read_exact(&mut word).map_err(truncated)?;
            let expected = u32::from_le_bytes(word);
            let actual = hash.digest();
            if expected != actual {
                return Err(Error::ChecksumMismatch {
                    kind: ChecksumKind::Content,
                    expected,
                    actual,
                });
            }
        }
        if let Some(declared) = self.info.content_size {
            if declared != self.produced {
                return Err(Error::ContentSizeMismatch {
                    declared,
                    actual: self.produced,
                });
            }
        }
        self.state = ReaderState::Eof;
        Ok(())
    }

    /// Fill `buf` with decoded bytes; `Ok(0)` at end of frame.
    ///
    /// After an error every further call fails as well.
    pub fn read_data(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.fill(buf).map_err(|e| {
            self.state = ReaderState::Failed;
            self.pos = self.pending.len();
            e
        })
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_header()?;
        loop {
            let available = self.pending.len() - self.pos;
            if available > 0 {
                let n = available.min(buf.len());
                buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
                self.pos += n;
                return Ok(n);
            }
            if self.state == ReaderState::Eof || !self.next_block()? {
                return Ok(0);
            }
        }
    }
}

impl<R: Read> Read for FrameReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_data(buf)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress one complete frame from `data`.
pub fn decompress_frame(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = FrameReader::new(data);
    let mut out = Vec::new();
    if let Some(size) = reader.frame_info()?.content_size {
        out.reserve(size.min(16 << 20) as usize);
    }
    let mut tmp = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read_data(&mut tmp)?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&tmp[..n]);
    }
    Ok(out)
}

//! Streaming frame writer.
//!
//! [`FrameWriter`] wraps any `W: Write`.  Input is gathered into a buffer of
//! the frame's block size; each full buffer becomes one independent block.
//! The header is written lazily, on the first `write()` or on `close()`.

use std::io::{self, Write};

use crate::block::compress::compress_to_vec;
use crate::block::level::Block;
use crate::block::types::{CompressOptions, MIN_BLOCK_SIZE};
use crate::error::{Error, Result};
use crate::frame::header::encode_header;
use crate::frame::types::{FrameOptions, BLOCK_UNCOMPRESSED_FLAG};
use crate::xxhash::{frame_checksum_state, xxh32_oneshot, Xxh32State, FRAME_CHECKSUM_SEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Idle,
    HeaderWritten,
    Buffering,
    Closed,
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameWriter<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming LZ4 frame compressor backed by any `W: Write`.
///
/// Call [`close`](Self::close) or [`finish`](Self::finish) to write the end
/// marker and optional content checksum.  If the writer is dropped unclosed
/// the frame is closed on a best-effort basis and errors are discarded.
///
/// ```no_run
/// use lz4chain::frame::{FrameOptions, FrameWriter};
/// use std::io::Write;
///
/// let mut w = FrameWriter::new(Vec::new(), FrameOptions::default());
/// w.write_all(b"hello").unwrap();
/// let frame = w.finish().unwrap();
/// ```
pub struct FrameWriter<W: Write> {
    /// Wrapped in `Option` so `finish()` can hand it back.
    inner: Option<W>,
    options: FrameOptions,
    compress: CompressOptions,
    state: WriterState,
    buffer: Vec<u8>,
    block_size: usize,
    content_hash: Option<Xxh32State>,
    written: u64,
    /// Sticky: after an I/O or encode failure `Drop` does not try to close.
    errored: bool,
}

impl<W: Write> FrameWriter<W> {
    /// Create a writer; nothing is written until the first `write()`.
    pub fn new(inner: W, options: FrameOptions) -> Self {
        let block_size = options.block_size_id.block_size();
        FrameWriter {
            inner: Some(inner),
            compress: options.compress_options(),
            content_hash: options.content_checksum.then(frame_checksum_state),
            options,
            state: WriterState::Idle,
            buffer: Vec::with_capacity(block_size),
            block_size,
            written: 0,
            errored: false,
        }
    }

    pub fn options(&self) -> &FrameOptions {
        &self.options
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn is_closed(&self) -> bool {
        self.state == WriterState::Closed
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    fn sink(inner: &mut Option<W>) -> Result<&mut W> {
        inner.as_mut().ok_or(Error::StreamClosed)
    }

    fn write_header(&mut self) -> Result<()> {
        if self.state != WriterState::Idle {
            return Ok(());
        }
        let info = self.options.frame_info();
        let header = encode_header(&info);
        Self::sink(&mut self.inner)?.write_all(&header)?;
        crate::displaylevel!(
            4,
            "frame header: level {}, block {} KB, flags {:#04x}\n",
            self.options.level,
            self.block_size / 1024,
            info.flags()
        );
        self.state = WriterState::HeaderWritten;
        Ok(())
    }

    /// Accept `data` into the frame, emitting a block whenever the buffer
    /// fills.
    pub fn write_data(&mut self, mut data: &[u8]) -> Result<()> {
        if self.state == WriterState::Closed {
            return Err(Error::StreamClosed);
        }
        self.guard(|w| w.write_header())?;
        if let Some(hash) = self.content_hash.as_mut() {
            hash.update(data);
        }
        self.written += data.len() as u64;

        while !data.is_empty() {
            let room = self.block_size - self.buffer.len();
            let take = room.min(data.len());
            self.buffer.extend_from_slice(&data[..take]);
            data = &data[take..];
            self.state = WriterState::Buffering;
            if self.buffer.len() == self.block_size {
                self.guard(|w| w.flush_block())?;
            }
        }
        Ok(())
    }

    /// Compress and emit the buffered bytes as one block.
    ///
    /// Blocks that do not shrink, or are shorter than the block-API minimum,
    /// are stored raw with the high bit of the size field set.
    pub fn flush_block(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let compressed = (self.buffer.len() >= MIN_BLOCK_SIZE)
            .then(|| compress_to_vec(&Block::chunk(&self.buffer, &self.compress)))
            .filter(|c| c.len() < self.buffer.len());

        let (size_field, payload): (u32, &[u8]) = match &compressed {
            Some(c) => (c.len() as u32, c.as_slice()),
            None => (self.buffer.len() as u32 | BLOCK_UNCOMPRESSED_FLAG, self.buffer.as_slice()),
        };
        crate::displaylevel!(
            5,
            "frame block: {} -> {} bytes{}\n",
            self.buffer.len(),
            payload.len(),
            if compressed.is_none() { " (stored)" } else { "" }
        );

        let out = Self::sink(&mut self.inner)?;
        out.write_all(&size_field.to_le_bytes())?;
        out.write_all(payload)?;
        if self.options.block_checksum {
            out.write_all(&xxh32_oneshot(payload, FRAME_CHECKSUM_SEED).to_le_bytes())?;
        }
        self.buffer.clear();
        self.state = WriterState::HeaderWritten;
        Ok(())
    }

    /// Flush pending data, write the end marker and content checksum.
    ///
    /// Idempotent: a second call is a no-op.  A declared content size that
    /// differs from the bytes written fails with `ContentSizeMismatch` and
    /// leaves the frame unterminated.
    pub fn close(&mut self) -> Result<()> {
        if self.state == WriterState::Closed {
            return Ok(());
        }
        if let Some(declared) = self.options.content_size {
            if declared != self.written {
                self.state = WriterState::Closed;
                self.errored = true;
                return Err(Error::ContentSizeMismatch {
                    declared,
                    actual: self.written,
                });
            }
        }
        self.guard(|w| {
            w.write_header()?;
            w.flush_block()?;
            let digest = w.content_hash.as_ref().map(|h| h.digest());
            let out = Self::sink(&mut w.inner)?;
            out.write_all(&0u32.to_le_bytes())?;
            if let Some(digest) = digest {
                out.write_all(&digest.to_le_bytes())?;
            }
            out.flush()?;
            Ok(())
        })?;
        self.state = WriterState::Closed;
        crate::displaylevel!(4, "frame closed after {} bytes\n", self.written);
        Ok(())
    }

    /// Close the frame and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        self.inner.take().ok_or(Error::StreamClosed)
    }

    /// Run `f`, marking the writer as errored if it fails.
    fn guard<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = f(self);
        if result.is_err() {
            self.errored = true;
        }
        result
    }
}

impl<W: Write> Write for FrameWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_data(buf)?;
        Ok(buf.len())
    }

    /// Emits the partially filled block, then flushes the sink.
    fn flush(&mut self) -> io::Result<()> {
        if self.state == WriterState::Closed {
            return Ok(());
        }
        self.guard(|w| w.flush_block())?;
        Self::sink(&mut self.inner)?.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for FrameWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_none() || self.errored || self.state == WriterState::Closed {
            return;
        }
        let _ = self.close();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `data` as one complete frame.
pub fn compress_frame(data: &[u8], options: &FrameOptions) -> Result<Vec<u8>> {
    let mut writer = FrameWriter::new(Vec::with_capacity(data.len() / 2 + 64), *options);
    writer.write_data(data)?;
    writer.finish()
}

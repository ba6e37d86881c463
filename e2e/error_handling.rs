//! E2E suite: error handling
//!
//! Every error kind surfaced by the public API, reached the way a caller
//! would hit it, plus the `io::Error` mapping used by the `Read` / `Write`
//! adapters.

use std::io::{self, Read, Write};

use lz4chain::frame::{FrameReader, FrameWriter};
use lz4chain::{
    compress_block, compress_block_into, compress_frame, decompress_block, decompress_frame,
    ChecksumKind, DispatcherConfig, Error, FrameOptions, ParallelCompressor,
};

/// Sink that fails after accepting `budget` bytes.
struct FailingSink {
    budget: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn payload() -> Vec<u8> {
    b"error handling payload with some repetition; ".repeat(200)
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn argument_errors() {
    assert!(matches!(compress_block(&[0; 8], 6), Err(Error::InvalidBlockSize { size: 8 })));
    assert!(matches!(compress_block(&payload(), 99), Err(Error::InvalidCompressionLevel(99))));
    assert!(matches!(FrameOptions::new(0), Err(Error::InvalidCompressionLevel(0))));
    assert!(matches!(
        ParallelCompressor::new(DispatcherConfig::new(4, 0)),
        Err(Error::InvalidBlockSize { size: 0 })
    ));
    let mut small = [0u8; 10];
    assert!(matches!(
        compress_block_into(&payload(), 6, &mut small),
        Err(Error::DestinationTooSmall { available: 10, .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Decode errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn block_decode_errors() {
    let data = payload();
    let packed = compress_block(&data, 6).unwrap();
    assert!(matches!(decompress_block(&packed, 100), Err(Error::CapacityExceeded { limit: 100 })));
    assert!(matches!(
        decompress_block(&packed[..packed.len() - 1], data.len()),
        Err(Error::MalformedBlock(_))
    ));
    assert!(matches!(
        decompress_block(&[0x00, 0x05, 0x00, 0x00], 64),
        Err(Error::InvalidMatchOffset { offset: 5, position: 0 })
    ));
}

#[test]
fn frame_decode_errors() {
    assert!(matches!(decompress_frame(b"\x00\x01\x02\x03 plain bytes"), Err(Error::InvalidFrameFormat(_))));

    let data = payload();
    let mut frame = compress_frame(&data, &FrameOptions::default().with_content_checksum(true)).unwrap();
    let n = frame.len();
    frame[n - 1] ^= 1;
    assert!(matches!(
        decompress_frame(&frame),
        Err(Error::ChecksumMismatch { kind: ChecksumKind::Content, .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sink_failure_propagates_as_io() {
    let mut w = FrameWriter::new(FailingSink { budget: 3 }, FrameOptions::default());
    match w.write_data(b"anything") {
        Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn content_size_mismatch_reported() {
    let opts = FrameOptions::default().with_content_size(1);
    assert!(matches!(
        compress_frame(b"two", &opts),
        Err(Error::ContentSizeMismatch { declared: 1, actual: 3 })
    ));
}

#[test]
fn writes_after_close_fail() {
    let mut w = FrameWriter::new(Vec::new(), FrameOptions::default());
    w.close().unwrap();
    assert!(matches!(w.write_data(b"late"), Err(Error::StreamClosed)));
    assert_eq!(w.write(b"late").unwrap_err().kind(), io::ErrorKind::BrokenPipe);
}

// ─────────────────────────────────────────────────────────────────────────────
// io::Error mapping
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reader_maps_format_errors_to_invalid_data() {
    let mut reader = FrameReader::new(&b"garbage garbage"[..]);
    let mut out = Vec::new();
    let err = reader.read_to_end(&mut out).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(err.to_string().contains("invalid frame format"), "{err}");
}

#[test]
fn error_messages_name_the_problem() {
    assert_eq!(
        Error::InvalidCompressionLevel(0).to_string(),
        "invalid compression level 0 (expected 1..=12)"
    );
    assert_eq!(Error::StreamClosed.to_string(), "stream already closed");
    assert_eq!(
        Error::WorkerFailed { chunk: 3 }.to_string(),
        "worker failed while compressing chunk 3"
    );
}

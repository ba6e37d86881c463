//! Crate-wide error type.
//!
//! Every public operation returns [`Result<T>`].  Argument errors
//! (`InvalidBlockSize`, `InvalidCompressionLevel`) are raised before any byte
//! is processed; decode errors abort the call without partial output.

use std::io;

use thiserror::Error;

use crate::block::types::{MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which checksum failed verification in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    Block,
    Content,
}

impl std::fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumKind::Block => f.write_str("block"),
            ChecksumKind::Content => f.write_str("content"),
        }
    }
}

/// Errors returned by the block, frame and parallel APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// Input (or configured chunk) size outside `[MIN_BLOCK_SIZE, MAX_BLOCK_SIZE]`.
    #[error("invalid block size {size} (expected {}..={} bytes)", MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)]
    InvalidBlockSize { size: usize },

    /// Compression level outside `1..=12`.
    #[error("invalid compression level {0} (expected 1..=12)")]
    InvalidCompressionLevel(u32),

    /// Bad magic, truncated header, unsupported version or block-size code.
    #[error("invalid frame format: {0}")]
    InvalidFrameFormat(&'static str),

    /// Truncated token, literal run, offset or length field.
    #[error("malformed block: {0}")]
    MalformedBlock(&'static str),

    /// Offset of zero, or pointing before the start of the output.
    #[error("invalid match offset {offset} at output position {position}")]
    InvalidMatchOffset { offset: usize, position: usize },

    /// Decoded output would exceed the caller's declared maximum.
    #[error("decompressed size would exceed {limit} bytes")]
    CapacityExceeded { limit: usize },

    /// Caller-provided destination is smaller than the worst-case bound.
    #[error("destination buffer too small: need {needed} bytes, have {available}")]
    DestinationTooSmall { needed: usize, available: usize },

    /// Frame block or content checksum did not match.
    #[error("{kind} checksum mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch {
        kind: ChecksumKind,
        expected: u32,
        actual: u32,
    },

    /// Declared frame content size disagrees with the bytes actually seen.
    #[error("content size mismatch: declared {declared} bytes, got {actual}")]
    ContentSizeMismatch { declared: u64, actual: u64 },

    /// Write attempted after the frame was closed.
    #[error("stream already closed")]
    StreamClosed,

    /// The worker pool could not be started.
    #[error("worker pool unavailable: {0}")]
    DispatcherUnavailable(String),

    /// A worker job panicked while compressing a chunk.
    #[error("worker failed while compressing chunk {chunk}")]
    WorkerFailed { chunk: usize },

    /// Failure from the underlying sink or source.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::StreamClosed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            Error::InvalidBlockSize { .. }
            | Error::InvalidCompressionLevel(_)
            | Error::DispatcherUnavailable(_)
            | Error::WorkerFailed { .. }
            | Error::DestinationTooSmall { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

// lz4chain — LZ4-compatible block codec, frame streams and parallel block compression

pub mod caps;
pub mod config;
pub mod display;
pub mod error;
pub mod xxhash;
pub mod matcher;
pub mod block;
pub mod frame;
pub mod parallel;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 3;
pub const VERSION_RELEASE: u32 = 0;
pub const VERSION_NUMBER: u32 = VERSION_MAJOR * 100 * 100 + VERSION_MINOR * 100 + VERSION_RELEASE;
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version number (`major * 10000 + minor * 100 + release`).
pub fn version_number() -> u32 {
    VERSION_NUMBER
}

/// Returns the library version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::{
    compress_block, compress_block_into, compress_bound, decompress_block, decompress_block_into,
    CompressOptions, CompressionLevel, MatchVariant, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE,
};
pub use caps::Capabilities;
pub use error::{ChecksumKind, Error, Result};
pub use frame::{compress_frame, decompress_frame, BlockSizeId, FrameOptions, FrameReader, FrameWriter};
pub use parallel::{DispatcherConfig, ParallelCompressor};

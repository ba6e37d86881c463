//! LZ4 block compression and decompression.
//!
//! A block is a self-contained token stream: every back-reference points into
//! bytes produced by the same block (or, for [`decompress_block_into`], into
//! history the caller already holds).

pub mod compress;
pub mod decompress;
pub mod level;
pub mod types;

// Re-export the most important public API items at the module level.
pub use compress::{compress_block, compress_block_baseline, compress_block_into, compress_block_with, compress_bound};
pub use decompress::{decompress_block, decompress_block_into};
pub use level::{search_params, Block};
pub use types::{
    CompressOptions, CompressionLevel, MatchVariant, KB, LAST_LITERALS, MAX_BLOCK_SIZE,
    MAX_DISTANCE, MAX_MATCH_LENGTH, MB, MFLIMIT, MINMATCH, MIN_BLOCK_SIZE,
};

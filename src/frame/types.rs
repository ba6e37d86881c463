//! LZ4 frame constants, block-size codes, frame options and parsed header info.

use crate::block::types::{CompressOptions, CompressionLevel, MatchVariant, KB, MB};
use crate::caps::Capabilities;
use crate::config::BLOCKSIZEID_DEFAULT;
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Frame format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Little-endian magic number opening every LZ4 frame.
pub const FRAME_MAGIC: u32 = 0x184D_2204;

/// FLG version field value (`01` in bits 7–6).
pub const FRAME_VERSION: u8 = 0b01;

pub const FLG_BLOCK_INDEPENDENCE: u8 = 1 << 5;
pub const FLG_BLOCK_CHECKSUM: u8 = 1 << 4;
pub const FLG_CONTENT_SIZE: u8 = 1 << 3;
pub const FLG_CONTENT_CHECKSUM: u8 = 1 << 2;
pub const FLG_RESERVED: u8 = 1 << 1;
pub const FLG_DICT_ID: u8 = 1;

/// High bit of a block-size field: the block is stored uncompressed.
pub const BLOCK_UNCOMPRESSED_FLAG: u32 = 0x8000_0000;

/// Block header (size field) length.
pub const BH_SIZE: usize = 4;

/// Block / content checksum length.
pub const CHECKSUM_SIZE: usize = 4;

/// Magic + FLG + BD + header checksum.
pub const MIN_FH_SIZE: usize = 7;

/// Magic + FLG + BD + content size + dictionary id + header checksum.
pub const MAX_FH_SIZE: usize = 19;

/// History retained between linked blocks on the read side.
pub const LINKED_HISTORY: usize = 64 * KB;

// ─────────────────────────────────────────────────────────────────────────────
// BlockSizeId
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum block size of a frame, stored as a 3-bit code in the BD byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum BlockSizeId {
    #[default]
    Max64Kb = 4,
    Max256Kb = 5,
    Max1Mb = 6,
    Max4Mb = 7,
}

impl BlockSizeId {
    /// Parse a block-size code; only 4–7 are defined.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            4 => Ok(BlockSizeId::Max64Kb),
            5 => Ok(BlockSizeId::Max256Kb),
            6 => Ok(BlockSizeId::Max1Mb),
            7 => Ok(BlockSizeId::Max4Mb),
            _ => Err(Error::InvalidFrameFormat("unsupported block size code")),
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Maximum uncompressed bytes per block.
    pub fn block_size(self) -> usize {
        match self {
            BlockSizeId::Max64Kb => 64 * KB,
            BlockSizeId::Max256Kb => 256 * KB,
            BlockSizeId::Max1Mb => MB,
            BlockSizeId::Max4Mb => 4 * MB,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Writer configuration, fixed for the lifetime of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    pub level: CompressionLevel,
    pub block_size_id: BlockSizeId,
    pub variant: MatchVariant,
    /// Append an XXH32 of each stored block.
    pub block_checksum: bool,
    /// Append an XXH32 of all uncompressed content after the end marker.
    pub content_checksum: bool,
    /// Declared uncompressed size; `close()` fails if the writes disagree.
    pub content_size: Option<u64>,
    /// Dictionary id recorded in the header.
    pub dict_id: Option<u32>,
    /// CPU capabilities handed to the block encoder; detected once when the
    /// options are built.
    pub caps: Capabilities,
}

impl FrameOptions {
    /// Defaults with `level` (validated).
    pub fn new(level: u32) -> Result<Self> {
        Ok(FrameOptions {
            level: CompressionLevel::new(level)?,
            ..FrameOptions::default()
        })
    }

    pub fn with_block_size(mut self, id: BlockSizeId) -> Self {
        self.block_size_id = id;
        self
    }

    pub fn with_variant(mut self, variant: MatchVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_block_checksum(mut self, enabled: bool) -> Self {
        self.block_checksum = enabled;
        self
    }

    pub fn with_content_checksum(mut self, enabled: bool) -> Self {
        self.content_checksum = enabled;
        self
    }

    pub fn with_content_size(mut self, size: u64) -> Self {
        self.content_size = Some(size);
        self
    }

    pub fn with_dict_id(mut self, id: u32) -> Self {
        self.dict_id = Some(id);
        self
    }

    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    /// Block-level options derived from these frame options.
    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions {
            level: self.level,
            variant: self.variant,
            caps: self.caps,
        }
    }

    /// The header this writer emits.
    pub fn frame_info(&self) -> FrameInfo {
        FrameInfo {
            block_size_id: self.block_size_id,
            independent_blocks: true,
            block_checksum: self.block_checksum,
            content_checksum: self.content_checksum,
            content_size: self.content_size,
            dict_id: self.dict_id,
        }
    }
}

impl Default for FrameOptions {
    fn default() -> Self {
        FrameOptions {
            level: CompressionLevel::default(),
            block_size_id: BlockSizeId::from_code(BLOCKSIZEID_DEFAULT).unwrap_or_default(),
            variant: MatchVariant::Improved,
            block_checksum: false,
            content_checksum: false,
            content_size: None,
            dict_id: None,
            caps: Capabilities::detect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameInfo
// ─────────────────────────────────────────────────────────────────────────────

/// Frame descriptor as written to, or parsed from, a frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInfo {
    pub block_size_id: BlockSizeId,
    /// Blocks never reference earlier blocks.
    pub independent_blocks: bool,
    pub block_checksum: bool,
    pub content_checksum: bool,
    pub content_size: Option<u64>,
    pub dict_id: Option<u32>,
}

impl FrameInfo {
    /// FLG byte for this descriptor.
    pub fn flags(&self) -> u8 {
        let mut flg = FRAME_VERSION << 6;
        if self.independent_blocks {
            flg |= FLG_BLOCK_INDEPENDENCE;
        }
        if self.block_checksum {
            flg |= FLG_BLOCK_CHECKSUM;
        }
        if self.content_size.is_some() {
            flg |= FLG_CONTENT_SIZE;
        }
        if self.content_checksum {
            flg |= FLG_CONTENT_CHECKSUM;
        }
        if self.dict_id.is_some() {
            flg |= FLG_DICT_ID;
        }
        flg
    }

    /// Size of the whole header (magic through header checksum).
    pub fn header_size(&self) -> usize {
        MIN_FH_SIZE
            + if self.content_size.is_some() { 8 } else { 0 }
            + if self.dict_id.is_some() { 4 } else { 0 }
    }
}

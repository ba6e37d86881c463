//! Frame header encoding and parsing.
//!
//! ```text
//! magic (4, LE) | FLG | BD | [content size (8, LE)] | [dict id (4, LE)] | HC
//! ```
//!
//! `HC` is the second byte of the XXH32 (seed 0) of the descriptor, i.e. of
//! everything between the magic number and the checksum byte.

use crate::error::{Error, Result};
use crate::frame::types::{
    BlockSizeId, FrameInfo, FLG_BLOCK_CHECKSUM, FLG_BLOCK_INDEPENDENCE, FLG_CONTENT_CHECKSUM,
    FLG_CONTENT_SIZE, FLG_DICT_ID, FLG_RESERVED, FRAME_MAGIC, FRAME_VERSION,
};
use crate::xxhash::{xxh32_oneshot, FRAME_CHECKSUM_SEED};

// ─────────────────────────────────────────────────────────────────────────────
// Byte-order helpers
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub fn read_le32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([src[offset], src[offset + 1], src[offset + 2], src[offset + 3]])
}

#[inline]
pub fn read_le64(src: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&src[offset..offset + 8]);
    u64::from_le_bytes(word)
}

// ─────────────────────────────────────────────────────────────────────────────
// Header checksum
// ─────────────────────────────────────────────────────────────────────────────

/// `(XXH32(descriptor) >> 8) & 0xFF`.
#[inline]
pub fn header_checksum(descriptor: &[u8]) -> u8 {
    ((xxh32_oneshot(descriptor, FRAME_CHECKSUM_SEED) >> 8) & 0xFF) as u8
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Serialise a complete frame header.
pub fn encode_header(info: &FrameInfo) -> Vec<u8> {
    let mut out = Vec::with_capacity(info.header_size());
    out.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
    out.push(info.flags());
    out.push(info.block_size_id.code() << 4);
    if let Some(size) = info.content_size {
        out.extend_from_slice(&size.to_le_bytes());
    }
    if let Some(id) = info.dict_id {
        out.extend_from_slice(&id.to_le_bytes());
    }
    let hc = header_checksum(&out[4..]);
    out.push(hc);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Check the magic number and FLG/BD fixed fields, returning the number of
/// header bytes still to read (optional fields plus the checksum byte).
pub fn parse_prefix(prefix: &[u8; 6]) -> Result<usize> {
    if read_le32(prefix, 0) != FRAME_MAGIC {
        return Err(Error::InvalidFrameFormat("bad magic number"));
    }
    let flg = prefix[4];
    if flg >> 6 != FRAME_VERSION {
        return Err(Error::InvalidFrameFormat("unsupported frame version"));
    }
    if flg & FLG_RESERVED != 0 {
        return Err(Error::InvalidFrameFormat("reserved flag bit set"));
    }
    let bd = prefix[5];
    if bd & 0x8F != 0 {
        return Err(Error::InvalidFrameFormat("reserved block descriptor bits set"));
    }
    BlockSizeId::from_code((bd >> 4) & 0x07)?;

    let mut rest = 1;
    if flg & FLG_CONTENT_SIZE != 0 {
        rest += 8;
    }
    if flg & FLG_DICT_ID != 0 {
        rest += 4;
    }
    Ok(rest)
}

/// Decode a full header: the 6-byte prefix followed by the `rest` bytes
/// announced by [`parse_prefix`].
///
/// The header checksum byte is carried but not verified.
pub fn decode_header(prefix: &[u8; 6], rest: &[u8]) -> Result<FrameInfo> {
    let expected_rest = parse_prefix(prefix)?;
    if rest.len() != expected_rest {
        return Err(Error::InvalidFrameFormat("truncated frame header"));
    }
    let flg = prefix[4];
    let block_size_id = BlockSizeId::from_code((prefix[5] >> 4) & 0x07)?;

    let mut pos = 0;
    let content_size = if flg & FLG_CONTENT_SIZE != 0 {
        let v = read_le64(rest, pos);
        pos += 8;
        Some(v)
    } else {
        None
    };
    let dict_id = if flg & FLG_DICT_ID != 0 {
        Some(read_le32(rest, pos))
    } else {
        None
    };

    Ok(FrameInfo {
        block_size_id,
        independent_blocks: flg & FLG_BLOCK_INDEPENDENCE != 0,
        block_checksum: flg & FLG_BLOCK_CHECKSUM != 0,
        content_checksum: flg & FLG_CONTENT_CHECKSUM != 0,
        content_size,
        dict_id,
    })
}

/// Decode a header at the start of `src`, returning it and its length.
pub fn read_header(src: &[u8]) -> Result<(FrameInfo, usize)> {
    let prefix: &[u8; 6] = src
        .get(..6)
        .and_then(|p| p.try_into().ok())
        .ok_or(Error::InvalidFrameFormat("truncated frame header"))?;
    let rest_len = parse_prefix(prefix)?;
    let rest = src
        .get(6..6 + rest_len)
        .ok_or(Error::InvalidFrameFormat("truncated frame header"))?;
    Ok((decode_header(prefix, rest)?, 6 + rest_len))
}

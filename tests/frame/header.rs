// Integration tests for src/frame/header.rs — frame header encode / parse.
//
// Covers:
//   - byte layout of the minimal and fully-populated header
//   - `read_header` round-trip of every optional field
//   - rejection of bad magic, version, reserved bits and block codes
//   - the header checksum byte is written but not enforced

use lz4chain::frame::{
    decompress_frame, encode_header, header_checksum, read_header, BlockSizeId, FrameInfo,
    FrameOptions, FRAME_MAGIC,
};
use lz4chain::{compress_frame, Error};

fn minimal() -> Vec<u8> {
    encode_header(&FrameOptions::default().frame_info())
}

#[test]
fn magic_is_little_endian() {
    assert_eq!(FRAME_MAGIC, 0x184D_2204);
    assert_eq!(&minimal()[..4], &[0x04, 0x22, 0x4D, 0x18]);
}

#[test]
fn minimal_header_bytes() {
    let hdr = minimal();
    // version 01, independent blocks; 64 KB blocks
    assert_eq!(hdr.len(), 7);
    assert_eq!(hdr[4], 0x60);
    assert_eq!(hdr[5], 0x40);
    assert_eq!(hdr[6], header_checksum(&[0x60, 0x40]));
}

#[test]
fn every_option_is_recorded() {
    let opts = FrameOptions::new(9)
        .unwrap()
        .with_block_size(BlockSizeId::Max4Mb)
        .with_block_checksum(true)
        .with_content_checksum(true)
        .with_content_size(0x0102_0304_0506)
        .with_dict_id(0xCAFE_F00D);
    let hdr = encode_header(&opts.frame_info());
    assert_eq!(hdr.len(), 19);
    assert_eq!(hdr[4], 0x40 | 0x20 | 0x10 | 0x08 | 0x04 | 0x01);
    assert_eq!(hdr[5], 0x70);
    assert_eq!(&hdr[6..14], &0x0102_0304_0506u64.to_le_bytes());
    assert_eq!(&hdr[14..18], &0xCAFE_F00Du32.to_le_bytes());
    assert_eq!(hdr[18], header_checksum(&hdr[4..18]));

    let (info, len) = read_header(&hdr).unwrap();
    assert_eq!(len, 19);
    assert_eq!(info, opts.frame_info());
}

#[test]
fn block_size_codes_roundtrip() {
    for id in [BlockSizeId::Max64Kb, BlockSizeId::Max256Kb, BlockSizeId::Max1Mb, BlockSizeId::Max4Mb] {
        let info = FrameInfo { block_size_id: id, independent_blocks: true, ..FrameInfo::default() };
        let (parsed, _) = read_header(&encode_header(&info)).unwrap();
        assert_eq!(parsed.block_size_id, id);
    }
}

#[test]
fn read_header_ignores_trailing_bytes() {
    let mut src = minimal();
    src.extend_from_slice(&[1, 2, 3]);
    let (_, len) = read_header(&src).unwrap();
    assert_eq!(len, 7);
}

// ═════════════════════════════════════════════════════════════════════════════
// Rejections
// ═════════════════════════════════════════════════════════════════════════════

fn rejected(hdr: &[u8]) -> bool {
    matches!(read_header(hdr), Err(Error::InvalidFrameFormat(_)))
}

#[test]
fn bad_magic() {
    let mut hdr = minimal();
    hdr[0] ^= 1;
    assert!(rejected(&hdr));
}

#[test]
fn unsupported_version() {
    let mut hdr = minimal();
    hdr[4] = (hdr[4] & 0x3F) | 0x80;
    assert!(rejected(&hdr));
}

#[test]
fn reserved_flag_bit() {
    let mut hdr = minimal();
    hdr[4] |= 0x02;
    assert!(rejected(&hdr));
}

#[test]
fn reserved_block_descriptor_bits() {
    let mut hdr = minimal();
    hdr[5] |= 0x01;
    assert!(rejected(&hdr));
    let mut hdr = minimal();
    hdr[5] |= 0x80;
    assert!(rejected(&hdr));
}

#[test]
fn undefined_block_size_codes() {
    for code in 0..4u8 {
        let mut hdr = minimal();
        hdr[5] = code << 4;
        assert!(rejected(&hdr), "code {code}");
    }
}

#[test]
fn truncated_headers() {
    let full = encode_header(&FrameOptions::default().with_content_size(5).frame_info());
    for cut in 0..full.len() {
        assert!(rejected(&full[..cut]), "cut at {cut}");
    }
}

#[test]
fn header_checksum_is_not_enforced() {
    let data = b"header checksum tolerance".repeat(4);
    let mut frame = compress_frame(&data, &FrameOptions::default()).unwrap();
    frame[6] ^= 0xFF;
    assert_eq!(decompress_frame(&frame).unwrap(), data);
}

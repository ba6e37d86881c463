// Integration tests for src/frame/decompress.rs — FrameReader.
//
// Covers:
//   - streaming reads with small and odd-sized buffers
//   - frame_info before any data is read
//   - linked-block frames built by hand
//   - truncated and malformed frames
//   - bytes after the end marker are left in the source

use std::io::{Cursor, Read};

use lz4chain::frame::{decompress_frame, encode_header, BlockSizeId, FrameInfo, FrameOptions, FrameReader};
use lz4chain::{compress_frame, Error};

fn text(len: usize) -> Vec<u8> {
    (0..len).map(|i| b"reader test data "[i % 17] ^ ((i / 4096) as u8 & 3)).collect()
}

fn header(independent: bool) -> Vec<u8> {
    encode_header(&FrameInfo {
        independent_blocks: independent,
        ..FrameInfo::default()
    })
}

/// Block 1 stores "abcdefgh"; block 2 is a single match back into block 1.
fn two_block_frame(independent: bool) -> Vec<u8> {
    let mut frame = header(independent);
    frame.extend_from_slice(&(8u32 | 0x8000_0000).to_le_bytes());
    frame.extend_from_slice(b"abcdefgh");
    frame.extend_from_slice(&4u32.to_le_bytes());
    frame.extend_from_slice(&[0x04, 0x08, 0x00, 0x00]);
    frame.extend_from_slice(&0u32.to_le_bytes());
    frame
}

// ═════════════════════════════════════════════════════════════════════════════
// Streaming
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn small_reads_reassemble_content() {
    let data = text(300_000);
    let frame = compress_frame(&data, &FrameOptions::default().with_content_checksum(true)).unwrap();
    let mut reader = FrameReader::new(frame.as_slice());
    let mut out = Vec::new();
    let mut buf = [0u8; 1000];
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, data);
    assert_eq!(reader.bytes_produced(), data.len() as u64);
    // further reads keep returning 0
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn read_to_end_through_io_trait() {
    let data = text(150_000);
    let frame = compress_frame(&data, &FrameOptions::new(2).unwrap().with_block_size(BlockSizeId::Max256Kb)).unwrap();
    let mut out = Vec::new();
    FrameReader::new(Cursor::new(frame)).read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn frame_info_available_before_data() {
    let opts = FrameOptions::default()
        .with_block_size(BlockSizeId::Max1Mb)
        .with_content_size(4)
        .with_dict_id(7);
    let frame = compress_frame(b"info", &opts).unwrap();
    let mut reader = FrameReader::new(frame.as_slice());
    let info = *reader.frame_info().unwrap();
    assert_eq!(info.block_size_id, BlockSizeId::Max1Mb);
    assert_eq!(info.content_size, Some(4));
    assert_eq!(info.dict_id, Some(7));
    assert!(info.independent_blocks);
    assert_eq!(reader.bytes_produced(), 0);
}

#[test]
fn trailing_bytes_left_unread() {
    let mut src = compress_frame(b"first frame", &FrameOptions::default()).unwrap();
    src.extend_from_slice(b"TAIL");
    let mut reader = FrameReader::new(Cursor::new(src));
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"first frame");
    let mut rest = Vec::new();
    reader.into_inner().read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"TAIL");
}

#[test]
fn concatenated_frames_read_one_at_a_time() {
    let mut src = compress_frame(b"one", &FrameOptions::default()).unwrap();
    src.extend(compress_frame(b"two", &FrameOptions::default()).unwrap());
    let mut cursor = Cursor::new(src);
    for expected in [&b"one"[..], b"two"] {
        let mut reader = FrameReader::new(&mut cursor);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Linked blocks
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn linked_blocks_use_previous_output() {
    assert_eq!(decompress_frame(&two_block_frame(false)).unwrap(), b"abcdefghabcdefgh");
}

#[test]
fn independent_blocks_cannot_reach_back() {
    assert!(matches!(
        decompress_frame(&two_block_frame(true)),
        Err(Error::InvalidMatchOffset { offset: 8, position: 0 })
    ));
}

// ═════════════════════════════════════════════════════════════════════════════
// Malformed frames
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn truncated_frames_fail() {
    let data = text(20_000);
    let frame = compress_frame(&data, &FrameOptions::default().with_content_checksum(true)).unwrap();
    for cut in [0, 3, 7, 9, 20, frame.len() / 2, frame.len() - 5, frame.len() - 1] {
        let err = decompress_frame(&frame[..cut]).unwrap_err();
        assert!(matches!(err, Error::InvalidFrameFormat(_)), "cut {cut}: {err:?}");
    }
}

#[test]
fn missing_end_marker_fails() {
    let frame = compress_frame(b"no end marker here", &FrameOptions::default()).unwrap();
    assert!(decompress_frame(&frame[..frame.len() - 4]).is_err());
}

#[test]
fn oversized_block_rejected() {
    let mut frame = header(true);
    frame.extend_from_slice(&((64 * 1024 + 1) as u32 | 0x8000_0000).to_le_bytes());
    frame.extend(std::iter::repeat(0u8).take(64 * 1024 + 1));
    frame.extend_from_slice(&0u32.to_le_bytes());
    assert!(matches!(decompress_frame(&frame), Err(Error::InvalidFrameFormat(_))));
}

#[test]
fn corrupt_block_payload_reports_block_error() {
    let mut frame = header(true);
    frame.extend_from_slice(&3u32.to_le_bytes());
    frame.extend_from_slice(&[0x10, b'a', 0x05]);
    frame.extend_from_slice(&0u32.to_le_bytes());
    assert!(matches!(decompress_frame(&frame), Err(Error::MalformedBlock(_))));
}

#[test]
fn io_error_kinds_through_read_trait() {
    let mut reader = FrameReader::new(&b"not a frame"[..]);
    let err = reader.read(&mut [0u8; 16]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn reader_keeps_failing_after_a_bad_block() {
    for independent in [true, false] {
        // a stored block, then a compressed block whose match has offset 0
        let mut frame = header(independent);
        frame.extend_from_slice(&(8u32 | 0x8000_0000).to_le_bytes());
        frame.extend_from_slice(b"abcdefgh");
        frame.extend_from_slice(&5u32.to_le_bytes());
        frame.extend_from_slice(&[0x10, b'a', 0x00, 0x00, 0x00]);
        frame.extend_from_slice(&0u32.to_le_bytes());

        let mut reader = FrameReader::new(frame.as_slice());
        let mut buf = [0u8; 64];
        assert_eq!(reader.read_data(&mut buf).unwrap(), 8);
        assert_eq!(&buf[..8], b"abcdefgh");
        assert!(matches!(
            reader.read_data(&mut buf),
            Err(Error::InvalidMatchOffset { offset: 0, .. })
        ));
        for _ in 0..3 {
            assert!(matches!(reader.read_data(&mut buf), Err(Error::InvalidFrameFormat(_))));
            assert!(reader.read(&mut buf).is_err());
        }
    }
}

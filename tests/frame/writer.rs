// Integration tests for src/frame/compress.rs — FrameWriter.
//
// Covers:
//   - round-trips for empty, tiny, mid-size and multi-block inputs
//   - block splitting at the configured block size
//   - stored (uncompressed) blocks
//   - close / finish / flush state handling
//   - declared content size enforcement

use std::io::{Read, Write};

use lz4chain::frame::{decompress_frame, BlockSizeId, FrameOptions, FrameReader, FrameWriter};
use lz4chain::{compress_frame, Capabilities, Error, MatchVariant};

fn text(len: usize) -> Vec<u8> {
    let mut x = 0x9E37_79B9u32;
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        out.extend_from_slice(
            [&b"stream "[..], b"frame ", b"block ", b"writer ", b"reader "][(x % 5) as usize],
        );
    }
    out.truncate(len);
    out
}

/// Walk the block headers of a frame without a content size or checksums.
fn block_sizes(frame: &[u8]) -> Vec<(usize, bool)> {
    let mut pos = 7;
    let mut out = Vec::new();
    loop {
        let raw = u32::from_le_bytes(frame[pos..pos + 4].try_into().unwrap());
        pos += 4;
        if raw == 0 {
            assert_eq!(pos, frame.len());
            return out;
        }
        let size = (raw & 0x7FFF_FFFF) as usize;
        out.push((size, raw & 0x8000_0000 != 0));
        pos += size;
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Round-trips
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn roundtrip_sizes() {
    for len in [0usize, 1, 4096, (1 << 20) + 37] {
        let data = text(len);
        let frame = compress_frame(&data, &FrameOptions::default()).unwrap();
        assert_eq!(decompress_frame(&frame).unwrap(), data, "len {len}");
    }
}

#[test]
fn varied_writes_drain_through_reader() {
    for len in [0usize, 1, 4096, (1 << 20) + 37] {
        let data = text(len);
        let opts = FrameOptions::default().with_content_checksum(true);
        let mut writer = FrameWriter::new(Vec::new(), opts);
        let mut x = len as u32 | 1;
        let mut rest = data.as_slice();
        while !rest.is_empty() {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let n = ((x >> 16) as usize % 100_000).clamp(1, rest.len());
            writer.write_all(&rest[..n]).unwrap();
            rest = &rest[n..];
        }
        let frame = writer.finish().unwrap();

        let mut reader = FrameReader::new(frame.as_slice());
        let mut out = Vec::new();
        let mut buf = vec![0u8; 7_777];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, data, "len {len}");
    }
}

#[test]
fn empty_frame_is_header_and_end_marker() {
    let frame = compress_frame(&[], &FrameOptions::default()).unwrap();
    assert_eq!(frame.len(), 11);
    assert_eq!(&frame[7..], &[0, 0, 0, 0]);
}

#[test]
fn every_block_size_roundtrips() {
    let data = text(600_000);
    for id in [BlockSizeId::Max64Kb, BlockSizeId::Max256Kb, BlockSizeId::Max1Mb, BlockSizeId::Max4Mb] {
        let opts = FrameOptions::new(3).unwrap().with_block_size(id);
        let frame = compress_frame(&data, &opts).unwrap();
        assert_eq!(decompress_frame(&frame).unwrap(), data, "{id:?}");
    }
}

#[test]
fn capabilities_carried_into_block_options() {
    let data = text(150_000);
    let scalar = FrameOptions::new(9).unwrap().with_capabilities(Capabilities::scalar());
    assert_eq!(scalar.compress_options().caps, Capabilities::scalar());
    let detected = FrameOptions::new(9).unwrap();
    assert_eq!(detected.compress_options().caps, detected.caps);
    assert_eq!(
        compress_frame(&data, &scalar).unwrap(),
        compress_frame(&data, &detected).unwrap()
    );
}

#[test]
fn baseline_variant_roundtrips() {
    let data = text(200_000);
    let opts = FrameOptions::new(8).unwrap().with_variant(MatchVariant::Baseline);
    assert_eq!(decompress_frame(&compress_frame(&data, &opts).unwrap()).unwrap(), data);
}

// ═════════════════════════════════════════════════════════════════════════════
// Block layout
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn input_split_at_block_size() {
    let data = text(64 * 1024 * 3 + 100);
    let frame = compress_frame(&data, &FrameOptions::new(1).unwrap()).unwrap();
    let blocks = block_sizes(&frame);
    assert_eq!(blocks.len(), 4);
    assert!(blocks[..3].iter().all(|&(size, stored)| !stored && size < 64 * 1024));
    assert!(blocks[3].0 <= 100);
}

#[test]
fn tiny_input_stored_raw() {
    let frame = compress_frame(b"abc", &FrameOptions::default()).unwrap();
    assert_eq!(block_sizes(&frame), vec![(3, true)]);
    assert_eq!(&frame[11..14], b"abc");
}

#[test]
fn incompressible_block_stored_raw() {
    let mut x = 1u32;
    let noise: Vec<u8> = (0..10_000)
        .map(|_| {
            x = x.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (x >> 24) as u8
        })
        .collect();
    let frame = compress_frame(&noise, &FrameOptions::default()).unwrap();
    assert_eq!(block_sizes(&frame), vec![(10_000, true)]);
    assert_eq!(decompress_frame(&frame).unwrap(), noise);
}

// ═════════════════════════════════════════════════════════════════════════════
// Lifecycle
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn header_written_on_first_write() {
    let mut w = FrameWriter::new(Vec::new(), FrameOptions::default());
    assert!(w.get_ref().unwrap().is_empty());
    w.write_all(b"x").unwrap();
    assert_eq!(w.get_ref().unwrap().len(), 7);
}

#[test]
fn flush_emits_partial_block() {
    let mut w = FrameWriter::new(Vec::new(), FrameOptions::default());
    w.write_all(&text(500)).unwrap();
    assert_eq!(w.get_ref().unwrap().len(), 7);
    w.flush().unwrap();
    assert!(w.get_ref().unwrap().len() > 11);
    w.write_all(&text(500)).unwrap();
    let frame = w.finish().unwrap();
    assert_eq!(block_sizes(&frame).len(), 2);
    let mut expected = text(500);
    expected.extend(text(500));
    assert_eq!(decompress_frame(&frame).unwrap(), expected);
}

#[test]
fn many_small_writes_match_one_large_write() {
    let data = text(200_000);
    let mut w = FrameWriter::new(Vec::new(), FrameOptions::default());
    for piece in data.chunks(777) {
        w.write_all(piece).unwrap();
    }
    assert_eq!(w.bytes_written(), data.len() as u64);
    let streamed = w.finish().unwrap();
    assert_eq!(streamed, compress_frame(&data, &FrameOptions::default()).unwrap());
}

#[test]
fn close_is_idempotent_and_blocks_further_writes() {
    let mut w = FrameWriter::new(Vec::new(), FrameOptions::default());
    w.write_all(b"some bytes").unwrap();
    w.close().unwrap();
    let len = w.get_ref().unwrap().len();
    w.close().unwrap();
    assert_eq!(w.get_ref().unwrap().len(), len);
    assert!(w.is_closed());
    assert!(matches!(w.write_data(b"more"), Err(Error::StreamClosed)));
    assert!(w.write(b"more").is_err());
}

#[test]
fn drop_closes_the_frame() {
    let mut sink = Vec::new();
    {
        let mut w = FrameWriter::new(&mut sink, FrameOptions::default());
        w.write_all(b"closed on drop").unwrap();
    }
    assert_eq!(decompress_frame(&sink).unwrap(), b"closed on drop");
}

#[test]
fn content_size_mismatch_on_close() {
    let opts = FrameOptions::default().with_content_size(100);
    let mut w = FrameWriter::new(Vec::new(), opts);
    w.write_all(&[0u8; 40]).unwrap();
    assert!(matches!(
        w.close(),
        Err(Error::ContentSizeMismatch { declared: 100, actual: 40 })
    ));
    assert!(w.is_closed());
}

#[test]
fn content_size_recorded_when_matching() {
    let data = text(12_345);
    let opts = FrameOptions::default().with_content_size(data.len() as u64);
    let frame = compress_frame(&data, &opts).unwrap();
    assert_eq!(&frame[6..14], &(data.len() as u64).to_le_bytes());
    assert_eq!(decompress_frame(&frame).unwrap(), data);
}

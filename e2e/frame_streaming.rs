//! E2E suite: frame streaming through files
//!
//! Drives `FrameWriter` and `FrameReader` over real files and `io::copy`:
//! - file-to-file compression and decompression with every block size
//! - checksum and content-size options end to end
//! - byte-identical output for one-shot and streamed writes
//! - partial reads and corruption on disk

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};

use lz4chain::frame::{decompress_frame, BlockSizeId, FrameOptions, FrameReader, FrameWriter};
use lz4chain::{compress_frame, ChecksumKind, Error};
use tempfile::TempDir;

fn log_lines(count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..count {
        writeln!(
            out,
            "2026-03-{:02}T{:02}:{:02}:{:02}Z INFO request id={} path=/api/v1/items/{} status={}",
            i % 28 + 1,
            i % 24,
            i % 60,
            (i * 7) % 60,
            i * 2_654_435 % 1_000_000,
            i % 500,
            [200, 200, 200, 404, 500][i % 5]
        )
        .unwrap();
    }
    out
}

fn compress_file(src: &std::path::Path, dst: &std::path::Path, opts: FrameOptions) -> u64 {
    let mut input = BufReader::new(File::open(src).unwrap());
    let mut writer = FrameWriter::new(BufWriter::new(File::create(dst).unwrap()), opts);
    let n = io::copy(&mut input, &mut writer).unwrap();
    writer.finish().unwrap().flush().unwrap();
    n
}

fn decompress_file(src: &std::path::Path) -> io::Result<Vec<u8>> {
    let mut reader = FrameReader::new(BufReader::new(File::open(src)?));
    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// File round-trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn file_roundtrip_every_block_size() {
    let dir = TempDir::new().unwrap();
    let data = log_lines(20_000);
    let plain = dir.path().join("app.log");
    fs::write(&plain, &data).unwrap();

    for id in [BlockSizeId::Max64Kb, BlockSizeId::Max256Kb, BlockSizeId::Max1Mb, BlockSizeId::Max4Mb] {
        let packed = dir.path().join(format!("app.{}.lz4", id.code()));
        let opts = FrameOptions::new(4).unwrap().with_block_size(id);
        assert_eq!(compress_file(&plain, &packed, opts), data.len() as u64);
        assert!(fs::metadata(&packed).unwrap().len() < data.len() as u64 / 2);
        assert_eq!(decompress_file(&packed).unwrap(), data, "{id:?}");
    }
}

#[test]
fn all_options_roundtrip_through_files() {
    let dir = TempDir::new().unwrap();
    let data = log_lines(5_000);
    let plain = dir.path().join("in.log");
    let packed = dir.path().join("in.log.lz4");
    fs::write(&plain, &data).unwrap();

    let opts = FrameOptions::new(9)
        .unwrap()
        .with_block_checksum(true)
        .with_content_checksum(true)
        .with_content_size(data.len() as u64)
        .with_dict_id(0x1234);
    compress_file(&plain, &packed, opts);

    let mut reader = FrameReader::new(File::open(&packed).unwrap());
    let info = *reader.frame_info().unwrap();
    assert!(info.block_checksum && info.content_checksum);
    assert_eq!(info.content_size, Some(data.len() as u64));
    assert_eq!(info.dict_id, Some(0x1234));
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn streamed_file_equals_one_shot_frame() {
    let dir = TempDir::new().unwrap();
    let data = log_lines(8_000);
    let plain = dir.path().join("s.log");
    let packed = dir.path().join("s.log.lz4");
    fs::write(&plain, &data).unwrap();
    let opts = FrameOptions::default().with_content_checksum(true);
    compress_file(&plain, &packed, opts);
    assert_eq!(fs::read(&packed).unwrap(), compress_frame(&data, &opts).unwrap());
}

#[test]
fn empty_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("empty");
    let packed = dir.path().join("empty.lz4");
    fs::write(&plain, b"").unwrap();
    assert_eq!(compress_file(&plain, &packed, FrameOptions::default()), 0);
    assert_eq!(fs::metadata(&packed).unwrap().len(), 11);
    assert!(decompress_file(&packed).unwrap().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Reading patterns
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn byte_at_a_time_reads() {
    let data = log_lines(200);
    let frame = compress_frame(&data, &FrameOptions::default().with_block_checksum(true)).unwrap();
    let mut reader = FrameReader::new(frame.as_slice());
    let mut out = Vec::new();
    let mut byte = [0u8; 1];
    while reader.read(&mut byte).unwrap() == 1 {
        out.push(byte[0]);
    }
    assert_eq!(out, data);
}

#[test]
fn frame_after_file_prefix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("container.bin");
    let data = log_lines(1000);
    let mut file = File::create(&path).unwrap();
    file.write_all(b"HDR:").unwrap();
    file.write_all(&compress_frame(&data, &FrameOptions::default()).unwrap()).unwrap();
    file.write_all(b":END").unwrap();
    drop(file);

    let mut file = File::open(&path).unwrap();
    file.seek(SeekFrom::Start(4)).unwrap();
    let mut reader = FrameReader::new(file);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
    let mut tail = String::new();
    reader.into_inner().read_to_string(&mut tail).unwrap();
    assert_eq!(tail, ":END");
}

// ─────────────────────────────────────────────────────────────────────────────
// Corruption on disk
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn flipped_digest_on_disk_detected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("c.lz4");
    let data = log_lines(3000);
    let mut frame = compress_frame(&data, &FrameOptions::default().with_content_checksum(true)).unwrap();
    let last = frame.len() - 2;
    frame[last] ^= 0x10;
    fs::write(&path, &frame).unwrap();

    let err = decompress_file(&path).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(matches!(
        decompress_frame(&frame),
        Err(Error::ChecksumMismatch { kind: ChecksumKind::Content, .. })
    ));
}

#[test]
fn truncated_file_detected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("t.lz4");
    let data = log_lines(3000);
    let frame = compress_frame(&data, &FrameOptions::default()).unwrap();
    fs::write(&path, &frame[..frame.len() - 10]).unwrap();
    assert!(decompress_file(&path).is_err());
}

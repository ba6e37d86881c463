//! E2E suite: block one-shot API
//!
//! Exercises `compress_block`, `compress_block_into` and `decompress_block`
//! on realistic payload shapes:
//! - source-code-like text, binary records, long runs, sparse data
//! - every compression level on one payload
//! - ratio sanity across level bands

use lz4chain::block::{compress_block_baseline, compress_block_with, CompressOptions};
use lz4chain::{
    compress_block, compress_block_into, compress_bound, decompress_block, CompressionLevel,
    MatchVariant,
};

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

fn source_text() -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..400 {
        out.extend_from_slice(
            format!(
                "fn handler_{i}(ctx: &mut Context, req: Request) -> Result<Response> {{\n    \
                 let body = ctx.load({i})?;\n    Ok(Response::new(body, {}))\n}}\n\n",
                i * 37 % 101
            )
            .as_bytes(),
        );
    }
    out
}

fn binary_records() -> Vec<u8> {
    let mut out = Vec::new();
    for id in 0u32..3000 {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(id / 16).to_le_bytes());
        out.extend_from_slice(&[0xAB, 0xCD, (id % 7) as u8, 0]);
        out.extend_from_slice(&(u64::from(id) * 1_000_003).to_le_bytes());
    }
    out
}

fn sparse() -> Vec<u8> {
    let mut out = vec![0u8; 256 * 1024];
    for i in (0..out.len()).step_by(4099) {
        out[i] = (i % 251) as u8;
    }
    out
}

fn roundtrip(data: &[u8], level: u32) -> usize {
    let packed = compress_block(data, level).expect("compression should succeed");
    let restored = decompress_block(&packed, data.len()).expect("decompression should succeed");
    assert_eq!(restored, data, "level {level}");
    packed.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn source_text_every_level() {
    let data = source_text();
    for level in CompressionLevel::all() {
        let size = roundtrip(&data, level.get());
        assert!(size < data.len() / 2, "level {level}: {size} of {}", data.len());
    }
}

#[test]
fn binary_records_selected_levels() {
    let data = binary_records();
    for level in [1, 3, 6, 9, 12] {
        roundtrip(&data, level);
    }
}

#[test]
fn sparse_data_compresses_heavily() {
    let data = sparse();
    let size = roundtrip(&data, 6);
    assert!(size < data.len() / 50, "got {size}");
}

#[test]
fn single_byte_run() {
    let data = vec![0x55u8; 1 << 20];
    let size = roundtrip(&data, 1);
    assert!(size < 6000, "got {size}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Caller-provided destination
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn into_buffer_at_exact_bound() {
    let data = binary_records();
    let mut dst = vec![0u8; compress_bound(data.len())];
    let n = compress_block_into(&data, 7, &mut dst).unwrap();
    assert_eq!(decompress_block(&dst[..n], data.len()).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Level bands and variants
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stronger_bands_compress_at_least_as_well() {
    let data = source_text();
    let fast = roundtrip(&data, 1);
    let default = roundtrip(&data, 6);
    let max = roundtrip(&data, 12);
    assert!(default <= fast, "default {default} vs fast {fast}");
    assert!(max <= default + default / 50, "max {max} vs default {default}");
}

#[test]
fn improved_variant_no_worse_than_baseline_on_text() {
    let data = source_text();
    for level in [6, 9] {
        let baseline = compress_block_baseline(&data, level).unwrap();
        let improved = compress_block_with(
            &data,
            &CompressOptions::new(level).unwrap().with_variant(MatchVariant::Improved),
        )
        .unwrap();
        assert_eq!(decompress_block(&baseline, data.len()).unwrap(), data);
        assert!(
            improved.len() <= baseline.len() + baseline.len() / 20,
            "level {level}: improved {} vs baseline {}",
            improved.len(),
            baseline.len()
        );
    }
}

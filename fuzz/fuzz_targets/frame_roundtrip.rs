#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4chain::{BlockSizeId, FrameOptions};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let options = FrameOptions::new(u32::from(selector % 12) + 1)
        .expect("level in range")
        .with_block_size(if selector & 0x80 != 0 { BlockSizeId::Max256Kb } else { BlockSizeId::Max64Kb })
        .with_block_checksum(selector & 0x40 != 0)
        .with_content_checksum(selector & 0x20 != 0)
        .with_content_size(payload.len() as u64);
    let frame = lz4chain::compress_frame(payload, &options).expect("compression must succeed");
    let restored = lz4chain::decompress_frame(&frame).expect("own frame must decode");
    assert_eq!(restored, payload);
});

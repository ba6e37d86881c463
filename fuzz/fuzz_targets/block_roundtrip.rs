#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < lz4chain::MIN_BLOCK_SIZE || data.len() > lz4chain::MAX_BLOCK_SIZE {
        return;
    }
    // First byte picks the level so every band gets coverage.
    let level = u32::from(data[0] % 12) + 1;
    let packed = lz4chain::compress_block(data, level).expect("valid arguments");
    assert!(packed.len() <= lz4chain::compress_bound(data.len()));
    let restored = lz4chain::decompress_block(&packed, data.len()).expect("own output must decode");
    assert_eq!(restored, data, "level {level}");
});

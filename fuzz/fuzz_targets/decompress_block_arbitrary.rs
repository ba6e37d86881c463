#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are expected; panics are not.
    let _ = lz4chain::decompress_block(data, 0);
    let _ = lz4chain::decompress_block(data, 4096);
    let _ = lz4chain::decompress_block(data, data.len().saturating_mul(255).min(1 << 20));

    // With history already in the buffer, offsets may reach into it.
    let mut out = b"0123456789abcdef".to_vec();
    if lz4chain::decompress_block_into(data, &mut out, 1 << 16).is_err() {
        assert_eq!(out, b"0123456789abcdef");
    }
});

#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = lz4chain::decompress_frame(data);

    // Small reads walk a different path through block refills.
    let mut reader = lz4chain::FrameReader::new(data);
    let mut buf = [0u8; 97];
    let mut total = 0usize;
    while let Ok(n) = reader.read(&mut buf) {
        if n == 0 || total > (1 << 24) {
            break;
        }
        total += n;
    }
});

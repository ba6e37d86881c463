//! Thin wrapper around the `xxhash-rust` crate providing the XXH32 API used
//! by the frame layer for header, block and content checksums.

pub use xxhash_rust::xxh32::Xxh32 as Xxh32State;

/// Seed used for every frame checksum.
pub const FRAME_CHECKSUM_SEED: u32 = 0;

/// One-shot XXH32 hash.
///
/// # Parity vectors
/// * `xxh32_oneshot(b"", 0)` == `0x02CC5D05`
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}

/// Fresh streaming state seeded for frame checksums.
#[inline]
pub fn frame_checksum_state() -> Xxh32State {
    Xxh32State::new(FRAME_CHECKSUM_SEED)
}

// config.rs — Compile-time configuration constants.
//
// Defaults for the block, frame and parallel APIs.  The CLI may override the
// level and worker count from LZ4_CLEVEL / LZ4_NBWORKERS; the library itself
// never reads the environment.

use crate::block::types::MB;

// Default compression level (middle of the 4–6 "default" band).
pub const CLEVEL_DEFAULT: u32 = 6;

// Inclusive level range accepted by every API.
pub const CLEVEL_MIN: u32 = 1;
pub const CLEVEL_MAX: u32 = 12;

// Default frame block size ID (4 = 64 KB blocks).
pub const BLOCKSIZEID_DEFAULT: u8 = 4;

// Default chunk size handed to each parallel worker.
pub const CHUNK_SIZE_DEFAULT: usize = MB;

// Inputs below this size are always compressed synchronously.
pub const PARALLEL_MIN_INPUT: usize = 4 * 1024;

// Maximum number of worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Submission slots per worker: bounds how many chunk jobs may be queued
// ahead of the workers.
pub const QUEUE_DEPTH_PER_WORKER: usize = 2;

/// Default worker count: the number of logical CPUs, at least one.
pub fn default_nb_workers() -> usize {
    num_cpus::get().clamp(1, NB_WORKERS_MAX)
}

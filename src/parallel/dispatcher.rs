//! Chunked parallel block compression.
//!
//! An input larger than one chunk is cut into `ceil(len / chunk_size)`
//! contiguous chunks.  Each chunk is encoded by its own job with a fresh match
//! finder, so back-references never cross a chunk boundary, and the encoded
//! chunks are joined in input order into a single token stream that
//! [`decompress_block`](crate::block::decompress_block) reads like any other
//! block.
//!
//! Joining: every chunk but the last is encoded up to its final match; its
//! trailing literals are carried forward and folded into the first sequence
//! of the next encoded chunk.  Only the last chunk ends with a literal-only
//! sequence.  The output depends on the input, level and chunk size only,
//! never on the worker count.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::block::compress::{compress_bound, compress_open_chunk, compress_to_vec, splice_literals};
use crate::block::level::Block;
use crate::block::types::{
    check_block_size, CompressOptions, CompressionLevel, MatchVariant, MIN_BLOCK_SIZE,
};
use crate::caps::Capabilities;
use crate::config::{
    default_nb_workers, CHUNK_SIZE_DEFAULT, NB_WORKERS_MAX, PARALLEL_MIN_INPUT,
    QUEUE_DEPTH_PER_WORKER,
};
use crate::error::{Error, Result};
use crate::parallel::pool::WorkerPool;

// ─────────────────────────────────────────────────────────────────────────────
// DispatcherConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Worker count and chunk size, fixed when the dispatcher is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub workers: usize,
    pub chunk_size: usize,
}

impl DispatcherConfig {
    pub fn new(workers: usize, chunk_size: usize) -> Self {
        DispatcherConfig {
            workers,
            chunk_size,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            workers: default_nb_workers(),
            chunk_size: CHUNK_SIZE_DEFAULT,
        }
    }
}

/// One encoded chunk: its body and how many of its trailing input bytes are
/// still owed to the stream as literals.
type ChunkOutput = (Vec<u8>, usize);

fn encode_chunk(data: &[u8], options: &CompressOptions, last: bool) -> ChunkOutput {
    let block = Block::chunk(data, options);
    if last {
        (compress_to_vec(&block), 0)
    } else {
        compress_open_chunk(&block)
    }
}

/// Concatenate encoded chunks, carrying pending literals across boundaries.
fn join_chunks(input: &[u8], chunk_size: usize, outputs: Vec<ChunkOutput>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(compress_bound(input.len()));
    // Start of the literal run not yet written.
    let mut carry_from = 0usize;
    for (i, (body, pending)) in outputs.into_iter().enumerate() {
        let start = i * chunk_size;
        let end = (start + chunk_size).min(input.len());
        if body.is_empty() {
            // No match anywhere in the chunk: all of it joins the carry.
            continue;
        }
        splice_literals(&mut out, &input[carry_from..start], &body)?;
        carry_from = end - pending;
    }
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// ParallelCompressor
// ─────────────────────────────────────────────────────────────────────────────

/// Block compressor that spreads large inputs over a worker pool.
///
/// `start()` and `stop()` may be called any number of times; `stop()` waits
/// for in-flight `compress()` calls.  While stopped, or if the pool could not
/// be built, `compress()` runs the same chunked encoding on the calling
/// thread.
pub struct ParallelCompressor {
    config: DispatcherConfig,
    variant: MatchVariant,
    caps: Capabilities,
    pool: RwLock<Option<WorkerPool>>,
}

impl ParallelCompressor {
    /// Validate `config` and build a stopped dispatcher.
    ///
    /// The chunk size must lie within the block-size range; the worker count
    /// is clamped to `1..=200`.
    pub fn new(config: DispatcherConfig) -> Result<Self> {
        check_block_size(config.chunk_size)?;
        let workers = config.workers.clamp(1, NB_WORKERS_MAX);
        if workers != config.workers {
            crate::displaylevel!(
                2,
                "warning: worker count {} clamped to {}\n",
                config.workers,
                workers
            );
        }
        Ok(ParallelCompressor {
            config: DispatcherConfig { workers, ..config },
            variant: MatchVariant::Improved,
            caps: Capabilities::detect(),
            pool: RwLock::new(None),
        })
    }

    pub fn with_variant(mut self, variant: MatchVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn config(&self) -> DispatcherConfig {
        self.config
    }

    fn pool_read(&self) -> RwLockReadGuard<'_, Option<WorkerPool>> {
        self.pool.read().unwrap_or_else(|e| e.into_inner())
    }

    fn pool_write(&self) -> RwLockWriteGuard<'_, Option<WorkerPool>> {
        self.pool.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Spin up the worker pool.  A pool that cannot be built is logged and
    /// the dispatcher keeps compressing synchronously.
    pub fn start(&self) {
        let mut slot = self.pool_write();
        if slot.is_some() {
            return;
        }
        let depth = self.config.workers * QUEUE_DEPTH_PER_WORKER;
        match WorkerPool::new(self.config.workers, depth) {
            Ok(pool) => {
                crate::displaylevel!(
                    4,
                    "dispatcher started: {} workers, queue depth {}, chunk {} bytes\n",
                    pool.workers(),
                    pool.queue_depth(),
                    self.config.chunk_size
                );
                *slot = Some(pool);
            }
            Err(e) => {
                crate::displaylevel!(2, "warning: {e}; compressing synchronously\n");
            }
        }
    }

    /// Shut the pool down after in-flight calls complete.
    pub fn stop(&self) {
        if self.pool_write().take().is_some() {
            crate::displaylevel!(4, "dispatcher stopped\n");
        }
    }

    pub fn is_running(&self) -> bool {
        self.pool_read().is_some()
    }

    /// Compress `input` at `level` into one token stream.
    ///
    /// Inputs no larger than one chunk, or under 4 KB, are encoded as a single
    /// block on the calling thread.  Unlike the block API there is no upper
    /// size limit: each chunk is within it.
    pub fn compress(&self, input: &[u8], level: u32) -> Result<Vec<u8>> {
        let options = CompressOptions {
            level: CompressionLevel::new(level)?,
            variant: self.variant,
            caps: self.caps,
        };
        if input.len() < MIN_BLOCK_SIZE {
            return Err(Error::InvalidBlockSize { size: input.len() });
        }
        let chunk_size = self.config.chunk_size;
        if input.len() <= chunk_size || input.len() < PARALLEL_MIN_INPUT {
            return Ok(compress_to_vec(&Block::chunk(input, &options)));
        }

        let chunks: Vec<&[u8]> = input.chunks(chunk_size).collect();
        let count = chunks.len();

        let guard = self.pool_read();
        let outputs: Vec<ChunkOutput> = match guard.as_ref() {
            Some(pool) => {
                crate::displaylevel!(
                    5,
                    "dispatching {} chunks of {} bytes to {} workers\n",
                    count,
                    chunk_size,
                    pool.workers()
                );
                let jobs = chunks.iter().enumerate().map(|(i, chunk)| {
                    let options = &options;
                    move || encode_chunk(chunk, options, i + 1 == count)
                });
                pool.run_ordered(jobs)?
                    .into_iter()
                    .enumerate()
                    .map(|(chunk, r)| r.map_err(|_| Error::WorkerFailed { chunk }))
                    .collect::<Result<_>>()?
            }
            None => chunks
                .iter()
                .enumerate()
                .map(|(i, chunk)| encode_chunk(chunk, &options, i + 1 == count))
                .collect(),
        };
        drop(guard);

        join_chunks(input, chunk_size, outputs)
    }
}

impl Drop for ParallelCompressor {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Multi-threaded block compression.

pub mod dispatcher;
pub mod pool;

pub use dispatcher::{DispatcherConfig, ParallelCompressor};
pub use pool::WorkerPool;

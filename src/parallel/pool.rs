//! Fixed-size worker pool with a bounded submission gate.
//!
//! Jobs run on a `rayon::ThreadPool`.  A pre-filled
//! `crossbeam_channel::bounded` channel acts as a counting semaphore: the
//! submitting thread takes a token before posting each job and the job hands
//! it back when it finishes, so at most `queue_depth` jobs are ever queued or
//! running at once.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use rayon::ThreadPool as RayonPool;

use crate::error::{Error, Result};

/// Returns its semaphore token when dropped, including on unwind.
struct Permit(Sender<()>);

impl Drop for Permit {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

/// Worker pool handle.  Dropping it joins the worker threads.
pub struct WorkerPool {
    pool: RayonPool,
    slot_tx: Sender<()>,
    slot_rx: Receiver<()>,
    workers: usize,
    queue_depth: usize,
}

impl WorkerPool {
    /// Build a pool of `workers` threads admitting `queue_depth` jobs at a
    /// time.  Both must be at least 1.
    pub fn new(workers: usize, queue_depth: usize) -> Result<Self> {
        if workers == 0 || queue_depth == 0 {
            return Err(Error::DispatcherUnavailable(format!(
                "need at least one worker and one queue slot (got {workers}, {queue_depth})"
            )));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lz4chain-worker-{i}"))
            .build()
            .map_err(|e| Error::DispatcherUnavailable(e.to_string()))?;

        let (slot_tx, slot_rx) = bounded(queue_depth);
        for _ in 0..queue_depth {
            slot_tx
                .send(())
                .map_err(|_| Error::DispatcherUnavailable("submission gate closed".into()))?;
        }

        Ok(WorkerPool {
            pool,
            slot_tx,
            slot_rx,
            workers,
            queue_depth,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_depth(&self) -> usize {
        self.queue_depth
    }

    /// Free submission slots right now.
    pub fn idle_slots(&self) -> usize {
        self.slot_rx.len()
    }

    /// Run every job on the pool and return their outcomes in submission
    /// order.
    ///
    /// The calling thread submits, blocking while the gate is full, and
    /// returns once every job has finished.  A panicking job is caught and
    /// reported as `Err` in its slot; the other jobs still run.
    pub fn run_ordered<'env, T, F, I>(&self, jobs: I) -> Result<Vec<thread::Result<T>>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> T + Send + 'env,
        T: Send + 'env,
    {
        let receivers = self.pool.in_place_scope(|scope| {
            let mut receivers = Vec::new();
            for job in jobs {
                self.slot_rx
                    .recv()
                    .map_err(|_| Error::DispatcherUnavailable("submission gate closed".into()))?;
                let permit = Permit(self.slot_tx.clone());
                let (tx, rx) = bounded(1);
                receivers.push(rx);
                scope.spawn(move |_| {
                    let _permit = permit;
                    let _ = tx.send(panic::catch_unwind(AssertUnwindSafe(job)));
                });
            }
            Ok::<_, Error>(receivers)
        })?;

        receivers
            .into_iter()
            .enumerate()
            .map(|(chunk, rx)| rx.recv().map_err(|_| Error::WorkerFailed { chunk }))
            .collect()
    }
}

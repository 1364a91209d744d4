//! Worker pool coordinator.
//!
//! This module defines the [`WorkerPool`] struct, which spawns a fixed set of
//! [`worker_loop`] tasks over one shared input queue and one shared output
//! queue, all observing the same [`CancelSignal`].
//!
//! A dedicated watcher task joins every worker. Once all of them have
//! returned, by draining the queue or by observing cancellation, the watcher
//! drops the last output sender. That closes the output queue exactly once and
//! lets the consumer's receive loop terminate.
//!
//! ```text
//! Running ──(all workers returned)──▶ AllWorkersDone ──(sender dropped)──▶ OutputClosed
//! ```

use crate::{
    error::{Error, Result},
    signal::CancelSignal,
    transform::{ResultItem, Transform, WorkItem},
    worker::{WorkerExit, share_jobs, worker_loop},
};
use core::{sync::atomic::Ordering, time::Duration};
use portable_atomic::AtomicUsize;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

/// Lifecycle of a single pool run. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoolState {
    Running,
    AllWorkersDone,
    OutputClosed,
}

/// Summary of how every worker in a pool exited, ordered by worker id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolReport {
    pub exits: Vec<WorkerExit>,
}

impl PoolReport {
    /// Total number of results written to the output queue.
    pub fn processed(&self) -> usize {
        self.exits.iter().map(WorkerExit::processed).sum()
    }

    /// Number of workers that stopped because the signal fired.
    pub fn cancelled(&self) -> usize {
        self.exits.iter().filter(|exit| exit.is_cancelled()).count()
    }

    /// Number of workers that found the input queue closed and empty.
    pub fn drained(&self) -> usize {
        self.exits
            .iter()
            .filter(|exit| matches!(exit, WorkerExit::Drained { .. }))
            .count()
    }
}

/// A fixed-size pool of cancellable workers. Single use: [`Self::spawn`]
/// consumes it.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    num_workers: usize,
    signal: CancelSignal,
}

impl WorkerPool {
    pub const fn new(num_workers: usize, signal: CancelSignal) -> Self {
        Self {
            num_workers,
            signal,
        }
    }

    /// Spawns the workers and their watcher.
    ///
    /// `results` is moved into the pool: each worker holds a clone and the
    /// watcher holds the original, so the output queue closes only after the
    /// watcher has seen every worker return.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<T>(
        self,
        jobs: mpsc::Receiver<WorkItem>,
        results: mpsc::Sender<ResultItem>,
        transform: T,
        latency: Duration,
    ) -> PoolHandle
    where
        T: Transform,
    {
        let jobs = share_jobs(jobs);
        let transform = Arc::new(transform);
        let finished = Arc::new(AtomicUsize::new(0));
        let (state_tx, state_rx) = watch::channel(PoolState::Running);

        let mut handles = Vec::with_capacity(self.num_workers);
        for worker_id in 0..self.num_workers {
            let work = worker_loop(
                worker_id,
                Arc::clone(&jobs),
                results.clone(),
                self.signal.clone(),
                Arc::clone(&transform),
                latency,
            );
            let finished = Arc::clone(&finished);

            handles.push(tokio::spawn(async move {
                let exit = work.await;
                finished.fetch_add(1, Ordering::AcqRel);
                exit
            }));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Spawned {} workers", self.num_workers);

        let watcher = tokio::spawn(watch_workers(handles, results, state_tx));

        PoolHandle {
            num_workers: self.num_workers,
            finished,
            state: state_rx,
            watcher,
        }
    }
}

/// Joins every worker, then closes the output queue.
async fn watch_workers(
    handles: Vec<JoinHandle<WorkerExit>>,
    results: mpsc::Sender<ResultItem>,
    state: watch::Sender<PoolState>,
) -> Result<PoolReport> {
    let joined = futures::future::join_all(handles).await;

    state.send_replace(PoolState::AllWorkersDone);
    #[cfg(feature = "tracing")]
    tracing::debug!("All {} workers done, closing output queue", joined.len());

    drop(results);
    state.send_replace(PoolState::OutputClosed);

    let mut exits = Vec::with_capacity(joined.len());
    for (worker_id, res) in joined.into_iter().enumerate() {
        match res {
            Ok(exit) => exits.push(exit),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {worker_id} did not exit cleanly: {_e}");
                return Err(Error::WorkerPanicked { worker_id });
            }
        }
    }

    Ok(PoolReport { exits })
}

/// Handle to a running pool.
#[derive(Debug)]
pub struct PoolHandle {
    num_workers: usize,
    finished: Arc<AtomicUsize>,
    state: watch::Receiver<PoolState>,
    watcher: JoinHandle<Result<PoolReport>>,
}

impl PoolHandle {
    pub const fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Number of workers whose loop has returned so far.
    pub fn finished_workers(&self) -> usize {
        self.finished.load(Ordering::Acquire)
    }

    pub fn state(&self) -> PoolState {
        *self.state.borrow()
    }

    /// A receiver that is notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<PoolState> {
        self.state.clone()
    }

    /// Waits for the watcher to close the output queue.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker or the watcher itself panicked.
    pub async fn join(self) -> Result<PoolReport> {
        self.watcher.await.map_err(|e| Error::ChannelError {
            context: format!("Pool watcher failed: {e}"),
        })?
    }
}

use crate::{
    signal::CancelSignal,
    transform::{ResultItem, Transform, WorkItem},
};
use core::time::Duration;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// The input queue as seen by workers.
///
/// Tokio's bounded channel has a single receiver, so workers take turns
/// holding it. `recv` is cancel-safe, so a worker that loses the race to the
/// cancel signal while waiting never swallows an item.
pub type SharedJobs = Arc<Mutex<mpsc::Receiver<WorkItem>>>;

/// Wraps the receiving half of the input queue for sharing between workers.
pub fn share_jobs(rx: mpsc::Receiver<WorkItem>) -> SharedJobs {
    Arc::new(Mutex::new(rx))
}

/// How a worker loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// The input queue was closed and empty.
    Drained { worker_id: usize, processed: usize },
    /// The cancel signal fired before the next item was pulled.
    Cancelled { worker_id: usize, processed: usize },
    /// The output queue's consumer went away; the last result was dropped.
    OutputClosed { worker_id: usize, processed: usize },
}

impl WorkerExit {
    pub const fn worker_id(&self) -> usize {
        match *self {
            Self::Drained { worker_id, .. }
            | Self::Cancelled { worker_id, .. }
            | Self::OutputClosed { worker_id, .. } => worker_id,
        }
    }

    /// Number of results this worker wrote to the output queue.
    pub const fn processed(&self) -> usize {
        match *self {
            Self::Drained { processed, .. }
            | Self::Cancelled { processed, .. }
            | Self::OutputClosed { processed, .. } => processed,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Worker task that pulls [`WorkItem`]s until the queue drains or the signal
/// fires.
///
/// Each iteration waits on two sources at once: the next item from `jobs` and
/// the cancel signal. When both are ready the signal wins, so no new item is
/// started after cancellation has been observed. Cancellation is only checked
/// at the top of the loop: the simulated `latency` and the write to `results`
/// run to completion once an item has been pulled, and a worker blocked on a
/// full output queue stays blocked until the consumer frees a slot.
///
/// # Arguments
///
/// - `worker_id`: Identifier for this worker (used for logs/tracing).
/// - `jobs`: Shared input queue.
/// - `results`: Output queue. Dropped when the loop returns.
/// - `signal`: Pool-wide cancel signal.
/// - `transform`: Mapping applied to each item.
/// - `latency`: Simulated processing time per item.
pub async fn worker_loop<T>(
    worker_id: usize,
    jobs: SharedJobs,
    results: mpsc::Sender<ResultItem>,
    signal: CancelSignal,
    transform: Arc<T>,
    latency: Duration,
) -> WorkerExit
where
    T: Transform,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    let mut processed = 0;

    loop {
        let next = tokio::select! {
            biased;

            () = signal.fired() => {
                #[cfg(feature = "tracing")]
                tracing::info!("Worker {worker_id} cancelled after {processed} items");
                return WorkerExit::Cancelled { worker_id, processed };
            }
            item = recv_next(&jobs) => item,
        };

        let Some(item) = next else {
            #[cfg(feature = "tracing")]
            tracing::trace!("Worker {worker_id} drained after {processed} items");
            return WorkerExit::Drained {
                worker_id,
                processed,
            };
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Err(_e) = results.send(transform.apply(item)).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("Worker {worker_id} failed to send result: {_e}");
            return WorkerExit::OutputClosed {
                worker_id,
                processed,
            };
        }

        processed += 1;
    }
}

async fn recv_next(jobs: &SharedJobs) -> Option<WorkItem> {
    jobs.lock().await.recv().await
}

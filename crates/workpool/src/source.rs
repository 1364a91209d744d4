//! Finite, ordered producer of work items.
//!
//! A [`JobSource`] pushes its items onto the input queue in order, waiting
//! whenever the queue is full, and then drops its sender so that workers see
//! the queue close. The producer does not watch the pool's cancel signal: if
//! the pool is cancelled mid-stream it keeps sending until every receiver is
//! gone, at which point the send fails and the task ends.

use crate::transform::WorkItem;
use tokio::{sync::mpsc, task::JoinHandle};

/// An ordered, finite sequence of [`WorkItem`]s.
#[derive(Clone, Debug)]
pub struct JobSource {
    items: Vec<WorkItem>,
}

impl JobSource {
    /// Yields `1..=count` in ascending order.
    pub fn sequential(count: u64) -> Self {
        Self {
            items: (1..=count).collect(),
        }
    }

    /// Yields `items` in iteration order.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = WorkItem>,
    {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sends every item, then closes the queue by dropping `tx`.
    ///
    /// Returns the number of items that were accepted by the queue. This is
    /// less than [`Self::len`] only if all receivers were dropped first.
    pub async fn run(self, tx: mpsc::Sender<WorkItem>) -> usize {
        let mut sent = 0;

        for item in self.items {
            if let Err(_e) = tx.send(item).await {
                #[cfg(feature = "tracing")]
                tracing::debug!("Job source stopped after {sent} items: {_e}");
                return sent;
            }
            sent += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("Job source sent {sent} items, closing input queue");

        sent
    }

    /// Runs [`Self::run`] as a detached Tokio task.
    pub fn spawn(self, tx: mpsc::Sender<WorkItem>) -> JoinHandle<usize> {
        tokio::spawn(self.run(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_items_in_order_then_closes() {
        let (tx, mut rx) = mpsc::channel(5);
        let handle = JobSource::sequential(5).spawn(tx);

        let mut seen = Vec::new();
        while let Some(item) = rx.recv().await {
            seen.push(item);
        }

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(handle.await.unwrap(), 5);
    }

    #[tokio::test]
    async fn blocks_on_full_queue_until_drained() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = JobSource::from_items([9, 8, 7]).spawn(tx);

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        let mut seen = Vec::new();
        while let Some(item) = rx.recv().await {
            seen.push(item);
        }

        assert_eq!(seen, vec![9, 8, 7]);
        assert_eq!(handle.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(2);
        drop(rx);

        let sent = JobSource::sequential(5).run(tx).await;
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn empty_source_closes_immediately() {
        let (tx, mut rx) = mpsc::channel(1);
        let source = JobSource::sequential(0);
        assert!(source.is_empty());

        assert_eq!(source.run(tx).await, 0);
        assert_eq!(rx.recv().await, None);
    }
}
